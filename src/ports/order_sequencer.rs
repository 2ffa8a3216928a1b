//! Order sequencer port.
//!
//! Moves one item a single step within its sibling group by swapping order
//! keys with the nearest sibling.
//!
//! # Concurrency
//!
//! Implementations must lock the moved row and its neighbor for the duration
//! of the swap (one transaction). Two concurrent moves in the same group must
//! serialize; neither may observe a half-applied swap, and the group must
//! never end up with two items sharing an order key that did not share one
//! before.

use crate::domain::foundation::DomainError;
use crate::domain::ordering::{MoveDirection, MoveOutcome, SequencedItem};
use async_trait::async_trait;

/// Sequencer port for sibling reordering.
#[async_trait]
pub trait OrderSequencer: Send + Sync {
    /// Move `item` one step.
    ///
    /// Reaching a boundary is not an error: the item stays put and
    /// `MoveOutcome::AtBoundary` is returned.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` / `KeyResultNotFound` / `PeriodNotFound` for a missing item
    /// - `DatabaseError` on persistence failure (nothing is applied)
    async fn move_item(
        &self,
        item: SequencedItem,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_sequencer_is_object_safe() {
        fn _accepts_dyn(_sequencer: &dyn OrderSequencer) {}
    }
}
