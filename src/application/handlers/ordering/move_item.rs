//! MoveItemHandler - One-step reordering of goals, key results and periods.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::DomainError;
use crate::domain::ordering::{MoveDirection, MoveOutcome, SequencedItem};
use crate::ports::OrderSequencer;

/// Command to move an item one step.
#[derive(Debug, Clone, Copy)]
pub struct MoveItemCommand {
    pub item: SequencedItem,
    pub direction: MoveDirection,
}

/// Handler for reordering.
pub struct MoveItemHandler {
    sequencer: Arc<dyn OrderSequencer>,
}

impl MoveItemHandler {
    pub fn new(sequencer: Arc<dyn OrderSequencer>) -> Self {
        Self { sequencer }
    }

    pub async fn handle(&self, cmd: MoveItemCommand) -> Result<MoveOutcome, DomainError> {
        let outcome = self.sequencer.move_item(cmd.item, cmd.direction).await?;

        match outcome {
            MoveOutcome::Swapped { neighbor_id } => info!(
                item = cmd.item.kind(),
                id = cmd.item.raw_id(),
                neighbor_id,
                direction = %cmd.direction,
                "item moved"
            ),
            other => debug!(
                item = cmd.item.kind(),
                id = cmd.item.raw_id(),
                direction = %cmd.direction,
                outcome = ?other,
                "item not moved"
            ),
        }

        Ok(outcome)
    }
}
