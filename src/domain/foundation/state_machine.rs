//! State machine trait for status enums.
//!
//! Status enums declare their full state set and which moves are legal; the
//! trait derives the list of reachable states and a validated transition.

use super::ValidationError;

/// Trait for status enums that represent state machines.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug + 'static {
    /// Every state, in lifecycle order.
    fn all() -> &'static [Self];

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state, in lifecycle order.
    fn valid_transitions(&self) -> Vec<Self> {
        Self::all()
            .iter()
            .copied()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Latch {
        Open,
        Locked,
    }

    impl StateMachine for Latch {
        fn all() -> &'static [Self] {
            &[Latch::Open, Latch::Locked]
        }

        fn can_transition_to(&self, target: &Self) -> bool {
            matches!((self, target), (Latch::Open, Latch::Locked))
        }
    }

    #[test]
    fn valid_transitions_are_derived_from_state_set() {
        assert_eq!(Latch::Open.valid_transitions(), vec![Latch::Locked]);
        assert!(Latch::Locked.valid_transitions().is_empty());
    }

    #[test]
    fn transition_to_rejects_disallowed_move() {
        assert_eq!(Latch::Open.transition_to(Latch::Locked), Ok(Latch::Locked));
        assert!(Latch::Locked.transition_to(Latch::Open).is_err());
    }

    #[test]
    fn terminal_state_has_no_exits() {
        assert!(Latch::Locked.is_terminal());
        assert!(!Latch::Open.is_terminal());
    }
}
