//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the OKR domain.

mod errors;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;
mod weight;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CheckpointId, CommentId, GoalId, KeyResultId, PeriodId, StageId, TeamId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
pub use weight::Weight;
