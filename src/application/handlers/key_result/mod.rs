//! Key result command handlers.
//!
//! Every key result change is gated on the owning team's status for the
//! goal's period.

mod add_checkpoint;
mod add_comment;
mod create_key_result;
mod delete_key_result;
mod record_progress;
mod update_key_result;
mod update_weights;

pub use add_checkpoint::{AddCheckpointCommand, AddCheckpointHandler};
pub use add_comment::{AddCommentCommand, AddCommentHandler};
pub use create_key_result::{CreateKeyResultCommand, CreateKeyResultHandler};
pub use delete_key_result::{DeleteKeyResultCommand, DeleteKeyResultHandler};
pub use record_progress::{RecordProgressCommand, RecordProgressHandler, RecordProgressResult};
pub use update_key_result::{UpdateKeyResultCommand, UpdateKeyResultHandler};
pub use update_weights::{UpdateKeyResultWeightsCommand, UpdateKeyResultWeightsHandler};

use crate::domain::foundation::{DomainError, ErrorCode, GoalId, KeyResultId};
use crate::domain::goal::{Goal, KeyResult};
use crate::ports::{GoalRepository, KeyResultRepository};

async fn load_goal(goals: &dyn GoalRepository, goal_id: GoalId) -> Result<Goal, DomainError> {
    goals.find_by_id(goal_id).await?.ok_or_else(|| {
        DomainError::new(
            ErrorCode::GoalNotFound,
            format!("Goal {} not found", goal_id),
        )
    })
}

/// A key result together with the goal it hangs off.
async fn load_with_goal(
    goals: &dyn GoalRepository,
    key_results: &dyn KeyResultRepository,
    id: KeyResultId,
) -> Result<(KeyResult, Goal), DomainError> {
    let key_result = key_results.find_by_id(id).await?.ok_or_else(|| {
        DomainError::new(
            ErrorCode::KeyResultNotFound,
            format!("Key result {} not found", id),
        )
    })?;
    let goal = load_goal(goals, key_result.goal_id).await?;
    Ok((key_result, goal))
}
