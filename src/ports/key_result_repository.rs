//! Key result repository port.
//!
//! The measurement payload is stored per kind; implementations assemble it
//! back into a `Measurement` on read.

use crate::domain::foundation::{DomainError, GoalId, KeyResultId, Weight};
use crate::domain::goal::{Checkpoint, CheckpointDraft, KeyResult, KeyResultDraft, ProgressUpdate};
use async_trait::async_trait;

/// Repository port for key results and their measurements.
#[async_trait]
pub trait KeyResultRepository: Send + Sync {
    /// Create a key result appended after the goal's other key results.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` if the goal doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn create(&self, goal_id: GoalId, draft: &KeyResultDraft)
        -> Result<KeyResult, DomainError>;

    /// Find a key result by its ID, measurement included.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: KeyResultId) -> Result<Option<KeyResult>, DomainError>;

    /// Key results of a goal ordered by sort order, then id.
    async fn list_by_goal(&self, goal_id: GoalId) -> Result<Vec<KeyResult>, DomainError>;

    /// Replace text, weight and measurement.
    ///
    /// The measurement is replaced wholesale. Percent checkpoints survive
    /// only when the key result stays percent-kind.
    ///
    /// # Errors
    ///
    /// - `KeyResultNotFound` if the key result doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, id: KeyResultId, draft: &KeyResultDraft)
        -> Result<KeyResult, DomainError>;

    /// Set the weights of several key results of one goal, all or nothing.
    ///
    /// # Errors
    ///
    /// - `KeyResultNotFound` if any id is missing or belongs to another goal;
    ///   no weight changes in that case
    /// - `DatabaseError` on persistence failure
    async fn update_weights(
        &self,
        goal_id: GoalId,
        weights: &[(KeyResultId, Weight)],
    ) -> Result<(), DomainError>;

    /// Persist a progress report already checked against the measurement.
    ///
    /// # Errors
    ///
    /// - `KeyResultNotFound` / `StageNotFound` if the target row is gone
    /// - `DatabaseError` on persistence failure
    async fn record_progress(
        &self,
        id: KeyResultId,
        update: &ProgressUpdate,
    ) -> Result<(), DomainError>;

    /// Add a checkpoint to a percent-kind key result.
    ///
    /// # Errors
    ///
    /// - `KeyResultNotFound` if the key result doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn add_checkpoint(
        &self,
        id: KeyResultId,
        checkpoint: &CheckpointDraft,
    ) -> Result<Checkpoint, DomainError>;

    /// Delete a key result with its payload and comments.
    ///
    /// # Errors
    ///
    /// - `KeyResultNotFound` if the key result doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: KeyResultId) -> Result<(), DomainError>;
}
