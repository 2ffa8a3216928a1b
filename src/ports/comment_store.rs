//! Comment store port.

use crate::domain::foundation::DomainError;
use crate::domain::goal::{Comment, CommentTarget};
use async_trait::async_trait;

/// Storage port for goal and key-result comments.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Append a comment.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` / `KeyResultNotFound` if the target doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn add(&self, target: CommentTarget, text: &str) -> Result<Comment, DomainError>;

    /// Comments on a target, newest first.
    async fn list(&self, target: CommentTarget) -> Result<Vec<Comment>, DomainError>;
}
