//! AddCommentHandler - Attaches a note to a goal or key result.

use std::sync::Arc;

use tracing::info;

use super::{load_goal, load_with_goal};
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::DomainError;
use crate::domain::goal::{comment_text, Comment, CommentTarget};
use crate::ports::{CommentStore, GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to add a comment.
#[derive(Debug, Clone)]
pub struct AddCommentCommand {
    pub target: CommentTarget,
    pub text: String,
}

/// Handler for adding comments.
pub struct AddCommentHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
    comments: Arc<dyn CommentStore>,
}

impl AddCommentHandler {
    pub fn new(
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            goals,
            key_results,
            statuses,
            comments,
        }
    }

    pub async fn handle(&self, cmd: AddCommentCommand) -> Result<Comment, DomainError> {
        let text = comment_text(&cmd.text)?;

        let goal = match cmd.target {
            CommentTarget::Goal(goal_id) => load_goal(self.goals.as_ref(), goal_id).await?,
            CommentTarget::KeyResult(id) => {
                load_with_goal(self.goals.as_ref(), self.key_results.as_ref(), id)
                    .await?
                    .1
            }
        };

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "add_comment",
        )
        .await?;

        let comment = self.comments.add(cmd.target, &text).await?;

        info!(
            comment_id = comment.id.value(),
            goal_id = goal.id.value(),
            "comment added"
        );

        Ok(comment)
    }
}
