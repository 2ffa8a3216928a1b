//! DeleteKeyResultHandler - Removes a key result with its payload and comments.

use std::sync::Arc;

use tracing::info;

use super::load_with_goal;
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, KeyResultId};
use crate::ports::{GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to delete a key result.
#[derive(Debug, Clone, Copy)]
pub struct DeleteKeyResultCommand {
    pub key_result_id: KeyResultId,
}

/// Handler for deleting key results.
pub struct DeleteKeyResultHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl DeleteKeyResultHandler {
    pub fn new(
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            goals,
            key_results,
            statuses,
        }
    }

    pub async fn handle(&self, cmd: DeleteKeyResultCommand) -> Result<(), DomainError> {
        let (key_result, goal) =
            load_with_goal(self.goals.as_ref(), self.key_results.as_ref(), cmd.key_result_id)
                .await?;

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "delete_key_result",
        )
        .await?;

        self.key_results.delete(key_result.id).await?;

        info!(
            key_result_id = key_result.id.value(),
            goal_id = goal.id.value(),
            "key result deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{linear_draft, Fixture};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::goal::CommentTarget;
    use crate::ports::CommentStore;

    fn handler(fx: &Fixture) -> DeleteKeyResultHandler {
        DeleteKeyResultHandler::new(fx.store.clone(), fx.store.clone(), fx.store.clone())
    }

    #[tokio::test]
    async fn delete_removes_key_result_and_its_comments() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        let kr = fx.key_result(&goal, linear_draft("Users", 30, 10.0)).await;
        fx.store
            .add(CommentTarget::KeyResult(kr.id), "on track")
            .await
            .unwrap();

        handler(&fx)
            .handle(DeleteKeyResultCommand {
                key_result_id: kr.id,
            })
            .await
            .unwrap();

        assert!(fx.store.list_by_goal(goal.id).await.unwrap().is_empty());
        assert!(fx
            .store
            .list(CommentTarget::KeyResult(kr.id))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        let kr = fx.key_result(&goal, linear_draft("Users", 30, 10.0)).await;
        let handler = handler(&fx);
        let cmd = DeleteKeyResultCommand {
            key_result_id: kr.id,
        };

        handler.handle(cmd).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::KeyResultNotFound);
    }
}
