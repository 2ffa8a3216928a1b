//! CreateKeyResultHandler - Command handler for adding key results.

use std::sync::Arc;

use tracing::info;

use super::load_goal;
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, GoalId};
use crate::domain::goal::{KeyResult, KeyResultDraft};
use crate::ports::{GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to add a key result to a goal.
#[derive(Debug, Clone)]
pub struct CreateKeyResultCommand {
    pub goal_id: GoalId,
    pub draft: KeyResultDraft,
}

/// Handler for creating key results.
pub struct CreateKeyResultHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl CreateKeyResultHandler {
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

    pub async fn handle(&self, cmd: CreateKeyResultCommand) -> Result<KeyResult, DomainError> {
        let draft = cmd.draft.normalized()?;
        let goal = load_goal(self.goals.as_ref(), cmd.goal_id).await?;

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "create_key_result",
        )
        .await?;

        let key_result = self.key_results.create(goal.id, &draft).await?;

        info!(
            key_result_id = key_result.id.value(),
            goal_id = goal.id.value(),
            kind = %key_result.kind(),
            "key result created"
        );

        Ok(key_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{linear_draft, project_draft, Fixture};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::goal::KeyResultKind;
    use crate::domain::period::TeamPeriodStatus;

    fn handler(fx: &Fixture) -> CreateKeyResultHandler {
        CreateKeyResultHandler::new(fx.store.clone(), fx.store.clone(), fx.store.clone())
    }

    #[tokio::test]
    async fn key_results_append_in_creation_order() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        let handler = handler(&fx);

        let first = handler
            .handle(CreateKeyResultCommand {
                goal_id: goal.id,
                draft: linear_draft("Users", 30, 10.0),
            })
            .await
            .unwrap();
        let second = handler
            .handle(CreateKeyResultCommand {
                goal_id: goal.id,
                draft: project_draft("Launch", 70, &[(50, true), (50, false)]),
            })
            .await
            .unwrap();

        assert_eq!(second.kind(), KeyResultKind::Project);
        assert!(second.sort_order > first.sort_order);
        let listed = fx.store.list_by_goal(goal.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
    }

    #[tokio::test]
    async fn closed_owner_blocks_creation() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        fx.set_status(&fx.alpha, TeamPeriodStatus::Closed).await;

        let err = handler(&fx)
            .handle(CreateKeyResultCommand {
                goal_id: goal.id,
                draft: linear_draft("Users", 30, 10.0),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PeriodClosed);
        assert!(fx.store.list_by_goal(goal.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_goal_is_not_found() {
        let fx = Fixture::new().await;
        let err = handler(&fx)
            .handle(CreateKeyResultCommand {
                goal_id: GoalId::new(404),
                draft: linear_draft("Users", 30, 10.0),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::GoalNotFound);
    }
}
