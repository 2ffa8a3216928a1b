//! UpdateKeyResultWeightsHandler - Bulk weight edit for a goal's key results.

use std::sync::Arc;

use tracing::info;

use super::load_goal;
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, GoalId, KeyResultId, Weight};
use crate::ports::{GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to set the weights of several key results of one goal.
#[derive(Debug, Clone)]
pub struct UpdateKeyResultWeightsCommand {
    pub goal_id: GoalId,
    pub weights: Vec<(KeyResultId, Weight)>,
}

/// Handler for bulk weight edits.
pub struct UpdateKeyResultWeightsHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl UpdateKeyResultWeightsHandler {
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

    pub async fn handle(&self, cmd: UpdateKeyResultWeightsCommand) -> Result<(), DomainError> {
        let goal = load_goal(self.goals.as_ref(), cmd.goal_id).await?;

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "update_key_result_weights",
        )
        .await?;

        // All or nothing.
        self.key_results
            .update_weights(goal.id, &cmd.weights)
            .await?;

        info!(
            goal_id = goal.id.value(),
            count = cmd.weights.len(),
            "key result weights updated"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{linear_draft, w, Fixture};
    use crate::domain::foundation::ErrorCode;

    fn handler(fx: &Fixture) -> UpdateKeyResultWeightsHandler {
        UpdateKeyResultWeightsHandler::new(fx.store.clone(), fx.store.clone(), fx.store.clone())
    }

    #[tokio::test]
    async fn sets_each_listed_weight() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        let a = fx.key_result(&goal, linear_draft("A", 10, 0.0)).await;
        let b = fx.key_result(&goal, linear_draft("B", 10, 0.0)).await;

        handler(&fx)
            .handle(UpdateKeyResultWeightsCommand {
                goal_id: goal.id,
                weights: vec![(a.id, w(75)), (b.id, w(25))],
            })
            .await
            .unwrap();

        let stored = fx.store.list_by_goal(goal.id).await.unwrap();
        assert_eq!(stored[0].weight, w(75));
        assert_eq!(stored[1].weight, w(25));
    }

    #[tokio::test]
    async fn key_result_of_another_goal_rejects_whole_batch() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        let other = fx.goal(&fx.alpha, "Other", 50).await;
        let mine = fx.key_result(&goal, linear_draft("Mine", 10, 0.0)).await;
        let theirs = fx.key_result(&other, linear_draft("Theirs", 10, 0.0)).await;

        let err = handler(&fx)
            .handle(UpdateKeyResultWeightsCommand {
                goal_id: goal.id,
                weights: vec![(mine.id, w(90)), (theirs.id, w(90))],
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::KeyResultNotFound);
        let stored = fx.store.list_by_goal(goal.id).await.unwrap();
        assert_eq!(stored[0].weight, w(10));
    }

    #[tokio::test]
    async fn unknown_id_after_valid_ones_leaves_weights_unchanged() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Ship", 50).await;
        let a = fx.key_result(&goal, linear_draft("A", 10, 0.0)).await;
        let b = fx.key_result(&goal, linear_draft("B", 20, 0.0)).await;

        let err = handler(&fx)
            .handle(UpdateKeyResultWeightsCommand {
                goal_id: goal.id,
                weights: vec![(a.id, w(60)), (b.id, w(30)), (KeyResultId::new(9999), w(10))],
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::KeyResultNotFound);
        let weights: Vec<Weight> = fx
            .store
            .list_by_goal(goal.id)
            .await
            .unwrap()
            .iter()
            .map(|kr| kr.weight)
            .collect();
        assert_eq!(weights, vec![w(10), w(20)]);
    }
}
