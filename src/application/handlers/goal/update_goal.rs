//! UpdateGoalHandler - Command handler for editing goals.
//!
//! Text and classification fields live on the goal itself. The weight is
//! per team: an edit made from the owner's view sets the goal weight, an edit
//! made from a share team's view sets that team's share weight.

use std::sync::Arc;

use tracing::info;

use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, ErrorCode, GoalId, TeamId};
use crate::domain::goal::{Goal, GoalDraft};
use crate::ports::{GoalRepository, GoalShareLedger, TeamPeriodStatusStore};

/// Command to edit a goal.
#[derive(Debug, Clone)]
pub struct UpdateGoalCommand {
    pub goal_id: GoalId,
    /// Team on whose behalf the edit is made; the owner when `None`.
    pub as_team: Option<TeamId>,
    pub draft: GoalDraft,
}

/// Handler for editing goals.
pub struct UpdateGoalHandler {
    goals: Arc<dyn GoalRepository>,
    ledger: Arc<dyn GoalShareLedger>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl UpdateGoalHandler {
    pub fn new(
        goals: Arc<dyn GoalRepository>,
        ledger: Arc<dyn GoalShareLedger>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            goals,
            ledger,
            statuses,
        }
    }

    pub async fn handle(&self, cmd: UpdateGoalCommand) -> Result<Goal, DomainError> {
        let draft = cmd.draft.normalized()?;

        let mut goal = self.goals.find_by_id(cmd.goal_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::GoalNotFound,
                format!("Goal {} not found", cmd.goal_id),
            )
        })?;
        let team_id = cmd.as_team.unwrap_or(goal.team_id);

        ensure_open(self.statuses.as_ref(), team_id, goal.period_id, "update_goal").await?;

        let team_weight = draft.weight;
        let owner_weight = goal.weight;
        goal.apply(draft);

        if goal.is_owned_by(team_id) {
            self.goals.update(&goal).await?;
        } else {
            // Share weight first: a team without a share fails before any write.
            goal.weight = owner_weight;
            self.ledger
                .update_team_weight(goal.id, team_id, team_weight)
                .await?;
            self.goals.update(&goal).await?;
        }

        info!(
            goal_id = goal.id.value(),
            team_id = team_id.value(),
            weight = team_weight.value(),
            "goal updated"
        );

        Ok(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{goal_draft, w, Fixture};
    use crate::domain::period::TeamPeriodStatus;

    fn handler(fx: &Fixture) -> UpdateGoalHandler {
        UpdateGoalHandler::new(fx.store.clone(), fx.store.clone(), fx.store.clone())
    }

    #[tokio::test]
    async fn owner_edit_sets_goal_weight() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Old", 20).await;

        let updated = handler(&fx)
            .handle(UpdateGoalCommand {
                goal_id: goal.id,
                as_team: None,
                draft: goal_draft("New", 45),
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "New");
        let stored = fx.stored_goal(goal.id).await.unwrap();
        assert_eq!(stored.weight, w(45));
        assert_eq!(stored.sort_order, goal.sort_order);
    }

    #[tokio::test]
    async fn share_team_edit_sets_only_its_share_weight() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 20).await;
        fx.share(&goal, &[(fx.alpha.id, 20), (fx.beta.id, 5)]).await;

        handler(&fx)
            .handle(UpdateGoalCommand {
                goal_id: goal.id,
                as_team: Some(fx.beta.id),
                draft: goal_draft("Shared", 35),
            })
            .await
            .unwrap();

        let stored = fx.stored_goal(goal.id).await.unwrap();
        assert_eq!(stored.weight, w(20));
        let shares = fx.store.list_shares(goal.id).await.unwrap();
        assert_eq!(shares[0].weight, w(35));
    }

    #[tokio::test]
    async fn closed_period_rejects_and_leaves_goal_untouched() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Frozen", 20).await;
        fx.set_status(&fx.alpha, TeamPeriodStatus::Closed).await;

        let err = handler(&fx)
            .handle(UpdateGoalCommand {
                goal_id: goal.id,
                as_team: None,
                draft: goal_draft("Thawed", 90),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PeriodClosed);
        let stored = fx.stored_goal(goal.id).await.unwrap();
        assert_eq!(stored.title, "Frozen");
        assert_eq!(stored.weight, w(20));
    }
}
