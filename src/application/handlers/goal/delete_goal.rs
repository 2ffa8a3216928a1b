//! DeleteGoalHandler - Command handler for removing a goal from a team.
//!
//! From a share team's view only that team's share is dropped. From the
//! owner's view, a goal that other teams still carry passes to the first
//! share holder instead of being deleted.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, ErrorCode, GoalId, TeamId};
use crate::ports::{GoalRepository, GoalShareLedger, TeamPeriodStatusStore};

/// Command to delete a goal, or drop it from one team.
#[derive(Debug, Clone)]
pub struct DeleteGoalCommand {
    pub goal_id: GoalId,
    /// Team on whose behalf the delete is made; the owner when `None`.
    pub as_team: Option<TeamId>,
}

/// What the delete did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteGoalOutcome {
    /// The goal and everything under it is gone.
    Deleted,
    /// The owner let go; `new_owner` took the goal at its share weight.
    OwnershipTransferred { new_owner: TeamId },
    /// A share team dropped the goal from its list.
    ShareRemoved,
}

/// Handler for deleting goals.
pub struct DeleteGoalHandler {
    goals: Arc<dyn GoalRepository>,
    ledger: Arc<dyn GoalShareLedger>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl DeleteGoalHandler {
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

    pub async fn handle(&self, cmd: DeleteGoalCommand) -> Result<DeleteGoalOutcome, DomainError> {
        let goal = self.goals.find_by_id(cmd.goal_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::GoalNotFound,
                format!("Goal {} not found", cmd.goal_id),
            )
        })?;
        let team_id = cmd.as_team.unwrap_or(goal.team_id);

        ensure_open(self.statuses.as_ref(), team_id, goal.period_id, "delete_goal").await?;

        let outcome = if !goal.is_owned_by(team_id) {
            self.ledger.remove_share(goal.id, team_id).await?;
            DeleteGoalOutcome::ShareRemoved
        } else {
            match self.ledger.list_shares(goal.id).await?.first() {
                Some(heir) => {
                    self.ledger.promote_to_owner(heir).await?;
                    DeleteGoalOutcome::OwnershipTransferred {
                        new_owner: heir.team_id,
                    }
                }
                None => {
                    self.goals.delete(goal.id).await?;
                    DeleteGoalOutcome::Deleted
                }
            }
        };

        info!(
            goal_id = goal.id.value(),
            team_id = team_id.value(),
            outcome = ?outcome,
            "goal deleted"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{w, Fixture};
    use crate::domain::period::TeamPeriodStatus;

    fn handler(fx: &Fixture) -> DeleteGoalHandler {
        DeleteGoalHandler::new(fx.store.clone(), fx.store.clone(), fx.store.clone())
    }

    #[tokio::test]
    async fn unshared_goal_is_deleted() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Solo", 20).await;

        let outcome = handler(&fx)
            .handle(DeleteGoalCommand {
                goal_id: goal.id,
                as_team: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome, DeleteGoalOutcome::Deleted);
        assert!(fx.stored_goal(goal.id).await.is_none());
    }

    #[tokio::test]
    async fn owner_delete_hands_goal_to_first_share() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 20).await;
        fx.share(&goal, &[(fx.alpha.id, 20), (fx.beta.id, 7)]).await;

        let outcome = handler(&fx)
            .handle(DeleteGoalCommand {
                goal_id: goal.id,
                as_team: None,
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DeleteGoalOutcome::OwnershipTransferred {
                new_owner: fx.beta.id
            }
        );
        let stored = fx.stored_goal(goal.id).await.unwrap();
        assert_eq!(stored.team_id, fx.beta.id);
        assert_eq!(stored.weight, w(7));
        assert!(fx.store.list_shares(goal.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn share_team_delete_drops_only_its_share() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 20).await;
        fx.share(&goal, &[(fx.alpha.id, 20), (fx.beta.id, 7)]).await;

        let outcome = handler(&fx)
            .handle(DeleteGoalCommand {
                goal_id: goal.id,
                as_team: Some(fx.beta.id),
            })
            .await
            .unwrap();

        assert_eq!(outcome, DeleteGoalOutcome::ShareRemoved);
        let stored = fx.stored_goal(goal.id).await.unwrap();
        assert_eq!(stored.team_id, fx.alpha.id);
        assert!(fx.store.list_shares(goal.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_period_blocks_delete() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Kept", 20).await;
        fx.set_status(&fx.alpha, TeamPeriodStatus::Closed).await;

        let err = handler(&fx)
            .handle(DeleteGoalCommand {
                goal_id: goal.id,
                as_team: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::PeriodClosed);
        assert!(fx.stored_goal(goal.id).await.is_some());
    }
}
