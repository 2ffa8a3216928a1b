//! ShareGoalHandler - Command handler for replacing a goal's contributors.
//!
//! The submitted list is the complete desired set, owner included. Anything
//! not in it loses its share.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, GoalId};
use crate::domain::goal::{SharePlan, ShareTarget};
use crate::ports::{GoalRepository, GoalShareLedger, TeamPeriodStatusStore, TeamReader};

/// Command to set the full contributor list of a goal.
#[derive(Debug, Clone)]
pub struct ShareGoalCommand {
    pub goal_id: GoalId,
    pub targets: Vec<ShareTarget>,
}

/// Result of a share replacement.
#[derive(Debug, Clone, Serialize)]
pub struct ShareGoalResult {
    pub plan: SharePlan,
    pub owner_changed: bool,
}

/// Handler for sharing goals.
pub struct ShareGoalHandler {
    teams: Arc<dyn TeamReader>,
    goals: Arc<dyn GoalRepository>,
    ledger: Arc<dyn GoalShareLedger>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl ShareGoalHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        goals: Arc<dyn GoalRepository>,
        ledger: Arc<dyn GoalShareLedger>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            teams,
            goals,
            ledger,
            statuses,
        }
    }

    pub async fn handle(&self, cmd: ShareGoalCommand) -> Result<ShareGoalResult, DomainError> {
        // 1. Load goal
        let goal = self.goals.find_by_id(cmd.goal_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::GoalNotFound,
                format!("Goal {} not found", cmd.goal_id),
            )
        })?;

        // 2. Resolve owner and shares
        let plan = SharePlan::resolve(goal.id, goal.team_id, &cmd.targets)?;

        // 3. Every target must exist. Teams new to the goal must accept shares;
        //    the owner and current share holders keep their place regardless.
        let current = self.ledger.list_shares(goal.id).await?;
        let statuses = self.statuses.list_for_period(goal.period_id).await?;
        for team_id in plan.team_ids() {
            if self.teams.find_by_id(team_id).await?.is_none() {
                return Err(DomainError::new(
                    ErrorCode::TeamNotFound,
                    format!("Team {} not found", team_id),
                ));
            }
            if goal.is_owned_by(team_id) || current.iter().any(|s| s.team_id == team_id) {
                continue;
            }
            let status = statuses.get(&team_id).copied().unwrap_or_default();
            if !status.accepts_shares() {
                warn!(
                    goal_id = goal.id.value(),
                    team_id = team_id.value(),
                    status = %status,
                    "share rejected: target locked"
                );
                return Err(DomainError::new(
                    ErrorCode::ShareTargetLocked,
                    format!("Team {} is {} for this period", team_id, status.label()),
                )
                .with_detail("team_id", team_id.to_string()));
            }
        }

        // 4. Apply atomically
        self.ledger.replace_shares(&plan).await?;

        let owner_changed = plan.changes_owner(goal.team_id);
        info!(
            goal_id = goal.id.value(),
            owner_id = plan.owner.team_id.value(),
            shares = plan.shares.len(),
            owner_changed,
            "goal shares replaced"
        );

        Ok(ShareGoalResult {
            plan,
            owner_changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{w, Fixture};
    use crate::domain::foundation::{TeamId, Weight};
    use crate::domain::period::TeamPeriodStatus;

    fn handler(fx: &Fixture) -> ShareGoalHandler {
        ShareGoalHandler::new(
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
        )
    }

    fn target(team: TeamId, weight: i64) -> ShareTarget {
        ShareTarget::new(team, w(weight))
    }

    #[tokio::test]
    async fn listed_shares_match_submitted_non_owner_targets() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 40).await;

        handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: vec![
                    target(fx.alpha.id, 40),
                    target(fx.beta.id, 10),
                    target(fx.cluster.id, 5),
                ],
            })
            .await
            .unwrap();

        let shares: Vec<(TeamId, Weight)> = fx
            .store
            .list_shares(goal.id)
            .await
            .unwrap()
            .iter()
            .map(|s| (s.team_id, s.weight))
            .collect();
        let mut expected = vec![(fx.beta.id, w(10)), (fx.cluster.id, w(5))];
        expected.sort_by_key(|(team, _)| *team);
        assert_eq!(shares, expected);
    }

    #[tokio::test]
    async fn dropping_owner_from_targets_moves_ownership_to_first_target() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Handover", 40).await;

        let result = handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: vec![target(fx.beta.id, 30), target(fx.cluster.id, 5)],
            })
            .await
            .unwrap();

        assert!(result.owner_changed);
        let stored = fx.stored_goal(goal.id).await.unwrap();
        assert_eq!(stored.team_id, fx.beta.id);
        assert_eq!(stored.weight, w(30));
    }

    #[tokio::test]
    async fn validated_target_rejects_whole_request() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 40).await;
        fx.set_status(&fx.beta, TeamPeriodStatus::Validated).await;

        let err = handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: vec![
                    target(fx.alpha.id, 40),
                    target(fx.cluster.id, 5),
                    target(fx.beta.id, 10),
                ],
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ShareTargetLocked);
        assert!(fx.store.list_shares(goal.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn locked_owner_can_still_reshare() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 40).await;
        fx.set_status(&fx.alpha, TeamPeriodStatus::Validated).await;

        let result = handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: vec![target(fx.alpha.id, 40), target(fx.beta.id, 10)],
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn locked_share_holder_survives_resubmission() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 40).await;
        fx.share(&goal, &[(fx.alpha.id, 40), (fx.beta.id, 10)]).await;
        fx.set_status(&fx.beta, TeamPeriodStatus::Validated).await;

        handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: vec![
                    target(fx.alpha.id, 40),
                    target(fx.beta.id, 12),
                    target(fx.cluster.id, 5),
                ],
            })
            .await
            .unwrap();

        let teams: Vec<TeamId> = fx
            .store
            .list_shares(goal.id)
            .await
            .unwrap()
            .iter()
            .map(|s| s.team_id)
            .collect();
        assert!(teams.contains(&fx.beta.id));
        assert!(teams.contains(&fx.cluster.id));
    }

    #[tokio::test]
    async fn locked_share_holder_does_not_unlock_other_teams() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 40).await;
        fx.share(&goal, &[(fx.alpha.id, 40), (fx.beta.id, 10)]).await;
        fx.set_status(&fx.beta, TeamPeriodStatus::Validated).await;
        fx.set_status(&fx.cluster, TeamPeriodStatus::Closed).await;

        let err = handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: vec![
                    target(fx.alpha.id, 40),
                    target(fx.beta.id, 10),
                    target(fx.cluster.id, 5),
                ],
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ShareTargetLocked);
        assert_eq!(err.details.get("team_id"), Some(&fx.cluster.id.to_string()));
    }

    #[tokio::test]
    async fn handover_places_goal_after_new_owner_goals() {
        let fx = Fixture::new().await;
        let handed = fx.goal(&fx.alpha, "Handed", 40).await;
        let native = fx.goal(&fx.beta, "Native", 20).await;

        handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: handed.id,
                targets: vec![target(fx.beta.id, 30)],
            })
            .await
            .unwrap();

        let order: Vec<(GoalId, i32)> = fx
            .store
            .list_for_team(fx.beta.id, fx.period.id)
            .await
            .unwrap()
            .iter()
            .map(|tg| (tg.goal.id, tg.sort_order))
            .collect();
        assert_eq!(
            order,
            vec![(native.id, native.sort_order), (handed.id, native.sort_order + 1)]
        );
    }

    #[tokio::test]
    async fn empty_target_list_is_a_validation_error() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 40).await;

        let err = handler(&fx)
            .handle(ShareGoalCommand {
                goal_id: goal.id,
                targets: Vec::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
