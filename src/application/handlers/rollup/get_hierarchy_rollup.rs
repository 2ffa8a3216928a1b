//! GetHierarchyRollupHandler - Query handler for the period rollup report.
//!
//! Walks the team tree in pre-order and emits one summary per team: status,
//! weighted progress over its goal list, goal count, total weight and the
//! goals themselves.

use std::sync::Arc;

use tracing::debug;

use super::goal_summaries::GoalSummaryReader;
use crate::config::RollupConfig;
use crate::domain::foundation::{DomainError, ErrorCode, PeriodId, TeamId};
use crate::domain::rollup::TeamSummary;
use crate::domain::team::TeamHierarchy;
use crate::ports::{
    GoalRepository, GoalShareLedger, KeyResultRepository, PeriodRepository,
    TeamPeriodStatusStore, TeamReader,
};

/// Query for the rollup of every team (or one subtree) in a period.
#[derive(Debug, Clone)]
pub struct GetHierarchyRollupQuery {
    pub period_id: PeriodId,
    pub root: Option<TeamId>,
}

/// Handler for the hierarchy rollup.
pub struct GetHierarchyRollupHandler {
    teams: Arc<dyn TeamReader>,
    periods: Arc<dyn PeriodRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
    summaries: GoalSummaryReader,
    config: RollupConfig,
}

impl GetHierarchyRollupHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        periods: Arc<dyn PeriodRepository>,
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        ledger: Arc<dyn GoalShareLedger>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
        config: RollupConfig,
    ) -> Self {
        Self {
            teams,
            periods,
            statuses,
            summaries: GoalSummaryReader::new(goals, key_results, ledger),
            config,
        }
    }

    pub async fn handle(
        &self,
        query: GetHierarchyRollupQuery,
    ) -> Result<Vec<TeamSummary>, DomainError> {
        // 1. Period must exist
        if self.periods.find_by_id(query.period_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period {} not found", query.period_id),
            ));
        }

        // 2. Rebuild the tree and walk it; a cycle aborts before any reads
        let hierarchy = TeamHierarchy::build(self.teams.list_all().await?);
        let entries = hierarchy.walk(query.root)?;
        let statuses = self.statuses.list_for_period(query.period_id).await?;

        // 3. One summary per team, in walk order
        let mut rows = Vec::with_capacity(entries.len());
        for entry in entries {
            let goals = self
                .summaries
                .for_team(entry.team.id, query.period_id, &hierarchy)
                .await?;
            let status = statuses.get(&entry.team.id).copied().unwrap_or_default();
            rows.push(TeamSummary::aggregate(
                entry.team,
                entry.depth,
                self.config.indent_unit,
                status,
                goals,
            ));
        }

        debug!(
            period_id = query.period_id.value(),
            teams = rows.len(),
            "hierarchy rollup built"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{linear_draft, project_draft, w, Fixture};
    use crate::domain::foundation::Percentage;
    use crate::domain::period::TeamPeriodStatus;

    fn handler(fx: &Fixture) -> GetHierarchyRollupHandler {
        GetHierarchyRollupHandler::new(
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
            fx.store.clone(),
            RollupConfig { indent_unit: 24 },
        )
    }

    #[tokio::test]
    async fn rows_follow_pre_order_with_indent() {
        let fx = Fixture::new().await;

        let rows = handler(&fx)
            .handle(GetHierarchyRollupQuery {
                period_id: fx.period.id,
                root: None,
            })
            .await
            .unwrap();

        let layout: Vec<(&str, usize, u32)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.depth, r.indent))
            .collect();
        assert_eq!(
            layout,
            vec![("Platform", 0, 0), ("Alpha", 1, 24), ("Beta", 1, 24)]
        );
    }

    #[tokio::test]
    async fn team_progress_weights_goals_by_effective_weight() {
        let fx = Fixture::new().await;
        // Alpha: 100% goal at weight 60, 50% goal at weight 40
        let done = fx.goal(&fx.alpha, "Done", 60).await;
        fx.key_result(&done, project_draft("Ship", 100, &[(100, true)]))
            .await;
        let half = fx.goal(&fx.alpha, "Half", 40).await;
        fx.key_result(&half, linear_draft("Adoption", 100, 50.0))
            .await;
        fx.set_status(&fx.alpha, TeamPeriodStatus::InProgress).await;

        let rows = handler(&fx)
            .handle(GetHierarchyRollupQuery {
                period_id: fx.period.id,
                root: Some(fx.alpha.id),
            })
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        let alpha = &rows[0];
        assert_eq!(alpha.depth, 0);
        assert_eq!(alpha.status, TeamPeriodStatus::InProgress);
        assert_eq!(alpha.progress, Percentage::new(80));
        assert_eq!(alpha.goal_count, 2);
        assert_eq!(alpha.total_weight, 100);
    }

    #[tokio::test]
    async fn shared_goal_counts_at_share_weight() {
        let fx = Fixture::new().await;
        let goal = fx.goal(&fx.alpha, "Shared", 70).await;
        fx.key_result(&goal, linear_draft("Latency", 100, 25.0)).await;
        fx.share(&goal, &[(fx.alpha.id, 70), (fx.beta.id, 10)]).await;

        let rows = handler(&fx)
            .handle(GetHierarchyRollupQuery {
                period_id: fx.period.id,
                root: Some(fx.beta.id),
            })
            .await
            .unwrap();

        let beta = &rows[0];
        assert_eq!(beta.total_weight, 10);
        assert_eq!(beta.goals[0].weight, w(10));
        assert!(!beta.goals[0].is_owned);
        assert_eq!(beta.goals[0].progress, Percentage::new(25));
        assert_eq!(beta.goals[0].contributing_teams.len(), 2);
    }

    #[tokio::test]
    async fn unknown_period_is_not_found() {
        let fx = Fixture::new().await;
        let err = handler(&fx)
            .handle(GetHierarchyRollupQuery {
                period_id: PeriodId::new(999),
                root: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PeriodNotFound);
    }

    #[tokio::test]
    async fn unknown_root_is_not_found() {
        let fx = Fixture::new().await;
        let err = handler(&fx)
            .handle(GetHierarchyRollupQuery {
                period_id: fx.period.id,
                root: Some(TeamId::new(999)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TeamNotFound);
    }
}
