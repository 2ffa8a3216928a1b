//! GetTeamRollupHandler - Query handler for one team's period summary.

use std::sync::Arc;

use super::goal_summaries::GoalSummaryReader;
use crate::domain::foundation::{DomainError, ErrorCode, PeriodId, TeamId};
use crate::domain::rollup::TeamSummary;
use crate::domain::team::TeamHierarchy;
use crate::ports::{
    GoalRepository, GoalShareLedger, KeyResultRepository, PeriodRepository,
    TeamPeriodStatusStore, TeamReader,
};

/// Query for a single team in a period.
#[derive(Debug, Clone)]
pub struct GetTeamRollupQuery {
    pub team_id: TeamId,
    pub period_id: PeriodId,
}

/// Handler for a single team's rollup.
///
/// The summary is reported at depth zero; contributing-team names still need
/// the full team list.
pub struct GetTeamRollupHandler {
    teams: Arc<dyn TeamReader>,
    periods: Arc<dyn PeriodRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
    summaries: GoalSummaryReader,
}

impl GetTeamRollupHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        periods: Arc<dyn PeriodRepository>,
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        ledger: Arc<dyn GoalShareLedger>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            teams,
            periods,
            statuses,
            summaries: GoalSummaryReader::new(goals, key_results, ledger),
        }
    }

    pub async fn handle(&self, query: GetTeamRollupQuery) -> Result<TeamSummary, DomainError> {
        if self.periods.find_by_id(query.period_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period {} not found", query.period_id),
            ));
        }

        let hierarchy = TeamHierarchy::build(self.teams.list_all().await?);
        let team = hierarchy.get(query.team_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::TeamNotFound,
                format!("Team {} not found", query.team_id),
            )
        })?;

        let status = self.statuses.get(team.id, query.period_id).await?;
        let goals = self
            .summaries
            .for_team(team.id, query.period_id, &hierarchy)
            .await?;

        Ok(TeamSummary::aggregate(team, 0, 0, status, goals))
    }
}
