//! Goal summaries for one team's list, shared by the rollup queries.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, PeriodId, TeamId};
use crate::domain::goal::contributing_teams;
use crate::domain::progress::ProgressCalculator;
use crate::domain::rollup::GoalSummary;
use crate::domain::team::TeamHierarchy;
use crate::ports::{GoalRepository, GoalShareLedger, KeyResultRepository};

/// Reads a team's goals and scores each from freshly loaded key results.
#[derive(Clone)]
pub(crate) struct GoalSummaryReader {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    ledger: Arc<dyn GoalShareLedger>,
}

impl GoalSummaryReader {
    pub fn new(
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        ledger: Arc<dyn GoalShareLedger>,
    ) -> Self {
        Self {
            goals,
            key_results,
            ledger,
        }
    }

    /// Owned and shared-in goals of the team, in the team's order. Each carries
    /// the team's effective weight.
    pub async fn for_team(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        hierarchy: &TeamHierarchy,
    ) -> Result<Vec<GoalSummary>, DomainError> {
        let team_goals = self.goals.list_for_team(team_id, period_id).await?;

        let mut summaries = Vec::with_capacity(team_goals.len());
        for team_goal in team_goals {
            let key_results = self.key_results.list_by_goal(team_goal.goal.id).await?;
            let shares = self.ledger.list_shares(team_goal.goal.id).await?;
            summaries.push(GoalSummary {
                id: team_goal.goal.id,
                title: team_goal.goal.title.clone(),
                priority: team_goal.goal.priority,
                weight: team_goal.weight,
                progress: ProgressCalculator::goal(&key_results),
                is_owned: team_goal.is_owned(),
                contributing_teams: contributing_teams(&team_goal.goal, &shares, hierarchy),
            });
        }
        Ok(summaries)
    }
}
