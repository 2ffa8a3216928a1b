//! Rollup view models.
//!
//! Built fresh on every read from stored goals, shares and key results.
//! Nothing here is persisted.

use serde::Serialize;

use crate::domain::foundation::{GoalId, Percentage, TeamId, Weight};
use crate::domain::goal::{Comment, ContributingTeam, Goal, KeyResult, Priority};
use crate::domain::period::TeamPeriodStatus;
use crate::domain::progress::ProgressCalculator;
use crate::domain::team::{Team, TeamType};

/// One goal as it appears in a team's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalSummary {
    pub id: GoalId,
    pub title: String,
    pub priority: Priority,
    /// Effective weight for the team whose list this is.
    pub weight: Weight,
    pub progress: Percentage,
    /// False when the goal is shared into the team from another owner.
    pub is_owned: bool,
    pub contributing_teams: Vec<ContributingTeam>,
}

/// One team's standing for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamSummary {
    pub team_id: TeamId,
    pub name: String,
    pub team_type: TeamType,
    /// Depth below the walk's starting point.
    pub depth: usize,
    /// Display indent: depth × indent unit.
    pub indent: u32,
    pub status: TeamPeriodStatus,
    pub progress: Percentage,
    pub goal_count: usize,
    pub total_weight: u32,
    pub goals: Vec<GoalSummary>,
}

impl TeamSummary {
    /// Aggregates goal summaries into the team row.
    ///
    /// Progress is the weighted average of goal progress by effective weight.
    pub fn aggregate(
        team: &Team,
        depth: usize,
        indent_unit: u32,
        status: TeamPeriodStatus,
        goals: Vec<GoalSummary>,
    ) -> Self {
        let progress =
            ProgressCalculator::weighted_average(goals.iter().map(|g| (g.progress, g.weight)));
        let total_weight = goals.iter().map(|g| u32::from(g.weight.value())).sum();
        Self {
            team_id: team.id,
            name: team.name.clone(),
            team_type: team.team_type,
            depth,
            indent: (depth as u32).saturating_mul(indent_unit),
            status,
            progress,
            goal_count: goals.len(),
            total_weight,
            goals,
        }
    }
}

/// A key result with its computed progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyResultView {
    #[serde(flatten)]
    pub key_result: KeyResult,
    pub progress: Percentage,
    pub comments: Vec<Comment>,
}

/// Everything shown on a goal's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalDetail {
    pub goal: Goal,
    pub progress: Percentage,
    pub status: TeamPeriodStatus,
    pub key_results: Vec<KeyResultView>,
    pub comments: Vec<Comment>,
    pub contributing_teams: Vec<ContributingTeam>,
}

impl GoalDetail {
    /// Goal progress from the key results' freshly computed progress.
    pub fn assemble(
        goal: Goal,
        status: TeamPeriodStatus,
        key_results: Vec<KeyResultView>,
        comments: Vec<Comment>,
        contributing_teams: Vec<ContributingTeam>,
    ) -> Self {
        let progress = ProgressCalculator::weighted_average(
            key_results
                .iter()
                .map(|kr| (kr.progress, kr.key_result.weight)),
        );
        Self {
            goal,
            progress,
            status,
            key_results,
            comments,
            contributing_teams,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.status.is_closed()
    }
}

/// A team offered as a share target for a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareCandidate {
    pub team_id: TeamId,
    pub name: String,
    pub team_type: TeamType,
    pub depth: usize,
    pub indent: u32,
    pub status: TeamPeriodStatus,
    /// False when the team's status refuses new shares.
    pub eligible: bool,
    /// Owner or current share holder.
    pub selected: bool,
    /// Current effective weight, or the goal's weight as a suggestion.
    pub weight: Weight,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: i64, weight: i64, progress: u8) -> GoalSummary {
        GoalSummary {
            id: GoalId::new(id),
            title: format!("Goal {}", id),
            priority: Priority::P2,
            weight: Weight::try_new(weight).unwrap(),
            progress: Percentage::new(progress),
            is_owned: true,
            contributing_teams: Vec::new(),
        }
    }

    #[test]
    fn aggregate_weights_goal_progress() {
        let team = Team::new(TeamId::new(1), "Core", TeamType::Unit, None);
        let row = TeamSummary::aggregate(
            &team,
            2,
            24,
            TeamPeriodStatus::InProgress,
            vec![summary(1, 60, 100), summary(2, 40, 50)],
        );
        assert_eq!(row.progress.value(), 80);
        assert_eq!(row.total_weight, 100);
        assert_eq!(row.goal_count, 2);
        assert_eq!(row.indent, 48);
    }

    #[test]
    fn aggregate_of_no_goals_is_zero() {
        let team = Team::new(TeamId::new(1), "Core", TeamType::Team, None);
        let row = TeamSummary::aggregate(&team, 0, 24, TeamPeriodStatus::NoGoals, Vec::new());
        assert_eq!(row.progress, Percentage::ZERO);
        assert_eq!(row.total_weight, 0);
    }
}
