//! CreateGoalHandler - Command handler for creating goals.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, ErrorCode, PeriodId, TeamId};
use crate::domain::goal::{Goal, GoalDraft};
use crate::domain::period::TeamPeriodStatus;
use crate::ports::{GoalRepository, PeriodRepository, TeamPeriodStatusStore, TeamReader};

/// Command to create a goal owned by a team.
#[derive(Debug, Clone)]
pub struct CreateGoalCommand {
    pub team_id: TeamId,
    pub period_id: PeriodId,
    pub draft: GoalDraft,
}

/// Result of successful goal creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGoalResult {
    pub goal: Goal,
    /// The team's status after creation.
    pub status: TeamPeriodStatus,
}

/// Handler for creating goals.
pub struct CreateGoalHandler {
    teams: Arc<dyn TeamReader>,
    periods: Arc<dyn PeriodRepository>,
    goals: Arc<dyn GoalRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl CreateGoalHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        periods: Arc<dyn PeriodRepository>,
        goals: Arc<dyn GoalRepository>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            teams,
            periods,
            goals,
            statuses,
        }
    }

    pub async fn handle(&self, cmd: CreateGoalCommand) -> Result<CreateGoalResult, DomainError> {
        // 1. Validate input
        let draft = cmd.draft.normalized()?;

        // 2. Team and period must exist
        if self.teams.find_by_id(cmd.team_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::TeamNotFound,
                format!("Team {} not found", cmd.team_id),
            ));
        }
        if self.periods.find_by_id(cmd.period_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::PeriodNotFound,
                format!("Period {} not found", cmd.period_id),
            ));
        }

        // 3. Closed periods refuse new goals
        let status =
            ensure_open(self.statuses.as_ref(), cmd.team_id, cmd.period_id, "create_goal").await?;

        // 4. Persist
        let goal = self.goals.create(cmd.team_id, cmd.period_id, &draft).await?;

        // 5. First goal moves the team out of no_goals
        let next = status.after_goal_created();
        if next != status {
            self.statuses.set(cmd.team_id, cmd.period_id, next).await?;
        }

        info!(
            goal_id = goal.id.value(),
            team_id = cmd.team_id.value(),
            period_id = cmd.period_id.value(),
            status = %next,
            "goal created"
        );

        Ok(CreateGoalResult { goal, status: next })
    }
}
