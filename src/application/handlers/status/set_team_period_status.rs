//! SetTeamPeriodStatusHandler - Explicit status changes for a team's period.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, PeriodId, StateMachine, TeamId};
use crate::domain::period::TeamPeriodStatus;
use crate::ports::{PeriodRepository, TeamPeriodStatusStore, TeamReader};

/// Command to set a team's status for a period.
#[derive(Debug, Clone, Copy)]
pub struct SetTeamPeriodStatusCommand {
    pub team_id: TeamId,
    pub period_id: PeriodId,
    pub status: TeamPeriodStatus,
}

/// Status before and after the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetTeamPeriodStatusResult {
    pub previous: TeamPeriodStatus,
    pub status: TeamPeriodStatus,
}

/// Handler for status changes.
pub struct SetTeamPeriodStatusHandler {
    teams: Arc<dyn TeamReader>,
    periods: Arc<dyn PeriodRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl SetTeamPeriodStatusHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        periods: Arc<dyn PeriodRepository>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            teams,
            periods,
            statuses,
        }
    }

    pub async fn handle(
        &self,
        cmd: SetTeamPeriodStatusCommand,
    ) -> Result<SetTeamPeriodStatusResult, DomainError> {
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

        let previous = self.statuses.get(cmd.team_id, cmd.period_id).await?;
        let status = previous.transition_to(cmd.status)?;
        self.statuses.set(cmd.team_id, cmd.period_id, status).await?;

        info!(
            team_id = cmd.team_id.value(),
            period_id = cmd.period_id.value(),
            from = %previous,
            to = %status,
            "team period status changed"
        );

        Ok(SetTeamPeriodStatusResult { previous, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::Fixture;

    fn handler(fx: &Fixture) -> SetTeamPeriodStatusHandler {
        SetTeamPeriodStatusHandler::new(fx.store.clone(), fx.store.clone(), fx.store.clone())
    }

    fn command(fx: &Fixture, status: TeamPeriodStatus) -> SetTeamPeriodStatusCommand {
        SetTeamPeriodStatusCommand {
            team_id: fx.alpha.id,
            period_id: fx.period.id,
            status,
        }
    }

    #[tokio::test]
    async fn missing_row_reads_as_no_goals() {
        let fx = Fixture::new().await;

        let result = handler(&fx)
            .handle(command(&fx, TeamPeriodStatus::InProgress))
            .await
            .unwrap();

        assert_eq!(result.previous, TeamPeriodStatus::NoGoals);
        assert_eq!(fx.status(&fx.alpha).await, TeamPeriodStatus::InProgress);
    }

    #[tokio::test]
    async fn closed_period_can_be_reopened() {
        let fx = Fixture::new().await;
        fx.set_status(&fx.alpha, TeamPeriodStatus::Closed).await;

        let result = handler(&fx)
            .handle(command(&fx, TeamPeriodStatus::Forming))
            .await
            .unwrap();

        assert_eq!(
            result,
            SetTeamPeriodStatusResult {
                previous: TeamPeriodStatus::Closed,
                status: TeamPeriodStatus::Forming,
            }
        );
    }

    #[tokio::test]
    async fn status_is_per_team() {
        let fx = Fixture::new().await;

        handler(&fx)
            .handle(command(&fx, TeamPeriodStatus::Validated))
            .await
            .unwrap();

        assert_eq!(fx.status(&fx.beta).await, TeamPeriodStatus::NoGoals);
    }

    #[tokio::test]
    async fn unknown_period_is_not_found() {
        let fx = Fixture::new().await;
        let mut cmd = command(&fx, TeamPeriodStatus::Closed);
        cmd.period_id = PeriodId::new(777);

        let err = handler(&fx).handle(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::PeriodNotFound);
    }
}
