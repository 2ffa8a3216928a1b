//! Period status gate shared by the mutating handlers.

use tracing::warn;

use crate::domain::foundation::{DomainError, ErrorCode, PeriodId, TeamId};
use crate::domain::period::TeamPeriodStatus;
use crate::ports::TeamPeriodStatusStore;

/// Loads the team's status for the period and refuses edits once it is closed.
///
/// # Errors
///
/// - `PeriodClosed` if the status is `closed`
pub(crate) async fn ensure_open(
    statuses: &dyn TeamPeriodStatusStore,
    team_id: TeamId,
    period_id: PeriodId,
    action: &'static str,
) -> Result<TeamPeriodStatus, DomainError> {
    let status = statuses.get(team_id, period_id).await?;
    if status.is_closed() {
        warn!(
            team_id = team_id.value(),
            period_id = period_id.value(),
            action,
            "edit rejected: period closed"
        );
        return Err(DomainError::new(
            ErrorCode::PeriodClosed,
            format!("Period {} is closed for team {}", period_id, team_id),
        )
        .with_detail("action", action));
    }
    Ok(status)
}
