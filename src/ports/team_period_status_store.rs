//! Team period status store port.

use std::collections::HashMap;

use crate::domain::foundation::{DomainError, PeriodId, TeamId};
use crate::domain::period::TeamPeriodStatus;
use async_trait::async_trait;

/// Storage port for per-(team, period) status.
#[async_trait]
pub trait TeamPeriodStatusStore: Send + Sync {
    /// Status of a team in a period. A missing row reads as `NoGoals`.
    async fn get(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
    ) -> Result<TeamPeriodStatus, DomainError>;

    /// Upsert the status of a team in a period.
    async fn set(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        status: TeamPeriodStatus,
    ) -> Result<(), DomainError>;

    /// Every stored status for a period. Teams without a row are absent.
    async fn list_for_period(
        &self,
        period_id: PeriodId,
    ) -> Result<HashMap<TeamId, TeamPeriodStatus>, DomainError>;
}
