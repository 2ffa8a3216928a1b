//! PostgreSQL implementation of TeamPeriodStatusStore.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{db_err, parse_column};
use crate::domain::foundation::{DomainError, PeriodId, TeamId};
use crate::domain::period::TeamPeriodStatus;
use crate::ports::TeamPeriodStatusStore;

/// PostgreSQL implementation of TeamPeriodStatusStore.
#[derive(Clone)]
pub struct PostgresTeamPeriodStatusStore {
    pool: PgPool,
}

impl PostgresTeamPeriodStatusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamPeriodStatusStore for PostgresTeamPeriodStatusStore {
    async fn get(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
    ) -> Result<TeamPeriodStatus, DomainError> {
        let row = sqlx::query(
            "SELECT status FROM team_period_statuses WHERE team_id = $1 AND period_id = $2",
        )
        .bind(team_id.value())
        .bind(period_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to fetch team period status"))?;

        match row {
            Some(row) => {
                let status: String = row.get("status");
                parse_column("status", &status)
            }
            None => Ok(TeamPeriodStatus::default()),
        }
    }

    async fn set(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        status: TeamPeriodStatus,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO team_period_statuses (team_id, period_id, status)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, period_id) DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = NOW()
            "#,
        )
        .bind(team_id.value())
        .bind(period_id.value())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to save team period status"))?;

        Ok(())
    }

    async fn list_for_period(
        &self,
        period_id: PeriodId,
    ) -> Result<HashMap<TeamId, TeamPeriodStatus>, DomainError> {
        let rows = sqlx::query(
            "SELECT team_id, status FROM team_period_statuses WHERE period_id = $1",
        )
        .bind(period_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch team period statuses"))?;

        rows.iter()
            .map(|row| {
                let status: String = row.get("status");
                Ok((
                    TeamId::new(row.get("team_id")),
                    parse_column("status", &status)?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, StateMachine};

    #[test]
    fn every_saved_status_reads_back() {
        for status in TeamPeriodStatus::all() {
            let read: TeamPeriodStatus = parse_column("status", status.as_str()).unwrap();
            assert_eq!(read, *status);
        }
    }

    #[test]
    fn unknown_stored_status_is_a_database_error() {
        let err = parse_column::<TeamPeriodStatus>("status", "archived").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
