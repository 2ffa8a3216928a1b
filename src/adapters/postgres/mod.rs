//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresTeamReader` - Flat team list
//! - `PostgresPeriodRepository` - Periods and date lookup
//! - `PostgresGoalRepository` - Goal rows and per-team goal lists
//! - `PostgresKeyResultRepository` - Key results with per-kind payload tables
//! - `PostgresGoalShareLedger` - Transactional share replacement
//! - `PostgresTeamPeriodStatusStore` - Status upserts
//! - `PostgresOrderSequencer` - Row-locked order swaps
//! - `PostgresCommentStore` - Goal and key-result comments
//!
//! All adapters share one `PgPool`; see [`connect`].

mod comment_store;
mod goal_repository;
mod goal_share_ledger;
mod key_result_repository;
mod order_sequencer;
mod period_repository;
mod team_period_status_store;
mod team_reader;

pub use comment_store::PostgresCommentStore;
pub use goal_repository::PostgresGoalRepository;
pub use goal_share_ledger::PostgresGoalShareLedger;
pub use key_result_repository::PostgresKeyResultRepository;
pub use order_sequencer::PostgresOrderSequencer;
pub use period_repository::PostgresPeriodRepository;
pub use team_period_status_store::PostgresTeamPeriodStatusStore;
pub use team_reader::PostgresTeamReader;

use std::str::FromStr;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode, ValidationError, Weight};

/// Opens a connection pool and, when configured, applies pending migrations.
///
/// # Errors
///
/// - `DatabaseError` if the pool cannot connect or a migration fails
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(config.connection_url())
        .await
        .map_err(|e| DomainError::database("Failed to connect to database", e))?;

    if config.run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DomainError::database("Failed to run migrations", e))?;
        tracing::info!("database migrations applied");
    }

    Ok(pool)
}

// ════════════════════════════════════════════════════════════════════════════════
// Shared Row Helpers
// ════════════════════════════════════════════════════════════════════════════════

/// Maps a sqlx failure to `DatabaseError` with context.
pub(crate) fn db_err(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::database(context, e)
}

/// Parses a stored enum column; a bad value means the row is corrupt.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = ValidationError>,
{
    value.parse::<T>().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid value in column {}: {}", column, e),
        )
    })
}

/// Reads a stored weight column.
pub(crate) fn weight_column(column: &str, value: i32) -> Result<Weight, DomainError> {
    Weight::try_new(i64::from(value)).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid value in column {}: {}", column, e),
        )
    })
}

/// Stored form of a weight.
pub(crate) fn weight_param(weight: Weight) -> i32 {
    i32::from(weight.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::goal::{FocusType, Priority};
    use crate::domain::team::TeamType;

    #[test]
    fn stored_enum_columns_parse() {
        assert_eq!(parse_column::<Priority>("priority", "P0").unwrap(), Priority::P0);
        assert_eq!(
            parse_column::<FocusType>("focus_type", "SPEED_EFFICIENCY").unwrap(),
            FocusType::SpeedEfficiency
        );
        assert_eq!(parse_column::<TeamType>("type", "cluster").unwrap(), TeamType::Cluster);
    }

    #[test]
    fn corrupt_enum_column_names_the_column() {
        let err = parse_column::<Priority>("priority", "urgent").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Invalid value in column priority"));
    }

    #[test]
    fn weight_column_round_trips_with_weight_param() {
        let weight = weight_column("weight", 35).unwrap();
        assert_eq!(weight_param(weight), 35);
    }

    #[test]
    fn stored_weight_outside_range_is_corrupt() {
        let err = weight_column("weight", 250).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(weight_column("weight", -1).is_err());
    }

    #[test]
    fn sqlx_failures_become_database_errors() {
        let err = db_err("Failed to fetch goal")(sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("Failed to fetch goal"));
    }
}
