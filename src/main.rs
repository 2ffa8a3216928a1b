//! okr-engine - prints the hierarchy rollup for a period.
//!
//! Usage: `okr-engine [period-id] [root-team-id]`
//!
//! Without a period id the period covering today is used.

use std::error::Error;
use std::sync::Arc;

use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

use okr_engine::adapters::postgres::{
    self, PostgresGoalRepository, PostgresGoalShareLedger, PostgresKeyResultRepository,
    PostgresPeriodRepository, PostgresTeamPeriodStatusStore, PostgresTeamReader,
};
use okr_engine::application::{GetHierarchyRollupHandler, GetHierarchyRollupQuery};
use okr_engine::config::{AppConfig, LoggingConfig};
use okr_engine::domain::foundation::{PeriodId, TeamId};
use okr_engine::ports::PeriodRepository;

fn init_tracing(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging);

    let mut args = std::env::args().skip(1);
    let period_arg: Option<PeriodId> = args.next().map(|s| s.parse()).transpose()?;
    let root: Option<TeamId> = args.next().map(|s| s.parse()).transpose()?;

    let pool = postgres::connect(&config.database).await?;
    let periods = Arc::new(PostgresPeriodRepository::new(pool.clone()));

    let period_id = match period_arg {
        Some(id) => id,
        None => {
            let today = Local::now().date_naive();
            periods
                .find_for_date(today)
                .await?
                .map(|p| p.id)
                .ok_or_else(|| format!("no period covers {}", today))?
        }
    };
    info!(period_id = period_id.value(), root = ?root, "building rollup");

    let handler = GetHierarchyRollupHandler::new(
        Arc::new(PostgresTeamReader::new(pool.clone())),
        periods,
        Arc::new(PostgresGoalRepository::new(pool.clone())),
        Arc::new(PostgresKeyResultRepository::new(pool.clone())),
        Arc::new(PostgresGoalShareLedger::new(pool.clone())),
        Arc::new(PostgresTeamPeriodStatusStore::new(pool)),
        config.rollup.clone(),
    );

    let rows = handler
        .handle(GetHierarchyRollupQuery { period_id, root })
        .await?;
    println!("{}", serde_json::to_string_pretty(&rows)?);

    Ok(())
}
