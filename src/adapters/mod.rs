//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed repositories, ledger and sequencer
//! - `memory` - In-memory store for tests and local runs

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOkrStore;
pub use postgres::{
    PostgresCommentStore, PostgresGoalRepository, PostgresGoalShareLedger,
    PostgresKeyResultRepository, PostgresOrderSequencer, PostgresPeriodRepository,
    PostgresTeamPeriodStatusStore, PostgresTeamReader,
};
