//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Read Ports
//!
//! - `TeamReader` - Flat team list; the tree is rebuilt per request
//!
//! ## Repository Ports
//!
//! - `PeriodRepository` - Reporting periods, lookup by date
//! - `GoalRepository` - Goal rows and per-team goal lists
//! - `KeyResultRepository` - Key results with typed measurements
//! - `CommentStore` - Timestamped notes on goals and key results
//! - `TeamPeriodStatusStore` - Per-(team, period) lifecycle status
//!
//! ## Transactional Ports
//!
//! - `GoalShareLedger` - Replace-all share records and ownership moves
//! - `OrderSequencer` - Locked sibling order swaps

mod comment_store;
mod goal_repository;
mod goal_share_ledger;
mod key_result_repository;
mod order_sequencer;
mod period_repository;
mod team_period_status_store;
mod team_reader;

pub use comment_store::CommentStore;
pub use goal_repository::GoalRepository;
pub use goal_share_ledger::GoalShareLedger;
pub use key_result_repository::KeyResultRepository;
pub use order_sequencer::OrderSequencer;
pub use period_repository::PeriodRepository;
pub use team_period_status_store::TeamPeriodStatusStore;
pub use team_reader::TeamReader;
