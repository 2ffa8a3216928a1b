//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `team` - Organization tree and its hierarchy walk
//! - `period` - Reporting periods and per-team period status
//! - `goal` - Goals, goal shares, key results and measurements
//! - `ordering` - Sibling order moves
//! - `progress` - Pure progress calculator
//! - `rollup` - Read-side summaries built from the above

pub mod foundation;
pub mod goal;
pub mod ordering;
pub mod period;
pub mod progress;
pub mod rollup;
pub mod team;
