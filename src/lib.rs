//! OKR Engine - Progress and rollup engine for team objectives
//!
//! This crate scores key results under four measurement models, rolls goal
//! progress up through a team hierarchy, keeps the ledger of goals shared
//! between teams and sequences sibling order, gated by each team's lifecycle
//! status for a period.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
