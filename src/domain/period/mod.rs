//! Period module - Reporting windows and per-team lifecycle status.

mod period;
mod status;

pub use period::Period;
pub use status::TeamPeriodStatus;
