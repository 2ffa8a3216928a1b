//! Progress module - Pure completion scoring.

mod calculator;

pub use calculator::ProgressCalculator;
