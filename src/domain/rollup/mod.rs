//! Rollup module - Read-side summaries for teams and goals.

mod summary;

pub use summary::{GoalDetail, GoalSummary, KeyResultView, ShareCandidate, TeamSummary};
