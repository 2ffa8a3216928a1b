//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `rollup` - Hierarchy, team and goal read models
//! - `goal` - Goal lifecycle and sharing
//! - `key_result` - Key results, progress reports, checkpoints, comments
//! - `status` - Explicit team period status changes
//! - `ordering` - One-step sibling moves

pub mod goal;
pub mod key_result;
pub mod ordering;
pub mod rollup;
pub mod status;

mod status_gate;

#[cfg(test)]
pub(crate) mod test_support;

pub use goal::{
    CreateGoalCommand, CreateGoalHandler, CreateGoalResult, DeleteGoalCommand, DeleteGoalHandler,
    DeleteGoalOutcome, ShareGoalCommand, ShareGoalHandler, ShareGoalResult, UpdateGoalCommand,
    UpdateGoalHandler,
};
pub use key_result::{
    AddCheckpointCommand, AddCheckpointHandler, AddCommentCommand, AddCommentHandler,
    CreateKeyResultCommand, CreateKeyResultHandler, DeleteKeyResultCommand,
    DeleteKeyResultHandler, RecordProgressCommand, RecordProgressHandler, RecordProgressResult,
    UpdateKeyResultCommand, UpdateKeyResultHandler, UpdateKeyResultWeightsCommand,
    UpdateKeyResultWeightsHandler,
};
pub use ordering::{MoveItemCommand, MoveItemHandler};
pub use rollup::{
    GetGoalDetailHandler, GetGoalDetailQuery, GetHierarchyHandler, GetHierarchyQuery,
    GetHierarchyRollupHandler, GetHierarchyRollupQuery, GetTeamRollupHandler, GetTeamRollupQuery,
    ListShareCandidatesHandler, ListShareCandidatesQuery,
};
pub use status::{
    SetTeamPeriodStatusCommand, SetTeamPeriodStatusHandler, SetTeamPeriodStatusResult,
};
