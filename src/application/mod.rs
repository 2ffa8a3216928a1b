//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Rollup queries
    GetGoalDetailHandler, GetGoalDetailQuery, GetHierarchyHandler, GetHierarchyQuery,
    GetHierarchyRollupHandler, GetHierarchyRollupQuery, GetTeamRollupHandler, GetTeamRollupQuery,
    ListShareCandidatesHandler, ListShareCandidatesQuery,
    // Goal commands
    CreateGoalCommand, CreateGoalHandler, CreateGoalResult, DeleteGoalCommand, DeleteGoalHandler,
    DeleteGoalOutcome, ShareGoalCommand, ShareGoalHandler, ShareGoalResult, UpdateGoalCommand,
    UpdateGoalHandler,
    // Key result commands
    AddCheckpointCommand, AddCheckpointHandler, AddCommentCommand, AddCommentHandler,
    CreateKeyResultCommand, CreateKeyResultHandler, DeleteKeyResultCommand,
    DeleteKeyResultHandler, RecordProgressCommand, RecordProgressHandler, RecordProgressResult,
    UpdateKeyResultCommand, UpdateKeyResultHandler, UpdateKeyResultWeightsCommand,
    UpdateKeyResultWeightsHandler,
    // Status and ordering
    MoveItemCommand, MoveItemHandler, SetTeamPeriodStatusCommand, SetTeamPeriodStatusHandler,
    SetTeamPeriodStatusResult,
};
