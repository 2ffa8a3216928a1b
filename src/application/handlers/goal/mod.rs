//! Goal command handlers.

mod create_goal;
mod delete_goal;
mod share_goal;
mod update_goal;

pub use create_goal::{CreateGoalCommand, CreateGoalHandler, CreateGoalResult};
pub use delete_goal::{DeleteGoalCommand, DeleteGoalHandler, DeleteGoalOutcome};
pub use share_goal::{ShareGoalCommand, ShareGoalHandler, ShareGoalResult};
pub use update_goal::{UpdateGoalCommand, UpdateGoalHandler};
