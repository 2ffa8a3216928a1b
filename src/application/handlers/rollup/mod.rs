//! Rollup query handlers.

mod get_goal_detail;
mod get_hierarchy;
mod get_hierarchy_rollup;
mod get_team_rollup;
mod goal_summaries;
mod list_share_candidates;

pub use get_goal_detail::{GetGoalDetailHandler, GetGoalDetailQuery};
pub use get_hierarchy::{GetHierarchyHandler, GetHierarchyQuery};
pub use get_hierarchy_rollup::{GetHierarchyRollupHandler, GetHierarchyRollupQuery};
pub use get_team_rollup::{GetTeamRollupHandler, GetTeamRollupQuery};
pub use list_share_candidates::{ListShareCandidatesHandler, ListShareCandidatesQuery};
