//! Team module - Organization tree.
//!
//! Teams form a tree (cluster → unit → team) via parent ids. The tree is
//! rebuilt from the flat list for every read.

mod hierarchy;
mod team;

pub use hierarchy::{HierarchyEntry, TeamHierarchy, TeamNode};
pub use team::{Team, TeamType};
