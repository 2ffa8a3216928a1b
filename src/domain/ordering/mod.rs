//! Ordering module - Sibling order moves.
//!
//! Goals are ordered within (team, period), key results within their goal and
//! periods globally. A move swaps an item's order key with its nearest
//! sibling in the requested direction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{GoalId, KeyResultId, PeriodId, TeamId};

/// Direction of a one-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Up => f.write_str("up"),
            MoveDirection::Down => f.write_str("down"),
        }
    }
}

/// An item to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SequencedItem {
    /// A goal, optionally moved from the view of a specific team. Only the
    /// owner's view can reorder; shared rows follow the goal's own order.
    Goal {
        goal_id: GoalId,
        as_team: Option<TeamId>,
    },
    KeyResult { key_result_id: KeyResultId },
    Period { period_id: PeriodId },
}

impl SequencedItem {
    /// Raw id of the item, for logging.
    pub fn raw_id(&self) -> i64 {
        match self {
            SequencedItem::Goal { goal_id, .. } => goal_id.value(),
            SequencedItem::KeyResult { key_result_id } => key_result_id.value(),
            SequencedItem::Period { period_id } => period_id.value(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SequencedItem::Goal { .. } => "goal",
            SequencedItem::KeyResult { .. } => "key_result",
            SequencedItem::Period { .. } => "period",
        }
    }
}

/// Result of a move request. Every variant is a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// Order keys of the item and `neighbor_id` were exchanged.
    Swapped { neighbor_id: i64 },
    /// Already first (up) or last (down); nothing changed.
    AtBoundary,
    /// Goal moved from a non-owner team's view; nothing changed.
    NotOwner,
}

impl MoveOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, MoveOutcome::Swapped { .. })
    }
}

/// Picks the nearest sibling strictly on the requested side of `current`.
///
/// `siblings` are (id, order) pairs of the group, including the item itself.
pub fn nearest_sibling(
    siblings: &[(i64, i32)],
    current: i32,
    direction: MoveDirection,
) -> Option<(i64, i32)> {
    let candidates = siblings.iter().copied();
    match direction {
        MoveDirection::Up => candidates
            .filter(|(_, order)| *order < current)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0))),
        MoveDirection::Down => candidates
            .filter(|(_, order)| *order > current)
            .min_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0))),
    }
}
