//! Per-(team, period) lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Lifecycle of a team's goal set within one period.
///
/// A missing status row reads as `NoGoals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamPeriodStatus {
    #[default]
    NoGoals,
    Forming,
    InProgress,
    Validated,
    Closed,
}

impl TeamPeriodStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamPeriodStatus::NoGoals => "no_goals",
            TeamPeriodStatus::Forming => "forming",
            TeamPeriodStatus::InProgress => "in_progress",
            TeamPeriodStatus::Validated => "validated",
            TeamPeriodStatus::Closed => "closed",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TeamPeriodStatus::NoGoals => "No goals",
            TeamPeriodStatus::Forming => "Forming",
            TeamPeriodStatus::InProgress => "In progress",
            TeamPeriodStatus::Validated => "Validated",
            TeamPeriodStatus::Closed => "Closed",
        }
    }

    /// Goals (and their key results) may not be changed once closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, TeamPeriodStatus::Closed)
    }

    /// A team accepts goals shared into it until its set is validated.
    pub fn accepts_shares(&self) -> bool {
        !matches!(self, TeamPeriodStatus::Validated | TeamPeriodStatus::Closed)
    }

    /// Status after a goal was created under this status.
    pub fn after_goal_created(self) -> Self {
        match self {
            TeamPeriodStatus::NoGoals => TeamPeriodStatus::Forming,
            other => other,
        }
    }
}

impl StateMachine for TeamPeriodStatus {
    fn all() -> &'static [Self] {
        &[
            TeamPeriodStatus::NoGoals,
            TeamPeriodStatus::Forming,
            TeamPeriodStatus::InProgress,
            TeamPeriodStatus::Validated,
            TeamPeriodStatus::Closed,
        ]
    }

    /// Explicit status changes are unrestricted; any state may be set from any
    /// other, including reopening a closed period.
    fn can_transition_to(&self, _target: &Self) -> bool {
        true
    }
}

impl fmt::Display for TeamPeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamPeriodStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TeamPeriodStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("status", format!("unknown status '{}'", s))
            })
    }
}
