//! Goal entity and its classification enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{GoalId, PeriodId, TeamId, Timestamp, ValidationError, Weight};

/// Defines a closed string enum with storage representation and parsing.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Storage representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok($name::$variant),)+
                    other => Err(ValidationError::invalid_format(
                        $field,
                        format!("unknown value '{}'", other),
                    )),
                }
            }
        }
    };
}

string_enum!(
    /// Goal urgency, P0 highest.
    Priority, "priority", {
        P0 => "P0",
        P1 => "P1",
        P2 => "P2",
        P3 => "P3",
    }
);

string_enum!(
    /// Kind of work a goal represents.
    WorkType, "work_type", {
        Discovery => "Discovery",
        Delivery => "Delivery",
    }
);

string_enum!(
    /// Strategic focus area.
    FocusType, "focus_type", {
        Profitability => "PROFITABILITY",
        Stability => "STABILITY",
        SpeedEfficiency => "SPEED_EFFICIENCY",
        TechIndependence => "TECH_INDEPENDENCE",
    }
);

// ════════════════════════════════════════════════════════════════════════════════
// Goal
// ════════════════════════════════════════════════════════════════════════════════

/// A goal owned by one team for one period.
///
/// `weight` is the owner's weight. Other contributing teams carry their own
/// weight in goal shares. Progress is never stored; it is computed from the
/// key results on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub team_id: TeamId,
    pub period_id: PeriodId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub weight: Weight,
    pub work_type: WorkType,
    pub focus_type: FocusType,
    pub owner_text: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Goal {
    pub fn is_owned_by(&self, team_id: TeamId) -> bool {
        self.team_id == team_id
    }

    /// Applies edited fields, leaving identity, ownership and order intact.
    pub fn apply(&mut self, draft: GoalDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.priority = draft.priority;
        self.weight = draft.weight;
        self.work_type = draft.work_type;
        self.focus_type = draft.focus_type;
        self.owner_text = draft.owner_text;
        self.updated_at = Timestamp::now();
    }
}

/// Editable goal fields, as submitted for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub weight: Weight,
    pub work_type: WorkType,
    pub focus_type: FocusType,
    pub owner_text: String,
}

impl GoalDraft {
    /// Trims free text and requires a title.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        self.owner_text = self.owner_text.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(self)
    }
}
