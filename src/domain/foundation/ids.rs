//! Strongly-typed identifier value objects.
//!
//! Every persisted record is keyed by a `BIGSERIAL`, so identifiers wrap an
//! `i64`. Distinct types keep a `GoalId` from being passed where a `TeamId`
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database key.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw database key.
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a team (any tier: cluster, unit or team).
    TeamId
);
define_id!(
    /// Identifier of a planning period.
    PeriodId
);
define_id!(
    /// Identifier of a goal.
    GoalId
);
define_id!(
    /// Identifier of a key result.
    KeyResultId
);
define_id!(
    /// Identifier of a project stage within a Project key result.
    StageId
);
define_id!(
    /// Identifier of a percent checkpoint.
    CheckpointId
);
define_id!(
    /// Identifier of a goal or key-result comment.
    CommentId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_parses_from_valid_string() {
        let id: GoalId = "42".parse().unwrap();
        assert_eq!(id, GoalId::new(42));
    }

    #[test]
    fn id_parse_trims_whitespace() {
        let id: TeamId = " 7 ".parse().unwrap();
        assert_eq!(id.value(), 7);
    }

    #[test]
    fn id_rejects_non_numeric_string() {
        assert!("abc".parse::<PeriodId>().is_err());
    }

    #[test]
    fn id_displays_raw_value() {
        assert_eq!(format!("{}", KeyResultId::new(19)), "19");
    }

    #[test]
    fn id_serializes_transparently() {
        let json = serde_json::to_string(&TeamId::new(3)).unwrap();
        assert_eq!(json, "3");
        let back: TeamId = serde_json::from_str("3").unwrap();
        assert_eq!(back, TeamId::new(3));
    }
}
