//! Team record and tier classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{TeamId, Timestamp, ValidationError};

/// Organizational tier of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamType {
    Cluster,
    Unit,
    #[default]
    Team,
}

impl TeamType {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamType::Cluster => "cluster",
            TeamType::Unit => "unit",
            TeamType::Team => "team",
        }
    }
}

impl fmt::Display for TeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TeamType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cluster" => Ok(TeamType::Cluster),
            "unit" => Ok(TeamType::Unit),
            "team" => Ok(TeamType::Team),
            other => Err(ValidationError::invalid_format(
                "team_type",
                format!("unknown team type '{}'", other),
            )),
        }
    }
}

/// A node of the organization tree. The tree itself is never stored; it is
/// rebuilt from the flat list via parent ids on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub team_type: TeamType,
    pub parent_id: Option<TeamId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Team {
    /// Builds a team record with fresh timestamps.
    pub fn new(id: TeamId, name: impl Into<String>, team_type: TeamType, parent_id: Option<TeamId>) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            name: name.into(),
            team_type,
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
