//! Key result entity.

use serde::{Deserialize, Serialize};

use super::measurement::{KeyResultKind, Measurement, MeasurementDraft};
use crate::domain::foundation::{GoalId, KeyResultId, Timestamp, ValidationError, Weight};

/// A measurable outcome under a goal. Its progress is derived from the
/// measurement on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: KeyResultId,
    pub goal_id: GoalId,
    pub title: String,
    pub description: String,
    pub weight: Weight,
    pub sort_order: i32,
    pub measurement: Measurement,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl KeyResult {
    pub fn kind(&self) -> KeyResultKind {
        self.measurement.kind()
    }
}

/// Editable key-result fields, as submitted for create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyResultDraft {
    pub title: String,
    pub description: String,
    pub weight: Weight,
    pub measurement: MeasurementDraft,
}

impl KeyResultDraft {
    /// Trims text, requires a title and re-checks the measurement payload.
    pub fn normalized(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        self.description = self.description.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        self.measurement.validate()?;
        Ok(self)
    }
}
