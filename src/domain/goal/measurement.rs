//! Key-result measurement models.
//!
//! A key result is scored under exactly one model. The model and its payload
//! travel together as [`Measurement`], so a key result can never declare a
//! kind without carrying the data that kind needs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    CheckpointId, DomainError, ErrorCode, Percentage, StageId, ValidationError, Weight,
};

// ════════════════════════════════════════════════════════════════════════════════
// Kind
// ════════════════════════════════════════════════════════════════════════════════

/// Discriminant of [`Measurement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyResultKind {
    Project,
    Percent,
    Linear,
    Boolean,
}

impl KeyResultKind {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyResultKind::Project => "PROJECT",
            KeyResultKind::Percent => "PERCENT",
            KeyResultKind::Linear => "LINEAR",
            KeyResultKind::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for KeyResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyResultKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROJECT" => Ok(KeyResultKind::Project),
            "PERCENT" => Ok(KeyResultKind::Percent),
            "LINEAR" => Ok(KeyResultKind::Linear),
            "BOOLEAN" => Ok(KeyResultKind::Boolean),
            other => Err(ValidationError::invalid_format(
                "kind",
                format!("unknown key result kind '{}'", other),
            )),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payload Parts
// ════════════════════════════════════════════════════════════════════════════════

/// Start, target and current value of a metric.
///
/// Target may sit below start for "reduce X" metrics. Start and target must
/// differ so the range has a length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct MetricRange {
    start: f64,
    target: f64,
    current: f64,
}

#[derive(Deserialize)]
struct RawRange {
    start: f64,
    target: f64,
    current: f64,
}

impl TryFrom<RawRange> for MetricRange {
    type Error = ValidationError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        MetricRange::new(raw.start, raw.target, raw.current)
    }
}

impl MetricRange {
    /// # Errors
    ///
    /// - any value not finite
    /// - `start == target`
    pub fn new(start: f64, target: f64, current: f64) -> Result<Self, ValidationError> {
        for (field, value) in [("start", start), ("target", target), ("current", current)] {
            if !value.is_finite() {
                return Err(ValidationError::invalid_format(field, "must be a finite number"));
            }
        }
        if start == target {
            return Err(ValidationError::invalid_format(
                "target",
                "start and target must differ",
            ));
        }
        Ok(Self {
            start,
            target,
            current,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    /// Same range with a new current value.
    pub fn with_current(self, current: f64) -> Result<Self, ValidationError> {
        Self::new(self.start, self.target, current)
    }
}

/// One step of a project-kind key result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStage {
    pub id: StageId,
    pub title: String,
    pub weight: Weight,
    pub done: bool,
    pub sort_order: i32,
}

/// A stage as submitted, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDraft {
    pub title: String,
    pub weight: Weight,
    pub done: bool,
}

impl StageDraft {
    /// Stage weights run 1..=100; a zero-weight stage could never move progress.
    pub fn new(title: &str, weight: i64, done: bool) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::empty_field("stage_title"));
        }
        Ok(Self {
            title: title.to_string(),
            weight: Weight::checked("stage_weight", weight, 1)?,
            done,
        })
    }
}

/// A (metric value → percent) control point for percent-kind interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub id: CheckpointId,
    pub metric_value: f64,
    pub percent: Percentage,
}

/// A checkpoint as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointDraft {
    pub metric_value: f64,
    pub percent: Percentage,
}

impl CheckpointDraft {
    pub fn new(metric_value: f64, percent: i64) -> Result<Self, ValidationError> {
        if !metric_value.is_finite() {
            return Err(ValidationError::invalid_format(
                "metric_value",
                "must be a finite number",
            ));
        }
        Ok(Self {
            metric_value,
            percent: Percentage::try_new(percent)?,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Measurement
// ════════════════════════════════════════════════════════════════════════════════

/// Stored measurement of a key result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Measurement {
    /// Weighted stages; progress is the weight of finished stages.
    Project { stages: Vec<ProjectStage> },
    /// Metric range shaped by optional checkpoints.
    Percent {
        range: MetricRange,
        checkpoints: Vec<Checkpoint>,
    },
    /// Metric range scaled linearly.
    Linear { range: MetricRange },
    /// Done or not.
    Boolean { done: bool },
}

impl Measurement {
    pub fn kind(&self) -> KeyResultKind {
        match self {
            Measurement::Project { .. } => KeyResultKind::Project,
            Measurement::Percent { .. } => KeyResultKind::Percent,
            Measurement::Linear { .. } => KeyResultKind::Linear,
            Measurement::Boolean { .. } => KeyResultKind::Boolean,
        }
    }

    /// Applies a progress report.
    ///
    /// # Errors
    ///
    /// - `KindMismatch` if the report is for a different kind
    /// - `StageNotFound` if a stage toggle names a stage this key result lacks
    /// - `ValidationFailed` for a non-finite metric value
    pub fn record(&mut self, update: ProgressUpdate) -> Result<(), DomainError> {
        match (self, update) {
            (Measurement::Project { stages }, ProgressUpdate::Stage { stage_id, done }) => {
                let stage = stages.iter_mut().find(|s| s.id == stage_id).ok_or_else(|| {
                    DomainError::new(
                        ErrorCode::StageNotFound,
                        format!("Stage {} not found", stage_id),
                    )
                })?;
                stage.done = done;
                Ok(())
            }
            (Measurement::Percent { range, .. }, ProgressUpdate::PercentCurrent(value))
            | (Measurement::Linear { range }, ProgressUpdate::LinearCurrent(value)) => {
                *range = range.with_current(value)?;
                Ok(())
            }
            (Measurement::Boolean { done }, ProgressUpdate::Boolean(value)) => {
                *done = value;
                Ok(())
            }
            (current, update) => Err(DomainError::new(
                ErrorCode::KindMismatch,
                format!(
                    "Cannot record {} progress on a {} key result",
                    update.kind(),
                    current.kind()
                ),
            )),
        }
    }
}

/// Measurement as submitted on create or update. Replaces the stored one
/// wholesale; percent checkpoints are managed separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeasurementDraft {
    Project { stages: Vec<StageDraft> },
    Percent { range: MetricRange },
    Linear { range: MetricRange },
    Boolean { done: bool },
}

impl MeasurementDraft {
    /// A project needs at least one stage.
    pub fn project(stages: Vec<StageDraft>) -> Result<Self, ValidationError> {
        if stages.is_empty() {
            return Err(ValidationError::empty_field("stages"));
        }
        Ok(MeasurementDraft::Project { stages })
    }

    pub fn kind(&self) -> KeyResultKind {
        match self {
            MeasurementDraft::Project { .. } => KeyResultKind::Project,
            MeasurementDraft::Percent { .. } => KeyResultKind::Percent,
            MeasurementDraft::Linear { .. } => KeyResultKind::Linear,
            MeasurementDraft::Boolean { .. } => KeyResultKind::Boolean,
        }
    }

    /// Re-checks invariants that deserialization alone cannot enforce.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            MeasurementDraft::Project { stages } if stages.is_empty() => {
                Err(ValidationError::empty_field("stages"))
            }
            MeasurementDraft::Project { stages } => stages
                .iter()
                .try_for_each(|s| Weight::checked("stage_weight", s.weight.as_i64(), 1).map(|_| ())),
            _ => Ok(()),
        }
    }
}

/// A kind-specific progress report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProgressUpdate {
    Stage { stage_id: StageId, done: bool },
    PercentCurrent(f64),
    LinearCurrent(f64),
    Boolean(bool),
}

impl ProgressUpdate {
    pub fn kind(&self) -> KeyResultKind {
        match self {
            ProgressUpdate::Stage { .. } => KeyResultKind::Project,
            ProgressUpdate::PercentCurrent(_) => KeyResultKind::Percent,
            ProgressUpdate::LinearCurrent(_) => KeyResultKind::Linear,
            ProgressUpdate::Boolean(_) => KeyResultKind::Boolean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: f64, target: f64, current: f64) -> MetricRange {
        MetricRange::new(start, target, current).unwrap()
    }

    fn stage(id: i64, weight: i64, done: bool) -> ProjectStage {
        ProjectStage {
            id: StageId::new(id),
            title: format!("Stage {}", id),
            weight: Weight::try_new(weight).unwrap(),
            done,
            sort_order: id as i32,
        }
    }

    #[test]
    fn range_rejects_equal_start_and_target() {
        assert!(MetricRange::new(5.0, 5.0, 5.0).is_err());
        assert!(MetricRange::new(100.0, 0.0, 50.0).is_ok());
    }

    #[test]
    fn range_rejects_nan() {
        assert!(MetricRange::new(0.0, 10.0, f64::NAN).is_err());
    }

    #[test]
    fn deserializing_range_validates() {
        let bad = r#"{"start":1.0,"target":1.0,"current":0.0}"#;
        assert!(serde_json::from_str::<MetricRange>(bad).is_err());
    }

    #[test]
    fn stage_weight_must_be_positive() {
        assert!(StageDraft::new("Design", 0, false).is_err());
        assert!(StageDraft::new("Design", 101, false).is_err());
        assert_eq!(StageDraft::new(" Design ", 25, true).unwrap().title, "Design");
    }

    #[test]
    fn project_requires_a_stage() {
        assert_eq!(
            MeasurementDraft::project(Vec::new()),
            Err(ValidationError::empty_field("stages"))
        );
    }

    #[test]
    fn checkpoint_percent_is_bounded() {
        assert!(CheckpointDraft::new(50.0, 101).is_err());
        assert!(CheckpointDraft::new(50.0, 40).is_ok());
    }

    #[test]
    fn recording_toggles_stage() {
        let mut m = Measurement::Project {
            stages: vec![stage(1, 40, false), stage(2, 60, false)],
        };
        m.record(ProgressUpdate::Stage {
            stage_id: StageId::new(2),
            done: true,
        })
        .unwrap();
        match m {
            Measurement::Project { stages } => assert!(stages[1].done),
            _ => panic!("kind changed"),
        }
    }

    #[test]
    fn recording_unknown_stage_is_not_found() {
        let mut m = Measurement::Project {
            stages: vec![stage(1, 100, false)],
        };
        let err = m
            .record(ProgressUpdate::Stage {
                stage_id: StageId::new(9),
                done: true,
            })
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StageNotFound);
    }

    #[test]
    fn recording_current_keeps_range_and_checkpoints() {
        let mut m = Measurement::Percent {
            range: range(0.0, 100.0, 10.0),
            checkpoints: vec![Checkpoint {
                id: CheckpointId::new(1),
                metric_value: 50.0,
                percent: Percentage::new(40),
            }],
        };
        m.record(ProgressUpdate::PercentCurrent(60.0)).unwrap();
        match m {
            Measurement::Percent { range, checkpoints } => {
                assert_eq!(range.current(), 60.0);
                assert_eq!(range.target(), 100.0);
                assert_eq!(checkpoints.len(), 1);
            }
            _ => panic!("kind changed"),
        }
    }

    #[test]
    fn recording_for_other_kind_is_a_mismatch() {
        let mut m = Measurement::Linear {
            range: range(0.0, 10.0, 0.0),
        };
        let err = m.record(ProgressUpdate::PercentCurrent(5.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::KindMismatch);

        let mut b = Measurement::Boolean { done: false };
        assert_eq!(
            b.record(ProgressUpdate::LinearCurrent(1.0)).unwrap_err().code,
            ErrorCode::KindMismatch
        );
    }

    #[test]
    fn kind_parses_storage_strings() {
        assert_eq!("LINEAR".parse::<KeyResultKind>().unwrap(), KeyResultKind::Linear);
        assert!("linear".parse::<KeyResultKind>().is_err());
    }
}
