//! Goal module - Goals, their shares across teams, and key results.
//!
//! A goal belongs to one owning team and one period. Other teams may carry it
//! through shares at their own weight. Key results hang off the goal and each
//! is scored under one measurement model.

mod comment;
mod goal;
mod key_result;
mod measurement;
mod share;

pub use comment::{comment_text, Comment, CommentTarget};
pub use goal::{FocusType, Goal, GoalDraft, Priority, WorkType};
pub use key_result::{KeyResult, KeyResultDraft};
pub use measurement::{
    Checkpoint, CheckpointDraft, KeyResultKind, Measurement, MeasurementDraft, MetricRange,
    ProgressUpdate, ProjectStage, StageDraft,
};
pub use share::{
    contributing_teams, effective_weight, ContributingTeam, GoalShare, SharePlan, ShareTarget,
    TeamGoal,
};
