//! RecordProgressHandler - Command handler for progress reports.
//!
//! The report is applied to the loaded measurement first, so kind mismatches
//! and unknown stages are rejected before anything is written.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::load_with_goal;
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, KeyResultId, Percentage};
use crate::domain::goal::{KeyResult, ProgressUpdate};
use crate::domain::progress::ProgressCalculator;
use crate::ports::{GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to report progress on a key result.
#[derive(Debug, Clone, Copy)]
pub struct RecordProgressCommand {
    pub key_result_id: KeyResultId,
    pub update: ProgressUpdate,
}

/// The key result after the report, with its recomputed progress.
#[derive(Debug, Clone, Serialize)]
pub struct RecordProgressResult {
    pub key_result: KeyResult,
    pub progress: Percentage,
}

/// Handler for progress reports.
pub struct RecordProgressHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl RecordProgressHandler {
    pub fn new(
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
    ) -> Self {
        Self {
            goals,
            key_results,
            statuses,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordProgressCommand,
    ) -> Result<RecordProgressResult, DomainError> {
        let (mut key_result, goal) =
            load_with_goal(self.goals.as_ref(), self.key_results.as_ref(), cmd.key_result_id)
                .await?;

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "record_progress",
        )
        .await?;

        key_result.measurement.record(cmd.update)?;
        self.key_results
            .record_progress(key_result.id, &cmd.update)
            .await?;

        let progress = ProgressCalculator::key_result(&key_result);
        info!(
            key_result_id = key_result.id.value(),
            kind = %key_result.kind(),
            progress = progress.value(),
            "progress recorded"
        );

        Ok(RecordProgressResult {
            key_result,
            progress,
        })
    }
}
