//! AddCheckpointHandler - Adds a control point to a percent-kind key result.

use std::sync::Arc;

use tracing::{info, warn};

use super::load_with_goal;
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, ErrorCode, KeyResultId};
use crate::domain::goal::{Checkpoint, CheckpointDraft, KeyResultKind};
use crate::ports::{GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to add a checkpoint.
#[derive(Debug, Clone, Copy)]
pub struct AddCheckpointCommand {
    pub key_result_id: KeyResultId,
    pub checkpoint: CheckpointDraft,
}

/// Handler for adding checkpoints.
pub struct AddCheckpointHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl AddCheckpointHandler {
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

    pub async fn handle(&self, cmd: AddCheckpointCommand) -> Result<Checkpoint, DomainError> {
        let (key_result, goal) =
            load_with_goal(self.goals.as_ref(), self.key_results.as_ref(), cmd.key_result_id)
                .await?;

        if key_result.kind() != KeyResultKind::Percent {
            warn!(
                key_result_id = key_result.id.value(),
                kind = %key_result.kind(),
                "checkpoint rejected: not a percent key result"
            );
            return Err(DomainError::new(
                ErrorCode::KindMismatch,
                format!(
                    "Checkpoints need a PERCENT key result, {} is {}",
                    key_result.id,
                    key_result.kind()
                ),
            ));
        }

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "add_checkpoint",
        )
        .await?;

        let checkpoint = self
            .key_results
            .add_checkpoint(key_result.id, &cmd.checkpoint)
            .await?;

        info!(
            key_result_id = key_result.id.value(),
            checkpoint_id = checkpoint.id.value(),
            "checkpoint added"
        );

        Ok(checkpoint)
    }
}
