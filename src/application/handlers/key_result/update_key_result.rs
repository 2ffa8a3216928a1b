//! UpdateKeyResultHandler - Command handler for editing key results.
//!
//! The measurement is replaced wholesale, so a key result may change kind.

use std::sync::Arc;

use tracing::info;

use super::load_with_goal;
use crate::application::handlers::status_gate::ensure_open;
use crate::domain::foundation::{DomainError, KeyResultId};
use crate::domain::goal::{KeyResult, KeyResultDraft};
use crate::ports::{GoalRepository, KeyResultRepository, TeamPeriodStatusStore};

/// Command to edit a key result.
#[derive(Debug, Clone)]
pub struct UpdateKeyResultCommand {
    pub key_result_id: KeyResultId,
    pub draft: KeyResultDraft,
}

/// Handler for editing key results.
pub struct UpdateKeyResultHandler {
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
}

impl UpdateKeyResultHandler {
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

    pub async fn handle(&self, cmd: UpdateKeyResultCommand) -> Result<KeyResult, DomainError> {
        let draft = cmd.draft.normalized()?;
        let (current, goal) =
            load_with_goal(self.goals.as_ref(), self.key_results.as_ref(), cmd.key_result_id)
                .await?;

        ensure_open(
            self.statuses.as_ref(),
            goal.team_id,
            goal.period_id,
            "update_key_result",
        )
        .await?;

        let updated = self.key_results.update(current.id, &draft).await?;

        info!(
            key_result_id = updated.id.value(),
            from_kind = %current.kind(),
            to_kind = %updated.kind(),
            "key result updated"
        );

        Ok(updated)
    }
}
