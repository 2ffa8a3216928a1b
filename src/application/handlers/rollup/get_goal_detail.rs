//! GetGoalDetailHandler - Query handler for a goal's page.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, GoalId};
use crate::domain::goal::{contributing_teams, CommentTarget};
use crate::domain::progress::ProgressCalculator;
use crate::domain::rollup::{GoalDetail, KeyResultView};
use crate::domain::team::TeamHierarchy;
use crate::ports::{
    CommentStore, GoalRepository, GoalShareLedger, KeyResultRepository, TeamPeriodStatusStore,
    TeamReader,
};

/// Query for one goal with key results, comments and contributors.
#[derive(Debug, Clone)]
pub struct GetGoalDetailQuery {
    pub goal_id: GoalId,
}

/// Handler for goal detail.
pub struct GetGoalDetailHandler {
    teams: Arc<dyn TeamReader>,
    goals: Arc<dyn GoalRepository>,
    key_results: Arc<dyn KeyResultRepository>,
    ledger: Arc<dyn GoalShareLedger>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
    comments: Arc<dyn CommentStore>,
}

impl GetGoalDetailHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        goals: Arc<dyn GoalRepository>,
        key_results: Arc<dyn KeyResultRepository>,
        ledger: Arc<dyn GoalShareLedger>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
        comments: Arc<dyn CommentStore>,
    ) -> Self {
        Self {
            teams,
            goals,
            key_results,
            ledger,
            statuses,
            comments,
        }
    }

    pub async fn handle(&self, query: GetGoalDetailQuery) -> Result<GoalDetail, DomainError> {
        let goal = self.goals.find_by_id(query.goal_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::GoalNotFound,
                format!("Goal {} not found", query.goal_id),
            )
        })?;

        let mut key_results = Vec::new();
        for key_result in self.key_results.list_by_goal(goal.id).await? {
            let comments = self
                .comments
                .list(CommentTarget::KeyResult(key_result.id))
                .await?;
            key_results.push(KeyResultView {
                progress: ProgressCalculator::key_result(&key_result),
                key_result,
                comments,
            });
        }

        let hierarchy = TeamHierarchy::build(self.teams.list_all().await?);
        let shares = self.ledger.list_shares(goal.id).await?;
        let contributors = contributing_teams(&goal, &shares, &hierarchy);
        let status = self.statuses.get(goal.team_id, goal.period_id).await?;
        let comments = self.comments.list(CommentTarget::Goal(goal.id)).await?;

        Ok(GoalDetail::assemble(
            goal,
            status,
            key_results,
            comments,
            contributors,
        ))
    }
}
