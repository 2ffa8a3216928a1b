//! Goal repository port.
//!
//! Covers the goal row itself. Share rows go through `GoalShareLedger`,
//! sibling order through `OrderSequencer`.

use crate::domain::foundation::{DomainError, GoalId, PeriodId, TeamId};
use crate::domain::goal::{Goal, GoalDraft, TeamGoal};
use async_trait::async_trait;

/// Repository port for goals.
#[async_trait]
pub trait GoalRepository: Send + Sync {
    /// Create a goal owned by `team_id`, appended after the team's other goals
    /// for the period.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn create(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        draft: &GoalDraft,
    ) -> Result<Goal, DomainError>;

    /// Find a goal by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>, DomainError>;

    /// Persist edited fields (title through owner text, owner weight).
    ///
    /// Ownership and sort order are not touched.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` if the goal doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, goal: &Goal) -> Result<(), DomainError>;

    /// Delete a goal with its key results, shares and comments.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` if the goal doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete(&self, id: GoalId) -> Result<(), DomainError>;

    /// Goals a team carries in a period: the ones it owns plus the ones
    /// shared into it, each with the team's own weight and order.
    ///
    /// Ordered by the team's sort order, then goal id.
    async fn list_for_team(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
    ) -> Result<Vec<TeamGoal>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn GoalRepository) {}
    }
}
