//! Goal share ledger port.
//!
//! Records which non-owner teams carry a goal and at what weight. The
//! owner's weight lives on the goal, so plans that move ownership touch the
//! goal row too.
//!
//! # Atomicity
//!
//! `replace_shares` and `promote_to_owner` change several rows. Implementations
//! must apply them as a unit so concurrent readers never see a goal with two
//! owners or an owner that still holds a share row.

use crate::domain::foundation::{DomainError, GoalId, TeamId, Weight};
use crate::domain::goal::{GoalShare, SharePlan};
use async_trait::async_trait;

/// Ledger port for goal shares.
#[async_trait]
pub trait GoalShareLedger: Send + Sync {
    /// Non-owner share rows of a goal, ordered by team id.
    async fn list_shares(&self, goal_id: GoalId) -> Result<Vec<GoalShare>, DomainError>;

    /// Apply a resolved plan: set the goal's owner and owner weight, drop
    /// shares of teams not in the plan, upsert the rest. New share rows copy
    /// the goal's sort order.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` if the goal doesn't exist
    /// - `DatabaseError` on persistence failure (nothing is applied)
    async fn replace_shares(&self, plan: &SharePlan) -> Result<(), DomainError>;

    /// Drop one team's share. Removing a share that doesn't exist is a no-op.
    async fn remove_share(&self, goal_id: GoalId, team_id: TeamId) -> Result<(), DomainError>;

    /// Hand ownership to a share holder, at the weight of its share, and
    /// drop that share row.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` if the goal doesn't exist
    /// - `DatabaseError` on persistence failure (nothing is applied)
    async fn promote_to_owner(&self, share: &GoalShare) -> Result<(), DomainError>;

    /// Set the weight a team carries the goal at: the goal weight for the
    /// owner, the share weight for anyone else.
    ///
    /// # Errors
    ///
    /// - `GoalNotFound` if the goal doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_team_weight(
        &self,
        goal_id: GoalId,
        team_id: TeamId,
        weight: Weight,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_share_ledger_is_object_safe() {
        fn _accepts_dyn(_ledger: &dyn GoalShareLedger) {}
    }
}
