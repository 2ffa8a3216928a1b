//! Goal shares: how teams other than the owner contribute to a goal.
//!
//! The owner's weight lives on the goal row. Every other contributing team
//! has one share row carrying its own weight and its own copy of the goal's
//! sort order. A goal with no share rows is owned-only.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::Goal;
use crate::domain::foundation::{GoalId, TeamId, ValidationError, Weight};
use crate::domain::team::{TeamHierarchy, TeamType};

/// A non-owner team's contribution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalShare {
    pub goal_id: GoalId,
    pub team_id: TeamId,
    pub weight: Weight,
    pub sort_order: i32,
}

/// A team selected to carry a goal, with the weight it should carry it at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTarget {
    pub team_id: TeamId,
    pub weight: Weight,
}

impl ShareTarget {
    pub fn new(team_id: TeamId, weight: Weight) -> Self {
        Self { team_id, weight }
    }
}

/// The resolved outcome of a share request: who owns the goal and at what
/// weight, and which other teams hold shares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePlan {
    pub goal_id: GoalId,
    pub owner: ShareTarget,
    pub shares: Vec<ShareTarget>,
}

impl SharePlan {
    /// Resolves a raw target list against the goal's current owner.
    ///
    /// # Rules
    ///
    /// - Duplicate team ids collapse to their first occurrence
    /// - The current owner keeps ownership if selected; otherwise the first
    ///   selected team becomes owner
    /// - Everyone else becomes a share, in selection order
    ///
    /// # Errors
    ///
    /// An empty target list is rejected; a goal always has an owner.
    pub fn resolve(
        goal_id: GoalId,
        current_owner: TeamId,
        targets: &[ShareTarget],
    ) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(targets.len());
        let unique: Vec<ShareTarget> = targets
            .iter()
            .copied()
            .filter(|t| seen.insert(t.team_id))
            .collect();

        let owner = unique
            .iter()
            .find(|t| t.team_id == current_owner)
            .or_else(|| unique.first())
            .copied()
            .ok_or_else(|| ValidationError::empty_field("teams"))?;

        let shares = unique
            .into_iter()
            .filter(|t| t.team_id != owner.team_id)
            .collect();

        Ok(Self {
            goal_id,
            owner,
            shares,
        })
    }

    /// True when the plan hands the goal to a different team.
    pub fn changes_owner(&self, current_owner: TeamId) -> bool {
        self.owner.team_id != current_owner
    }

    /// Every team the plan touches, owner first.
    pub fn team_ids(&self) -> impl Iterator<Item = TeamId> + '_ {
        std::iter::once(self.owner.team_id).chain(self.shares.iter().map(|s| s.team_id))
    }
}

/// A goal as listed for one team, owned or shared in.
///
/// `weight` and `sort_order` are the team's own: the goal's values for the
/// owner, the share row's values otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGoal {
    pub team_id: TeamId,
    pub goal: Goal,
    pub weight: Weight,
    pub sort_order: i32,
}

impl TeamGoal {
    pub fn is_owned(&self) -> bool {
        self.goal.is_owned_by(self.team_id)
    }
}

/// Weight a goal carries inside `team_id`'s rollup.
///
/// Owner weight for the owner, the team's share weight otherwise. A team with
/// neither falls back to the owner weight.
pub fn effective_weight(goal: &Goal, team_id: TeamId, shares: &[GoalShare]) -> Weight {
    if goal.is_owned_by(team_id) {
        return goal.weight;
    }
    shares
        .iter()
        .find(|s| s.team_id == team_id)
        .map(|s| s.weight)
        .unwrap_or(goal.weight)
}

// ════════════════════════════════════════════════════════════════════════════════
// Contributing Teams
// ════════════════════════════════════════════════════════════════════════════════

/// A team contributing to a goal, as listed next to the goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributingTeam {
    pub team_id: TeamId,
    pub name: String,
    pub team_type: TeamType,
    pub weight: Weight,
    pub is_owner: bool,
}

/// Owner plus share teams, each with the weight it carries, sorted by name.
///
/// Team ids that no longer resolve to a team are skipped.
pub fn contributing_teams(
    goal: &Goal,
    shares: &[GoalShare],
    teams: &TeamHierarchy,
) -> Vec<ContributingTeam> {
    let mut seen = HashSet::with_capacity(shares.len() + 1);
    let mut out: Vec<ContributingTeam> = std::iter::once(goal.team_id)
        .chain(shares.iter().map(|s| s.team_id))
        .filter(|id| seen.insert(*id))
        .filter_map(|id| teams.get(id))
        .map(|team| ContributingTeam {
            team_id: team.id,
            name: team.name.clone(),
            team_type: team.team_type,
            weight: effective_weight(goal, team.id, shares),
            is_owner: goal.is_owned_by(team.id),
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name).then(a.team_id.cmp(&b.team_id)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PeriodId, Timestamp};
    use crate::domain::goal::{FocusType, Priority, WorkType};
    use crate::domain::team::Team;

    fn w(v: i64) -> Weight {
        Weight::try_new(v).unwrap()
    }

    fn t(team: i64, weight: i64) -> ShareTarget {
        ShareTarget::new(TeamId::new(team), w(weight))
    }

    fn goal(owner: i64, weight: i64) -> Goal {
        Goal {
            id: GoalId::new(10),
            team_id: TeamId::new(owner),
            period_id: PeriodId::new(1),
            title: "Cut latency".to_string(),
            description: String::new(),
            priority: Priority::P1,
            weight: w(weight),
            work_type: WorkType::Delivery,
            focus_type: FocusType::SpeedEfficiency,
            owner_text: String::new(),
            sort_order: 3,
            created_at: Timestamp::now(),
            updated_at: Timestamp::now(),
        }
    }

    fn share(team: i64, weight: i64) -> GoalShare {
        GoalShare {
            goal_id: GoalId::new(10),
            team_id: TeamId::new(team),
            weight: w(weight),
            sort_order: 3,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // SharePlan::resolve
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn existing_owner_keeps_ownership() {
        let plan = SharePlan::resolve(GoalId::new(10), TeamId::new(1), &[t(2, 30), t(1, 50)]).unwrap();
        assert_eq!(plan.owner, t(1, 50));
        assert_eq!(plan.shares, vec![t(2, 30)]);
        assert!(!plan.changes_owner(TeamId::new(1)));
    }

    #[test]
    fn first_target_becomes_owner_when_owner_dropped() {
        let plan = SharePlan::resolve(GoalId::new(10), TeamId::new(1), &[t(3, 20), t(2, 30)]).unwrap();
        assert_eq!(plan.owner, t(3, 20));
        assert_eq!(plan.shares, vec![t(2, 30)]);
        assert!(plan.changes_owner(TeamId::new(1)));
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let plan =
            SharePlan::resolve(GoalId::new(10), TeamId::new(1), &[t(1, 50), t(2, 30), t(2, 90)]).unwrap();
        assert_eq!(plan.shares, vec![t(2, 30)]);
        assert_eq!(plan.team_ids().count(), 2);
    }

    #[test]
    fn empty_target_list_is_rejected() {
        assert_eq!(
            SharePlan::resolve(GoalId::new(10), TeamId::new(1), &[]),
            Err(ValidationError::empty_field("teams"))
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // effective_weight
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn owner_sees_goal_weight_and_share_team_sees_its_own() {
        let g = goal(1, 60);
        let shares = [share(2, 25)];
        assert_eq!(effective_weight(&g, TeamId::new(1), &shares), w(60));
        assert_eq!(effective_weight(&g, TeamId::new(2), &shares), w(25));
    }

    #[test]
    fn unrelated_team_falls_back_to_owner_weight() {
        let g = goal(1, 60);
        assert_eq!(effective_weight(&g, TeamId::new(9), &[share(2, 25)]), w(60));
    }

    // ─────────────────────────────────────────────────────────────────────
    // contributing_teams
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn contributing_teams_are_name_sorted_and_skip_unknown() {
        let teams = TeamHierarchy::build(vec![
            Team::new(TeamId::new(1), "Zeta", TeamType::Team, None),
            Team::new(TeamId::new(2), "Alpha", TeamType::Unit, None),
        ]);
        let g = goal(1, 60);
        let list = contributing_teams(&g, &[share(2, 25), share(99, 10)], &teams);

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Alpha");
        assert_eq!(list[0].weight, w(25));
        assert!(!list[0].is_owner);
        assert_eq!(list[1].name, "Zeta");
        assert!(list[1].is_owner);
    }
}
