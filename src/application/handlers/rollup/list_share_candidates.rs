//! ListShareCandidatesHandler - Teams a goal can be shared into.

use std::sync::Arc;

use crate::config::RollupConfig;
use crate::domain::foundation::{DomainError, ErrorCode, GoalId};
use crate::domain::goal::effective_weight;
use crate::domain::rollup::ShareCandidate;
use crate::domain::team::TeamHierarchy;
use crate::ports::{GoalRepository, GoalShareLedger, TeamPeriodStatusStore, TeamReader};

/// Query for the share picker of one goal.
#[derive(Debug, Clone)]
pub struct ListShareCandidatesQuery {
    pub goal_id: GoalId,
}

/// Handler listing every team in hierarchy order with its share eligibility
/// for the goal's period.
pub struct ListShareCandidatesHandler {
    teams: Arc<dyn TeamReader>,
    goals: Arc<dyn GoalRepository>,
    ledger: Arc<dyn GoalShareLedger>,
    statuses: Arc<dyn TeamPeriodStatusStore>,
    config: RollupConfig,
}

impl ListShareCandidatesHandler {
    pub fn new(
        teams: Arc<dyn TeamReader>,
        goals: Arc<dyn GoalRepository>,
        ledger: Arc<dyn GoalShareLedger>,
        statuses: Arc<dyn TeamPeriodStatusStore>,
        config: RollupConfig,
    ) -> Self {
        Self {
            teams,
            goals,
            ledger,
            statuses,
            config,
        }
    }

    pub async fn handle(
        &self,
        query: ListShareCandidatesQuery,
    ) -> Result<Vec<ShareCandidate>, DomainError> {
        let goal = self.goals.find_by_id(query.goal_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::GoalNotFound,
                format!("Goal {} not found", query.goal_id),
            )
        })?;
        let shares = self.ledger.list_shares(goal.id).await?;
        let statuses = self.statuses.list_for_period(goal.period_id).await?;
        let hierarchy = TeamHierarchy::build(self.teams.list_all().await?);

        let candidates = hierarchy
            .walk(None)?
            .into_iter()
            .map(|entry| {
                let team_id = entry.team.id;
                let status = statuses.get(&team_id).copied().unwrap_or_default();
                let is_owner = goal.is_owned_by(team_id);
                let is_shared = shares.iter().any(|s| s.team_id == team_id);
                ShareCandidate {
                    team_id,
                    name: entry.team.name.clone(),
                    team_type: entry.team.team_type,
                    depth: entry.depth,
                    indent: (entry.depth as u32).saturating_mul(self.config.indent_unit),
                    status,
                    // Teams already on the goal stay pickable whatever their status.
                    eligible: is_owner || is_shared || status.accepts_shares(),
                    selected: is_owner || is_shared,
                    weight: effective_weight(&goal, team_id, &shares),
                }
            })
            .collect();

        Ok(candidates)
    }
}
