//! In-memory OKR store.
//!
//! Implements every repository port over one `Mutex`-guarded state. Each
//! port call holds the lock for its whole body, which gives the same
//! all-or-nothing behavior the PostgreSQL adapters get from transactions.
//!
//! Useful for:
//! - Handler and integration tests
//! - Local runs without a database
//!
//! Nothing is persisted across restarts.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::{
    CheckpointId, CommentId, DomainError, ErrorCode, GoalId, KeyResultId, PeriodId, StageId,
    TeamId, Timestamp, Weight,
};
use crate::domain::goal::{
    Checkpoint, CheckpointDraft, Comment, CommentTarget, Goal, GoalDraft, GoalShare, KeyResult,
    KeyResultDraft, Measurement, MeasurementDraft, ProgressUpdate, ProjectStage, SharePlan,
    TeamGoal,
};
use crate::domain::ordering::{nearest_sibling, MoveDirection, MoveOutcome, SequencedItem};
use crate::domain::period::{Period, TeamPeriodStatus};
use crate::domain::team::{Team, TeamType};
use crate::ports::{
    CommentStore, GoalRepository, GoalShareLedger, KeyResultRepository, OrderSequencer,
    PeriodRepository, TeamPeriodStatusStore, TeamReader,
};

#[derive(Default)]
struct State {
    next_id: i64,
    teams: BTreeMap<TeamId, Team>,
    periods: BTreeMap<PeriodId, Period>,
    goals: BTreeMap<GoalId, Goal>,
    shares: BTreeMap<(GoalId, TeamId), GoalShare>,
    statuses: HashMap<(TeamId, PeriodId), TeamPeriodStatus>,
    key_results: BTreeMap<KeyResultId, KeyResult>,
    comments: Vec<Comment>,
}

impl State {
    /// One id sequence shared by every record kind.
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn goal_mut(&mut self, id: GoalId) -> Result<&mut Goal, DomainError> {
        self.goals.get_mut(&id).ok_or_else(|| goal_not_found(id))
    }

    /// Sets owner and owner weight. A new owner gets the goal appended to the
    /// end of its own (team, period) group.
    fn set_owner(
        &mut self,
        goal_id: GoalId,
        team_id: TeamId,
        weight: Weight,
    ) -> Result<(), DomainError> {
        let (current_owner, period_id) = {
            let goal = self.goal_mut(goal_id)?;
            (goal.team_id, goal.period_id)
        };
        let next_order = (current_owner != team_id).then(|| {
            self.goals
                .values()
                .filter(|g| g.id != goal_id && g.team_id == team_id && g.period_id == period_id)
                .map(|g| g.sort_order)
                .max()
                .unwrap_or(0)
                + 1
        });

        let goal = self.goal_mut(goal_id)?;
        goal.team_id = team_id;
        goal.weight = weight;
        if let Some(order) = next_order {
            goal.sort_order = order;
        }
        goal.updated_at = Timestamp::now();
        Ok(())
    }

    fn key_result_mut(&mut self, id: KeyResultId) -> Result<&mut KeyResult, DomainError> {
        self.key_results
            .get_mut(&id)
            .ok_or_else(|| key_result_not_found(id))
    }

    fn materialize(&mut self, draft: &MeasurementDraft, kept: Vec<Checkpoint>) -> Measurement {
        match draft {
            MeasurementDraft::Project { stages } => Measurement::Project {
                stages: stages
                    .iter()
                    .enumerate()
                    .map(|(index, stage)| ProjectStage {
                        id: StageId::new(self.next_id()),
                        title: stage.title.clone(),
                        weight: stage.weight,
                        done: stage.done,
                        sort_order: index as i32 + 1,
                    })
                    .collect(),
            },
            MeasurementDraft::Percent { range } => Measurement::Percent {
                range: *range,
                checkpoints: kept,
            },
            MeasurementDraft::Linear { range } => Measurement::Linear { range: *range },
            MeasurementDraft::Boolean { done } => Measurement::Boolean { done: *done },
        }
    }
}

/// In-memory implementation of all OKR repository ports.
///
/// Thread-safe via internal `Mutex`. Share one instance behind `Arc` and hand
/// it to handlers as each port they need.
#[derive(Default)]
pub struct InMemoryOkrStore {
    state: Mutex<State>,
}

impl InMemoryOkrStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a team. Teams are managed outside the engine, so there is no port
    /// for this.
    pub fn insert_team(
        &self,
        name: &str,
        team_type: TeamType,
        parent_id: Option<TeamId>,
    ) -> Team {
        let mut state = self.state();
        let team = Team::new(TeamId::new(state.next_id()), name, team_type, parent_id);
        state.teams.insert(team.id, team.clone());
        team
    }

    /// Re-parents a team, cycles included.
    pub fn set_team_parent(&self, team_id: TeamId, parent_id: Option<TeamId>) {
        if let Some(team) = self.state().teams.get_mut(&team_id) {
            team.parent_id = parent_id;
        }
    }

    /// Number of stored goals.
    pub fn goal_count(&self) -> usize {
        self.state().goals.len()
    }
}

fn goal_not_found(id: GoalId) -> DomainError {
    DomainError::new(ErrorCode::GoalNotFound, format!("Goal {} not found", id))
}

fn key_result_not_found(id: KeyResultId) -> DomainError {
    DomainError::new(
        ErrorCode::KeyResultNotFound,
        format!("Key result {} not found", id),
    )
}

// ════════════════════════════════════════════════════════════════════════════════
// Teams and Periods
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl TeamReader for InMemoryOkrStore {
    async fn list_all(&self) -> Result<Vec<Team>, DomainError> {
        Ok(self.state().teams.values().cloned().collect())
    }

    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.state().teams.get(&id).cloned())
    }
}

#[async_trait]
impl PeriodRepository for InMemoryOkrStore {
    async fn create(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Period, DomainError> {
        let mut state = self.state();
        let sort_order = state
            .periods
            .values()
            .map(|p| p.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let id = PeriodId::new(state.next_id());
        let period = Period::new(id, name, start_date, end_date, sort_order)?;
        state.periods.insert(id, period.clone());
        Ok(period)
    }

    async fn list_all(&self) -> Result<Vec<Period>, DomainError> {
        let mut periods: Vec<Period> = self.state().periods.values().cloned().collect();
        periods.sort_by_key(|p| (p.sort_order, p.id));
        Ok(periods)
    }

    async fn find_by_id(&self, id: PeriodId) -> Result<Option<Period>, DomainError> {
        Ok(self.state().periods.get(&id).cloned())
    }

    async fn find_for_date(&self, date: NaiveDate) -> Result<Option<Period>, DomainError> {
        Ok(self
            .state()
            .periods
            .values()
            .filter(|p| p.contains(date))
            .max_by_key(|p| (p.sort_order, p.end_date))
            .cloned())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Goals and Shares
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl GoalRepository for InMemoryOkrStore {
    async fn create(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        draft: &GoalDraft,
    ) -> Result<Goal, DomainError> {
        let mut state = self.state();
        let sort_order = state
            .goals
            .values()
            .filter(|g| g.team_id == team_id && g.period_id == period_id)
            .map(|g| g.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let now = Timestamp::now();
        let goal = Goal {
            id: GoalId::new(state.next_id()),
            team_id,
            period_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            weight: draft.weight,
            work_type: draft.work_type,
            focus_type: draft.focus_type,
            owner_text: draft.owner_text.clone(),
            sort_order,
            created_at: now,
            updated_at: now,
        };
        state.goals.insert(goal.id, goal.clone());
        Ok(goal)
    }

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>, DomainError> {
        Ok(self.state().goals.get(&id).cloned())
    }

    async fn update(&self, goal: &Goal) -> Result<(), DomainError> {
        let mut state = self.state();
        let stored = state.goal_mut(goal.id)?;
        stored.title = goal.title.clone();
        stored.description = goal.description.clone();
        stored.priority = goal.priority;
        stored.weight = goal.weight;
        stored.work_type = goal.work_type;
        stored.focus_type = goal.focus_type;
        stored.owner_text = goal.owner_text.clone();
        stored.updated_at = Timestamp::now();
        Ok(())
    }

    async fn delete(&self, id: GoalId) -> Result<(), DomainError> {
        let mut state = self.state();
        state.goals.remove(&id).ok_or_else(|| goal_not_found(id))?;
        state.shares.retain(|(goal_id, _), _| *goal_id != id);

        let removed: Vec<KeyResultId> = state
            .key_results
            .values()
            .filter(|kr| kr.goal_id == id)
            .map(|kr| kr.id)
            .collect();
        for kr_id in &removed {
            state.key_results.remove(kr_id);
        }
        state.comments.retain(|c| match c.target {
            CommentTarget::Goal(goal_id) => goal_id != id,
            CommentTarget::KeyResult(kr_id) => !removed.contains(&kr_id),
        });
        Ok(())
    }

    async fn list_for_team(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
    ) -> Result<Vec<TeamGoal>, DomainError> {
        let state = self.state();
        let mut goals: Vec<TeamGoal> = state
            .goals
            .values()
            .filter(|g| g.period_id == period_id)
            .filter_map(|goal| {
                let share = state.shares.get(&(goal.id, team_id));
                if goal.team_id != team_id && share.is_none() {
                    return None;
                }
                Some(TeamGoal {
                    team_id,
                    goal: goal.clone(),
                    weight: share.map_or(goal.weight, |s| s.weight),
                    sort_order: share.map_or(goal.sort_order, |s| s.sort_order),
                })
            })
            .collect();
        goals.sort_by_key(|tg| (tg.sort_order, tg.goal.id));
        Ok(goals)
    }
}

#[async_trait]
impl GoalShareLedger for InMemoryOkrStore {
    async fn list_shares(&self, goal_id: GoalId) -> Result<Vec<GoalShare>, DomainError> {
        Ok(self
            .state()
            .shares
            .range((goal_id, TeamId::new(i64::MIN))..=(goal_id, TeamId::new(i64::MAX)))
            .map(|(_, share)| *share)
            .collect())
    }

    async fn replace_shares(&self, plan: &SharePlan) -> Result<(), DomainError> {
        let mut state = self.state();
        state.set_owner(plan.goal_id, plan.owner.team_id, plan.owner.weight)?;
        let goal_order = state.goal_mut(plan.goal_id)?.sort_order;

        state.shares.retain(|(goal_id, team_id), _| {
            *goal_id != plan.goal_id || plan.shares.iter().any(|s| s.team_id == *team_id)
        });
        for target in &plan.shares {
            state
                .shares
                .entry((plan.goal_id, target.team_id))
                .and_modify(|share| share.weight = target.weight)
                .or_insert(GoalShare {
                    goal_id: plan.goal_id,
                    team_id: target.team_id,
                    weight: target.weight,
                    sort_order: goal_order,
                });
        }
        Ok(())
    }

    async fn remove_share(&self, goal_id: GoalId, team_id: TeamId) -> Result<(), DomainError> {
        self.state().shares.remove(&(goal_id, team_id));
        Ok(())
    }

    async fn promote_to_owner(&self, share: &GoalShare) -> Result<(), DomainError> {
        let mut state = self.state();
        state.set_owner(share.goal_id, share.team_id, share.weight)?;
        state.shares.remove(&(share.goal_id, share.team_id));
        Ok(())
    }

    async fn update_team_weight(
        &self,
        goal_id: GoalId,
        team_id: TeamId,
        weight: Weight,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        if let Some(goal) = state.goals.get_mut(&goal_id) {
            if goal.team_id == team_id {
                goal.weight = weight;
                return Ok(());
            }
        }
        match state.shares.get_mut(&(goal_id, team_id)) {
            Some(share) => {
                share.weight = weight;
                Ok(())
            }
            None => Err(goal_not_found(goal_id).with_detail("team_id", team_id.to_string())),
        }
    }
}

#[async_trait]
impl TeamPeriodStatusStore for InMemoryOkrStore {
    async fn get(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
    ) -> Result<TeamPeriodStatus, DomainError> {
        Ok(self
            .state()
            .statuses
            .get(&(team_id, period_id))
            .copied()
            .unwrap_or_default())
    }

    async fn set(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        status: TeamPeriodStatus,
    ) -> Result<(), DomainError> {
        self.state().statuses.insert((team_id, period_id), status);
        Ok(())
    }

    async fn list_for_period(
        &self,
        period_id: PeriodId,
    ) -> Result<HashMap<TeamId, TeamPeriodStatus>, DomainError> {
        Ok(self
            .state()
            .statuses
            .iter()
            .filter(|((_, p), _)| *p == period_id)
            .map(|((team_id, _), status)| (*team_id, *status))
            .collect())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Key Results and Comments
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl KeyResultRepository for InMemoryOkrStore {
    async fn create(
        &self,
        goal_id: GoalId,
        draft: &KeyResultDraft,
    ) -> Result<KeyResult, DomainError> {
        let mut state = self.state();
        if !state.goals.contains_key(&goal_id) {
            return Err(goal_not_found(goal_id));
        }
        let sort_order = state
            .key_results
            .values()
            .filter(|kr| kr.goal_id == goal_id)
            .map(|kr| kr.sort_order)
            .max()
            .unwrap_or(0)
            + 1;
        let id = KeyResultId::new(state.next_id());
        let measurement = state.materialize(&draft.measurement, Vec::new());
        let now = Timestamp::now();
        let key_result = KeyResult {
            id,
            goal_id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            weight: draft.weight,
            sort_order,
            measurement,
            created_at: now,
            updated_at: now,
        };
        state.key_results.insert(id, key_result.clone());
        Ok(key_result)
    }

    async fn find_by_id(&self, id: KeyResultId) -> Result<Option<KeyResult>, DomainError> {
        Ok(self.state().key_results.get(&id).cloned())
    }

    async fn list_by_goal(&self, goal_id: GoalId) -> Result<Vec<KeyResult>, DomainError> {
        let mut key_results: Vec<KeyResult> = self
            .state()
            .key_results
            .values()
            .filter(|kr| kr.goal_id == goal_id)
            .cloned()
            .collect();
        key_results.sort_by_key(|kr| (kr.sort_order, kr.id));
        Ok(key_results)
    }

    async fn update(
        &self,
        id: KeyResultId,
        draft: &KeyResultDraft,
    ) -> Result<KeyResult, DomainError> {
        let mut state = self.state();
        let kept = match (&state.key_result_mut(id)?.measurement, &draft.measurement) {
            (Measurement::Percent { checkpoints, .. }, MeasurementDraft::Percent { .. }) => {
                checkpoints.clone()
            }
            _ => Vec::new(),
        };
        let measurement = state.materialize(&draft.measurement, kept);

        let key_result = state.key_result_mut(id)?;
        key_result.title = draft.title.clone();
        key_result.description = draft.description.clone();
        key_result.weight = draft.weight;
        key_result.measurement = measurement;
        key_result.updated_at = Timestamp::now();
        Ok(key_result.clone())
    }

    async fn update_weights(
        &self,
        goal_id: GoalId,
        weights: &[(KeyResultId, Weight)],
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        for (id, _) in weights {
            if state.key_results.get(id).map(|kr| kr.goal_id) != Some(goal_id) {
                return Err(key_result_not_found(*id));
            }
        }
        let now = Timestamp::now();
        for (id, weight) in weights {
            let key_result = state.key_result_mut(*id)?;
            key_result.weight = *weight;
            key_result.updated_at = now;
        }
        Ok(())
    }

    async fn record_progress(
        &self,
        id: KeyResultId,
        update: &ProgressUpdate,
    ) -> Result<(), DomainError> {
        let mut state = self.state();
        let key_result = state.key_result_mut(id)?;
        key_result.measurement.record(*update)?;
        key_result.updated_at = Timestamp::now();
        Ok(())
    }

    async fn add_checkpoint(
        &self,
        id: KeyResultId,
        checkpoint: &CheckpointDraft,
    ) -> Result<Checkpoint, DomainError> {
        let mut state = self.state();
        let checkpoint_id = CheckpointId::new(state.next_id());
        match &mut state.key_result_mut(id)?.measurement {
            Measurement::Percent { checkpoints, .. } => {
                let stored = Checkpoint {
                    id: checkpoint_id,
                    metric_value: checkpoint.metric_value,
                    percent: checkpoint.percent,
                };
                checkpoints.push(stored);
                checkpoints.sort_by(|a, b| {
                    a.metric_value
                        .total_cmp(&b.metric_value)
                        .then(a.id.cmp(&b.id))
                });
                Ok(stored)
            }
            _ => Err(key_result_not_found(id)),
        }
    }

    async fn delete(&self, id: KeyResultId) -> Result<(), DomainError> {
        let mut state = self.state();
        state
            .key_results
            .remove(&id)
            .ok_or_else(|| key_result_not_found(id))?;
        state
            .comments
            .retain(|c| c.target != CommentTarget::KeyResult(id));
        Ok(())
    }
}

#[async_trait]
impl CommentStore for InMemoryOkrStore {
    async fn add(&self, target: CommentTarget, text: &str) -> Result<Comment, DomainError> {
        let mut state = self.state();
        match target {
            CommentTarget::Goal(id) if !state.goals.contains_key(&id) => {
                return Err(goal_not_found(id))
            }
            CommentTarget::KeyResult(id) if !state.key_results.contains_key(&id) => {
                return Err(key_result_not_found(id))
            }
            _ => {}
        }
        let comment = Comment {
            id: CommentId::new(state.next_id()),
            target,
            text: text.to_string(),
            created_at: Timestamp::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list(&self, target: CommentTarget) -> Result<Vec<Comment>, DomainError> {
        let mut comments: Vec<Comment> = self
            .state()
            .comments
            .iter()
            .filter(|c| c.target == target)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Ordering
// ════════════════════════════════════════════════════════════════════════════════

#[async_trait]
impl OrderSequencer for InMemoryOkrStore {
    async fn move_item(
        &self,
        item: SequencedItem,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, DomainError> {
        let mut state = self.state();

        let outcome = match item {
            SequencedItem::Goal { goal_id, as_team } => {
                let goal = state.goals.get(&goal_id).ok_or_else(|| goal_not_found(goal_id))?;
                if as_team.is_some_and(|team| team != goal.team_id) {
                    return Ok(MoveOutcome::NotOwner);
                }
                let (team_id, period_id, current) = (goal.team_id, goal.period_id, goal.sort_order);
                let siblings: Vec<(i64, i32)> = state
                    .goals
                    .values()
                    .filter(|g| g.team_id == team_id && g.period_id == period_id)
                    .map(|g| (g.id.value(), g.sort_order))
                    .collect();
                let neighbor = nearest_sibling(&siblings, current, direction);
                if let Some((neighbor_id, neighbor_order)) = neighbor {
                    swap(
                        &mut state.goals,
                        goal_id,
                        GoalId::new(neighbor_id),
                        current,
                        neighbor_order,
                        |g| &mut g.sort_order,
                    );
                }
                neighbor
            }
            SequencedItem::KeyResult { key_result_id } => {
                let kr = state
                    .key_results
                    .get(&key_result_id)
                    .ok_or_else(|| key_result_not_found(key_result_id))?;
                let (goal_id, current) = (kr.goal_id, kr.sort_order);
                let siblings: Vec<(i64, i32)> = state
                    .key_results
                    .values()
                    .filter(|k| k.goal_id == goal_id)
                    .map(|k| (k.id.value(), k.sort_order))
                    .collect();
                let neighbor = nearest_sibling(&siblings, current, direction);
                if let Some((neighbor_id, neighbor_order)) = neighbor {
                    swap(
                        &mut state.key_results,
                        key_result_id,
                        KeyResultId::new(neighbor_id),
                        current,
                        neighbor_order,
                        |k| &mut k.sort_order,
                    );
                }
                neighbor
            }
            SequencedItem::Period { period_id } => {
                let current = state
                    .periods
                    .get(&period_id)
                    .map(|p| p.sort_order)
                    .ok_or_else(|| {
                        DomainError::new(
                            ErrorCode::PeriodNotFound,
                            format!("Period {} not found", period_id),
                        )
                    })?;
                let siblings: Vec<(i64, i32)> = state
                    .periods
                    .values()
                    .map(|p| (p.id.value(), p.sort_order))
                    .collect();
                let neighbor = nearest_sibling(&siblings, current, direction);
                if let Some((neighbor_id, neighbor_order)) = neighbor {
                    swap(
                        &mut state.periods,
                        period_id,
                        PeriodId::new(neighbor_id),
                        current,
                        neighbor_order,
                        |p| &mut p.sort_order,
                    );
                }
                neighbor
            }
        };

        Ok(match outcome {
            Some((neighbor_id, _)) => MoveOutcome::Swapped { neighbor_id },
            None => MoveOutcome::AtBoundary,
        })
    }
}

/// Exchanges the order keys of two rows of one map.
fn swap<K: Ord, V>(
    rows: &mut BTreeMap<K, V>,
    item: K,
    neighbor: K,
    item_order: i32,
    neighbor_order: i32,
    order_of: impl Fn(&mut V) -> &mut i32,
) {
    if let Some(row) = rows.get_mut(&item) {
        *order_of(row) = neighbor_order;
    }
    if let Some(row) = rows.get_mut(&neighbor) {
        *order_of(row) = item_order;
    }
}
