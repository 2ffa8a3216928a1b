//! Shared fixture for handler tests.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::adapters::InMemoryOkrStore;
use crate::domain::foundation::{GoalId, TeamId, Weight};
use crate::domain::goal::{
    FocusType, Goal, GoalDraft, KeyResult, KeyResultDraft, MeasurementDraft, MetricRange,
    Priority, ShareTarget, SharePlan, StageDraft, WorkType,
};
use crate::domain::period::{Period, TeamPeriodStatus};
use crate::domain::team::{Team, TeamType};
use crate::ports::{
    GoalRepository, GoalShareLedger, KeyResultRepository, PeriodRepository, TeamPeriodStatusStore,
};

pub(crate) fn w(v: i64) -> Weight {
    Weight::try_new(v).unwrap()
}

pub(crate) fn goal_draft(title: &str, weight: i64) -> GoalDraft {
    GoalDraft {
        title: title.to_string(),
        description: String::new(),
        priority: Priority::P1,
        weight: w(weight),
        work_type: WorkType::Delivery,
        focus_type: FocusType::Stability,
        owner_text: String::new(),
    }
}

pub(crate) fn linear_draft(title: &str, weight: i64, current: f64) -> KeyResultDraft {
    KeyResultDraft {
        title: title.to_string(),
        description: String::new(),
        weight: w(weight),
        measurement: MeasurementDraft::Linear {
            range: MetricRange::new(0.0, 100.0, current).unwrap(),
        },
    }
}

pub(crate) fn project_draft(title: &str, weight: i64, stages: &[(i64, bool)]) -> KeyResultDraft {
    let stages = stages
        .iter()
        .enumerate()
        .map(|(i, (stage_weight, done))| {
            StageDraft::new(&format!("Stage {}", i + 1), *stage_weight, *done).unwrap()
        })
        .collect();
    KeyResultDraft {
        title: title.to_string(),
        description: String::new(),
        weight: w(weight),
        measurement: MeasurementDraft::project(stages).unwrap(),
    }
}

/// Cluster "Platform" with child teams "Alpha" and "Beta", plus one period.
pub(crate) struct Fixture {
    pub store: Arc<InMemoryOkrStore>,
    pub cluster: Team,
    pub alpha: Team,
    pub beta: Team,
    pub period: Period,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryOkrStore::new());
        let cluster = store.insert_team("Platform", TeamType::Cluster, None);
        let beta = store.insert_team("Beta", TeamType::Team, Some(cluster.id));
        let alpha = store.insert_team("Alpha", TeamType::Team, Some(cluster.id));
        let period = PeriodRepository::create(
            store.as_ref(),
            "Q1",
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        )
        .await
        .unwrap();
        Self {
            store,
            cluster,
            alpha,
            beta,
            period,
        }
    }

    pub async fn goal(&self, team: &Team, title: &str, weight: i64) -> Goal {
        GoalRepository::create(
            self.store.as_ref(),
            team.id,
            self.period.id,
            &goal_draft(title, weight),
        )
        .await
        .unwrap()
    }

    pub async fn key_result(&self, goal: &Goal, draft: KeyResultDraft) -> KeyResult {
        KeyResultRepository::create(self.store.as_ref(), goal.id, &draft)
            .await
            .unwrap()
    }

    pub async fn share(&self, goal: &Goal, targets: &[(TeamId, i64)]) {
        let targets: Vec<ShareTarget> = targets
            .iter()
            .map(|(team, weight)| ShareTarget::new(*team, w(*weight)))
            .collect();
        let plan = SharePlan::resolve(goal.id, goal.team_id, &targets).unwrap();
        self.store.replace_shares(&plan).await.unwrap();
    }

    pub async fn set_status(&self, team: &Team, status: TeamPeriodStatus) {
        self.store
            .set(team.id, self.period.id, status)
            .await
            .unwrap();
    }

    pub async fn status(&self, team: &Team) -> TeamPeriodStatus {
        self.store.get(team.id, self.period.id).await.unwrap()
    }

    pub async fn stored_goal(&self, id: GoalId) -> Option<Goal> {
        GoalRepository::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
    }
}
