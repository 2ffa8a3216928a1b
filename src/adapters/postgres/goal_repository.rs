//! PostgreSQL implementation of GoalRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{db_err, parse_column, weight_column, weight_param};
use crate::domain::foundation::{DomainError, ErrorCode, GoalId, PeriodId, TeamId, Timestamp};
use crate::domain::goal::{FocusType, Goal, GoalDraft, Priority, TeamGoal, WorkType};
use crate::ports::GoalRepository;

/// PostgreSQL implementation of GoalRepository.
#[derive(Clone)]
pub struct PostgresGoalRepository {
    pool: PgPool,
}

impl PostgresGoalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalRepository for PostgresGoalRepository {
    async fn create(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
        draft: &GoalDraft,
    ) -> Result<Goal, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO goals (
                team_id, period_id, title, description, priority, weight,
                work_type, focus_type, owner_text, sort_order
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9,
                (SELECT COALESCE(MAX(sort_order), 0) + 1
                 FROM goals WHERE team_id = $1 AND period_id = $2)
            )
            RETURNING id, team_id, period_id, title, description, priority, weight,
                      work_type, focus_type, owner_text, sort_order, created_at, updated_at
            "#,
        )
        .bind(team_id.value())
        .bind(period_id.value())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.priority.as_str())
        .bind(weight_param(draft.weight))
        .bind(draft.work_type.as_str())
        .bind(draft.focus_type.as_str())
        .bind(&draft.owner_text)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert goal"))?;

        row_to_goal(&row)
    }

    async fn find_by_id(&self, id: GoalId) -> Result<Option<Goal>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, team_id, period_id, title, description, priority, weight,
                   work_type, focus_type, owner_text, sort_order, created_at, updated_at
            FROM goals WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to fetch goal"))?;

        row.as_ref().map(row_to_goal).transpose()
    }

    async fn update(&self, goal: &Goal) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE goals SET
                title = $2,
                description = $3,
                priority = $4,
                weight = $5,
                work_type = $6,
                focus_type = $7,
                owner_text = $8,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(goal.id.value())
        .bind(&goal.title)
        .bind(&goal.description)
        .bind(goal.priority.as_str())
        .bind(weight_param(goal.weight))
        .bind(goal.work_type.as_str())
        .bind(goal.focus_type.as_str())
        .bind(&goal.owner_text)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update goal"))?;

        if result.rows_affected() == 0 {
            return Err(goal_not_found(goal.id));
        }

        Ok(())
    }

    async fn delete(&self, id: GoalId) -> Result<(), DomainError> {
        // Key results, shares and comments go with the goal through cascades.
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete goal"))?;

        if result.rows_affected() == 0 {
            return Err(goal_not_found(id));
        }

        Ok(())
    }

    async fn list_for_team(
        &self,
        team_id: TeamId,
        period_id: PeriodId,
    ) -> Result<Vec<TeamGoal>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT g.id, g.team_id, g.period_id, g.title, g.description, g.priority,
                   g.weight, g.work_type, g.focus_type, g.owner_text, g.sort_order,
                   g.created_at, g.updated_at,
                   COALESCE(gs.weight, g.weight) AS team_weight,
                   COALESCE(gs.sort_order, g.sort_order) AS team_sort_order
            FROM goals g
            LEFT JOIN goal_shares gs ON gs.goal_id = g.id AND gs.team_id = $1
            WHERE g.period_id = $2
              AND (g.team_id = $1 OR gs.team_id IS NOT NULL)
            ORDER BY team_sort_order, g.id
            "#,
        )
        .bind(team_id.value())
        .bind(period_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch team goals"))?;

        rows.iter()
            .map(|row| {
                Ok(TeamGoal {
                    team_id,
                    goal: row_to_goal(row)?,
                    weight: weight_column("team_weight", row.get("team_weight"))?,
                    sort_order: row.get("team_sort_order"),
                })
            })
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Conversion Functions
// ════════════════════════════════════════════════════════════════════════════════

pub(super) fn goal_not_found(id: GoalId) -> DomainError {
    DomainError::new(ErrorCode::GoalNotFound, format!("Goal {} not found", id))
}

fn row_to_goal(row: &sqlx::postgres::PgRow) -> Result<Goal, DomainError> {
    let priority: String = row.get("priority");
    let work_type: String = row.get("work_type");
    let focus_type: String = row.get("focus_type");

    Ok(Goal {
        id: GoalId::new(row.get("id")),
        team_id: TeamId::new(row.get("team_id")),
        period_id: PeriodId::new(row.get("period_id")),
        title: row.get("title"),
        description: row.get("description"),
        priority: parse_column::<Priority>("priority", &priority)?,
        weight: weight_column("weight", row.get("weight"))?,
        work_type: parse_column::<WorkType>("work_type", &work_type)?,
        focus_type: parse_column::<FocusType>("focus_type", &focus_type)?,
        owner_text: row.get("owner_text"),
        sort_order: row.get("sort_order"),
        created_at: Timestamp::from_datetime(row.get("created_at")),
        updated_at: Timestamp::from_datetime(row.get("updated_at")),
    })
}
