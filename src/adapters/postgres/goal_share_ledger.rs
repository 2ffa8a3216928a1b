//! PostgreSQL implementation of GoalShareLedger.
//!
//! Ownership lives on `goals.team_id` / `goals.weight`; every other team that
//! carries the goal has one `goal_shares` row. Multi-row changes run inside a
//! transaction holding the goal row lock.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::goal_repository::goal_not_found;
use super::{db_err, weight_column, weight_param};
use crate::domain::foundation::{DomainError, GoalId, TeamId, Weight};
use crate::domain::goal::{GoalShare, SharePlan};
use crate::ports::GoalShareLedger;

/// PostgreSQL implementation of GoalShareLedger.
#[derive(Clone)]
pub struct PostgresGoalShareLedger {
    pool: PgPool,
}

impl PostgresGoalShareLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GoalShareLedger for PostgresGoalShareLedger {
    async fn list_shares(&self, goal_id: GoalId) -> Result<Vec<GoalShare>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT goal_id, team_id, weight, sort_order
            FROM goal_shares
            WHERE goal_id = $1
            ORDER BY team_id
            "#,
        )
        .bind(goal_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch goal shares"))?;

        rows.iter()
            .map(|row| {
                Ok(GoalShare {
                    goal_id: GoalId::new(row.get("goal_id")),
                    team_id: TeamId::new(row.get("team_id")),
                    weight: weight_column("weight", row.get("weight"))?,
                    sort_order: row.get("sort_order"),
                })
            })
            .collect()
    }

    async fn replace_shares(&self, plan: &SharePlan) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        set_owner(&mut *tx, plan.goal_id, plan.owner.team_id, plan.owner.weight).await?;

        // `<> ALL('{}')` holds for every row, so an owner-only plan clears all shares.
        let keep: Vec<i64> = plan.shares.iter().map(|s| s.team_id.value()).collect();
        sqlx::query("DELETE FROM goal_shares WHERE goal_id = $1 AND team_id <> ALL($2)")
            .bind(plan.goal_id.value())
            .bind(&keep)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to prune goal shares"))?;

        for share in &plan.shares {
            sqlx::query(
                r#"
                INSERT INTO goal_shares (goal_id, team_id, weight, sort_order)
                SELECT $1, $2, $3, sort_order FROM goals WHERE id = $1
                ON CONFLICT (goal_id, team_id) DO UPDATE SET
                    weight = EXCLUDED.weight,
                    updated_at = NOW()
                "#,
            )
            .bind(plan.goal_id.value())
            .bind(share.team_id.value())
            .bind(weight_param(share.weight))
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to upsert goal share"))?;
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(())
    }

    async fn remove_share(&self, goal_id: GoalId, team_id: TeamId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM goal_shares WHERE goal_id = $1 AND team_id = $2")
            .bind(goal_id.value())
            .bind(team_id.value())
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to remove goal share"))?;

        Ok(())
    }

    async fn promote_to_owner(&self, share: &GoalShare) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        set_owner(&mut *tx, share.goal_id, share.team_id, share.weight).await?;

        sqlx::query("DELETE FROM goal_shares WHERE goal_id = $1 AND team_id = $2")
            .bind(share.goal_id.value())
            .bind(share.team_id.value())
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to remove promoted share"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(())
    }

    async fn update_team_weight(
        &self,
        goal_id: GoalId,
        team_id: TeamId,
        weight: Weight,
    ) -> Result<(), DomainError> {
        let owned = sqlx::query(
            "UPDATE goals SET weight = $3, updated_at = NOW() WHERE id = $1 AND team_id = $2",
        )
        .bind(goal_id.value())
        .bind(team_id.value())
        .bind(weight_param(weight))
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update goal weight"))?;

        if owned.rows_affected() > 0 {
            return Ok(());
        }

        let shared = sqlx::query(
            r#"
            UPDATE goal_shares SET weight = $3, updated_at = NOW()
            WHERE goal_id = $1 AND team_id = $2
            "#,
        )
        .bind(goal_id.value())
        .bind(team_id.value())
        .bind(weight_param(weight))
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to update share weight"))?;

        if shared.rows_affected() == 0 {
            return Err(goal_not_found(goal_id)
                .with_detail("team_id", team_id.to_string()));
        }

        Ok(())
    }
}

/// Moves ownership on the goal row, which also takes the row lock. A new
/// owner gets the goal appended to the end of its (team, period) group.
const SET_OWNER_SQL: &str = r#"
    UPDATE goals g SET
        team_id = $2,
        weight = $3,
        sort_order = CASE
            WHEN g.team_id = $2 THEN g.sort_order
            ELSE (
                SELECT COALESCE(MAX(o.sort_order), 0) + 1
                FROM goals o
                WHERE o.team_id = $2 AND o.period_id = g.period_id AND o.id <> g.id
            )
        END,
        updated_at = NOW()
    WHERE g.id = $1
"#;

async fn set_owner(
    conn: &mut PgConnection,
    goal_id: GoalId,
    team_id: TeamId,
    weight: Weight,
) -> Result<(), DomainError> {
    let result = sqlx::query(SET_OWNER_SQL)
        .bind(goal_id.value())
        .bind(team_id.value())
        .bind(weight_param(weight))
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to update goal owner"))?;

    if result.rows_affected() == 0 {
        return Err(goal_not_found(goal_id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_owner_keeps_order_for_same_owner() {
        assert!(SET_OWNER_SQL.contains("WHEN g.team_id = $2 THEN g.sort_order"));
    }

    #[test]
    fn set_owner_appends_within_new_owner_period_group() {
        let sql: String = SET_OWNER_SQL.split_whitespace().collect::<Vec<_>>().join(" ");
        assert!(sql.contains("COALESCE(MAX(o.sort_order), 0) + 1"));
        assert!(sql.contains("o.team_id = $2 AND o.period_id = g.period_id AND o.id <> g.id"));
    }
}
