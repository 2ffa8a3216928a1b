//! PostgreSQL implementation of OrderSequencer.
//!
//! Both rows of a swap are locked with `FOR UPDATE` inside one transaction,
//! so concurrent moves in the same group queue behind each other.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::db_err;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::ordering::{MoveDirection, MoveOutcome, SequencedItem};
use crate::ports::OrderSequencer;

/// PostgreSQL implementation of OrderSequencer.
#[derive(Clone)]
pub struct PostgresOrderSequencer {
    pool: PgPool,
}

impl PostgresOrderSequencer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A locked row and the columns that bound its sibling group.
struct LockedRow {
    table: &'static str,
    id: i64,
    sort_order: i32,
    group: Vec<(&'static str, i64)>,
}

#[async_trait]
impl OrderSequencer for PostgresOrderSequencer {
    async fn move_item(
        &self,
        item: SequencedItem,
        direction: MoveDirection,
    ) -> Result<MoveOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let locked = match item {
            SequencedItem::Goal { goal_id, as_team } => {
                let row = sqlx::query(
                    "SELECT team_id, period_id, sort_order FROM goals WHERE id = $1 FOR UPDATE",
                )
                .bind(goal_id.value())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to lock goal"))?
                .ok_or_else(|| not_found(ErrorCode::GoalNotFound, "Goal", goal_id.value()))?;

                let owner: i64 = row.get("team_id");
                if as_team.is_some_and(|team| team.value() != owner) {
                    return Ok(MoveOutcome::NotOwner);
                }

                LockedRow {
                    table: "goals",
                    id: goal_id.value(),
                    sort_order: row.get("sort_order"),
                    group: vec![("team_id", owner), ("period_id", row.get("period_id"))],
                }
            }
            SequencedItem::KeyResult { key_result_id } => {
                let row =
                    sqlx::query("SELECT goal_id, sort_order FROM key_results WHERE id = $1 FOR UPDATE")
                        .bind(key_result_id.value())
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(db_err("Failed to lock key result"))?
                        .ok_or_else(|| {
                            not_found(
                                ErrorCode::KeyResultNotFound,
                                "Key result",
                                key_result_id.value(),
                            )
                        })?;

                LockedRow {
                    table: "key_results",
                    id: key_result_id.value(),
                    sort_order: row.get("sort_order"),
                    group: vec![("goal_id", row.get("goal_id"))],
                }
            }
            SequencedItem::Period { period_id } => {
                let row = sqlx::query("SELECT sort_order FROM periods WHERE id = $1 FOR UPDATE")
                    .bind(period_id.value())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db_err("Failed to lock period"))?
                    .ok_or_else(|| {
                        not_found(ErrorCode::PeriodNotFound, "Period", period_id.value())
                    })?;

                LockedRow {
                    table: "periods",
                    id: period_id.value(),
                    sort_order: row.get("sort_order"),
                    group: Vec::new(),
                }
            }
        };

        let outcome = match lock_neighbor(&mut *tx, &locked, direction).await? {
            Some((neighbor_id, neighbor_order)) => {
                set_order(&mut *tx, locked.table, locked.id, neighbor_order).await?;
                set_order(&mut *tx, locked.table, neighbor_id, locked.sort_order).await?;
                MoveOutcome::Swapped { neighbor_id }
            }
            None => MoveOutcome::AtBoundary,
        };

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(outcome)
    }
}

/// Nearest sibling strictly past the row in `direction`, locked.
async fn lock_neighbor(
    conn: &mut PgConnection,
    row: &LockedRow,
    direction: MoveDirection,
) -> Result<Option<(i64, i32)>, DomainError> {
    let sql = neighbor_sql(row, direction);

    let mut query = sqlx::query(&sql);
    for (_, value) in &row.group {
        query = query.bind(*value);
    }

    let neighbor = query
        .bind(row.sort_order)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err("Failed to lock neighbor"))?;

    Ok(neighbor.map(|r| (r.get("id"), r.get("sort_order"))))
}

/// Group columns bind as `$1..$n`, the current order as `$n+1`.
fn neighbor_sql(row: &LockedRow, direction: MoveDirection) -> String {
    let (op, order) = match direction {
        MoveDirection::Up => ("<", "DESC"),
        MoveDirection::Down => (">", "ASC"),
    };

    let mut conditions: Vec<String> = row
        .group
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{} = ${}", column, i + 1))
        .collect();
    conditions.push(format!("sort_order {} ${}", op, row.group.len() + 1));

    format!(
        "SELECT id, sort_order FROM {} WHERE {} ORDER BY sort_order {}, id LIMIT 1 FOR UPDATE",
        row.table,
        conditions.join(" AND "),
        order
    )
}

async fn set_order(
    conn: &mut PgConnection,
    table: &'static str,
    id: i64,
    sort_order: i32,
) -> Result<(), DomainError> {
    sqlx::query(&format!(
        "UPDATE {} SET sort_order = $2, updated_at = NOW() WHERE id = $1",
        table
    ))
    .bind(id)
    .bind(sort_order)
    .execute(&mut *conn)
    .await
    .map_err(db_err("Failed to update sort order"))?;

    Ok(())
}

fn not_found(code: ErrorCode, what: &str, id: i64) -> DomainError {
    DomainError::new(code, format!("{} {} not found", what, id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_row() -> LockedRow {
        LockedRow {
            table: "goals",
            id: 7,
            sort_order: 3,
            group: vec![("team_id", 1), ("period_id", 2)],
        }
    }

    #[test]
    fn moving_up_locks_closest_lower_order_in_group() {
        assert_eq!(
            neighbor_sql(&goal_row(), MoveDirection::Up),
            "SELECT id, sort_order FROM goals \
             WHERE team_id = $1 AND period_id = $2 AND sort_order < $3 \
             ORDER BY sort_order DESC, id LIMIT 1 FOR UPDATE"
        );
    }

    #[test]
    fn moving_down_locks_closest_higher_order_in_group() {
        assert_eq!(
            neighbor_sql(&goal_row(), MoveDirection::Down),
            "SELECT id, sort_order FROM goals \
             WHERE team_id = $1 AND period_id = $2 AND sort_order > $3 \
             ORDER BY sort_order ASC, id LIMIT 1 FOR UPDATE"
        );
    }

    #[test]
    fn periods_have_no_group_columns() {
        let row = LockedRow {
            table: "periods",
            id: 4,
            sort_order: 1,
            group: Vec::new(),
        };
        assert_eq!(
            neighbor_sql(&row, MoveDirection::Down),
            "SELECT id, sort_order FROM periods WHERE sort_order > $1 \
             ORDER BY sort_order ASC, id LIMIT 1 FOR UPDATE"
        );
    }

    #[test]
    fn missing_row_maps_to_its_not_found_code() {
        let err = not_found(ErrorCode::KeyResultNotFound, "Key result", 12);
        assert_eq!(err.code, ErrorCode::KeyResultNotFound);
        assert_eq!(err.message, "Key result 12 not found");
    }
}
