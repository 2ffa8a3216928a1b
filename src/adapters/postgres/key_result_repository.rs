//! PostgreSQL implementation of KeyResultRepository.
//!
//! The key result row carries the kind; the payload sits in one table per
//! kind (`kr_project_stages`, `kr_percent_meta` + `kr_percent_checkpoints`,
//! `kr_linear_meta`, `kr_boolean_meta`).

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::{db_err, parse_column, weight_column, weight_param};
use crate::domain::foundation::{
    CheckpointId, DomainError, ErrorCode, GoalId, KeyResultId, Percentage, StageId, Timestamp,
    Weight,
};
use crate::domain::goal::{
    Checkpoint, CheckpointDraft, KeyResult, KeyResultDraft, KeyResultKind, Measurement,
    MeasurementDraft, MetricRange, ProgressUpdate, ProjectStage,
};
use crate::ports::KeyResultRepository;

/// PostgreSQL implementation of KeyResultRepository.
#[derive(Clone)]
pub struct PostgresKeyResultRepository {
    pool: PgPool,
}

impl PostgresKeyResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyResultRepository for PostgresKeyResultRepository {
    async fn create(
        &self,
        goal_id: GoalId,
        draft: &KeyResultDraft,
    ) -> Result<KeyResult, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let goal = sqlx::query("SELECT id FROM goals WHERE id = $1 FOR SHARE")
            .bind(goal_id.value())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Failed to fetch goal"))?;
        if goal.is_none() {
            return Err(DomainError::new(
                ErrorCode::GoalNotFound,
                format!("Goal {} not found", goal_id),
            ));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO key_results (goal_id, title, description, weight, kind, sort_order)
            VALUES (
                $1, $2, $3, $4, $5,
                (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM key_results WHERE goal_id = $1)
            )
            RETURNING id
            "#,
        )
        .bind(goal_id.value())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(weight_param(draft.weight))
        .bind(draft.measurement.kind().as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to insert key result"))?;

        let id = KeyResultId::new(row.get("id"));
        insert_payload(&mut *tx, id, &draft.measurement).await?;

        let key_result = load_key_result(&mut *tx, id)
            .await?
            .ok_or_else(|| missing_after_write(id))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(key_result)
    }

    async fn find_by_id(&self, id: KeyResultId) -> Result<Option<KeyResult>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_err("Failed to acquire connection"))?;

        load_key_result(&mut *conn, id).await
    }

    async fn list_by_goal(&self, goal_id: GoalId) -> Result<Vec<KeyResult>, DomainError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(db_err("Failed to acquire connection"))?;

        let rows = sqlx::query(
            r#"
            SELECT id, goal_id, title, description, weight, kind, sort_order,
                   created_at, updated_at
            FROM key_results
            WHERE goal_id = $1
            ORDER BY sort_order, id
            "#,
        )
        .bind(goal_id.value())
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err("Failed to fetch key results"))?;

        let mut key_results = Vec::with_capacity(rows.len());
        for row in &rows {
            key_results.push(row_to_key_result(&mut *conn, row).await?);
        }
        Ok(key_results)
    }

    async fn update(
        &self,
        id: KeyResultId,
        draft: &KeyResultDraft,
    ) -> Result<KeyResult, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let row = sqlx::query("SELECT kind FROM key_results WHERE id = $1 FOR UPDATE")
            .bind(id.value())
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Failed to fetch key result"))?
            .ok_or_else(|| key_result_not_found(id))?;
        let previous_kind: String = row.get("kind");
        let previous_kind = parse_column::<KeyResultKind>("kind", &previous_kind)?;
        let next_kind = draft.measurement.kind();

        sqlx::query(
            r#"
            UPDATE key_results SET
                title = $2,
                description = $3,
                weight = $4,
                kind = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(weight_param(draft.weight))
        .bind(next_kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to update key result"))?;

        let keep_checkpoints =
            previous_kind == KeyResultKind::Percent && next_kind == KeyResultKind::Percent;
        clear_payload(&mut *tx, id, keep_checkpoints).await?;
        insert_payload(&mut *tx, id, &draft.measurement).await?;

        let key_result = load_key_result(&mut *tx, id)
            .await?
            .ok_or_else(|| missing_after_write(id))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(key_result)
    }

    async fn update_weights(
        &self,
        goal_id: GoalId,
        weights: &[(KeyResultId, Weight)],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        for (id, weight) in weights {
            let result = sqlx::query(
                r#"
                UPDATE key_results SET weight = $3, updated_at = NOW()
                WHERE id = $1 AND goal_id = $2
                "#,
            )
            .bind(id.value())
            .bind(goal_id.value())
            .bind(weight_param(*weight))
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to update key result weight"))?;

            // Dropping the transaction rolls back the weights already written.
            if result.rows_affected() == 0 {
                return Err(key_result_not_found(*id));
            }
        }

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(())
    }

    async fn record_progress(
        &self,
        id: KeyResultId,
        update: &ProgressUpdate,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let result = match *update {
            ProgressUpdate::Stage { stage_id, done } => sqlx::query(
                "UPDATE kr_project_stages SET is_done = $3 WHERE id = $2 AND key_result_id = $1",
            )
            .bind(id.value())
            .bind(stage_id.value())
            .bind(done)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to update project stage"))?,
            ProgressUpdate::PercentCurrent(value) => {
                sqlx::query("UPDATE kr_percent_meta SET current_value = $2 WHERE key_result_id = $1")
                    .bind(id.value())
                    .bind(value)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err("Failed to update percent value"))?
            }
            ProgressUpdate::LinearCurrent(value) => {
                sqlx::query("UPDATE kr_linear_meta SET current_value = $2 WHERE key_result_id = $1")
                    .bind(id.value())
                    .bind(value)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err("Failed to update linear value"))?
            }
            ProgressUpdate::Boolean(done) => {
                sqlx::query("UPDATE kr_boolean_meta SET is_done = $2 WHERE key_result_id = $1")
                    .bind(id.value())
                    .bind(done)
                    .execute(&mut *tx)
                    .await
                    .map_err(db_err("Failed to update boolean value"))?
            }
        };

        if result.rows_affected() == 0 {
            return Err(match update {
                ProgressUpdate::Stage { stage_id, .. } => DomainError::new(
                    ErrorCode::StageNotFound,
                    format!("Stage {} not found", stage_id),
                ),
                _ => key_result_not_found(id),
            });
        }

        sqlx::query("UPDATE key_results SET updated_at = NOW() WHERE id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to touch key result"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit transaction"))?;

        Ok(())
    }

    async fn add_checkpoint(
        &self,
        id: KeyResultId,
        checkpoint: &CheckpointDraft,
    ) -> Result<Checkpoint, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO kr_percent_checkpoints (key_result_id, metric_value, kr_percent)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM key_results WHERE id = $1 AND kind = 'PERCENT')
            RETURNING id
            "#,
        )
        .bind(id.value())
        .bind(checkpoint.metric_value)
        .bind(i32::from(checkpoint.percent.value()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to insert checkpoint"))?
        .ok_or_else(|| key_result_not_found(id))?;

        Ok(Checkpoint {
            id: CheckpointId::new(row.get("id")),
            metric_value: checkpoint.metric_value,
            percent: checkpoint.percent,
        })
    }

    async fn delete(&self, id: KeyResultId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM key_results WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete key result"))?;

        if result.rows_affected() == 0 {
            return Err(key_result_not_found(id));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Payload Writes
// ════════════════════════════════════════════════════════════════════════════════

async fn insert_payload(
    conn: &mut PgConnection,
    id: KeyResultId,
    measurement: &MeasurementDraft,
) -> Result<(), DomainError> {
    match measurement {
        MeasurementDraft::Project { stages } => {
            for (index, stage) in stages.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO kr_project_stages (key_result_id, title, weight, is_done, sort_order)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(id.value())
                .bind(&stage.title)
                .bind(weight_param(stage.weight))
                .bind(stage.done)
                .bind(index as i32 + 1)
                .execute(&mut *conn)
                .await
                .map_err(db_err("Failed to insert project stage"))?;
            }
        }
        MeasurementDraft::Percent { range } => {
            sqlx::query(
                r#"
                INSERT INTO kr_percent_meta (key_result_id, start_value, target_value, current_value)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (key_result_id) DO UPDATE SET
                    start_value = EXCLUDED.start_value,
                    target_value = EXCLUDED.target_value,
                    current_value = EXCLUDED.current_value
                "#,
            )
            .bind(id.value())
            .bind(range.start())
            .bind(range.target())
            .bind(range.current())
            .execute(&mut *conn)
            .await
            .map_err(db_err("Failed to upsert percent payload"))?;
        }
        MeasurementDraft::Linear { range } => {
            sqlx::query(
                r#"
                INSERT INTO kr_linear_meta (key_result_id, start_value, target_value, current_value)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (key_result_id) DO UPDATE SET
                    start_value = EXCLUDED.start_value,
                    target_value = EXCLUDED.target_value,
                    current_value = EXCLUDED.current_value
                "#,
            )
            .bind(id.value())
            .bind(range.start())
            .bind(range.target())
            .bind(range.current())
            .execute(&mut *conn)
            .await
            .map_err(db_err("Failed to upsert linear payload"))?;
        }
        MeasurementDraft::Boolean { done } => {
            sqlx::query(
                r#"
                INSERT INTO kr_boolean_meta (key_result_id, is_done)
                VALUES ($1, $2)
                ON CONFLICT (key_result_id) DO UPDATE SET is_done = EXCLUDED.is_done
                "#,
            )
            .bind(id.value())
            .bind(*done)
            .execute(&mut *conn)
            .await
            .map_err(db_err("Failed to upsert boolean payload"))?;
        }
    }
    Ok(())
}

/// Drops every payload row of a key result. Checkpoints stay when asked.
async fn clear_payload(
    conn: &mut PgConnection,
    id: KeyResultId,
    keep_checkpoints: bool,
) -> Result<(), DomainError> {
    for table in payload_tables(keep_checkpoints) {
        sqlx::query(&format!("DELETE FROM {} WHERE key_result_id = $1", table))
            .bind(id.value())
            .execute(&mut *conn)
            .await
            .map_err(db_err("Failed to clear key result payload"))?;
    }
    Ok(())
}

fn payload_tables(keep_checkpoints: bool) -> Vec<&'static str> {
    let mut tables = vec![
        "kr_project_stages",
        "kr_percent_meta",
        "kr_linear_meta",
        "kr_boolean_meta",
    ];
    if !keep_checkpoints {
        tables.push("kr_percent_checkpoints");
    }
    tables
}

// ════════════════════════════════════════════════════════════════════════════════
// Payload Reads
// ════════════════════════════════════════════════════════════════════════════════

async fn load_key_result(
    conn: &mut PgConnection,
    id: KeyResultId,
) -> Result<Option<KeyResult>, DomainError> {
    let row = sqlx::query(
        r#"
        SELECT id, goal_id, title, description, weight, kind, sort_order,
               created_at, updated_at
        FROM key_results WHERE id = $1
        "#,
    )
    .bind(id.value())
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_err("Failed to fetch key result"))?;

    match row {
        Some(row) => Ok(Some(row_to_key_result(conn, &row).await?)),
        None => Ok(None),
    }
}

async fn row_to_key_result(
    conn: &mut PgConnection,
    row: &sqlx::postgres::PgRow,
) -> Result<KeyResult, DomainError> {
    let id = KeyResultId::new(row.get("id"));
    let kind: String = row.get("kind");
    let kind = parse_column::<KeyResultKind>("kind", &kind)?;

    Ok(KeyResult {
        id,
        goal_id: GoalId::new(row.get("goal_id")),
        title: row.get("title"),
        description: row.get("description"),
        weight: weight_column("weight", row.get("weight"))?,
        sort_order: row.get("sort_order"),
        measurement: load_measurement(conn, id, kind).await?,
        created_at: Timestamp::from_datetime(row.get("created_at")),
        updated_at: Timestamp::from_datetime(row.get("updated_at")),
    })
}

async fn load_measurement(
    conn: &mut PgConnection,
    id: KeyResultId,
    kind: KeyResultKind,
) -> Result<Measurement, DomainError> {
    match kind {
        KeyResultKind::Project => {
            let rows = sqlx::query(
                r#"
                SELECT id, title, weight, is_done, sort_order
                FROM kr_project_stages
                WHERE key_result_id = $1
                ORDER BY sort_order, id
                "#,
            )
            .bind(id.value())
            .fetch_all(&mut *conn)
            .await
            .map_err(db_err("Failed to fetch project stages"))?;

            let stages = rows
                .iter()
                .map(|row| {
                    Ok(ProjectStage {
                        id: StageId::new(row.get("id")),
                        title: row.get("title"),
                        weight: weight_column("weight", row.get("weight"))?,
                        done: row.get("is_done"),
                        sort_order: row.get("sort_order"),
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            Ok(Measurement::Project { stages })
        }
        KeyResultKind::Percent => {
            let range = load_range(conn, "kr_percent_meta", id).await?;
            let rows = sqlx::query(
                r#"
                SELECT id, metric_value, kr_percent
                FROM kr_percent_checkpoints
                WHERE key_result_id = $1
                ORDER BY metric_value, id
                "#,
            )
            .bind(id.value())
            .fetch_all(&mut *conn)
            .await
            .map_err(db_err("Failed to fetch checkpoints"))?;

            let checkpoints = rows
                .iter()
                .map(|row| {
                    Ok(Checkpoint {
                        id: CheckpointId::new(row.get("id")),
                        metric_value: row.get("metric_value"),
                        percent: checkpoint_percent(id, row.get("kr_percent"))?,
                    })
                })
                .collect::<Result<Vec<_>, DomainError>>()?;
            Ok(Measurement::Percent { range, checkpoints })
        }
        KeyResultKind::Linear => Ok(Measurement::Linear {
            range: load_range(conn, "kr_linear_meta", id).await?,
        }),
        KeyResultKind::Boolean => {
            let row = sqlx::query("SELECT is_done FROM kr_boolean_meta WHERE key_result_id = $1")
                .bind(id.value())
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err("Failed to fetch boolean payload"))?
                .ok_or_else(|| corrupt_payload(id, "boolean payload missing"))?;
            Ok(Measurement::Boolean {
                done: row.get("is_done"),
            })
        }
    }
}

async fn load_range(
    conn: &mut PgConnection,
    table: &str,
    id: KeyResultId,
) -> Result<MetricRange, DomainError> {
    let row = sqlx::query(&format!(
        "SELECT start_value, target_value, current_value FROM {} WHERE key_result_id = $1",
        table
    ))
    .bind(id.value())
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_err("Failed to fetch metric range"))?
    .ok_or_else(|| corrupt_payload(id, format!("{} row missing", table)))?;

    range_columns(
        id,
        row.get("start_value"),
        row.get("target_value"),
        row.get("current_value"),
    )
}

fn range_columns(
    id: KeyResultId,
    start: f64,
    target: f64,
    current: f64,
) -> Result<MetricRange, DomainError> {
    MetricRange::new(start, target, current).map_err(|e| corrupt_payload(id, e))
}

fn checkpoint_percent(id: KeyResultId, value: i32) -> Result<Percentage, DomainError> {
    Percentage::try_new(i64::from(value)).map_err(|e| corrupt_payload(id, e))
}

// ════════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════════

fn key_result_not_found(id: KeyResultId) -> DomainError {
    DomainError::new(
        ErrorCode::KeyResultNotFound,
        format!("Key result {} not found", id),
    )
}

fn corrupt_payload(id: KeyResultId, reason: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid payload for key result {}: {}", id, reason),
    )
}

fn missing_after_write(id: KeyResultId) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Key result {} vanished inside its own transaction", id),
    )
}
