//! PostgreSQL implementation of CommentStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::db_err;
use crate::domain::foundation::{CommentId, DomainError, ErrorCode, Timestamp};
use crate::domain::goal::{Comment, CommentTarget};
use crate::ports::CommentStore;

/// PostgreSQL implementation of CommentStore.
#[derive(Clone)]
pub struct PostgresCommentStore {
    pool: PgPool,
}

impl PostgresCommentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Table, owner column and owner id for a target.
fn locate(target: CommentTarget) -> (&'static str, &'static str, i64) {
    match target {
        CommentTarget::Goal(id) => ("goal_comments", "goal_id", id.value()),
        CommentTarget::KeyResult(id) => ("key_result_comments", "key_result_id", id.value()),
    }
}

#[async_trait]
impl CommentStore for PostgresCommentStore {
    async fn add(&self, target: CommentTarget, text: &str) -> Result<Comment, DomainError> {
        let (table, owner_column, owner_id) = locate(target);

        let row = sqlx::query(&format!(
            "INSERT INTO {} ({}, text) VALUES ($1, $2) RETURNING id, created_at",
            table, owner_column
        ))
        .bind(owner_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // A dangling owner id trips the foreign key.
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                let code = match target {
                    CommentTarget::Goal(_) => ErrorCode::GoalNotFound,
                    CommentTarget::KeyResult(_) => ErrorCode::KeyResultNotFound,
                };
                DomainError::new(code, format!("Comment target {} not found", owner_id))
            }
            _ => DomainError::database("Failed to insert comment", &e),
        })?;

        Ok(Comment {
            id: CommentId::new(row.get("id")),
            target,
            text: text.to_string(),
            created_at: Timestamp::from_datetime(row.get("created_at")),
        })
    }

    async fn list(&self, target: CommentTarget) -> Result<Vec<Comment>, DomainError> {
        let (table, owner_column, owner_id) = locate(target);

        let rows = sqlx::query(&format!(
            "SELECT id, text, created_at FROM {} WHERE {} = $1 ORDER BY created_at DESC, id DESC",
            table, owner_column
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch comments"))?;

        Ok(rows
            .iter()
            .map(|row| Comment {
                id: CommentId::new(row.get("id")),
                target,
                text: row.get("text"),
                created_at: Timestamp::from_datetime(row.get("created_at")),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{GoalId, KeyResultId};

    #[test]
    fn each_target_kind_has_its_own_table() {
        assert_eq!(
            locate(CommentTarget::Goal(GoalId::new(5))),
            ("goal_comments", "goal_id", 5)
        );
        assert_eq!(
            locate(CommentTarget::KeyResult(KeyResultId::new(9))),
            ("key_result_comments", "key_result_id", 9)
        );
    }
}
