//! PostgreSQL implementation of PeriodRepository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};

use super::db_err;
use crate::domain::foundation::{DomainError, PeriodId};
use crate::domain::period::Period;
use crate::ports::PeriodRepository;

/// PostgreSQL implementation of PeriodRepository.
#[derive(Clone)]
pub struct PostgresPeriodRepository {
    pool: PgPool,
}

impl PostgresPeriodRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PeriodRepository for PostgresPeriodRepository {
    async fn create(
        &self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Period, DomainError> {
        // Validate before touching the database; id and order are placeholders.
        let draft = Period::new(PeriodId::new(0), name, start_date, end_date, 0)?;

        let row = sqlx::query(
            r#"
            INSERT INTO periods (name, start_date, end_date, sort_order)
            VALUES ($1, $2, $3, (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM periods))
            RETURNING id, sort_order
            "#,
        )
        .bind(&draft.name)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to insert period"))?;

        Ok(Period {
            id: PeriodId::new(row.get("id")),
            sort_order: row.get("sort_order"),
            ..draft
        })
    }

    async fn list_all(&self) -> Result<Vec<Period>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, start_date, end_date, sort_order
            FROM periods
            ORDER BY sort_order, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch periods"))?;

        Ok(rows.iter().map(row_to_period).collect())
    }

    async fn find_by_id(&self, id: PeriodId) -> Result<Option<Period>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, start_date, end_date, sort_order
            FROM periods WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to fetch period"))?;

        Ok(row.as_ref().map(row_to_period))
    }

    async fn find_for_date(&self, date: NaiveDate) -> Result<Option<Period>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, start_date, end_date, sort_order
            FROM periods
            WHERE $1 BETWEEN start_date AND end_date
            ORDER BY sort_order DESC, end_date DESC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to find period for date"))?;

        Ok(row.as_ref().map(row_to_period))
    }
}

fn row_to_period(row: &sqlx::postgres::PgRow) -> Period {
    Period {
        id: PeriodId::new(row.get("id")),
        name: row.get("name"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        sort_order: row.get("sort_order"),
    }
}
