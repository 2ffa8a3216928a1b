//! PostgreSQL implementation of TeamReader.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{db_err, parse_column};
use crate::domain::foundation::{DomainError, TeamId, Timestamp};
use crate::domain::team::{Team, TeamType};
use crate::ports::TeamReader;

/// PostgreSQL implementation of TeamReader.
#[derive(Clone)]
pub struct PostgresTeamReader {
    pool: PgPool,
}

impl PostgresTeamReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamReader for PostgresTeamReader {
    async fn list_all(&self) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, type, parent_id, created_at, updated_at
            FROM teams
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to fetch teams"))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn find_by_id(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, type, parent_id, created_at, updated_at
            FROM teams WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err("Failed to fetch team"))?;

        row.as_ref().map(row_to_team).transpose()
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let team_type: String = row.get("type");
    let parent_id: Option<i64> = row.get("parent_id");
    Ok(Team {
        id: TeamId::new(row.get("id")),
        name: row.get("name"),
        team_type: parse_column::<TeamType>("type", &team_type)?,
        parent_id: parent_id.map(TeamId::new),
        created_at: Timestamp::from_datetime(row.get("created_at")),
        updated_at: Timestamp::from_datetime(row.get("updated_at")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_team_types_read_back() {
        for team_type in [TeamType::Cluster, TeamType::Unit, TeamType::Team] {
            let read: TeamType = parse_column("type", team_type.as_str()).unwrap();
            assert_eq!(read, team_type);
        }
    }
}
