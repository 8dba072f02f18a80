//! PostgreSQL implementation of DiscussionRepository.
//!
//! Persists debate records to the `discussions` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use crate::domain::debate::DebateSummary;
use crate::domain::foundation::{DebateId, DomainError, Timestamp, Username};
use crate::ports::{DiscussionRecord, DiscussionRepository};

/// PostgreSQL implementation of DiscussionRepository.
#[derive(Clone)]
pub struct PostgresDiscussionRepository {
    pool: PgPool,
}

impl PostgresDiscussionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiscussionRepository for PostgresDiscussionRepository {
    async fn save_discussion(&self, record: &DiscussionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO discussions (
                id, title, description, moderator, moderator_id, created_at, closed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.value())
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.moderator.as_str())
        .bind(record.moderator_id.value())
        .bind(record.created_at.as_datetime())
        .bind(record.closed_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert discussion", e))?;

        Ok(())
    }

    async fn mark_closed(&self, id: DebateId, closed_at: Timestamp) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE discussions SET closed_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .bind(closed_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to close discussion", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_moderator(
        &self,
        username: &Username,
    ) -> Result<Vec<DebateSummary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, closed_at
            FROM discussions
            WHERE moderator = $1
            ORDER BY id
            "#,
        )
        .bind(username.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to list discussions", e))?;

        rows.into_iter().map(row_to_summary).collect()
    }

    async fn max_discussion_id(&self) -> Result<Option<DebateId>, DomainError> {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM discussions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to read max discussion id", e))?;

        Ok(max.map(DebateId::new))
    }
}

fn row_to_summary(row: sqlx::postgres::PgRow) -> Result<DebateSummary, DomainError> {
    let decode = |e: sqlx::Error| DomainError::database("Failed to decode discussion row", e);

    let closed_at: Option<DateTime<Utc>> = row.try_get("closed_at").map_err(decode)?;
    Ok(DebateSummary {
        debate_id: DebateId::new(row.try_get("id").map_err(decode)?),
        title: row.try_get("title").map_err(decode)?,
        description: row.try_get("description").map_err(decode)?,
        closed: closed_at.is_some(),
    })
}
