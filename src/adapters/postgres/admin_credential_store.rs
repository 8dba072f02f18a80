//! PostgreSQL implementation of AdminCredentialStore.
//!
//! Reads moderator accounts from the `admins` table.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ModeratorId, Username};
use crate::ports::{AdminCredentialStore, AdminCredentials};

#[derive(Clone)]
pub struct PostgresAdminCredentialStore {
    pool: PgPool,
}

impl PostgresAdminCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminCredentialStore for PostgresAdminCredentialStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminCredentials>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, password_hash
            FROM admins
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch admin", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| DomainError::database("Failed to decode admin row", e);
        Ok(Some(AdminCredentials {
            moderator_id: ModeratorId::new(row.try_get("id").map_err(decode)?),
            password_hash: row.try_get("password_hash").map_err(decode)?,
        }))
    }
}
