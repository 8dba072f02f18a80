//! AdminCredentialStore port - stored moderator credentials.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ModeratorId, Username};

/// Stored credentials for one moderator account.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub moderator_id: ModeratorId,
    /// Argon2 PHC string.
    pub password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("moderator_id", &self.moderator_id)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Looks up moderator credentials by username.
#[async_trait]
pub trait AdminCredentialStore: Send + Sync {
    /// Returns `Ok(None)` when no account exists for `username`.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminCredentials>, DomainError>;

    /// Resolve the durable numeric id for a username.
    async fn moderator_id(&self, username: &Username) -> Result<Option<ModeratorId>, DomainError> {
        Ok(self
            .find_by_username(username)
            .await?
            .map(|credentials| credentials.moderator_id))
    }
}
