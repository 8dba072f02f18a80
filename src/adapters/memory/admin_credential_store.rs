//! In-memory implementation of AdminCredentialStore.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ModeratorId, Username};
use crate::ports::{AdminCredentialStore, AdminCredentials};

#[derive(Debug, Default)]
pub struct InMemoryAdminCredentialStore {
    admins: RwLock<HashMap<Username, AdminCredentials>>,
}

impl InMemoryAdminCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an account. `password_hash` is an Argon2 PHC string.
    pub fn insert(&self, username: Username, moderator_id: ModeratorId, password_hash: String) {
        self.admins
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                username,
                AdminCredentials {
                    moderator_id,
                    password_hash,
                },
            );
    }

    pub fn len(&self) -> usize {
        self.admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AdminCredentialStore for InMemoryAdminCredentialStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<AdminCredentials>, DomainError> {
        Ok(self
            .admins
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_inserted_account() {
        let store = InMemoryAdminCredentialStore::new();
        let alice = Username::new("alice").unwrap();
        store.insert(alice.clone(), ModeratorId::new(3), "$argon2id$hash".to_string());

        let found = store.find_by_username(&alice).await.unwrap().unwrap();
        assert_eq!(found.moderator_id, ModeratorId::new(3));
        assert_eq!(store.moderator_id(&alice).await.unwrap(), Some(ModeratorId::new(3)));
    }

    #[tokio::test]
    async fn unknown_account_is_none() {
        let store = InMemoryAdminCredentialStore::new();
        let bob = Username::new("bob").unwrap();
        assert!(store.find_by_username(&bob).await.unwrap().is_none());
    }
}
