//! Password credential verifier backed by stored Argon2id hashes.
//!
//! The hash comparison is CPU-bound and runs on the blocking pool. Unknown
//! usernames are checked against a fixed dummy hash with the same cost
//! parameters, so both failure paths take the same time and return the same
//! error.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::foundation::{AuthError, AuthenticatedModerator, Username};
use crate::ports::{AdminCredentialStore, CredentialVerifier};

/// Verified in place of a real hash when the username has no account.
/// Uses the default Argon2id parameters.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$suEWC5CzAcTpeA14gYsckw$AWHDFZFQdVufEKAC/N/HUhL73Jbuw2yhd3n+Y1izOLQ";

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hashing(String),

    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hash a password using Argon2id, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Check `password` against a PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// `CredentialVerifier` over an `AdminCredentialStore`.
pub struct PasswordCredentialVerifier {
    store: Arc<dyn AdminCredentialStore>,
}

impl PasswordCredentialVerifier {
    pub fn new(store: Arc<dyn AdminCredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialVerifier for PasswordCredentialVerifier {
    async fn verify(
        &self,
        username: &Username,
        secret: SecretString,
    ) -> Result<AuthenticatedModerator, AuthError> {
        let credentials = self.store.find_by_username(username).await.map_err(|e| {
            error!(moderator = %username, error = %e, "Credential lookup failed");
            AuthError::service_unavailable(e.message)
        })?;

        let (hash, moderator_id) = match credentials {
            Some(c) => (c.password_hash, Some(c.moderator_id)),
            None => (DUMMY_HASH.to_string(), None),
        };

        let outcome = tokio::task::spawn_blocking(move || {
            verify_password(secret.expose_secret(), &hash)
        })
        .await
        .map_err(|e| AuthError::service_unavailable(format!("verification task failed: {}", e)))?;

        match (outcome, moderator_id) {
            (Ok(true), Some(moderator_id)) => {
                Ok(AuthenticatedModerator::new(username.clone(), moderator_id))
            }
            (Ok(_), None) => {
                info!(moderator = %username, "Rejected moderator connection: unknown username");
                Err(AuthError::InvalidCredentials)
            }
            (Ok(false), Some(_)) => {
                info!(moderator = %username, "Rejected moderator connection: wrong password");
                Err(AuthError::InvalidCredentials)
            }
            (Err(e), _) => {
                warn!(moderator = %username, error = %e, "Stored password hash is unusable");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
