//! Authentication types for the domain layer.
//!
//! These types describe a moderator who has passed the connection gate.
//! They carry no transport or hashing dependencies; any credential backend
//! can produce them through the `CredentialVerifier` port.

use super::{ModeratorId, Username};
use thiserror::Error;

/// Moderator identity attached to a connection after authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedModerator {
    /// Login name, the key of the session registry.
    pub username: Username,

    /// Durable numeric id from the credential store.
    pub moderator_id: ModeratorId,
}

impl AuthenticatedModerator {
    pub fn new(username: Username, moderator_id: ModeratorId) -> Self {
        Self {
            username,
            moderator_id,
        }
    }
}

/// Authentication errors raised by the connection gate.
///
/// Only the `Display` of [`AuthError::InvalidCredentials`] ever reaches a
/// client; the distinction between unknown usernames and wrong passwords is
/// kept to the logs.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Missing secret, unknown username, or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The credential backend could not be reached.
    #[error("credential service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
