//! Mock credential verifier for testing.
//!
//! Compares secrets in plain text and counts calls, so gate tests can assert
//! that short-circuited handshakes never reach the verifier.
//!
//! # Example
//!
//! ```ignore
//! let verifier = MockCredentialVerifier::new().with_moderator("alice", "pw", 1);
//! let gate = ConnectionGate::new(Arc::new(verifier));
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{AuthError, AuthenticatedModerator, ModeratorId, Username};
use crate::ports::CredentialVerifier;

/// Mock verifier holding username → (password, moderator id).
#[derive(Debug, Default)]
pub struct MockCredentialVerifier {
    accounts: HashMap<String, (String, ModeratorId)>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl MockCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `password` for `username`.
    pub fn with_moderator(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        moderator_id: i64,
    ) -> Self {
        self.accounts.insert(
            username.into(),
            (password.into(), ModeratorId::new(moderator_id)),
        );
        self
    }

    /// Fail every verification with `ServiceUnavailable`.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Number of `verify` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialVerifier for MockCredentialVerifier {
    async fn verify(
        &self,
        username: &Username,
        secret: SecretString,
    ) -> Result<AuthenticatedModerator, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(AuthError::service_unavailable("mock backend down"));
        }

        match self.accounts.get(username.as_str()) {
            Some((password, id)) if password == secret.expose_secret() => {
                Ok(AuthenticatedModerator::new(username.clone(), *id))
            }
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
