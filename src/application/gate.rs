//! ConnectionGate - authenticates a moderator connection before routing.
//!
//! The gate runs once per connection attempt. It either yields an
//! [`AuthenticatedModerator`] or a rejection; there is no retry state, a
//! rejected client reconnects to try again.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::foundation::{AuthError, AuthenticatedModerator, Username};
use crate::ports::CredentialVerifier;

/// Credentials claimed on the connection handshake.
#[derive(Debug, Default, Deserialize)]
pub struct Handshake {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "password")]
    pub secret: Option<SecretString>,
}

impl Handshake {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            secret: Some(SecretString::new(secret.into())),
        }
    }
}

/// Gate in front of the moderator command surface.
pub struct ConnectionGate {
    verifier: Arc<dyn CredentialVerifier>,
}

impl ConnectionGate {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }

    /// Authenticate a handshake.
    ///
    /// A missing or empty secret, or a missing username, fails without
    /// consulting the verifier.
    pub async fn authorize(&self, handshake: Handshake) -> Result<AuthenticatedModerator, AuthError> {
        let Some(secret) = handshake
            .secret
            .filter(|s| !s.expose_secret().is_empty())
        else {
            info!("Rejected moderator connection: no secret supplied");
            return Err(AuthError::InvalidCredentials);
        };

        let username = match handshake.username.as_deref().map(Username::new) {
            Some(Ok(username)) => username,
            _ => {
                info!("Rejected moderator connection: no username supplied");
                return Err(AuthError::InvalidCredentials);
            }
        };

        self.verifier.verify(&username, secret).await.map_err(|e| {
            if e.is_transient() {
                warn!(moderator = %username, error = %e, "Credential check could not run");
            }
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockCredentialVerifier;
    use crate::domain::foundation::ModeratorId;

    fn gate_with(verifier: Arc<MockCredentialVerifier>) -> ConnectionGate {
        ConnectionGate::new(verifier)
    }

    #[tokio::test]
    async fn valid_handshake_is_authorized() {
        let verifier = Arc::new(MockCredentialVerifier::new().with_moderator("alice", "pw", 7));
        let gate = gate_with(verifier.clone());

        let moderator = gate.authorize(Handshake::new("alice", "pw")).await.unwrap();

        assert_eq!(moderator.username.as_str(), "alice");
        assert_eq!(moderator.moderator_id, ModeratorId::new(7));
        assert_eq!(verifier.call_count(), 1);
    }

    #[tokio::test]
    async fn missing_secret_never_reaches_verifier() {
        let verifier = Arc::new(MockCredentialVerifier::new().with_moderator("alice", "pw", 7));
        let gate = gate_with(verifier.clone());

        let missing = Handshake {
            username: Some("alice".to_string()),
            secret: None,
        };
        let empty = Handshake::new("alice", "");

        assert!(matches!(gate.authorize(missing).await, Err(AuthError::InvalidCredentials)));
        assert!(matches!(gate.authorize(empty).await, Err(AuthError::InvalidCredentials)));
        assert_eq!(verifier.call_count(), 0);
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let verifier = Arc::new(MockCredentialVerifier::new());
        let gate = gate_with(verifier.clone());

        let result = gate.authorize(Handshake::new("  ", "pw")).await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        assert_eq!(verifier.call_count(), 0);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() {
        let verifier = Arc::new(MockCredentialVerifier::new().with_moderator("alice", "pw", 7));
        let gate = gate_with(verifier);

        let wrong = gate.authorize(Handshake::new("alice", "nope")).await.unwrap_err();
        let unknown = gate.authorize(Handshake::new("mallory", "pw")).await.unwrap_err();

        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn backend_failure_is_surfaced_as_transient() {
        let verifier = Arc::new(MockCredentialVerifier::new().unavailable());
        let gate = gate_with(verifier);

        let err = gate.authorize(Handshake::new("alice", "pw")).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn handshake_reads_password_query_field() {
        let handshake: Handshake =
            serde_json::from_str(r#"{"username":"alice","password":"pw"}"#).unwrap();
        assert_eq!(handshake.username.as_deref(), Some("alice"));
        assert_eq!(handshake.secret.unwrap().expose_secret(), "pw");
    }
}
