//! CredentialVerifier port - authenticates a moderator handshake.
//!
//! # Example
//!
//! ```ignore
//! let moderator = verifier.verify(&username, secret).await?;
//! registry.initialize(&moderator, connection_id);
//! ```

use async_trait::async_trait;
use secrecy::SecretString;

use crate::domain::foundation::{AuthError, AuthenticatedModerator, Username};

/// Confirms that a claimed secret belongs to a moderator account.
///
/// # Contract
///
/// Implementations must:
/// - Run the CPU-bound hash comparison off the async executor threads
/// - Return `AuthError::InvalidCredentials` for both unknown usernames and
///   wrong secrets, with no observable difference to the caller
/// - Return `AuthError::ServiceUnavailable` only for backend failures
/// - Drop the secret as soon as the comparison is done
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify `secret` for `username`, consuming the secret.
    async fn verify(
        &self,
        username: &Username,
        secret: SecretString,
    ) -> Result<AuthenticatedModerator, AuthError>;
}
