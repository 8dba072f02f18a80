//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Credential settings.
///
/// With no database configured the service falls back to an in-memory
/// credential store, optionally seeded with one development admin.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// Username of the development admin
    pub dev_admin_username: Option<String>,

    /// Argon2 PHC hash of the development admin's password
    pub dev_admin_password_hash: Option<String>,
}

impl AuthConfig {
    /// Returns the development admin as `(username, hash)` if fully set.
    pub fn dev_admin(&self) -> Option<(&str, &str)> {
        match (&self.dev_admin_username, &self.dev_admin_password_hash) {
            (Some(username), Some(hash)) => Some((username.as_str(), hash.as_str())),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dev_admin_username.is_some() != self.dev_admin_password_hash.is_some() {
            return Err(ValidationError::IncompleteDevAdmin);
        }
        Ok(())
    }
}
