//! Authentication adapters.
//!
//! Implementations of the `CredentialVerifier` port:
//!
//! - `password` - Argon2id hashes from an `AdminCredentialStore`
//! - `mock` - Plain-text test implementation that doesn't hash

mod mock;
mod password;

pub use mock::MockCredentialVerifier;
pub use password::{hash_password, verify_password, PasswordCredentialVerifier, PasswordError};
