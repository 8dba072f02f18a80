//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the moderation core and the outside world. Adapters implement these ports.
//!
//! ## Authentication Ports
//!
//! - `CredentialVerifier` - Confirms a moderator's handshake secret
//! - `AdminCredentialStore` - Stored password hashes and moderator ids
//!
//! ## Persistence Ports
//!
//! - `DiscussionRepository` - Debate records, close markers, summaries
//!
//! ## Fan-out Ports
//!
//! - `AudienceBroadcaster` - Debate-to-audience update delivery

mod admin_credential_store;
mod audience_broadcaster;
mod credential_verifier;
mod discussion_repository;

pub use admin_credential_store::{AdminCredentialStore, AdminCredentials};
pub use audience_broadcaster::AudienceBroadcaster;
pub use credential_verifier::CredentialVerifier;
pub use discussion_repository::{DiscussionRecord, DiscussionRepository};
