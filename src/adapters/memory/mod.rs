//! In-memory adapters.
//!
//! Used by tests and when the service runs without a database. State lives
//! for the life of the process only.

mod admin_credential_store;
mod discussion_repository;

pub use admin_credential_store::InMemoryAdminCredentialStore;
pub use discussion_repository::InMemoryDiscussionRepository;
