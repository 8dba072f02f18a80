//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the moderation domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedModerator};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ConnectionId, DebateId, ModeratorId, QuestionId, SuggestionId, Username};
pub use timestamp::Timestamp;
