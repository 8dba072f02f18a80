//! Debate domain module.
//!
//! A debate is a moderated discussion session. It owns the questions
//! moderators pose and the suggestions the audience submits, and pushes
//! audience-facing updates through the `AudienceBroadcaster` port.
//!
//! # Audience updates
//!
//! - `QuestionCreated` - a moderator asked a new question
//! - `SuggestionApproved` - a suggestion passed review
//! - `DebateClosed` - the debate was closed by its moderator

mod aggregate;
mod errors;
mod question;
mod suggestion;
mod updates;

pub use aggregate::{Debate, DebateSummary};
pub use errors::DebateError;
pub use question::{Question, QuestionView};
pub use suggestion::{Suggestion, SuggestionStatus, SuggestionView};
pub use updates::AudienceUpdate;
