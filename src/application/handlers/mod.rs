//! Application handlers.
//!
//! One stateless function per moderator command. Each takes the router (for
//! the store and ports) and the caller's context and applies its registry
//! effects before returning. Commands that touch storage return the rest as
//! a pending [`Step`](super::router::Step) owning everything it needs.
//! Nothing read from the store before a persistence call is trusted after
//! it; the debate is re-resolved by id.

mod debates;
mod moderation;
mod questions;
mod suggestions;

pub(crate) use debates::{close_debate, create_debate, list_debates};
pub(crate) use moderation::ban_user;
pub(crate) use questions::{list_questions, new_question};
pub(crate) use suggestions::{approve_suggestion, list_suggestions, reject_suggestion};
