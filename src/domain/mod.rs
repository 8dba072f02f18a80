//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, auth)
//! - `debate` - Debate entity with its questions and audience suggestions

pub mod debate;
pub mod foundation;
