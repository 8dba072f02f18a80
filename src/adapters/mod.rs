//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the moderation core to external systems:
//! - `auth` - Credential verification (Argon2id, mock)
//! - `memory` - In-memory persistence for tests and database-less runs
//! - `postgres` - PostgreSQL persistence
//! - `websocket` - Moderator endpoint and audience rooms

pub mod auth;
pub mod memory;
pub mod postgres;
pub mod websocket;
