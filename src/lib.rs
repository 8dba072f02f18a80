//! Debate Moderation - moderator control plane for live debates.
//!
//! Authenticated moderators connect over a WebSocket, create and close
//! debates, post questions, and approve or reject audience suggestions. The
//! live session and debate registries are owned by one store; debates push
//! their updates to per-debate audience rooms.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
