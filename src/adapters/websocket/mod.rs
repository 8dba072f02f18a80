//! WebSocket adapters for the moderator channel and audience rooms.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                 GET /admin?username=..&password=..                   │
//! │   ConnectionGate runs before the upgrade; 401 on failure            │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ upgrade
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      EventRouter                                     │
//! │   - one task per command frame                                       │
//! │   - one writer task per connection for acks                          │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ debates publish
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomManager                                     │
//! │   Room: debate-1       Room: debate-2       Room: debate-3          │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`rooms`] - Per-debate audience fan-out
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;
pub mod rooms;

pub use handler::{admin_ws_handler, moderator_app, moderator_router, ModeratorSocketState};
pub use messages::{AckMessage, ClientMessage, ConnectedMessage, ErrorMessage, ServerMessage};
pub use rooms::RoomManager;
