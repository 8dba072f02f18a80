//! Application layer - the moderator control plane.
//!
//! The gate authenticates a connection, the router binds it to a session and
//! dispatches its commands to handlers, and the registries hold the live
//! state every handler reads and mutates.

pub mod commands;
pub mod gate;
mod handlers;
pub mod registry;
pub mod router;

pub use commands::{
    Acknowledgement, Command, CommandEnvelope, CommandError, CommandKind, Reply, ID_SENTINEL,
};
pub use gate::{ConnectionGate, Handshake};
pub use registry::{DebateRegistry, ModerationStore, ModeratorSession, Registries, SessionRegistry};
pub use router::{Dispatch, EventRouter, ModeratorContext};
