//! In-memory registries of the moderation core.
//!
//! - `sessions` - moderator username → connection handle + tracked debates
//! - `debates` - debate id → live debate
//! - `store` - the lock that keeps both in lockstep

mod debates;
mod sessions;
mod store;

pub use debates::DebateRegistry;
pub use sessions::{ModeratorSession, SessionRegistry};
pub use store::{ModerationStore, Registries};
