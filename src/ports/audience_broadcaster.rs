//! AudienceBroadcaster port - fan-out from a debate to its audience room.
//!
//! The moderator channel never talks to audience connections directly. A
//! debate calls this port whenever something its audience should see
//! changes; the adapter decides how that reaches the room.

use crate::domain::debate::AudienceUpdate;

/// Delivers audience updates for a debate.
///
/// # Contract
///
/// Implementations must:
/// - Never block; `publish` is called while the moderation store is locked
/// - Treat a room with no listeners as a no-op
/// - Route by `update.debate_id()`
pub trait AudienceBroadcaster: Send + Sync {
    /// Push an update to everyone following `update.debate_id()`.
    fn publish(&self, update: AudienceUpdate);
}
