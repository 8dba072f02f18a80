//! Audience rooms, one per live debate.
//!
//! Each debate's updates fan out through its own broadcast channel, so an
//! audience member watching debate 7 never sees updates for debate 8.
//!
//! ```text
//! Room: debate-7       Room: debate-8
//! ├── audience-a       ├── audience-d
//! ├── audience-b       └── audience-e
//! └── audience-c
//! ```
//!
//! `publish` is called by a debate while the moderation store is locked, so
//! the room map uses a `std::sync::RwLock` and never awaits.
//!
//! The moderator endpoint only publishes here. Audience connections are
//! served by a separate transport, which attaches its members with
//! [`RoomManager::join`] and [`RoomManager::leave`]; until one is mounted,
//! publishing finds no room and is a no-op.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::debate::AudienceUpdate;
use crate::domain::foundation::{ConnectionId, DebateId};
use crate::ports::AudienceBroadcaster;

/// Manages audience rooms keyed by debate.
///
/// - Rooms are created on first join
/// - A room is dropped when its last member leaves, or right after its
///   debate-closed update goes out
/// - Publishing to a debate with no room is a no-op
pub struct RoomManager {
    /// debate_id → broadcast sender for that room.
    rooms: RwLock<HashMap<DebateId, broadcast::Sender<AudienceUpdate>>>,

    /// member → debate_id for O(1) cleanup on disconnect.
    members: RwLock<HashMap<ConnectionId, DebateId>>,

    /// Buffer size of each room's channel. Slow receivers miss the oldest
    /// updates once it fills.
    channel_capacity: usize,
}

impl RoomManager {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            members: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Create with default capacity (128 updates).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Add an audience connection to a debate room.
    ///
    /// Returns a receiver for every update published to that debate.
    pub fn join(&self, debate_id: DebateId, member: ConnectionId) -> broadcast::Receiver<AudienceUpdate> {
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        let sender = rooms.entry(debate_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(member, debate_id);

        sender.subscribe()
    }

    /// Remove a member. The room goes away once no receiver is left.
    ///
    /// Drop the receiver returned by `join` before calling this.
    pub fn leave(&self, member: ConnectionId) {
        let removed = self
            .members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&member);

        if let Some(debate_id) = removed {
            let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
            if rooms
                .get(&debate_id)
                .is_some_and(|sender| sender.receiver_count() == 0)
            {
                rooms.remove(&debate_id);
            }
        }
    }

    /// Receivers currently listening to a debate (0 if there is no room).
    pub fn audience_size(&self, debate_id: DebateId) -> usize {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&debate_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    pub fn active_rooms(&self) -> Vec<DebateId> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

impl AudienceBroadcaster for RoomManager {
    fn publish(&self, update: AudienceUpdate) {
        let debate_id = update.debate_id();
        let closing = matches!(update, AudienceUpdate::DebateClosed { .. });

        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = rooms.get(&debate_id) {
            // No receivers is fine.
            let delivered = sender.send(update).unwrap_or(0);
            trace!(debate_id = %debate_id, delivered, "Audience update published");
        }

        if closing {
            // Dropping the sender ends every receiver after the final update.
            rooms.remove(&debate_id);
            self.members
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|_, room| *room != debate_id);
        }
    }
}
