//! Session registry - one entry per moderator for the life of the process.
//!
//! An entry survives disconnects; a reconnect swaps the connection handle in
//! place so the tracked debate set carries over.

use std::collections::{HashMap, HashSet};

use crate::domain::foundation::{
    AuthenticatedModerator, ConnectionId, DebateId, ModeratorId, Timestamp, Username,
};

/// Per-moderator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratorSession {
    moderator_id: ModeratorId,
    connection: Option<ConnectionId>,
    tracked: HashSet<DebateId>,
    connected_at: Timestamp,
}

impl ModeratorSession {
    fn new(moderator_id: ModeratorId, connection: ConnectionId) -> Self {
        Self {
            moderator_id,
            connection: Some(connection),
            tracked: HashSet::new(),
            connected_at: Timestamp::now(),
        }
    }

    pub fn moderator_id(&self) -> ModeratorId {
        self.moderator_id
    }

    /// Current connection, `None` while the moderator is disconnected.
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    pub fn tracked(&self) -> &HashSet<DebateId> {
        &self.tracked
    }

    pub fn is_tracking(&self, debate_id: DebateId) -> bool {
        self.tracked.contains(&debate_id)
    }

    /// When the current (or last) connection was attached.
    pub fn connected_at(&self) -> &Timestamp {
        &self.connected_at
    }
}

/// Moderator username → session.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<Username, ModeratorSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a connection to the moderator's session, creating it if needed.
    ///
    /// Returns `true` when an existing session was reused (a reconnect).
    pub fn initialize(
        &mut self,
        moderator: &AuthenticatedModerator,
        connection: ConnectionId,
    ) -> bool {
        match self.sessions.get_mut(&moderator.username) {
            Some(session) => {
                session.connection = Some(connection);
                session.moderator_id = moderator.moderator_id;
                session.connected_at = Timestamp::now();
                true
            }
            None => {
                self.sessions.insert(
                    moderator.username.clone(),
                    ModeratorSession::new(moderator.moderator_id, connection),
                );
                false
            }
        }
    }

    /// Clear the connection handle if it is still `connection`.
    ///
    /// A late disconnect from a superseded connection leaves the newer handle
    /// alone. Returns `true` if the handle was cleared.
    pub fn detach(&mut self, username: &Username, connection: ConnectionId) -> bool {
        match self.sessions.get_mut(username) {
            Some(session) if session.connection == Some(connection) => {
                session.connection = None;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, username: &Username) -> Option<&ModeratorSession> {
        self.sessions.get(username)
    }

    /// Tracked debate ids of a moderator, empty for unknown usernames.
    pub fn tracked(&self, username: &Username) -> Vec<DebateId> {
        self.sessions
            .get(username)
            .map(|s| s.tracked.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn track_debate(&mut self, username: &Username, debate_id: DebateId) {
        if let Some(session) = self.sessions.get_mut(username) {
            session.tracked.insert(debate_id);
        }
    }

    pub fn untrack_debate(&mut self, username: &Username, debate_id: DebateId) -> bool {
        self.sessions
            .get_mut(username)
            .map(|s| s.tracked.remove(&debate_id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
