//! ModerationStore - the single owner of both registries.
//!
//! Every read or write of the session and debate registries goes through
//! [`ModerationStore::with`], which runs a synchronous closure under one
//! lock. The guard is a `std::sync::MutexGuard`, which is `!Send`, so it
//! cannot be held across an `.await` inside a spawned handler. Paired
//! mutations (register + track, unregister + untrack) therefore always land
//! together and no handler can observe a debate in only one registry.

use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::debate::Debate;
use crate::domain::foundation::{AuthenticatedModerator, DebateId, Timestamp, Username};
use crate::ports::{AudienceBroadcaster, DiscussionRecord};

use super::{DebateRegistry, SessionRegistry};

/// Both registries, only reachable inside [`ModerationStore::with`].
#[derive(Debug, Default)]
pub struct Registries {
    pub sessions: SessionRegistry,
    pub debates: DebateRegistry,
}

impl Registries {
    /// Create a debate, register it and track it for its creator.
    ///
    /// Returns the record to persist once the lock is released.
    pub fn open_debate(
        &mut self,
        creator: &AuthenticatedModerator,
        title: String,
        description: String,
        audience: Arc<dyn AudienceBroadcaster>,
    ) -> DiscussionRecord {
        let id = self.debates.allocate_id();
        let debate = Debate::new(
            id,
            title,
            description,
            creator.username.clone(),
            creator.moderator_id,
            audience,
        );
        let record = DiscussionRecord::from_debate(&debate);

        self.debates.register(debate);
        self.sessions.track_debate(&creator.username, id);
        record
    }

    /// Unregister a debate and untrack it from its creator.
    ///
    /// The audience is told the debate closed before the instance is handed
    /// back. Returns `None` if the debate was not open.
    pub fn close_debate(&mut self, id: DebateId, closed_at: Timestamp) -> Option<Debate> {
        let debate = self.debates.unregister(id)?;
        self.sessions.untrack_debate(debate.creator(), id);
        debate.close(closed_at);
        Some(debate)
    }

    /// Live debates tracked by `username`, resolved against the registry.
    pub fn tracked_debates(&self, username: &Username) -> Vec<&Debate> {
        let mut debates: Vec<&Debate> = self
            .sessions
            .tracked(username)
            .into_iter()
            .filter_map(|id| self.debates.lookup(id))
            .collect();
        debates.sort_by_key(|d| d.id());
        debates
    }
}

/// Process-wide owner of the moderation registries.
///
/// Constructed once at startup and shared by reference with the router.
#[derive(Debug, Default)]
pub struct ModerationStore {
    inner: Mutex<Registries>,
}

impl ModerationStore {
    /// Create a store whose first debate id is `first_debate_id`.
    pub fn new(first_debate_id: DebateId) -> Self {
        Self {
            inner: Mutex::new(Registries {
                sessions: SessionRegistry::new(),
                debates: DebateRegistry::new(first_debate_id),
            }),
        }
    }

    /// Run `f` with exclusive access to both registries.
    ///
    /// `f` is synchronous; keep it short and never block inside it.
    pub fn with<R>(&self, f: impl FnOnce(&mut Registries) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
