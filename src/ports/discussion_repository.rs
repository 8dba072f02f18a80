//! DiscussionRepository port - persisted debate records.
//!
//! Persistence is a side channel for the moderation core: live debates are
//! authoritative in memory, and a failed save never rolls them back.

use async_trait::async_trait;

use crate::domain::debate::{Debate, DebateSummary};
use crate::domain::foundation::{DebateId, DomainError, ModeratorId, Timestamp, Username};

/// Persisted form of a debate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionRecord {
    pub id: DebateId,
    pub title: String,
    pub description: String,
    pub moderator: Username,
    pub moderator_id: ModeratorId,
    pub created_at: Timestamp,
    pub closed_at: Option<Timestamp>,
}

impl DiscussionRecord {
    /// Snapshot of a freshly created debate.
    pub fn from_debate(debate: &Debate) -> Self {
        Self {
            id: debate.id(),
            title: debate.title().to_string(),
            description: debate.description().to_string(),
            moderator: debate.creator().clone(),
            moderator_id: debate.moderator_id(),
            created_at: *debate.created_at(),
            closed_at: None,
        }
    }

    pub fn summary(&self) -> DebateSummary {
        DebateSummary {
            debate_id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            closed: self.closed_at.is_some(),
        }
    }
}

/// Repository for discussion records.
///
/// # Contract
///
/// - `save_discussion` inserts a new record; ids are assigned by the caller
/// - `mark_closed` returns `Ok(false)` when no record matched
/// - `list_for_moderator` returns open and closed discussions of one
///   moderator
/// - `max_discussion_id` seeds the in-process id sequence at startup
#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    async fn save_discussion(&self, record: &DiscussionRecord) -> Result<(), DomainError>;

    async fn mark_closed(&self, id: DebateId, closed_at: Timestamp) -> Result<bool, DomainError>;

    async fn list_for_moderator(
        &self,
        username: &Username,
    ) -> Result<Vec<DebateSummary>, DomainError>;

    async fn max_discussion_id(&self) -> Result<Option<DebateId>, DomainError>;
}
