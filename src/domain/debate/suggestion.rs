//! Audience-submitted suggestions awaiting moderator review.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{SuggestionId, Timestamp};

use super::DebateError;

/// Review state of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    /// Valid transitions:
    /// - Pending -> Approved
    /// - Pending -> Rejected
    pub fn can_transition_to(&self, target: &SuggestionStatus) -> bool {
        use SuggestionStatus::*;
        matches!((self, target), (Pending, Approved) | (Pending, Rejected))
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SuggestionStatus::Pending => "Pending",
            SuggestionStatus::Approved => "Approved",
            SuggestionStatus::Rejected => "Rejected",
        };
        write!(f, "{}", s)
    }
}

/// A candidate question proposed by an audience member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    id: SuggestionId,
    content: String,
    author: Uuid,
    status: SuggestionStatus,
    submitted_at: Timestamp,
}

impl Suggestion {
    pub fn new(id: SuggestionId, content: String, author: Uuid) -> Self {
        Self {
            id,
            content,
            author,
            status: SuggestionStatus::Pending,
            submitted_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> SuggestionId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> &Uuid {
        &self.author
    }

    pub fn status(&self) -> SuggestionStatus {
        self.status
    }

    pub fn submitted_at(&self) -> &Timestamp {
        &self.submitted_at
    }

    /// Moves the suggestion out of `Pending`.
    ///
    /// # Errors
    ///
    /// - `AlreadyDecided` if it was approved or rejected before
    pub fn decide(&mut self, target: SuggestionStatus) -> Result<(), DebateError> {
        if !self.status.can_transition_to(&target) {
            return Err(DebateError::AlreadyDecided(self.id));
        }
        self.status = target;
        Ok(())
    }

    pub fn view(&self) -> SuggestionView {
        SuggestionView {
            suggestion_id: self.id,
            content: self.content.clone(),
        }
    }
}

/// Approved suggestion as returned by `list-suggestions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionView {
    pub suggestion_id: SuggestionId,
    pub content: String,
}
