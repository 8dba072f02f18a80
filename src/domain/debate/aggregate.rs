//! Debate aggregate entity.
//!
//! A debate owns its questions and audience suggestions and fans updates out
//! to its audience room. The moderation registries only ever hold it by id.
//!
//! # Ownership
//!
//! The debate registry holds the single live instance. Moderator sessions
//! reference debates by `DebateId` only.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{
    DebateId, ModeratorId, QuestionId, SuggestionId, Timestamp, Username,
};
use crate::ports::AudienceBroadcaster;

use super::{
    AudienceUpdate, DebateError, Question, QuestionView, Suggestion, SuggestionStatus,
    SuggestionView,
};

/// Debate aggregate - a moderated discussion with questions and suggestions.
///
/// # Invariants
///
/// - `id` is unique for the lifetime of the process
/// - question and suggestion ids are per-debate sequences starting at 1
/// - a suggestion is decided at most once
pub struct Debate {
    id: DebateId,
    title: String,
    description: String,
    creator: Username,
    moderator_id: ModeratorId,
    created_at: Timestamp,
    questions: Vec<Question>,
    suggestions: BTreeMap<SuggestionId, Suggestion>,
    next_question_id: i64,
    next_suggestion_id: i64,
    audience: Arc<dyn AudienceBroadcaster>,
}

impl Debate {
    /// Create a new open debate with empty collections.
    pub fn new(
        id: DebateId,
        title: String,
        description: String,
        creator: Username,
        moderator_id: ModeratorId,
        audience: Arc<dyn AudienceBroadcaster>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            creator,
            moderator_id,
            created_at: Timestamp::now(),
            questions: Vec::new(),
            suggestions: BTreeMap::new(),
            next_question_id: 1,
            next_suggestion_id: 1,
            audience,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> DebateId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn creator(&self) -> &Username {
        &self.creator
    }

    pub fn moderator_id(&self) -> ModeratorId {
        self.moderator_id
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// All questions in creation order, formatted for the wire.
    pub fn formatted_questions(&self) -> Vec<QuestionView> {
        self.questions.iter().map(Question::format).collect()
    }

    /// The approved subset of suggestions, in submission order.
    pub fn approved_suggestions(&self) -> Vec<SuggestionView> {
        self.suggestions
            .values()
            .filter(|s| s.status() == SuggestionStatus::Approved)
            .map(Suggestion::view)
            .collect()
    }

    pub fn suggestion(&self, id: SuggestionId) -> Option<&Suggestion> {
        self.suggestions.get(&id)
    }

    /// Summary row for `list-debates`; a registered debate is always open.
    pub fn summary(&self) -> DebateSummary {
        DebateSummary {
            debate_id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            closed: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a question and broadcast it to the audience.
    pub fn new_question(&mut self, title: String, answers: Vec<String>, is_open: bool) -> QuestionId {
        let id = QuestionId::new(self.next_question_id);
        self.next_question_id += 1;

        let question = Question::new(id, title, answers, is_open);
        let view = question.format();
        self.questions.push(question);

        self.audience.publish(AudienceUpdate::QuestionCreated {
            debate_id: self.id,
            question: view,
        });
        id
    }

    /// Record an audience suggestion in `Pending` state.
    pub fn submit_suggestion(&mut self, content: String, author: Uuid) -> SuggestionId {
        let id = SuggestionId::new(self.next_suggestion_id);
        self.next_suggestion_id += 1;
        self.suggestions.insert(id, Suggestion::new(id, content, author));
        id
    }

    /// Approve a pending suggestion and show it to the audience.
    ///
    /// # Errors
    ///
    /// - `SuggestionNotFound` if the id was never submitted
    /// - `AlreadyDecided` if it was approved or rejected before
    pub fn approve_suggestion(&mut self, id: SuggestionId) -> Result<(), DebateError> {
        let suggestion = self.decide(id, SuggestionStatus::Approved)?;
        let view = suggestion.view();
        self.audience.publish(AudienceUpdate::SuggestionApproved {
            debate_id: self.id,
            suggestion: view,
        });
        Ok(())
    }

    /// Reject a pending suggestion.
    ///
    /// # Errors
    ///
    /// Same as [`Debate::approve_suggestion`].
    pub fn reject_suggestion(&mut self, id: SuggestionId) -> Result<(), DebateError> {
        self.decide(id, SuggestionStatus::Rejected).map(|_| ())
    }

    /// Tell the audience the debate is over. The registry drops the instance
    /// right after.
    pub fn close(&self, closed_at: Timestamp) {
        self.audience.publish(AudienceUpdate::DebateClosed {
            debate_id: self.id,
            closed_at,
        });
    }

    fn decide(
        &mut self,
        id: SuggestionId,
        target: SuggestionStatus,
    ) -> Result<&Suggestion, DebateError> {
        let suggestion = self
            .suggestions
            .get_mut(&id)
            .ok_or(DebateError::SuggestionNotFound(id))?;
        suggestion.decide(target)?;
        Ok(suggestion)
    }
}

impl fmt::Debug for Debate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debate")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("creator", &self.creator)
            .field("questions", &self.questions.len())
            .field("suggestions", &self.suggestions.len())
            .finish_non_exhaustive()
    }
}

/// Row returned by `list-debates`, for live and persisted debates alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateSummary {
    pub debate_id: DebateId,
    pub title: String,
    pub description: String,
    pub closed: bool,
}
