//! Questions posed by moderators to a debate's audience.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{QuestionId, Timestamp};

/// A question asked within a debate. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    title: String,
    answers: Vec<String>,
    is_open: bool,
    created_at: Timestamp,
}

impl Question {
    /// Creates a question. Open-ended questions never keep answer choices.
    pub fn new(id: QuestionId, title: String, answers: Vec<String>, is_open: bool) -> Self {
        let answers = if is_open { Vec::new() } else { answers };
        Self {
            id,
            title,
            answers,
            is_open,
            created_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Wire representation sent to moderators and the audience.
    pub fn format(&self) -> QuestionView {
        QuestionView {
            question_id: self.id,
            title: self.title.clone(),
            answers: self.answers.clone(),
            is_open_question: self.is_open,
        }
    }
}

/// Formatted question as returned by `list-questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub question_id: QuestionId,
    pub title: String,
    pub answers: Vec<String>,
    pub is_open_question: bool,
}
