//! Updates a debate pushes to its audience room.

use serde::Serialize;

use crate::domain::foundation::{DebateId, Timestamp};

use super::{QuestionView, SuggestionView};

/// Audience-facing notification emitted by a [`super::Debate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AudienceUpdate {
    #[serde(rename_all = "camelCase")]
    QuestionCreated {
        debate_id: DebateId,
        question: QuestionView,
    },

    #[serde(rename_all = "camelCase")]
    SuggestionApproved {
        debate_id: DebateId,
        suggestion: SuggestionView,
    },

    #[serde(rename_all = "camelCase")]
    DebateClosed {
        debate_id: DebateId,
        closed_at: Timestamp,
    },
}

impl AudienceUpdate {
    pub fn debate_id(&self) -> DebateId {
        match self {
            AudienceUpdate::QuestionCreated { debate_id, .. }
            | AudienceUpdate::SuggestionApproved { debate_id, .. }
            | AudienceUpdate::DebateClosed { debate_id, .. } => *debate_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;

    #[test]
    fn question_created_serializes_with_kebab_tag() {
        let update = AudienceUpdate::QuestionCreated {
            debate_id: DebateId::new(3),
            question: QuestionView {
                question_id: QuestionId::new(1),
                title: "Q".to_string(),
                answers: vec!["a".to_string()],
                is_open_question: false,
            },
        };

        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["type"], "question-created");
        assert_eq!(json["debateId"], 3);
        assert_eq!(json["question"]["questionId"], 1);
        assert_eq!(update.debate_id(), DebateId::new(3));
    }
}
