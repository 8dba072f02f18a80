//! Moderator commands, decoded and validated at the boundary.
//!
//! An inbound frame names a command and carries a loosely-typed JSON
//! payload. [`Command::decode`] turns it into one strongly-typed variant per
//! command or a [`CommandError`]; handlers never see raw JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ModerationConfig;
use crate::domain::debate::{DebateSummary, QuestionView, SuggestionView};
use crate::domain::foundation::{DebateId, SuggestionId, ValidationError};

/// Reply value of an id-returning command that failed.
pub const ID_SENTINEL: i64 = -1;

// ============================================
// Command catalogue
// ============================================

/// Every command the moderator channel accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ListDebates,
    ListQuestions,
    ListSuggestions,
    CreateDebate,
    CloseDebate,
    NewQuestion,
    ApproveSuggestion,
    RejectSuggestion,
    BanUser,
}

impl CommandKind {
    pub const ALL: [CommandKind; 9] = [
        CommandKind::ListDebates,
        CommandKind::ListQuestions,
        CommandKind::ListSuggestions,
        CommandKind::CreateDebate,
        CommandKind::CloseDebate,
        CommandKind::NewQuestion,
        CommandKind::ApproveSuggestion,
        CommandKind::RejectSuggestion,
        CommandKind::BanUser,
    ];

    /// Event name on the wire.
    pub fn event_name(&self) -> &'static str {
        match self {
            CommandKind::ListDebates => "list-debates",
            CommandKind::ListQuestions => "list-questions",
            CommandKind::ListSuggestions => "list-suggestions",
            CommandKind::CreateDebate => "create-debate",
            CommandKind::CloseDebate => "close-debate",
            CommandKind::NewQuestion => "new-question",
            CommandKind::ApproveSuggestion => "approve-suggestion",
            CommandKind::RejectSuggestion => "reject-suggestion",
            CommandKind::BanUser => "ban-user",
        }
    }

    /// The reply sent when the command cannot be carried out.
    ///
    /// `-1` for commands that return an id or a list, `false` for the rest.
    pub fn failure_reply(&self) -> Reply {
        match self {
            CommandKind::ListQuestions
            | CommandKind::ListSuggestions
            | CommandKind::CreateDebate
            | CommandKind::NewQuestion => Reply::Id(ID_SENTINEL),
            CommandKind::ListDebates
            | CommandKind::CloseDebate
            | CommandKind::ApproveSuggestion
            | CommandKind::RejectSuggestion
            | CommandKind::BanUser => Reply::Flag(false),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.event_name() == s)
            .ok_or_else(|| CommandError::UnknownEvent(s.to_string()))
    }
}

// ============================================
// Typed commands
// ============================================

/// A validated moderator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ListDebates,
    ListQuestions(DebateId),
    ListSuggestions(DebateId),
    CreateDebate(CreateDebate),
    CloseDebate(DebateId),
    NewQuestion(NewQuestion),
    ApproveSuggestion(SuggestionDecision),
    RejectSuggestion(SuggestionDecision),
    BanUser(BanUser),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDebate {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub debate_id: DebateId,
    pub title: String,
    /// Always empty when `is_open` is set.
    pub answers: Vec<String>,
    pub is_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionDecision {
    pub debate_id: DebateId,
    pub suggestion_id: SuggestionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BanUser {
    pub debate_id: DebateId,
    pub user: Uuid,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::ListDebates => CommandKind::ListDebates,
            Command::ListQuestions(_) => CommandKind::ListQuestions,
            Command::ListSuggestions(_) => CommandKind::ListSuggestions,
            Command::CreateDebate(_) => CommandKind::CreateDebate,
            Command::CloseDebate(_) => CommandKind::CloseDebate,
            Command::NewQuestion(_) => CommandKind::NewQuestion,
            Command::ApproveSuggestion(_) => CommandKind::ApproveSuggestion,
            Command::RejectSuggestion(_) => CommandKind::RejectSuggestion,
            Command::BanUser(_) => CommandKind::BanUser,
        }
    }

    /// Decode and validate the payload of `kind`.
    ///
    /// # Errors
    ///
    /// - `Malformed` if the payload has the wrong shape or types
    /// - `Invalid` if a value breaks a configured bound
    pub fn decode(
        kind: CommandKind,
        data: Value,
        limits: &ModerationConfig,
    ) -> Result<Command, CommandError> {
        let command = match kind {
            CommandKind::ListDebates => Command::ListDebates,
            CommandKind::ListQuestions => Command::ListQuestions(parse::<DebateRef>(data)?.id()),
            CommandKind::ListSuggestions => {
                Command::ListSuggestions(parse::<DebateRef>(data)?.id())
            }
            CommandKind::CloseDebate => Command::CloseDebate(parse::<DebateRef>(data)?.id()),
            CommandKind::CreateDebate => {
                let raw: CreateDebatePayload = parse(data)?;
                check_length("title", &raw.title, limits.max_title_length)?;
                check_length("description", &raw.description, limits.max_description_length)?;
                Command::CreateDebate(CreateDebate {
                    title: raw.title,
                    description: raw.description,
                })
            }
            CommandKind::NewQuestion => {
                let raw: NewQuestionPayload = parse(data)?;
                check_length("title", &raw.title, limits.max_question_length)?;
                let answers = if raw.is_open_question {
                    Vec::new()
                } else {
                    decode_answers(raw.answers, limits)?
                };
                Command::NewQuestion(NewQuestion {
                    debate_id: raw.debate_id,
                    title: raw.title,
                    answers,
                    is_open: raw.is_open_question,
                })
            }
            CommandKind::ApproveSuggestion => {
                Command::ApproveSuggestion(parse::<SuggestionDecisionPayload>(data)?.into())
            }
            CommandKind::RejectSuggestion => {
                Command::RejectSuggestion(parse::<SuggestionDecisionPayload>(data)?.into())
            }
            CommandKind::BanUser => {
                let raw: BanUserPayload = parse(data)?;
                let user = Uuid::parse_str(&raw.uuid)
                    .map_err(|e| ValidationError::invalid_format("uuid", e.to_string()))?;
                Command::BanUser(BanUser {
                    debate_id: raw.debate_id,
                    user,
                })
            }
        };
        Ok(command)
    }
}

// ============================================
// Wire payloads
// ============================================

/// A debate id given either bare (`7`) or as `{"debateId": 7}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DebateRef {
    Bare(DebateId),
    #[serde(rename_all = "camelCase")]
    Object {
        debate_id: DebateId,
    },
}

impl DebateRef {
    fn id(&self) -> DebateId {
        match self {
            DebateRef::Bare(id) | DebateRef::Object { debate_id: id } => *id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreateDebatePayload {
    title: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewQuestionPayload {
    debate_id: DebateId,
    title: String,
    /// Left raw so an open question ignores whatever was sent here.
    #[serde(default)]
    answers: Option<Value>,
    #[serde(default)]
    is_open_question: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionDecisionPayload {
    suggestion_id: SuggestionId,
    debate_id: DebateId,
}

impl From<SuggestionDecisionPayload> for SuggestionDecision {
    fn from(raw: SuggestionDecisionPayload) -> Self {
        Self {
            debate_id: raw.debate_id,
            suggestion_id: raw.suggestion_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BanUserPayload {
    uuid: String,
    debate_id: DebateId,
}

fn parse<T: serde::de::DeserializeOwned>(data: Value) -> Result<T, CommandError> {
    serde_json::from_value(data).map_err(|e| CommandError::Malformed(e.to_string()))
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::too_long(field, max, actual));
    }
    Ok(())
}

fn decode_answers(raw: Option<Value>, limits: &ModerationConfig) -> Result<Vec<String>, CommandError> {
    let answers: Vec<String> = match raw {
        Some(value) => parse(value)?,
        None => return Err(CommandError::Malformed("missing field `answers`".to_string())),
    };
    if answers.len() > limits.max_answers {
        return Err(CommandError::TooManyAnswers {
            max: limits.max_answers,
            actual: answers.len(),
        });
    }
    for answer in &answers {
        check_length("answers", answer, limits.max_question_length)?;
    }
    Ok(answers)
}

/// Why a command payload was refused.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("malformed payload: {0}")]
    Malformed(String),

    #[error("too many answers: at most {max}, got {actual}")]
    TooManyAnswers { max: usize, actual: usize },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

// ============================================
// Replies
// ============================================

/// The single value handed back to the caller of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Id(i64),
    Flag(bool),
    Debates(Vec<DebateSummary>),
    Questions(Vec<QuestionView>),
    Suggestions(Vec<SuggestionView>),
}

impl Reply {
    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Id(ID_SENTINEL) | Reply::Flag(false))
    }
}

/// An inbound command frame before decoding.
///
/// `ack` is the reply channel: a frame without it cannot be answered and is
/// dropped before any handler runs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandEnvelope {
    pub event: String,
    #[serde(default)]
    pub ack: Option<u64>,
    #[serde(default)]
    pub data: Value,
}

/// The reply to one acknowledged command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    pub ack: u64,
    pub reply: Reply,
}
