//! Debate-specific error types.

use crate::domain::foundation::{DebateId, DomainError, ErrorCode, SuggestionId};

/// Errors raised by debate entity operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebateError {
    /// The debate is not (or no longer) open in this process.
    NotFound(DebateId),
    /// No suggestion with this id was ever submitted to the debate.
    SuggestionNotFound(SuggestionId),
    /// The suggestion was already approved or rejected.
    AlreadyDecided(SuggestionId),
}

impl DebateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DebateError::NotFound(_) => ErrorCode::DebateNotFound,
            DebateError::SuggestionNotFound(_) => ErrorCode::SuggestionNotFound,
            DebateError::AlreadyDecided(_) => ErrorCode::SuggestionAlreadyDecided,
        }
    }

    pub fn message(&self) -> String {
        match self {
            DebateError::NotFound(id) => format!("Debate not found: {}", id),
            DebateError::SuggestionNotFound(id) => format!("Suggestion not found: {}", id),
            DebateError::AlreadyDecided(id) => format!("Suggestion already decided: {}", id),
        }
    }
}

impl std::fmt::Display for DebateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for DebateError {}

impl From<DebateError> for DomainError {
    fn from(err: DebateError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_decided_maps_to_state_code() {
        let err = DebateError::AlreadyDecided(SuggestionId::new(3));
        assert_eq!(err.code(), ErrorCode::SuggestionAlreadyDecided);
        assert_eq!(err.to_string(), "Suggestion already decided: 3");
    }

    #[test]
    fn converts_into_domain_error() {
        let err: DomainError = DebateError::NotFound(DebateId::new(9)).into();
        assert_eq!(err.code, ErrorCode::DebateNotFound);
    }
}
