//! Moderation limits applied to command payloads

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Bounds on moderator-supplied text and the persistence call budget.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModerationConfig {
    /// Maximum debate title length, in characters
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,

    /// Maximum debate description length, in characters
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,

    /// Maximum question title and answer length, in characters
    #[serde(default = "default_max_question_length")]
    pub max_question_length: usize,

    /// Maximum number of answer choices on a question
    #[serde(default = "default_max_answers")]
    pub max_answers: usize,

    /// Upper bound on any single persistence call, in seconds
    #[serde(default = "default_persistence_timeout")]
    pub persistence_timeout_secs: u64,
}

impl ModerationConfig {
    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_secs(self.persistence_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_title_length == 0 {
            return Err(ValidationError::ZeroLimit("max_title_length"));
        }
        if self.max_description_length == 0 {
            return Err(ValidationError::ZeroLimit("max_description_length"));
        }
        if self.max_question_length == 0 {
            return Err(ValidationError::ZeroLimit("max_question_length"));
        }
        if self.max_answers == 0 {
            return Err(ValidationError::ZeroLimit("max_answers"));
        }
        if self.persistence_timeout_secs == 0 || self.persistence_timeout_secs > 300 {
            return Err(ValidationError::InvalidPersistenceTimeout);
        }
        Ok(())
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            max_title_length: default_max_title_length(),
            max_description_length: default_max_description_length(),
            max_question_length: default_max_question_length(),
            max_answers: default_max_answers(),
            persistence_timeout_secs: default_persistence_timeout(),
        }
    }
}

fn default_max_title_length() -> usize {
    128
}

fn default_max_description_length() -> usize {
    1024
}

fn default_max_question_length() -> usize {
    256
}

fn default_max_answers() -> usize {
    10
}

fn default_persistence_timeout() -> u64 {
    5
}
