//! In-memory implementation of DiscussionRepository.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::debate::DebateSummary;
use crate::domain::foundation::{DebateId, DomainError, ErrorCode, Timestamp, Username};
use crate::ports::{DiscussionRecord, DiscussionRepository};

/// Discussion records keyed by id.
///
/// `failing()`, `with_delay()` and `with_save_delay()` let tests exercise
/// the persistence error, timeout and in-flight save paths.
#[derive(Debug, Default)]
pub struct InMemoryDiscussionRepository {
    records: RwLock<BTreeMap<DebateId, DiscussionRecord>>,
    failing: bool,
    delay: Option<Duration>,
    save_delay: Option<Duration>,
}

impl InMemoryDiscussionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository whose every call fails with `DATABASE_ERROR`.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sleep for `delay` before inserting a new record; other calls are
    /// unaffected.
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    pub fn get(&self, id: DebateId) -> Option<DiscussionRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn ready(&self) -> Result<(), DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "in-memory repository configured to fail",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DiscussionRepository for InMemoryDiscussionRepository {
    async fn save_discussion(&self, record: &DiscussionRecord) -> Result<(), DomainError> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }
        self.ready().await?;

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&record.id) {
            return Err(DomainError::database(
                "Failed to insert discussion",
                format!("duplicate id {}", record.id),
            ));
        }
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn mark_closed(&self, id: DebateId, closed_at: Timestamp) -> Result<bool, DomainError> {
        self.ready().await?;

        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.get_mut(&id) {
            Some(record) => {
                record.closed_at = Some(closed_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_moderator(
        &self,
        username: &Username,
    ) -> Result<Vec<DebateSummary>, DomainError> {
        self.ready().await?;

        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|r| &r.moderator == username)
            .map(DiscussionRecord::summary)
            .collect())
    }

    async fn max_discussion_id(&self) -> Result<Option<DebateId>, DomainError> {
        self.ready().await?;

        Ok(self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .next_back()
            .copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ModeratorId;

    fn record(id: i64, moderator: &str) -> DiscussionRecord {
        DiscussionRecord {
            id: DebateId::new(id),
            title: format!("Debate {}", id),
            description: "D".to_string(),
            moderator: Username::new(moderator).unwrap(),
            moderator_id: ModeratorId::new(1),
            created_at: Timestamp::now(),
            closed_at: None,
        }
    }

    #[tokio::test]
    async fn saves_and_lists_per_moderator() {
        let repo = InMemoryDiscussionRepository::new();
        repo.save_discussion(&record(1, "alice")).await.unwrap();
        repo.save_discussion(&record(2, "bob")).await.unwrap();

        let alice = repo
            .list_for_moderator(&Username::new("alice").unwrap())
            .await
            .unwrap();

        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].debate_id, DebateId::new(1));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let repo = InMemoryDiscussionRepository::new();
        repo.save_discussion(&record(1, "alice")).await.unwrap();

        let err = repo.save_discussion(&record(1, "alice")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[tokio::test]
    async fn mark_closed_reports_missing_rows() {
        let repo = InMemoryDiscussionRepository::new();
        repo.save_discussion(&record(3, "alice")).await.unwrap();

        assert!(repo.mark_closed(DebateId::new(3), Timestamp::now()).await.unwrap());
        assert!(!repo.mark_closed(DebateId::new(4), Timestamp::now()).await.unwrap());
        assert!(repo.get(DebateId::new(3)).unwrap().closed_at.is_some());
    }

    #[tokio::test]
    async fn max_id_tracks_highest_saved() {
        let repo = InMemoryDiscussionRepository::new();
        assert_eq!(repo.max_discussion_id().await.unwrap(), None);

        repo.save_discussion(&record(9, "alice")).await.unwrap();
        repo.save_discussion(&record(4, "alice")).await.unwrap();

        assert_eq!(repo.max_discussion_id().await.unwrap(), Some(DebateId::new(9)));
    }

    #[tokio::test]
    async fn failing_repository_fails_every_call() {
        let repo = InMemoryDiscussionRepository::failing();
        assert!(repo.save_discussion(&record(1, "alice")).await.is_err());
        assert!(repo.max_discussion_id().await.is_err());
        assert!(repo.is_empty());
    }
}
