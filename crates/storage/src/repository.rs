use async_trait::async_trait;
use drill_core::model::{AttemptRecord, ModuleId, UserId, UserProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence contract behind the progress aggregator.
///
/// Attempts are append-only; the progress document is the fold of every attempt.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the progress document for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn get_progress(&self, user_id: UserId) -> Result<Option<UserProgress>, StorageError>;

    /// Append `attempt` to the user's history and fold it into their progress as one unit.
    ///
    /// Returns the updated progress.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either write fails; neither is applied in that case.
    async fn record_attempt(
        &self,
        user_id: UserId,
        attempt: &AttemptRecord,
    ) -> Result<UserProgress, StorageError>;

    /// List attempts, newest first, optionally restricted to one module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn list_attempts(
        &self,
        user_id: UserId,
        module_id: Option<&ModuleId>,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, StorageError>;
}

#[derive(Default)]
struct InMemoryState {
    progress: HashMap<UserId, UserProgress>,
    attempts: Vec<(UserId, AttemptRecord)>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(&self, user_id: UserId) -> Result<Option<UserProgress>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.progress.get(&user_id).cloned())
    }

    async fn record_attempt(
        &self,
        user_id: UserId,
        attempt: &AttemptRecord,
    ) -> Result<UserProgress, StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.attempts.push((user_id, attempt.clone()));
        let progress = guard.progress.entry(user_id).or_default();
        progress.record_attempt(attempt);
        Ok(progress.clone())
    }

    async fn list_attempts(
        &self,
        user_id: UserId,
        module_id: Option<&ModuleId>,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(guard
            .attempts
            .iter()
            .rev()
            .filter(|(owner, a)| {
                *owner == user_id && module_id.is_none_or(|m| a.module_id() == m)
            })
            .map(|(_, a)| a.clone())
            .take(limit)
            .collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use drill_core::time::fixed_now;

    fn attempt(module: &str, score: u8, offset_secs: i64) -> AttemptRecord {
        AttemptRecord::new(
            ModuleId::new(module).unwrap(),
            score,
            60,
            fixed_now() + Duration::seconds(offset_secs),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn record_attempt_folds_and_appends() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();
        assert!(repo.get_progress(user).await.unwrap().is_none());

        repo.record_attempt(user, &attempt("phishing-awareness", 40, 0))
            .await
            .unwrap();
        let progress = repo
            .record_attempt(user, &attempt("phishing-awareness", 80, 10))
            .await
            .unwrap();

        let module = ModuleId::new("phishing-awareness").unwrap();
        assert_eq!(progress.module(&module).unwrap().best_score(), 80);
        assert_eq!(progress.total_modules_completed(), 2);
        assert_eq!(repo.get_progress(user).await.unwrap(), Some(progress));
    }

    #[tokio::test]
    async fn list_attempts_is_newest_first_and_scoped_per_user() {
        let repo = InMemoryRepository::new();
        let user = UserId::generate();
        let other = UserId::generate();

        repo.record_attempt(user, &attempt("password-security", 20, 0))
            .await
            .unwrap();
        repo.record_attempt(other, &attempt("password-security", 99, 5))
            .await
            .unwrap();
        repo.record_attempt(user, &attempt("network-security", 60, 10))
            .await
            .unwrap();
        repo.record_attempt(user, &attempt("password-security", 70, 20))
            .await
            .unwrap();

        let all = repo.list_attempts(user, None, 10).await.unwrap();
        let scores: Vec<u8> = all.iter().map(AttemptRecord::score).collect();
        assert_eq!(scores, vec![70, 60, 20]);

        let module = ModuleId::new("password-security").unwrap();
        let scoped = repo.list_attempts(user, Some(&module), 1).await.unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].score(), 70);
    }
}
