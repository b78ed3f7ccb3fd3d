use std::sync::Arc;

use async_trait::async_trait;
use drill_core::model::{AttemptRecord, ModuleId, UserId, UserProgress};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::ProgressServiceError;

/// Receives exactly one report per completed session.
#[async_trait]
pub trait ProgressAggregator: Send + Sync {
    /// Folds one completion into the learner's progress and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the score is out of range or persistence fails.
    async fn record_completion(
        &self,
        module_id: &ModuleId,
        score: u8,
        time_spent_seconds: u64,
    ) -> Result<UserProgress, ProgressServiceError>;
}

/// Storage-backed progress aggregator for a single learner.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    user_id: UserId,
    repo: Arc<dyn ProgressRepository>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, user_id: UserId, repo: Arc<dyn ProgressRepository>) -> Self {
        Self {
            clock,
            user_id,
            repo,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current progress; an unknown learner has an empty record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` on repository failures.
    pub async fn progress(&self) -> Result<UserProgress, ProgressServiceError> {
        Ok(self
            .repo
            .get_progress(self.user_id)
            .await?
            .unwrap_or_default())
    }

    /// Attempt history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` on repository failures.
    pub async fn history(
        &self,
        module_id: Option<&ModuleId>,
        limit: u32,
    ) -> Result<Vec<AttemptRecord>, ProgressServiceError> {
        Ok(self
            .repo
            .list_attempts(self.user_id, module_id, limit)
            .await?)
    }
}

#[async_trait]
impl ProgressAggregator for ProgressService {
    async fn record_completion(
        &self,
        module_id: &ModuleId,
        score: u8,
        time_spent_seconds: u64,
    ) -> Result<UserProgress, ProgressServiceError> {
        let attempt = AttemptRecord::new(
            module_id.clone(),
            score,
            time_spent_seconds,
            self.clock.now(),
        )?;
        let progress = self.repo.record_attempt(self.user_id, &attempt).await?;
        tracing::info!(
            user = %self.user_id,
            module = %module_id,
            score,
            time_spent_seconds,
            "completion recorded"
        );
        Ok(progress)
    }
}
