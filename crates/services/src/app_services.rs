use std::sync::Arc;

use drill_core::model::{FeedbackPolicy, UserId};
use storage::repository::Storage;

use crate::Clock;
use crate::catalog::ModuleCatalog;
use crate::error::AppServicesError;
use crate::progress_service::{ProgressAggregator, ProgressService};
use crate::sessions::TrainingLoopService;

/// Assembles app-facing services for one learner.
#[derive(Clone)]
pub struct AppServices {
    user_id: UserId,
    catalog: Arc<ModuleCatalog>,
    progress: Arc<ProgressService>,
    training: Arc<TrainingLoopService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the built-in catalog
    /// is invalid.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        user_id: UserId,
        policy: FeedbackPolicy,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(&storage, clock, user_id, policy)
    }

    /// Build services over an existing storage bundle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Catalog` if the built-in catalog is invalid.
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        user_id: UserId,
        policy: FeedbackPolicy,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(ModuleCatalog::builtin()?);
        let progress = Arc::new(ProgressService::new(
            clock,
            user_id,
            Arc::clone(&storage.progress),
        ));
        let aggregator: Arc<dyn ProgressAggregator> = progress.clone();
        let training = Arc::new(
            TrainingLoopService::new(clock, Arc::clone(&catalog), aggregator).with_policy(policy),
        );

        Ok(Self {
            user_id,
            catalog,
            progress,
            training,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<ModuleCatalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn training(&self) -> Arc<TrainingLoopService> {
        Arc::clone(&self.training)
    }
}
