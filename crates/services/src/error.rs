//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{AnswerError, ProgressError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::SessionPhase;

/// Errors emitted by `ProgressService` and other aggregators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("cannot {operation} while session is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: SessionPhase,
    },
    #[error("malformed answer: {0}")]
    MalformedAnswer(#[from] AnswerError),
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
    #[error("failed to report completion: {0}")]
    Progress(#[from] ProgressServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("invalid built-in catalog: {0}")]
    Catalog(#[from] drill_core::Error),
}
