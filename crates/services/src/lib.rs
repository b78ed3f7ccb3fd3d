#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod progress_service;
pub mod sessions;

pub use drill_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use catalog::{ModuleCatalog, TrainingModule};
pub use error::{AppServicesError, ProgressServiceError, SessionError};
pub use progress_service::{ProgressAggregator, ProgressService};

pub use sessions::{
    SessionController, SessionPhase, SessionProgress, Step, Tick, TrainingLoopService,
    TrainingSession,
};
