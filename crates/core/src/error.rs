use thiserror::Error;

use crate::model::{
    AnswerError, FeedbackPolicyError, IdError, ItemError, ProgressError, ScenarioError,
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Item(#[from] ItemError),
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
    #[error(transparent)]
    FeedbackPolicy(#[from] FeedbackPolicyError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
}
