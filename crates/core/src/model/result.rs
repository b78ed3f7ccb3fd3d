use serde::Serialize;

use crate::model::answer::AnswerRecord;
use crate::model::feedback::FeedbackTier;
use crate::model::ids::{ModuleId, ScenarioId};

/// How a session reached its results phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Completion {
    /// Every item was answered.
    Finished,
    /// The countdown hit zero first; unanswered items earned nothing.
    TimedOut,
}

/// Terminal, immutable summary of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    scenario_id: ScenarioId,
    module_id: ModuleId,
    total_points: u64,
    max_points: u64,
    percentage: u8,
    answers: Vec<AnswerRecord>,
    time_spent_seconds: u64,
    feedback_tier: FeedbackTier,
    completion: Completion,
}

impl ScenarioResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        scenario_id: ScenarioId,
        module_id: ModuleId,
        total_points: u64,
        max_points: u64,
        percentage: u8,
        answers: Vec<AnswerRecord>,
        time_spent_seconds: u64,
        feedback_tier: FeedbackTier,
        completion: Completion,
    ) -> Self {
        Self {
            scenario_id,
            module_id,
            total_points,
            max_points,
            percentage,
            answers,
            time_spent_seconds,
            feedback_tier,
            completion,
        }
    }

    #[must_use]
    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario_id
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn total_points(&self) -> u64 {
        self.total_points
    }

    #[must_use]
    pub fn max_points(&self) -> u64 {
        self.max_points
    }

    /// Score in `0..=100`.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn time_spent_seconds(&self) -> u64 {
        self.time_spent_seconds
    }

    #[must_use]
    pub fn feedback_tier(&self) -> FeedbackTier {
        self.feedback_tier
    }

    #[must_use]
    pub fn completion(&self) -> Completion {
        self.completion
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }
}
