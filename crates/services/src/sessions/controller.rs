use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use drill_core::model::{
    AnswerRecord, AnswerValue, Completion, FeedbackPolicy, Item, Scenario, ScenarioResult,
};
use drill_core::scorer;
use drill_core::time::elapsed_seconds;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of an assessment session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Briefing shown; nothing answered and the countdown is not running.
    Intro,
    /// Items are being answered and the countdown is running.
    Active,
    /// Terminal; the scenario result has been computed.
    Results,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Intro => "intro",
            SessionPhase::Active => "active",
            SessionPhase::Results => "results",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── TRANSITION OUTCOMES ───────────────────────────────────────────────────────
//

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The answer was recorded and the next item is current.
    Advanced { record: AnswerRecord },
    /// The answer was recorded for the last item; the session is in `Results`.
    Completed {
        record: AnswerRecord,
        result: ScenarioResult,
    },
}

impl Step {
    #[must_use]
    pub fn record(&self) -> &AnswerRecord {
        match self {
            Step::Advanced { record } | Step::Completed { record, .. } => record,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&ScenarioResult> {
        match self {
            Step::Advanced { .. } => None,
            Step::Completed { result, .. } => Some(result),
        }
    }
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Running { remaining_seconds: u32 },
    /// The countdown reached zero and forced completion.
    Expired(ScenarioResult),
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one scenario through `Intro → Active → Results`.
///
/// Every rejected operation leaves the state untouched. Timestamps are passed in by the
/// caller so the services-layer clock stays the only time source.
pub struct SessionController {
    scenario: Arc<Scenario>,
    policy: FeedbackPolicy,
    phase: SessionPhase,
    current: usize,
    answers: Vec<AnswerRecord>,
    time_remaining_seconds: u32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<ScenarioResult>,
}

impl SessionController {
    #[must_use]
    pub fn new(scenario: Arc<Scenario>, policy: FeedbackPolicy) -> Self {
        let time_remaining_seconds = scenario.time_limit_seconds();
        Self {
            scenario,
            policy,
            phase: SessionPhase::Intro,
            current: 0,
            answers: Vec::new(),
            time_remaining_seconds,
            started_at: None,
            completed_at: None,
            result: None,
        }
    }

    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The item awaiting an answer, only while `Active`.
    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        if self.phase == SessionPhase::Active {
            self.scenario.items().get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn result(&self) -> Option<&ScenarioResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Results
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.scenario.items().len();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Moves `Intro → Active` and starts the countdown at the scenario limit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` unless the session is in `Intro`.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        self.require(SessionPhase::Intro, "start")?;
        self.phase = SessionPhase::Active;
        self.time_remaining_seconds = self.scenario.time_limit_seconds();
        self.started_at = Some(now);
        Ok(())
    }

    /// Scores `value` against the current item, records it, and advances.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `Active` and
    /// `SessionError::MalformedAnswer` if the value does not fit the current item.
    pub fn submit_answer(
        &mut self,
        value: AnswerValue,
        now: DateTime<Utc>,
    ) -> Result<Step, SessionError> {
        self.require(SessionPhase::Active, "submit an answer")?;
        let Some(item) = self.scenario.items().get(self.current) else {
            return Err(self.invalid("submit an answer"));
        };

        let record = scorer::score(item, value)?;
        self.answers.push(record.clone());
        self.current += 1;

        if self.current < self.scenario.items().len() {
            return Ok(Step::Advanced { record });
        }

        let result = self.complete(Completion::Finished, now);
        Ok(Step::Completed { record, result })
    }

    /// Counts down one second; at zero the session completes with the answers so far.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside `Active`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Tick, SessionError> {
        self.require(SessionPhase::Active, "tick")?;
        self.time_remaining_seconds = self.time_remaining_seconds.saturating_sub(1);
        if self.time_remaining_seconds > 0 {
            return Ok(Tick::Running {
                remaining_seconds: self.time_remaining_seconds,
            });
        }
        Ok(Tick::Expired(self.complete(Completion::TimedOut, now)))
    }

    /// Returns to `Intro`, clearing answers, position, timer and result.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Intro;
        self.current = 0;
        self.answers.clear();
        self.time_remaining_seconds = self.scenario.time_limit_seconds();
        self.started_at = None;
        self.completed_at = None;
        self.result = None;
    }

    fn complete(&mut self, completion: Completion, now: DateTime<Utc>) -> ScenarioResult {
        let counted = u64::from(
            self.scenario
                .time_limit_seconds()
                .saturating_sub(self.time_remaining_seconds),
        );
        let wall = self
            .started_at
            .map_or(0, |started| elapsed_seconds(started, now));
        let result = scorer::aggregate(
            &self.scenario,
            self.answers.clone(),
            wall.max(counted),
            completion,
            &self.policy,
        );

        self.phase = SessionPhase::Results;
        self.completed_at = Some(now);
        self.result = Some(result.clone());
        result
    }

    fn require(&self, expected: SessionPhase, operation: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidPhase {
            operation,
            phase: self.phase,
        }
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("scenario_id", self.scenario.id())
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("time_remaining_seconds", &self.time_remaining_seconds)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
