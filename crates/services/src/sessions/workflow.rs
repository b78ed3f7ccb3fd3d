use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use drill_core::model::{AnswerValue, FeedbackPolicy, Item, ScenarioResult, UserProgress};

use super::controller::{SessionController, SessionPhase, Step, Tick};
use super::progress::SessionProgress;
use super::timer::{DEFAULT_TICK_PERIOD, TickTimer};
use crate::Clock;
use crate::catalog::ModuleCatalog;
use crate::error::SessionError;
use crate::progress_service::ProgressAggregator;

//
// ─── TRAINING SESSION ──────────────────────────────────────────────────────────
//

/// One learner's run through a scenario, with its countdown and completion report.
///
/// Completion reports to the aggregator at most once; dropping or abandoning the session
/// before it completes reports nothing.
pub struct TrainingSession {
    controller: SessionController,
    timer: Option<TickTimer>,
    tick_period: Duration,
    clock: Clock,
    aggregator: Arc<dyn ProgressAggregator>,
    reported: Option<UserProgress>,
}

impl TrainingSession {
    #[must_use]
    pub fn new(
        controller: SessionController,
        clock: Clock,
        aggregator: Arc<dyn ProgressAggregator>,
        tick_period: Duration,
    ) -> Self {
        Self {
            controller,
            timer: None,
            tick_period,
            clock,
            aggregator,
            reported: None,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.controller.phase()
    }

    #[must_use]
    pub fn current_item(&self) -> Option<&Item> {
        self.controller.current_item()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        self.controller.progress()
    }

    #[must_use]
    pub fn result(&self) -> Option<&ScenarioResult> {
        self.controller.result()
    }

    /// Progress returned by the aggregator once the completion has been reported.
    #[must_use]
    pub fn reported_progress(&self) -> Option<&UserProgress> {
        self.reported.as_ref()
    }

    #[must_use]
    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Starts the scenario and arms the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` unless the session is in `Intro`.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.controller.start(self.clock.now())?;
        self.timer = Some(TickTimer::start(self.tick_period));
        tracing::info!(
            scenario = %self.controller.scenario().id(),
            time_limit_seconds = self.controller.time_remaining_seconds(),
            "session started"
        );
        Ok(())
    }

    /// Submits an answer for the current item.
    ///
    /// On the last item the timer is disarmed and the result is reported. If the report
    /// fails the error is returned, the result stays available through [`Self::result`],
    /// and [`Self::finalize_report`] retries it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase`, `SessionError::MalformedAnswer`, or
    /// `SessionError::Progress` when reporting a completed session fails.
    pub async fn submit(&mut self, value: AnswerValue) -> Result<Step, SessionError> {
        let step = self.controller.submit_answer(value, self.clock.now())?;
        tracing::debug!(
            item = %step.record().item_id(),
            correct = step.record().is_correct(),
            "answer recorded"
        );
        if let Step::Completed { result, .. } = &step {
            self.timer = None;
            tracing::info!(
                scenario = %result.scenario_id(),
                percentage = result.percentage(),
                "session completed"
            );
            self.report().await?;
        }
        Ok(step)
    }

    /// Waits for the next countdown tick and applies it.
    ///
    /// The wait itself is cancel-safe, so this can race user input in `select!`. If the
    /// future is dropped while a timeout is being reported, call
    /// [`Self::finalize_report`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` if no countdown is running and
    /// `SessionError::Progress` when reporting a timed-out session fails.
    pub async fn next_tick(&mut self) -> Result<Tick, SessionError> {
        let Some(timer) = self.timer.as_mut() else {
            return Err(SessionError::InvalidPhase {
                operation: "tick",
                phase: self.controller.phase(),
            });
        };
        timer.tick().await;

        let tick = self.controller.tick(self.clock.now())?;
        if let Tick::Expired(result) = &tick {
            self.timer = None;
            tracing::info!(
                scenario = %result.scenario_id(),
                answered = result.answers().len(),
                percentage = result.percentage(),
                "session timed out"
            );
            self.report().await?;
        }
        Ok(tick)
    }

    /// Retries the completion report; a no-op once it has succeeded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` before `Results` and
    /// `SessionError::Progress` if the aggregator fails again.
    pub async fn finalize_report(&mut self) -> Result<&UserProgress, SessionError> {
        if self.reported.is_none() {
            if !self.controller.is_complete() {
                return Err(SessionError::InvalidPhase {
                    operation: "report",
                    phase: self.controller.phase(),
                });
            }
            self.report().await?;
        }
        self.reported.as_ref().ok_or(SessionError::InvalidPhase {
            operation: "report",
            phase: self.controller.phase(),
        })
    }

    /// Stops the countdown and returns to `Intro`.
    pub fn reset(&mut self) {
        self.timer = None;
        self.reported = None;
        self.controller.reset();
        tracing::debug!(scenario = %self.controller.scenario().id(), "session reset");
    }

    /// Stops the countdown and discards the session without reporting.
    pub fn abandon(self) {
        tracing::info!(
            scenario = %self.controller.scenario().id(),
            phase = %self.controller.phase(),
            answered = self.controller.answers().len(),
            "session abandoned"
        );
    }

    async fn report(&mut self) -> Result<(), SessionError> {
        if self.reported.is_some() {
            return Ok(());
        }
        let Some(result) = self.controller.result() else {
            return Err(SessionError::InvalidPhase {
                operation: "report",
                phase: self.controller.phase(),
            });
        };

        let progress = match self
            .aggregator
            .record_completion(
                result.module_id(),
                result.percentage(),
                result.time_spent_seconds(),
            )
            .await
        {
            Ok(progress) => progress,
            Err(err) => {
                tracing::warn!(error = %err, "completion report failed");
                return Err(err.into());
            }
        };
        self.reported = Some(progress);
        Ok(())
    }
}

impl fmt::Debug for TrainingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrainingSession")
            .field("controller", &self.controller)
            .field("timer_armed", &self.timer.is_some())
            .field("tick_period", &self.tick_period)
            .field("reported", &self.reported.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Opens training sessions for catalog scenarios.
#[derive(Clone)]
pub struct TrainingLoopService {
    clock: Clock,
    catalog: Arc<ModuleCatalog>,
    aggregator: Arc<dyn ProgressAggregator>,
    policy: FeedbackPolicy,
    tick_period: Duration,
}

impl TrainingLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<ModuleCatalog>,
        aggregator: Arc<dyn ProgressAggregator>,
    ) -> Self {
        Self {
            clock,
            catalog,
            aggregator,
            policy: FeedbackPolicy::default(),
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FeedbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Opens a session for `scenario_id` in `Intro`; call [`TrainingSession::start`] to begin.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownScenario` if the catalog has no such scenario.
    pub fn open_session(&self, scenario_id: &str) -> Result<TrainingSession, SessionError> {
        let scenario = self
            .catalog
            .scenario(scenario_id)
            .ok_or_else(|| SessionError::UnknownScenario(scenario_id.to_owned()))?;
        let controller = SessionController::new(scenario, self.policy);
        Ok(TrainingSession::new(
            controller,
            self.clock,
            Arc::clone(&self.aggregator),
            self.tick_period,
        ))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use drill_core::model::{Completion, ModuleId};
    use drill_core::time::fixed_now;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::catalog::{NETWORK_SECURITY, PHISHING_AWARENESS, SSH_BRUTE_FORCE};
    use crate::error::ProgressServiceError;
    use storage::repository::StorageError;

    #[derive(Default)]
    struct RecordingAggregator {
        calls: Mutex<Vec<(ModuleId, u8, u64)>>,
        failures_left: AtomicUsize,
    }

    impl RecordingAggregator {
        fn failing(times: usize) -> Self {
            Self {
                failures_left: AtomicUsize::new(times),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(ModuleId, u8, u64)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProgressAggregator for RecordingAggregator {
        async fn record_completion(
            &self,
            module_id: &ModuleId,
            score: u8,
            time_spent_seconds: u64,
        ) -> Result<UserProgress, ProgressServiceError> {
            if self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StorageError::Connection("offline".into()).into());
            }
            self.calls
                .lock()
                .unwrap()
                .push((module_id.clone(), score, time_spent_seconds));
            Ok(UserProgress::default())
        }
    }

    fn service(aggregator: Arc<RecordingAggregator>) -> TrainingLoopService {
        TrainingLoopService::new(
            Clock::fixed(fixed_now()),
            Arc::new(ModuleCatalog::builtin().unwrap()),
            aggregator,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn finished_session_reports_once() {
        let aggregator = Arc::new(RecordingAggregator::default());
        let svc = service(Arc::clone(&aggregator));
        let mut session = svc.open_session(PHISHING_AWARENESS).unwrap();
        session.start().unwrap();
        assert!(session.is_timer_armed());

        for answer in [true, false, true, false, false] {
            session.submit(AnswerValue::Binary(answer)).await.unwrap();
        }

        assert_eq!(session.phase(), SessionPhase::Results);
        assert!(!session.is_timer_armed());
        let result = session.result().unwrap();
        assert_eq!(result.percentage(), 80);
        assert_eq!(result.completion(), Completion::Finished);

        session.finalize_report().await.unwrap();
        let calls = aggregator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.as_str(), PHISHING_AWARENESS);
        assert_eq!(calls[0].1, 80);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_session_never_reports() {
        let aggregator = Arc::new(RecordingAggregator::default());
        let svc = service(Arc::clone(&aggregator));
        let mut session = svc.open_session(NETWORK_SECURITY).unwrap();
        session.start().unwrap();
        session
            .submit(AnswerValue::Choice("Port 23 (Telnet)".into()))
            .await
            .unwrap();
        session.abandon();

        let dropped = {
            let mut session = svc.open_session(NETWORK_SECURITY).unwrap();
            session.start().unwrap();
            session
        };
        drop(dropped);

        tokio::time::sleep(Duration::from_secs(3_000)).await;
        assert!(aggregator.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_expiry_reports_partial_result() {
        let aggregator = Arc::new(RecordingAggregator::default());
        let svc = service(Arc::clone(&aggregator));
        let mut session = svc.open_session(SSH_BRUTE_FORCE).unwrap();
        session.start().unwrap();
        session
            .submit(AnswerValue::Choice("203.0.113.42".into()))
            .await
            .unwrap();
        session
            .submit(AnswerValue::selection([
                "ssh-2", "ssh-3", "ssh-4", "ssh-5", "ssh-6",
            ]))
            .await
            .unwrap();

        let result = loop {
            match session.next_tick().await.unwrap() {
                Tick::Running { .. } => {}
                Tick::Expired(result) => break result,
            }
        };

        assert_eq!(result.completion(), Completion::TimedOut);
        assert_eq!(result.answers().len(), 2);
        assert_eq!(result.total_points(), 25);
        assert_eq!(result.max_points(), 40);
        assert_eq!(result.time_spent_seconds(), 300);
        assert!(!session.is_timer_armed());
        assert!(session.next_tick().await.is_err());

        let calls = aggregator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.as_str(), "threat-hunting");
        assert_eq!(calls[0].1, 63);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_report_is_retried_without_double_counting() {
        let aggregator = Arc::new(RecordingAggregator::failing(1));
        let svc = service(Arc::clone(&aggregator));
        let mut session = svc.open_session(PHISHING_AWARENESS).unwrap();
        session.start().unwrap();
        for _ in 0..4 {
            session.submit(AnswerValue::Binary(true)).await.unwrap();
        }
        let err = session.submit(AnswerValue::Binary(true)).await.unwrap_err();
        assert!(matches!(err, SessionError::Progress(_)));
        assert!(session.result().is_some());
        assert!(session.reported_progress().is_none());

        session.finalize_report().await.unwrap();
        session.finalize_report().await.unwrap();
        assert_eq!(aggregator.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_disarms_timer_and_allows_restart() {
        let aggregator = Arc::new(RecordingAggregator::default());
        let svc = service(Arc::clone(&aggregator));
        let mut session = svc.open_session(PHISHING_AWARENESS).unwrap();
        session.start().unwrap();
        session.next_tick().await.unwrap();
        session.reset();

        assert_eq!(session.phase(), SessionPhase::Intro);
        assert!(!session.is_timer_armed());
        assert!(session.next_tick().await.is_err());
        assert!(session.finalize_report().await.is_err());

        session.start().unwrap();
        assert_eq!(session.controller().time_remaining_seconds(), 600);
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        let svc = service(Arc::new(RecordingAggregator::default()));
        let err = svc.open_session("ransomware").unwrap_err();
        assert!(matches!(err, SessionError::UnknownScenario(id) if id == "ransomware"));
    }
}
