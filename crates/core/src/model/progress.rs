use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ModuleId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("score must be within 0..=100, got {0}")]
    ScoreOutOfRange(u8),
}

//
// ─── ATTEMPT ──────────────────────────────────────────────────────────────────
//

/// One reported completion of a module; the history only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    module_id: ModuleId,
    score: u8,
    time_spent_seconds: u64,
    completed_at: DateTime<Utc>,
}

impl AttemptRecord {
    /// # Errors
    ///
    /// Returns `ProgressError::ScoreOutOfRange` if `score > 100`.
    pub fn new(
        module_id: ModuleId,
        score: u8,
        time_spent_seconds: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ProgressError> {
        if score > 100 {
            return Err(ProgressError::ScoreOutOfRange(score));
        }
        Ok(Self {
            module_id,
            score,
            time_spent_seconds,
            completed_at,
        })
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn time_spent_seconds(&self) -> u64 {
        self.time_spent_seconds
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}

//
// ─── PER-MODULE BUCKET ────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleProgress {
    attempts: u32,
    best_score: u8,
    time_spent_seconds: u64,
}

impl ModuleProgress {
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Highest score across attempts; never decreases.
    #[must_use]
    pub fn best_score(&self) -> u8 {
        self.best_score
    }

    #[must_use]
    pub fn time_spent_seconds(&self) -> u64 {
        self.time_spent_seconds
    }
}

//
// ─── USER PROGRESS ────────────────────────────────────────────────────────────
//

/// Cross-module progress of one learner, persisted as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    total_modules_completed: u32,
    total_score: u64,
    total_time_spent: u64,
    module_progress: BTreeMap<ModuleId, ModuleProgress>,
}

impl UserProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one attempt into the per-module bucket and the global rollup.
    pub fn record_attempt(&mut self, attempt: &AttemptRecord) {
        let bucket = self
            .module_progress
            .entry(attempt.module_id.clone())
            .or_default();
        bucket.attempts = bucket.attempts.saturating_add(1);
        bucket.best_score = bucket.best_score.max(attempt.score);
        bucket.time_spent_seconds = bucket
            .time_spent_seconds
            .saturating_add(attempt.time_spent_seconds);

        self.total_modules_completed = self.total_modules_completed.saturating_add(1);
        self.total_score = self.total_score.saturating_add(u64::from(attempt.score));
        self.total_time_spent = self
            .total_time_spent
            .saturating_add(attempt.time_spent_seconds);
    }

    #[must_use]
    pub fn total_modules_completed(&self) -> u32 {
        self.total_modules_completed
    }

    #[must_use]
    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    #[must_use]
    pub fn total_time_spent(&self) -> u64 {
        self.total_time_spent
    }

    #[must_use]
    pub fn module(&self, module_id: &ModuleId) -> Option<&ModuleProgress> {
        self.module_progress.get(module_id)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&ModuleId, &ModuleProgress)> {
        self.module_progress.iter()
    }

    /// Number of distinct modules with at least one attempt.
    #[must_use]
    pub fn attempted_module_count(&self) -> usize {
        self.module_progress.len()
    }

    /// Mean of per-module best scores, rounded half up; 0 when nothing was attempted.
    #[must_use]
    pub fn average_best_score(&self) -> u8 {
        let count = self.module_progress.len() as u64;
        if count == 0 {
            return 0;
        }
        let sum: u64 = self
            .module_progress
            .values()
            .map(|m| u64::from(m.best_score))
            .sum();
        u8::try_from((2 * sum + count) / (2 * count)).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn module(raw: &str) -> ModuleId {
        ModuleId::new(raw).unwrap()
    }

    fn attempt(module_id: &str, score: u8, secs: u64) -> AttemptRecord {
        AttemptRecord::new(module(module_id), score, secs, fixed_now()).unwrap()
    }

    #[test]
    fn best_score_is_monotonic() {
        let mut progress = UserProgress::new();
        for score in [40, 70, 55] {
            progress.record_attempt(&attempt("network-security", score, 100));
        }

        let bucket = progress.module(&module("network-security")).unwrap();
        assert_eq!(bucket.best_score(), 70);
        assert_eq!(bucket.attempts(), 3);
        assert_eq!(bucket.time_spent_seconds(), 300);
        assert_eq!(progress.total_modules_completed(), 3);
        assert_eq!(progress.total_score(), 165);
        assert_eq!(progress.total_time_spent(), 300);
    }

    #[test]
    fn buckets_are_independent_per_module() {
        let mut progress = UserProgress::new();
        progress.record_attempt(&attempt("phishing-awareness", 80, 30));
        progress.record_attempt(&attempt("password-security", 45, 60));

        assert_eq!(progress.attempted_module_count(), 2);
        assert_eq!(progress.average_best_score(), 63);
        assert_eq!(
            progress
                .module(&module("password-security"))
                .unwrap()
                .best_score(),
            45
        );
    }

    #[test]
    fn rejects_score_above_hundred() {
        let err = AttemptRecord::new(module("x"), 101, 0, fixed_now()).unwrap_err();
        assert_eq!(err, ProgressError::ScoreOutOfRange(101));
    }

    #[test]
    fn serializes_with_camel_case_shape() {
        let mut progress = UserProgress::new();
        progress.record_attempt(&attempt("threat-hunting", 90, 12));
        let json = serde_json::to_value(&progress).unwrap();

        assert_eq!(json["totalModulesCompleted"], 1);
        assert_eq!(json["moduleProgress"]["threat-hunting"]["bestScore"], 90);
        let back: UserProgress = serde_json::from_value(json).unwrap();
        assert_eq!(back, progress);
    }
}
