use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ItemId, ModuleId, ScenarioId};
use crate::model::item::Item;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScenarioError {
    #[error("scenario has no items")]
    NoItems,

    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),

    #[error("time limit must be at least one second")]
    ZeroTimeLimit,

    #[error("scenario title must not be empty")]
    EmptyTitle,
}

//
// ─── SUPPORTING TYPES ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// When per-item correctness is shown to the learner.
///
/// Presentation only; scoring is identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealPolicy {
    #[default]
    Immediate,
    AtEnd,
}

/// A log line the learner inspects; multi-select items refer to it by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceEntry {
    pub id: String,
    pub timestamp: String,
    pub source: String,
    pub level: String,
    pub message: String,
}

impl EvidenceEntry {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        timestamp: impl Into<String>,
        source: impl Into<String>,
        level: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp: timestamp.into(),
            source: source.into(),
            level: level.into(),
            message: message.into(),
        }
    }
}

//
// ─── SCENARIO ─────────────────────────────────────────────────────────────────
//

/// An ordered, fixed-length sequence of items with a time budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    id: ScenarioId,
    module_id: ModuleId,
    title: String,
    description: Option<String>,
    difficulty: Difficulty,
    time_limit_seconds: u32,
    reveal: RevealPolicy,
    evidence: Vec<EvidenceEntry>,
    items: Vec<Item>,
}

impl Scenario {
    /// # Errors
    ///
    /// Returns `ScenarioError` if the title is blank, there are no items, item ids
    /// repeat, or the time limit is zero.
    pub fn new(
        id: ScenarioId,
        module_id: ModuleId,
        title: impl Into<String>,
        time_limit_seconds: u32,
        items: Vec<Item>,
    ) -> Result<Self, ScenarioError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ScenarioError::EmptyTitle);
        }
        if items.is_empty() {
            return Err(ScenarioError::NoItems);
        }
        if time_limit_seconds == 0 {
            return Err(ScenarioError::ZeroTimeLimit);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id()) {
                return Err(ScenarioError::DuplicateItem(item.id().clone()));
            }
        }

        Ok(Self {
            id,
            module_id,
            title,
            description: None,
            difficulty: Difficulty::Beginner,
            time_limit_seconds,
            reveal: RevealPolicy::default(),
            evidence: Vec::new(),
            items,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_reveal(mut self, reveal: RevealPolicy) -> Self {
        self.reveal = reveal;
        self
    }

    #[must_use]
    pub fn with_evidence(mut self, evidence: Vec<EvidenceEntry>) -> Self {
        self.evidence = evidence;
        self
    }

    #[must_use]
    pub fn id(&self) -> &ScenarioId {
        &self.id
    }

    #[must_use]
    pub fn module_id(&self) -> &ModuleId {
        &self.module_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_seconds
    }

    #[must_use]
    pub fn reveal(&self) -> RevealPolicy {
        self.reveal
    }

    #[must_use]
    pub fn evidence(&self) -> &[EvidenceEntry] {
        &self.evidence
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Sum of all item weights, answered or not.
    #[must_use]
    pub fn max_points(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.points())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, points: u32) -> Item {
        Item::binary(ItemId::new(id).unwrap(), "Phishing?", true, points).unwrap()
    }

    fn ids() -> (ScenarioId, ModuleId) {
        (
            ScenarioId::new("inbox").unwrap(),
            ModuleId::new("phishing-awareness").unwrap(),
        )
    }

    #[test]
    fn rejects_empty_and_duplicate_items() {
        let (sid, mid) = ids();
        assert_eq!(
            Scenario::new(sid.clone(), mid.clone(), "Inbox", 60, Vec::new()).unwrap_err(),
            ScenarioError::NoItems
        );
        let err = Scenario::new(sid, mid, "Inbox", 60, vec![item("e1", 1), item("e1", 1)])
            .unwrap_err();
        assert_eq!(err, ScenarioError::DuplicateItem(ItemId::new("e1").unwrap()));
    }

    #[test]
    fn rejects_zero_time_limit() {
        let (sid, mid) = ids();
        assert_eq!(
            Scenario::new(sid, mid, "Inbox", 0, vec![item("e1", 1)]).unwrap_err(),
            ScenarioError::ZeroTimeLimit
        );
    }

    #[test]
    fn max_points_sums_all_items() {
        let (sid, mid) = ids();
        let scenario = Scenario::new(
            sid,
            mid,
            "Inbox",
            60,
            vec![item("e1", 10), item("e2", 15), item("e3", 0)],
        )
        .unwrap()
        .with_reveal(RevealPolicy::AtEnd);
        assert_eq!(scenario.max_points(), 25);
        assert_eq!(scenario.reveal(), RevealPolicy::AtEnd);
    }
}
