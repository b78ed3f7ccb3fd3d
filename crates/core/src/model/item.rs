use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;
use crate::model::text::{normalize, same_text};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    #[error("item prompt must not be empty")]
    EmptyPrompt,

    #[error("item correct answer must not be empty")]
    EmptyCorrectAnswer,

    #[error("multiple-choice item needs at least two options")]
    TooFewOptions,

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct answer is not one of the offered options: {0}")]
    CorrectNotOffered(String),
}

//
// ─── VARIANT TAG ──────────────────────────────────────────────────────────────
//

/// Shape tag shared by items and answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    MultipleChoice,
    FreeText,
    MultiSelect,
    Binary,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::MultipleChoice => "multiple-choice",
            Variant::FreeText => "free-text",
            Variant::MultiSelect => "multi-select",
            Variant::Binary => "binary",
        };
        f.write_str(name)
    }
}

//
// ─── ITEM KIND ────────────────────────────────────────────────────────────────
//

/// Variant-specific answer key of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ItemKind {
    /// Pick exactly one of `options`.
    MultipleChoice { options: Vec<String>, correct: String },
    /// Type a short answer; compared trimmed and case-insensitively.
    FreeText { correct: String },
    /// Select a subset of `choices`; correct only on an exact set match.
    MultiSelect {
        choices: Vec<String>,
        correct: BTreeSet<String>,
    },
    /// Yes/no classification (e.g. "is this email phishing?").
    Binary { correct: bool },
}

impl ItemKind {
    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            ItemKind::MultipleChoice { .. } => Variant::MultipleChoice,
            ItemKind::FreeText { .. } => Variant::FreeText,
            ItemKind::MultiSelect { .. } => Variant::MultiSelect,
            ItemKind::Binary { .. } => Variant::Binary,
        }
    }
}

//
// ─── ITEM ─────────────────────────────────────────────────────────────────────
//

/// A single gradable unit (question, email, password, challenge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    prompt: String,
    points: u32,
    kind: ItemKind,
    explanation: Option<String>,
}

impl Item {
    /// Builds a multiple-choice item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if the prompt is blank, fewer than two distinct options are
    /// given, or `correct` is not among the options.
    pub fn multiple_choice<S: Into<String>>(
        id: ItemId,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        correct: impl Into<String>,
        points: u32,
    ) -> Result<Self, ItemError> {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let correct = correct.into();
        if correct.trim().is_empty() {
            return Err(ItemError::EmptyCorrectAnswer);
        }
        check_unique(&options)?;
        if options.len() < 2 {
            return Err(ItemError::TooFewOptions);
        }
        if !options.iter().any(|o| same_text(o, &correct)) {
            return Err(ItemError::CorrectNotOffered(correct));
        }
        Self::build(id, prompt, points, ItemKind::MultipleChoice { options, correct })
    }

    /// Builds a free-text item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if the prompt or the expected answer is blank.
    pub fn free_text(
        id: ItemId,
        prompt: impl Into<String>,
        correct: impl Into<String>,
        points: u32,
    ) -> Result<Self, ItemError> {
        let correct = correct.into();
        if correct.trim().is_empty() {
            return Err(ItemError::EmptyCorrectAnswer);
        }
        Self::build(id, prompt, points, ItemKind::FreeText { correct })
    }

    /// Builds a multi-select item over the given selectable identifiers.
    ///
    /// # Errors
    ///
    /// Returns `ItemError` if the prompt is blank, the correct set is empty,
    /// a choice is duplicated, or a correct id is not selectable.
    pub fn multi_select<S: Into<String>, C: Into<String>>(
        id: ItemId,
        prompt: impl Into<String>,
        choices: impl IntoIterator<Item = S>,
        correct: impl IntoIterator<Item = C>,
        points: u32,
    ) -> Result<Self, ItemError> {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        let correct: BTreeSet<String> = correct.into_iter().map(Into::into).collect();
        if correct.is_empty() {
            return Err(ItemError::EmptyCorrectAnswer);
        }
        check_unique(&choices)?;
        if let Some(missing) = correct.iter().find(|c| !choices.contains(c)) {
            return Err(ItemError::CorrectNotOffered(missing.clone()));
        }
        Self::build(id, prompt, points, ItemKind::MultiSelect { choices, correct })
    }

    /// Builds a binary (yes/no) classification item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::EmptyPrompt` if the prompt is blank.
    pub fn binary(
        id: ItemId,
        prompt: impl Into<String>,
        correct: bool,
        points: u32,
    ) -> Result<Self, ItemError> {
        Self::build(id, prompt, points, ItemKind::Binary { correct })
    }

    fn build(
        id: ItemId,
        prompt: impl Into<String>,
        points: u32,
        kind: ItemKind,
    ) -> Result<Self, ItemError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(ItemError::EmptyPrompt);
        }
        Ok(Self {
            id,
            prompt,
            points,
            kind,
            explanation: None,
        })
    }

    /// Attaches the explanation revealed after the item is answered.
    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        self.kind.variant()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Human-readable rendering of the expected answer.
    #[must_use]
    pub fn correct_answer_display(&self) -> String {
        match &self.kind {
            ItemKind::MultipleChoice { correct, .. } | ItemKind::FreeText { correct } => {
                correct.clone()
            }
            ItemKind::MultiSelect { correct, .. } => {
                correct.iter().cloned().collect::<Vec<_>>().join(", ")
            }
            ItemKind::Binary { correct } => (if *correct { "yes" } else { "no" }).to_owned(),
        }
    }
}

fn check_unique(values: &[String]) -> Result<(), ItemError> {
    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        if !seen.insert(normalize(value)) {
            return Err(ItemError::DuplicateOption(value.clone()));
        }
    }
    Ok(())
}
