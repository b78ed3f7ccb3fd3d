use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::ItemId;
use crate::model::item::{Item, ItemKind, Variant};
use crate::model::text::same_text;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// A submitted value that does not fit the shape of the item it answers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("expected a {expected} answer, got {found}")]
    VariantMismatch { expected: Variant, found: Variant },

    #[error("answer text must not be empty")]
    EmptyText,

    #[error("not one of the offered options: {0}")]
    UnknownOption(String),

    #[error("at least one entry must be selected")]
    EmptySelection,

    #[error("not a selectable entry: {0}")]
    UnknownSelection(String),
}

//
// ─── ANSWER VALUE ─────────────────────────────────────────────────────────────
//

/// What a learner submitted for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum AnswerValue {
    Choice(String),
    Text(String),
    Selection(BTreeSet<String>),
    Binary(bool),
}

impl AnswerValue {
    /// Builds a selection from any iterable of identifiers; order and duplicates are ignored.
    pub fn selection<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self::Selection(ids.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        match self {
            AnswerValue::Choice(_) => Variant::MultipleChoice,
            AnswerValue::Text(_) => Variant::FreeText,
            AnswerValue::Selection(_) => Variant::MultiSelect,
            AnswerValue::Binary(_) => Variant::Binary,
        }
    }

    /// Checks the value against the item's shape before it may be scored.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if the variant differs, free text is blank, a choice is not
    /// offered, or a selection is empty or names an unknown entry.
    pub fn validate_for(&self, item: &Item) -> Result<(), AnswerError> {
        match (item.kind(), self) {
            (ItemKind::MultipleChoice { options, .. }, AnswerValue::Choice(choice)) => {
                if options.iter().any(|o| same_text(o, choice)) {
                    Ok(())
                } else {
                    Err(AnswerError::UnknownOption(choice.clone()))
                }
            }
            (ItemKind::FreeText { .. }, AnswerValue::Text(text)) => {
                if text.trim().is_empty() {
                    Err(AnswerError::EmptyText)
                } else {
                    Ok(())
                }
            }
            (ItemKind::MultiSelect { choices, .. }, AnswerValue::Selection(selected)) => {
                if selected.is_empty() {
                    return Err(AnswerError::EmptySelection);
                }
                match selected.iter().find(|s| !choices.contains(s)) {
                    Some(unknown) => Err(AnswerError::UnknownSelection(unknown.clone())),
                    None => Ok(()),
                }
            }
            (ItemKind::Binary { .. }, AnswerValue::Binary(_)) => Ok(()),
            (kind, value) => Err(AnswerError::VariantMismatch {
                expected: kind.variant(),
                found: value.variant(),
            }),
        }
    }

    /// Canonical stored form: surrounding whitespace removed from strings.
    #[must_use]
    pub fn into_trimmed(self) -> Self {
        match self {
            AnswerValue::Choice(s) => AnswerValue::Choice(s.trim().to_owned()),
            AnswerValue::Text(s) => AnswerValue::Text(s.trim().to_owned()),
            other => other,
        }
    }
}

//
// ─── ANSWER RECORD ────────────────────────────────────────────────────────────
//

/// Immutable record of one scored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    item_id: ItemId,
    value: AnswerValue,
    is_correct: bool,
    points_earned: u32,
}

impl AnswerRecord {
    pub(crate) fn new(
        item_id: ItemId,
        value: AnswerValue,
        is_correct: bool,
        points_earned: u32,
    ) -> Self {
        Self {
            item_id,
            value,
            is_correct,
            points_earned,
        }
    }

    #[must_use]
    pub fn item_id(&self) -> &ItemId {
        &self.item_id
    }

    #[must_use]
    pub fn value(&self) -> &AnswerValue {
        &self.value
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    #[test]
    fn rejects_wrong_variant() {
        let item = Item::binary(item_id("email-1"), "Phishing?", true, 10).unwrap();
        let err = AnswerValue::Text("yes".into()).validate_for(&item).unwrap_err();
        assert_eq!(
            err,
            AnswerError::VariantMismatch {
                expected: Variant::Binary,
                found: Variant::FreeText,
            }
        );
    }

    #[test]
    fn rejects_blank_free_text() {
        let item = Item::free_text(item_id("q4"), "One word?", "timing", 5).unwrap();
        assert_eq!(
            AnswerValue::Text("   ".into()).validate_for(&item),
            Err(AnswerError::EmptyText)
        );
        assert!(AnswerValue::Text(" Timing ".into()).validate_for(&item).is_ok());
    }

    #[test]
    fn choice_must_be_offered() {
        let item = Item::multiple_choice(
            item_id("pw-1"),
            "Rate password123",
            ["weak", "medium", "strong"],
            "weak",
            10,
        )
        .unwrap();
        assert!(AnswerValue::Choice("WEAK".into()).validate_for(&item).is_ok());
        assert_eq!(
            AnswerValue::Choice("terrible".into()).validate_for(&item),
            Err(AnswerError::UnknownOption("terrible".into()))
        );
    }

    #[test]
    fn selection_must_be_non_empty_and_known() {
        let item = Item::multi_select(
            item_id("q2"),
            "Select the attack entries",
            ["ssh-1", "ssh-2", "ssh-3"],
            ["ssh-2"],
            15,
        )
        .unwrap();
        let none: [&str; 0] = [];
        assert_eq!(
            AnswerValue::selection(none).validate_for(&item),
            Err(AnswerError::EmptySelection)
        );
        assert_eq!(
            AnswerValue::selection(["ssh-2", "ssh-7"]).validate_for(&item),
            Err(AnswerError::UnknownSelection("ssh-7".into()))
        );
    }

    #[test]
    fn into_trimmed_strips_whitespace() {
        assert_eq!(
            AnswerValue::Text("  847MB ".into()).into_trimmed(),
            AnswerValue::Text("847MB".into())
        );
    }
}
