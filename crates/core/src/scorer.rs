//! Pure scoring: item + answer to correctness, and a finished answer log to a result.

use crate::model::text::same_text;
use crate::model::{
    AnswerError, AnswerRecord, AnswerValue, Completion, FeedbackPolicy, Item, ItemKind, Scenario,
    ScenarioResult,
};

/// Correctness of a single answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub points_earned: u32,
}

/// Grades `value` against `item`.
///
/// Strings compare trimmed and case-insensitively, selections as sets, binary answers by
/// equality. A value of the wrong variant is simply incorrect; use [`score`] to reject it.
#[must_use]
pub fn evaluate(item: &Item, value: &AnswerValue) -> Evaluation {
    let is_correct = match (item.kind(), value) {
        (ItemKind::MultipleChoice { correct, .. }, AnswerValue::Choice(given))
        | (ItemKind::FreeText { correct }, AnswerValue::Text(given)) => same_text(given, correct),
        (ItemKind::MultiSelect { correct, .. }, AnswerValue::Selection(given)) => given == correct,
        (ItemKind::Binary { correct }, AnswerValue::Binary(given)) => given == correct,
        _ => false,
    };

    Evaluation {
        is_correct,
        points_earned: if is_correct { item.points() } else { 0 },
    }
}

/// Validates `value` for `item` and produces the immutable answer record.
///
/// # Errors
///
/// Returns `AnswerError` if the value is malformed for the item's variant.
pub fn score(item: &Item, value: AnswerValue) -> Result<AnswerRecord, AnswerError> {
    value.validate_for(item)?;
    let value = value.into_trimmed();
    let Evaluation {
        is_correct,
        points_earned,
    } = evaluate(item, &value);
    Ok(AnswerRecord::new(
        item.id().clone(),
        value,
        is_correct,
        points_earned,
    ))
}

/// `round(100 * total / max)` with half-up rounding; 0 when `max == 0`.
#[must_use]
pub fn percentage(total_points: u64, max_points: u64) -> u8 {
    if max_points == 0 {
        return 0;
    }
    let total = u128::from(total_points.min(max_points));
    let max = u128::from(max_points);
    let pct = (200 * total + max) / (2 * max);
    u8::try_from(pct).unwrap_or(100)
}

/// Builds the terminal result for a session over `scenario`.
///
/// `answers` may be shorter than the item list (timeout); missing items earn nothing
/// but still count toward `max_points`.
#[must_use]
pub fn aggregate(
    scenario: &Scenario,
    answers: Vec<AnswerRecord>,
    time_spent_seconds: u64,
    completion: Completion,
    policy: &FeedbackPolicy,
) -> ScenarioResult {
    let total_points: u64 = answers.iter().map(|a| u64::from(a.points_earned())).sum();
    let max_points = scenario.max_points();
    let percentage = percentage(total_points, max_points);

    ScenarioResult::new(
        scenario.id().clone(),
        scenario.module_id().clone(),
        total_points,
        max_points,
        percentage,
        answers,
        time_spent_seconds,
        policy.tier_for(percentage),
        completion,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FeedbackTier, ItemId, ModuleId, ScenarioId};

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn mc(raw_id: &str, correct: &str, points: u32) -> Item {
        Item::multiple_choice(id(raw_id), "Pick one", ["a", "b", "c", "d"], correct, points)
            .unwrap()
    }

    fn scenario(items: Vec<Item>) -> Scenario {
        Scenario::new(
            ScenarioId::new("s").unwrap(),
            ModuleId::new("network-security").unwrap(),
            "Scenario",
            300,
            items,
        )
        .unwrap()
    }

    #[test]
    fn evaluate_is_deterministic() {
        let item = Item::free_text(id("q4"), "One word?", "timing", 5).unwrap();
        let value = AnswerValue::Text("Timing".into());
        let first = evaluate(&item, &value);
        let second = evaluate(&item, &value);
        assert_eq!(first, second);
        assert_eq!(
            first,
            Evaluation {
                is_correct: true,
                points_earned: 5
            }
        );
    }

    #[test]
    fn multi_select_is_order_independent_and_all_or_nothing() {
        let item = Item::multi_select(id("q2"), "Select", ["a", "b", "c"], ["a", "b"], 15).unwrap();

        let ab = evaluate(&item, &AnswerValue::selection(["a", "b"]));
        let ba = evaluate(&item, &AnswerValue::selection(["b", "a"]));
        assert_eq!(ab, ba);
        assert!(ab.is_correct);

        let extra = evaluate(&item, &AnswerValue::selection(["a", "b", "c"]));
        let missing = evaluate(&item, &AnswerValue::selection(["a"]));
        assert_eq!(extra.points_earned, 0);
        assert_eq!(missing.points_earned, 0);
    }

    #[test]
    fn free_text_ignores_case_and_surrounding_whitespace() {
        let item = Item::free_text(id("q"), "Technique?", "tunneling", 10).unwrap();
        assert_eq!(
            evaluate(&item, &AnswerValue::Text("  Tunneling  ".into())),
            evaluate(&item, &AnswerValue::Text("tunneling".into()))
        );
        assert!(!evaluate(&item, &AnswerValue::Text("tunnel".into())).is_correct);
    }

    #[test]
    fn binary_compares_ground_truth() {
        let item = Item::binary(id("email-2"), "Phishing?", false, 10).unwrap();
        assert!(evaluate(&item, &AnswerValue::Binary(false)).is_correct);
        assert!(!evaluate(&item, &AnswerValue::Binary(true)).is_correct);
    }

    #[test]
    fn mismatched_variant_evaluates_incorrect() {
        let item = Item::binary(id("email-1"), "Phishing?", true, 10).unwrap();
        assert!(!evaluate(&item, &AnswerValue::Text("true".into())).is_correct);
    }

    #[test]
    fn score_rejects_malformed_and_trims_accepted() {
        let item = Item::free_text(id("q4"), "Units?", "847MB", 5).unwrap();
        assert_eq!(
            score(&item, AnswerValue::Text(" ".into())).unwrap_err(),
            AnswerError::EmptyText
        );
        let record = score(&item, AnswerValue::Text(" 847mb ".into())).unwrap();
        assert!(record.is_correct());
        assert_eq!(record.points_earned(), 5);
        assert_eq!(record.value(), &AnswerValue::Text("847mb".into()));
    }

    #[test]
    fn total_points_equal_sum_of_answers() {
        let items = vec![mc("q1", "a", 10), mc("q2", "b", 20), mc("q3", "c", 30)];
        let answers: Vec<_> = items
            .iter()
            .zip(["a", "x", "c"])
            .map(|(item, pick)| {
                let value = AnswerValue::Choice(pick.into());
                let e = evaluate(item, &value);
                AnswerRecord::new(item.id().clone(), value, e.is_correct, e.points_earned)
            })
            .collect();
        let expected: u64 = answers.iter().map(|a| u64::from(a.points_earned())).sum();

        let result = aggregate(
            &scenario(items),
            answers,
            12,
            Completion::Finished,
            &FeedbackPolicy::default(),
        );
        assert_eq!(result.total_points(), expected);
        assert_eq!(result.total_points(), 40);
        assert_eq!(result.max_points(), 60);
        assert_eq!(result.percentage(), 67);
    }

    #[test]
    fn zero_point_scenario_scores_zero_percent() {
        let items = vec![mc("q1", "a", 0), mc("q2", "a", 0)];
        let answers = items
            .iter()
            .map(|item| score(item, AnswerValue::Choice("a".into())).unwrap())
            .collect();
        let result = aggregate(
            &scenario(items),
            answers,
            0,
            Completion::Finished,
            &FeedbackPolicy::default(),
        );
        assert_eq!(result.max_points(), 0);
        assert_eq!(result.percentage(), 0);
        assert_eq!(result.feedback_tier(), FeedbackTier::NeedsPractice);
    }

    #[test]
    fn one_of_four_correct_needs_practice() {
        let items: Vec<_> = (1..=4).map(|n| mc(&format!("q{n}"), "a", 10)).collect();
        let answers = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let pick = if i == 0 { "a" } else { "b" };
                score(item, AnswerValue::Choice(pick.into())).unwrap()
            })
            .collect();

        let result = aggregate(
            &scenario(items),
            answers,
            30,
            Completion::Finished,
            &FeedbackPolicy::default(),
        );
        assert_eq!(result.total_points(), 10);
        assert_eq!(result.max_points(), 40);
        assert_eq!(result.percentage(), 25);
        assert_eq!(result.feedback_tier(), FeedbackTier::NeedsPractice);
        assert_eq!(result.correct_count(), 1);
    }

    #[test]
    fn all_correct_is_excellent() {
        let items = vec![mc("q1", "a", 15), mc("q2", "b", 20), mc("q3", "c", 15)];
        let answers = items
            .iter()
            .zip(["a", "b", "c"])
            .map(|(item, pick)| score(item, AnswerValue::Choice(pick.into())).unwrap())
            .collect();

        let result = aggregate(
            &scenario(items),
            answers,
            30,
            Completion::Finished,
            &FeedbackPolicy::default(),
        );
        assert_eq!(result.max_points(), 50);
        assert_eq!(result.percentage(), 100);
        assert_eq!(result.feedback_tier(), FeedbackTier::Excellent);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(5, 5), 100);
        assert_eq!(percentage(7, 0), 0);
    }
}
