//! Plain-text rendering for the terminal runner.

use drill_core::model::{
    AnswerValue, AttemptRecord, Difficulty, Item, ItemKind, RevealPolicy, Scenario,
    ScenarioResult, UserId, UserProgress,
};
use services::ModuleCatalog;

fn difficulty_label(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Beginner => "beginner",
        Difficulty::Intermediate => "intermediate",
        Difficulty::Advanced => "advanced",
    }
}

fn minutes(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn print_catalog(catalog: &ModuleCatalog) {
    for module in catalog.modules() {
        println!("{} ({})", module.title(), module.id());
        println!("  {}", module.summary());
        for scenario in module.scenarios() {
            println!(
                "  - {:<20} {} [{}, {} items, {}]",
                scenario.id().as_str(),
                scenario.title(),
                difficulty_label(scenario.difficulty()),
                scenario.items().len(),
                minutes(u64::from(scenario.time_limit_seconds())),
            );
        }
        println!();
    }
}

pub fn print_intro(scenario: &Scenario) {
    println!("== {} ==", scenario.title());
    if let Some(description) = scenario.description() {
        println!("{description}");
    }
    println!(
        "{} items, {} points, time limit {}.",
        scenario.items().len(),
        scenario.max_points(),
        minutes(u64::from(scenario.time_limit_seconds()))
    );
    if !scenario.evidence().is_empty() {
        println!();
        println!("Evidence:");
        for entry in scenario.evidence() {
            println!(
                "  [{}] {} {} {:<5} {}",
                entry.id, entry.timestamp, entry.source, entry.level, entry.message
            );
        }
    }
    println!();
    println!("Press Enter to start, or type :quit to leave.");
}

pub fn print_item(index: usize, total: usize, item: &Item) {
    println!();
    println!("[{}/{}] ({} pts)", index + 1, total, item.points());
    println!("{}", item.prompt());
    match item.kind() {
        ItemKind::MultipleChoice { options, .. } => {
            for (n, option) in options.iter().enumerate() {
                println!("  {}) {option}", n + 1);
            }
            println!("Answer with a number or the option text.");
        }
        ItemKind::MultiSelect { choices, .. } => {
            println!("Entries: {}", choices.join(", "));
            println!("List every matching entry id, separated by commas or spaces.");
        }
        ItemKind::FreeText { .. } => println!("Type your answer."),
        ItemKind::Binary { .. } => println!("Answer y (yes) or n (no)."),
    }
}

pub fn print_feedback(item: &Item, correct: bool) {
    if correct {
        println!("Correct! +{}", item.points());
    } else {
        println!("Incorrect. Expected: {}", item.correct_answer_display());
    }
    if let Some(explanation) = item.explanation() {
        println!("{explanation}");
    }
}

fn answer_display(value: &AnswerValue) -> String {
    match value {
        AnswerValue::Choice(s) | AnswerValue::Text(s) => s.clone(),
        AnswerValue::Selection(ids) => ids.iter().cloned().collect::<Vec<_>>().join(", "),
        AnswerValue::Binary(b) => (if *b { "yes" } else { "no" }).to_owned(),
    }
}

pub fn print_result(scenario: &Scenario, result: &ScenarioResult) {
    println!();
    println!("== Results: {} ==", scenario.title());
    println!(
        "Score: {}% ({}/{} points, {}/{} correct) in {}",
        result.percentage(),
        result.total_points(),
        result.max_points(),
        result.correct_count(),
        scenario.items().len(),
        minutes(result.time_spent_seconds()),
    );
    println!(
        "{}: {}",
        result.feedback_tier(),
        result.feedback_tier().encouragement()
    );

    if scenario.reveal() == RevealPolicy::AtEnd {
        println!();
        for (n, item) in scenario.items().iter().enumerate() {
            let record = result.answers().iter().find(|a| a.item_id() == item.id());
            let verdict = match record {
                Some(r) if r.is_correct() => "correct",
                Some(_) => "incorrect",
                None => "unanswered",
            };
            println!("{}. {} [{verdict}]", n + 1, item.prompt());
            if let Some(record) = record {
                println!("   your answer: {}", answer_display(record.value()));
            }
            println!("   expected:    {}", item.correct_answer_display());
            if let Some(explanation) = item.explanation() {
                println!("   {explanation}");
            }
        }
    }
}

pub fn print_progress(
    user_id: UserId,
    catalog: &ModuleCatalog,
    progress: &UserProgress,
    history: &[AttemptRecord],
) {
    println!("Learner {user_id}");
    println!(
        "Completed sessions: {}  modules attempted: {}/{}  average best score: {}%",
        progress.total_modules_completed(),
        progress.attempted_module_count(),
        catalog.modules().len(),
        progress.average_best_score(),
    );
    println!("Total time: {}", minutes(progress.total_time_spent()));
    println!();

    for module in catalog.modules() {
        match progress.module(module.id()) {
            Some(bucket) => println!(
                "  {:<20} best {:>3}%  attempts {:>2}  time {}",
                module.title(),
                bucket.best_score(),
                bucket.attempts(),
                minutes(bucket.time_spent_seconds()),
            ),
            None => println!("  {:<20} not started", module.title()),
        }
    }

    if !history.is_empty() {
        println!();
        println!("Recent attempts:");
        for attempt in history {
            println!(
                "  {}  {:<20} {:>3}%  {}",
                attempt.completed_at().format("%Y-%m-%d %H:%M"),
                attempt.module_id().as_str(),
                attempt.score(),
                minutes(attempt.time_spent_seconds()),
            );
        }
    }

    let next = catalog
        .modules()
        .iter()
        .find(|m| progress.module(m.id()).is_none());
    if let Some(next) = next {
        println!();
        println!("Recommended next: {} ({})", next.title(), next.id());
    }
}
