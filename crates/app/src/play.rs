//! Interactive terminal runner: races stdin lines against the session countdown.

use drill_core::model::{AnswerValue, Item, ItemKind, RevealPolicy};
use services::{AppServices, SessionError, SessionPhase, Step, Tick, TrainingSession};
use tokio::sync::mpsc;

use crate::report;

const QUIT: &str = ":quit";

/// Turns one input line into an answer for `item`.
fn parse_answer(item: &Item, line: &str) -> Result<AnswerValue, String> {
    match item.kind() {
        ItemKind::MultipleChoice { options, .. } => {
            let picked = line
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| options.get(i));
            Ok(AnswerValue::Choice(
                picked.map_or_else(|| line.to_owned(), Clone::clone),
            ))
        }
        ItemKind::FreeText { .. } => Ok(AnswerValue::Text(line.to_owned())),
        ItemKind::MultiSelect { .. } => Ok(AnswerValue::selection(
            line.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty()),
        )),
        ItemKind::Binary { .. } => match line.to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(AnswerValue::Binary(true)),
            "n" | "no" => Ok(AnswerValue::Binary(false)),
            _ => Err("answer y or n".to_owned()),
        },
    }
}

fn announce_remaining(remaining_seconds: u32) {
    if remaining_seconds <= 10 || remaining_seconds % 60 == 0 {
        println!("({remaining_seconds}s remaining)");
    }
}

fn print_current(session: &TrainingSession) {
    if let Some(item) = session.current_item() {
        let progress = session.progress();
        report::print_item(progress.answered, progress.total, item);
    }
}

/// Forwards stdin lines from a detached thread; the channel closes on EOF or a read error.
///
/// Runtime shutdown does not wait on the pending read.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    if tx.blocking_send(line.trim_end().to_owned()).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
    });
    rx
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    Abandoned,
}

/// Races learner input against the countdown until the session leaves `Active`.
///
/// Returns `Outcome::Abandoned` on `:quit` or closed input; the caller discards the session.
async fn drive(
    session: &mut TrainingSession,
    input: &mut mpsc::Receiver<String>,
) -> Result<Outcome, SessionError> {
    let reveal = session.controller().scenario().reveal();

    while session.phase() == SessionPhase::Active {
        tokio::select! {
            line = input.recv() => {
                let Some(line) = line else {
                    return Ok(Outcome::Abandoned);
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == QUIT {
                    return Ok(Outcome::Abandoned);
                }
                let Some(item) = session.current_item().cloned() else {
                    break;
                };
                let value = match parse_answer(&item, line) {
                    Ok(value) => value,
                    Err(msg) => {
                        println!("{msg}");
                        continue;
                    }
                };
                match session.submit(value).await {
                    Ok(step) => {
                        if reveal == RevealPolicy::Immediate {
                            report::print_feedback(&item, step.record().is_correct());
                        }
                        if matches!(step, Step::Advanced { .. }) {
                            print_current(session);
                        }
                    }
                    Err(SessionError::MalformedAnswer(e)) => println!("{e}"),
                    Err(SessionError::Progress(e)) => {
                        tracing::warn!(error = %e, "progress not saved yet");
                    }
                    Err(e) => return Err(e),
                }
            }
            tick = session.next_tick() => match tick {
                Ok(Tick::Running { remaining_seconds }) => announce_remaining(remaining_seconds),
                Ok(Tick::Expired(_)) => println!("Time's up!"),
                Err(SessionError::Progress(e)) => {
                    println!("Time's up!");
                    tracing::warn!(error = %e, "progress not saved yet");
                }
                Err(e) => return Err(e),
            },
        }
    }
    Ok(Outcome::Completed)
}

/// Plays one scenario to completion, or until the learner quits.
///
/// # Errors
///
/// Returns an error for unknown scenarios and failed session transitions.
pub async fn run(
    services: &AppServices,
    scenario_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = services.training().open_session(scenario_id)?;
    report::print_intro(session.controller().scenario());

    let mut input = spawn_stdin_reader();
    match input.recv().await {
        Some(line) if line.trim() != QUIT => {}
        _ => {
            session.abandon();
            return Ok(());
        }
    }

    session.start()?;
    print_current(&session);

    if drive(&mut session, &mut input).await? == Outcome::Abandoned {
        session.abandon();
        println!("Session abandoned; nothing was recorded.");
        return Ok(());
    }

    let Some(result) = session.result().cloned() else {
        return Ok(());
    };
    report::print_result(session.controller().scenario(), &result);

    match session.finalize_report().await {
        Ok(_) => {
            let catalog = services.catalog();
            match catalog.next_module(result.module_id()) {
                Some(next) => println!("Next up: {} ({})", next.title(), next.id()),
                None => println!("You have completed the full training path."),
            }
        }
        Err(e) => eprintln!("could not save progress: {e}"),
    }
    Ok(())
}
