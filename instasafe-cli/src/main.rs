//! Terminal host for the Instasafe simulator.
//!
//! Drives a [`SafetySession`] with real wall-clock delays (or zero delays in
//! `--instant` mode), prompting for a decision on each incoming message and
//! printing feedback and the final score. `--auto` plays a whole run without
//! prompts, which makes the binary usable as a scripted QA harness.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use instasafe_engine::{
    Action, ActionOutcome, EngineEvent, FeedbackKind, Notification, SafetySession,
    ScenarioCatalog, ScenarioKind, SessionPhase, TimingConfig,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AutoPolicy {
    /// Always take the labeled correct action
    Correct,
    /// Always take the opposite of the labeled correct action
    Wrong,
}

impl AutoPolicy {
    fn action_for(self, kind: ScenarioKind) -> Action {
        match (self, kind) {
            (Self::Correct, ScenarioKind::Unsafe) | (Self::Wrong, ScenarioKind::Benign) => {
                Action::Reject
            }
            (Self::Correct, ScenarioKind::Benign) | (Self::Wrong, ScenarioKind::Unsafe) => {
                Action::Accept
            }
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "instasafe", version)]
#[command(about = "Instasafe - a simulated inbox for practicing safe accept/reject decisions")]
struct Args {
    /// Scenario catalog JSON file (defaults to the bundled catalog)
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Run with zero delays instead of the scripted pacing
    #[arg(long)]
    instant: bool,

    /// Resolve every message automatically instead of prompting
    #[arg(long, value_enum)]
    auto: Option<AutoPolicy>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let catalog = load_catalog(args.scenarios.as_deref())?;
    let timing = if args.instant {
        TimingConfig::instant()
    } else {
        TimingConfig::default()
    };

    println!("{}", "Instasafe online-safety simulator".bold());
    println!(
        "{} messages incoming. Accept the safe ones, reject the harmful ones.\n",
        catalog.len()
    );

    let mut session = SafetySession::new(catalog, timing);
    session.start();
    run(&mut session, args.auto, !args.instant)?;
    print_summary(&session);
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<ScenarioCatalog> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            ScenarioCatalog::from_json(&json)
                .with_context(|| format!("invalid scenario catalog {}", path.display()))
        }
        None => Ok(ScenarioCatalog::builtin()),
    }
    .inspect(|catalog| log::debug!("loaded catalog with {} scenarios", catalog.len()))
}

fn run(session: &mut SafetySession, auto: Option<AutoPolicy>, realtime: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while session.phase() != SessionPhase::Finished {
        pump_timers(session, realtime);
        if session.phase() == SessionPhase::Finished {
            break;
        }
        let Some(notification) = session.notifications().first().cloned() else {
            continue;
        };
        render_notification(&notification);

        let action = match auto {
            Some(policy) => {
                let action = policy.action_for(notification.kind);
                println!("  auto: {action:?}");
                action
            }
            None => prompt_action(session, &mut lines, notification.id)?,
        };

        if let ActionOutcome::Resolved { .. } = session.handle_action(notification.id, action)
            && let Some(feedback) = session.feedback()
        {
            let text = match feedback.kind {
                FeedbackKind::Success => feedback.text.green(),
                FeedbackKind::Error => feedback.text.red(),
            };
            println!("\n  {text}\n");
        }
    }
    Ok(())
}

/// Sleep through pending engine delays until a message is waiting for a
/// decision or the session finishes.
fn pump_timers(session: &mut SafetySession, realtime: bool) {
    while session.notifications().is_empty() && session.phase() != SessionPhase::Finished {
        let Some(wait) = session.next_due() else {
            return;
        };
        if realtime {
            thread::sleep(wait);
        }
        for event in session.advance(wait) {
            if event == EngineEvent::Finished {
                return;
            }
        }
    }
}

fn render_notification(notification: &Notification) {
    let header = format!(
        "{} {}",
        notification.avatar,
        notification.sender.cyan().bold()
    );
    println!("New message  {header}");
    if notification.is_masked && !notification.revealed {
        println!("  {}", notification.display_body().yellow().bold());
        println!("  (this message may be inappropriate; 'view' to reveal it)");
    } else {
        println!("  {}", notification.display_body());
    }
}

fn prompt_action(
    session: &mut SafetySession,
    lines: &mut impl Iterator<Item = io::Result<String>>,
    id: u64,
) -> Result<Action> {
    loop {
        print!("  [a]ccept / [r]eject / [v]iew / [h]ide > ");
        io::stdout().flush()?;
        let line = lines
            .next()
            .transpose()
            .context("failed to read stdin")?
            .context("stdin closed before the session finished")?;
        let action = match line.trim() {
            "a" => Ok(Action::Accept),
            "r" => Ok(Action::Reject),
            "v" => Ok(Action::View),
            "h" => Ok(Action::Hide),
            other => Action::from_str(other),
        };
        match action {
            Ok(action) if action.is_terminal() => return Ok(action),
            Ok(action) => {
                // Reveal toggles re-render the card and keep prompting.
                session.handle_action(id, action);
                if let Some(notification) = session.notifications().first().cloned() {
                    render_notification(&notification);
                }
            }
            Err(err) => println!("  {}", err.to_string().red()),
        }
    }
}

fn print_summary(session: &SafetySession) {
    let state = session.state();
    println!("{}", "Session complete!".bold());
    println!(
        "  {}",
        format!("correct: {}", state.correct_count).green()
    );
    println!(
        "  {}",
        format!("incorrect: {}", state.incorrect_count).red()
    );
    println!("  scenarios: {}", session.catalog_len());
}
