//! Session controller and decision engine.
//!
//! A [`SafetySession`] owns the whole run: catalog, timing, notification
//! store, score counters, the live feedback slot, and the task queue. The
//! host feeds it user actions and elapsed time; everything else is
//! synchronous, single-writer state transitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::constants::{
    LOG_DECISION_RESOLVED, LOG_NOTIFICATION_ARRIVED, LOG_SESSION_FINISHED, LOG_SESSION_RESET,
    LOG_STALE_ACTION, LOG_TASK_STALE_EPOCH,
};
use crate::data::{CorrectAction, ScenarioCatalog, ScenarioKind};
use crate::feedback::FeedbackMessage;
use crate::store::{Notification, NotificationId, NotificationStore};
use crate::timers::{DeferredEffect, Epoch, ScheduledTask, TaskQueue};
use crate::timing::TimingConfig;

/// A user action on a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Temporarily unmask the content. Non-terminal.
    View,
    /// Re-mask previously revealed content. Non-terminal.
    Hide,
    /// Accept the message. Terminal.
    Accept,
    /// Reject the message. Terminal.
    Reject,
}

impl Action {
    /// Whether this action resolves and removes the notification.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accept | Self::Reject)
    }
}

/// Raised when an untyped caller supplies an unrecognized action string.
///
/// Typed callers cannot hit this; it exists so input layers fail fast on
/// contract violations instead of mapping garbage onto a default.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized action '{0}' (expected view, hide, accept, or reject)")]
pub struct ActionParseError(String);

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "hide" => Ok(Self::Hide),
            "accept" => Ok(Self::Accept),
            "reject" => Ok(Self::Reject),
            other => Err(ActionParseError(other.to_string())),
        }
    }
}

/// Scoring and progression state for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub started: bool,
    pub finished: bool,
    /// 0-based cursor into the catalog, advanced only on terminal decisions.
    pub current_scenario_index: usize,
    pub correct_count: u32,
    pub incorrect_count: u32,
}

/// Coarse lifecycle phase derived from [`SessionState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    NotStarted,
    Running,
    Finished,
}

/// Synchronous result of [`SafetySession::handle_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The target id was not in the store; nothing changed.
    Ignored,
    /// A non-terminal action toggled the reveal state.
    Toggled { revealed: bool },
    /// A terminal action resolved the notification.
    Resolved { kind: ScenarioKind, correct: bool },
}

/// Deferred effect that fired during [`SafetySession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    NotificationArrived(NotificationId),
    FeedbackElapsed,
    Finished,
}

/// One full simulator session.
#[derive(Debug, Clone)]
pub struct SafetySession {
    catalog: ScenarioCatalog,
    timing: TimingConfig,
    state: SessionState,
    store: NotificationStore,
    feedback: Option<FeedbackMessage>,
    timers: TaskQueue,
    epoch: Epoch,
    next_notification_id: NotificationId,
}

impl SafetySession {
    /// Create a session over a catalog with the given pacing.
    #[must_use]
    pub fn new(catalog: ScenarioCatalog, timing: TimingConfig) -> Self {
        Self {
            catalog,
            timing,
            state: SessionState::default(),
            store: NotificationStore::new(),
            feedback: None,
            timers: TaskQueue::new(),
            epoch: 0,
            next_notification_id: 0,
        }
    }

    /// Session over the bundled catalog with production pacing.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(ScenarioCatalog::builtin(), TimingConfig::default())
    }

    /// Begin a fresh run: zero the counters, clear the store and feedback,
    /// invalidate in-flight timers, and schedule scenario 0.
    pub fn start(&mut self) {
        self.epoch += 1;
        self.timers.retain_epoch(self.epoch);
        self.store.clear();
        self.feedback = None;
        self.state = SessionState {
            started: true,
            ..SessionState::default()
        };
        log::debug!("{LOG_SESSION_RESET}: epoch={}", self.epoch);
        self.schedule_scenario(0);
    }

    /// Full reset; identical to [`SafetySession::start`].
    pub fn restart(&mut self) {
        self.start();
    }

    /// Queue delivery of the notification for `index`, or signal completion
    /// when the index is past the end of the catalog.
    ///
    /// Normal flow only calls this for the next unresolved scenario, but
    /// extra calls are harmless: deliveries are additive, most recent first.
    pub fn schedule_scenario(&mut self, index: usize) {
        if index >= self.catalog.len() {
            self.finish();
            return;
        }
        self.timers.schedule(
            self.epoch,
            self.timing.arrival_delay,
            DeferredEffect::Deliver(index),
        );
    }

    /// Apply a user action to a notification.
    ///
    /// Stale ids (already resolved, or from an abandoned run) are ignored so
    /// duplicate events cannot double-count the score.
    pub fn handle_action(&mut self, id: NotificationId, action: Action) -> ActionOutcome {
        match action {
            Action::View | Action::Hide => {
                let Some(notification) = self.store.get_mut(id) else {
                    log::debug!("{LOG_STALE_ACTION}: id={id} action={action:?}");
                    return ActionOutcome::Ignored;
                };
                notification.revealed = action == Action::View;
                ActionOutcome::Toggled {
                    revealed: notification.revealed,
                }
            }
            Action::Accept | Action::Reject => {
                let Some(notification) = self.store.remove(id) else {
                    log::debug!("{LOG_STALE_ACTION}: id={id} action={action:?}");
                    return ActionOutcome::Ignored;
                };
                self.resolve(&notification, action)
            }
        }
    }

    fn resolve(&mut self, notification: &Notification, action: Action) -> ActionOutcome {
        let kind = notification.kind;
        let correct = match kind.expected_action() {
            CorrectAction::Accept => action == Action::Accept,
            CorrectAction::Reject => action == Action::Reject,
        };
        if correct {
            self.state.correct_count += 1;
        } else {
            self.state.incorrect_count += 1;
        }
        log::info!(
            "{LOG_DECISION_RESOLVED}: scenario={} action={action:?} correct={correct}",
            notification.scenario_index
        );
        self.feedback = Some(FeedbackMessage::for_decision(kind, correct));
        self.timers.schedule(
            self.epoch,
            self.timing.feedback_duration(correct),
            DeferredEffect::ClearFeedback,
        );
        ActionOutcome::Resolved { kind, correct }
    }

    /// Advance the virtual clock and apply every deferred effect that became
    /// due, including zero-delay chains. Returns the effects that fired.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        let mut due = self.timers.advance(elapsed);
        while !due.is_empty() {
            for task in due {
                self.apply(task, &mut events);
            }
            due = self.timers.drain_due();
        }
        events
    }

    fn apply(&mut self, task: ScheduledTask, events: &mut Vec<EngineEvent>) {
        if task.epoch != self.epoch {
            log::debug!(
                "{LOG_TASK_STALE_EPOCH}: task epoch {} != {}",
                task.epoch,
                self.epoch
            );
            return;
        }
        match task.effect {
            DeferredEffect::Deliver(index) => {
                let Some(scenario) = self.catalog.get(index) else {
                    return;
                };
                let id = self.next_notification_id;
                self.next_notification_id += 1;
                let notification =
                    Notification::from_scenario(id, index, scenario, self.timers.now());
                log::info!("{LOG_NOTIFICATION_ARRIVED}: id={id} scenario={index}");
                self.store.insert(notification);
                events.push(EngineEvent::NotificationArrived(id));
            }
            DeferredEffect::ClearFeedback => {
                self.feedback = None;
                events.push(EngineEvent::FeedbackElapsed);
                self.advance_progression();
            }
            DeferredEffect::Finish => {
                self.finish();
                events.push(EngineEvent::Finished);
            }
        }
    }

    fn advance_progression(&mut self) {
        self.state.current_scenario_index += 1;
        let next = self.state.current_scenario_index;
        if next < self.catalog.len() {
            self.schedule_scenario(next);
        } else {
            self.timers.schedule(
                self.epoch,
                self.timing.completion_delay,
                DeferredEffect::Finish,
            );
        }
    }

    fn finish(&mut self) {
        if !self.state.finished {
            log::info!(
                "{LOG_SESSION_FINISHED}: correct={} incorrect={}",
                self.state.correct_count,
                self.state.incorrect_count
            );
        }
        self.state.finished = true;
    }

    /// Currently-visible notifications, most recent first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        self.store.notifications()
    }

    /// The live feedback message, if one is showing.
    #[must_use]
    pub const fn feedback(&self) -> Option<&FeedbackMessage> {
        self.feedback.as_ref()
    }

    /// Scoring and progression snapshot.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Coarse lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        if !self.state.started {
            SessionPhase::NotStarted
        } else if self.state.finished {
            SessionPhase::Finished
        } else {
            SessionPhase::Running
        }
    }

    /// The catalog driving this session.
    #[must_use]
    pub const fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Number of scenarios in the run.
    #[must_use]
    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    /// Time on the session's virtual clock.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Delay until the next deferred effect fires, if any is pending.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }
}
