//! Centralized tuning constants for the Instasafe engine.
//!
//! Timing defaults mirror the scripted pacing of the simulator. Hosts can
//! override all of them through [`crate::TimingConfig`]; these values are only
//! the production defaults.

// Diagnostic log keys ------------------------------------------------------
pub(crate) const LOG_STALE_ACTION: &str = "log.action.stale";
pub(crate) const LOG_NOTIFICATION_ARRIVED: &str = "log.notification.arrived";
pub(crate) const LOG_DECISION_RESOLVED: &str = "log.decision.resolved";
pub(crate) const LOG_SESSION_RESET: &str = "log.session.reset";
pub(crate) const LOG_SESSION_FINISHED: &str = "log.session.finished";
pub(crate) const LOG_TASK_STALE_EPOCH: &str = "log.task.stale-epoch";

// Timing defaults (milliseconds) -------------------------------------------
pub(crate) const ARRIVAL_DELAY_MS: u64 = 1_500;
pub(crate) const SUCCESS_FEEDBACK_MS: u64 = 2_500;
pub(crate) const ERROR_FEEDBACK_MS: u64 = 3_000;
pub(crate) const COMPLETION_DELAY_MS: u64 = 1_000;

// Masking ------------------------------------------------------------------
pub(crate) const DEFAULT_MASK_PLACEHOLDER: &str = "HARMFUL MESSAGE HIDDEN";
