//! Injectable pacing configuration for the notification lifecycle.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    ARRIVAL_DELAY_MS, COMPLETION_DELAY_MS, ERROR_FEEDBACK_MS, SUCCESS_FEEDBACK_MS,
};

/// The four delays that pace a session.
///
/// These are host-supplied configuration, not business logic: production hosts
/// use [`TimingConfig::default`], tests usually run with
/// [`TimingConfig::instant`] so the whole timer chain collapses into a single
/// `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between scheduling a scenario and its notification appearing.
    pub arrival_delay: Duration,
    /// How long success feedback stays visible before the run advances.
    pub success_feedback: Duration,
    /// How long corrective feedback stays visible before the run advances.
    pub error_feedback: Duration,
    /// Pause between resolving the last scenario and the finished signal.
    pub completion_delay: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            arrival_delay: Duration::from_millis(ARRIVAL_DELAY_MS),
            success_feedback: Duration::from_millis(SUCCESS_FEEDBACK_MS),
            error_feedback: Duration::from_millis(ERROR_FEEDBACK_MS),
            completion_delay: Duration::from_millis(COMPLETION_DELAY_MS),
        }
    }
}

impl TimingConfig {
    /// All-zero delays; every deferred effect becomes due immediately.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            arrival_delay: Duration::ZERO,
            success_feedback: Duration::ZERO,
            error_feedback: Duration::ZERO,
            completion_delay: Duration::ZERO,
        }
    }

    /// Feedback duration for a decision outcome.
    #[must_use]
    pub const fn feedback_duration(&self, correct: bool) -> Duration {
        if correct {
            self.success_feedback
        } else {
            self.error_feedback
        }
    }
}
