//! Transient decision feedback and its kind-specific copy.

use serde::{Deserialize, Serialize};

use crate::data::ScenarioKind;

const SUCCESS_REJECTED_UNSAFE: &str = "Well done! You rejected a harmful message from someone \
     you don't know. That is the safest choice.";
const SUCCESS_ACCEPTED_BENIGN: &str = "Great! Accepting safe messages from people you know is \
     good for your friendships.";
const ERROR_ACCEPTED_UNSAFE: &str = "Careful! That message was harmful. Always reject messages \
     that ask for personal information or make you uncomfortable.";
const ERROR_REJECTED_BENIGN: &str = "That was a safe message. Messages from your classmates or \
     your teacher are fine to accept. No need to worry!";

/// Whether feedback reports a correct or incorrect decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Error,
}

/// The at-most-one live feedback message shown after a terminal decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub text: String,
}

impl FeedbackMessage {
    /// Select the copy for a resolved decision.
    #[must_use]
    pub fn for_decision(scenario_kind: ScenarioKind, correct: bool) -> Self {
        let (kind, text) = match (correct, scenario_kind) {
            (true, ScenarioKind::Unsafe) => (FeedbackKind::Success, SUCCESS_REJECTED_UNSAFE),
            (true, ScenarioKind::Benign) => (FeedbackKind::Success, SUCCESS_ACCEPTED_BENIGN),
            (false, ScenarioKind::Unsafe) => (FeedbackKind::Error, ERROR_ACCEPTED_UNSAFE),
            (false, ScenarioKind::Benign) => (FeedbackKind::Error, ERROR_REJECTED_BENIGN),
        };
        Self {
            kind,
            text: text.to_string(),
        }
    }
}
