use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a scripted scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Benign,
    Unsafe,
}

impl ScenarioKind {
    /// The terminal action that correctly resolves a scenario of this kind.
    #[must_use]
    pub const fn expected_action(self) -> CorrectAction {
        match self {
            Self::Benign => CorrectAction::Accept,
            Self::Unsafe => CorrectAction::Reject,
        }
    }
}

/// Pre-labeled correct response for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectAction {
    Accept,
    Reject,
}

/// A single scripted message event in the catalog.
///
/// The data format carries both `kind` and `correct_action` even though the
/// latter is fully determined by the former. The coupling is validated at load
/// time rather than collapsed, so divergent fixtures surface as errors instead
/// of being silently rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub kind: ScenarioKind,
    pub sender: String,
    #[serde(default)]
    pub avatar: String,
    pub message: String,
    /// Text shown in place of the message body while an unsafe scenario is
    /// still masked.
    #[serde(default)]
    pub masked_placeholder: Option<String>,
    pub correct_action: CorrectAction,
}

/// Errors raised while loading or validating a scenario catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("scenario {index} ({sender}): correct_action {found:?} contradicts kind {kind:?}")]
    CorrectActionMismatch {
        index: usize,
        sender: String,
        kind: ScenarioKind,
        found: CorrectAction,
    },
    #[error("failed to parse scenario catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered list of scenario definitions driving a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioCatalog {
    pub scenarios: Vec<ScenarioDefinition>,
}

impl ScenarioCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Parse and validate a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or if any entry's
    /// `correct_action` contradicts its `kind`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Build a catalog from pre-parsed definitions without validation.
    #[must_use]
    pub fn from_scenarios(scenarios: Vec<ScenarioDefinition>) -> Self {
        Self { scenarios }
    }

    /// The bundled default catalog shipped with the engine.
    ///
    /// Falls back to an empty catalog if the bundled asset is invalid; the
    /// asset itself is covered by the test suite.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json(include_str!("../assets/data/scenarios.json"))
            .unwrap_or_else(|_| Self::empty())
    }

    /// Check the kind/correct-action coupling for every entry.
    ///
    /// # Errors
    ///
    /// Returns the first entry whose labeled `correct_action` disagrees with
    /// the action derived from its `kind`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (index, scenario) in self.scenarios.iter().enumerate() {
            if scenario.correct_action != scenario.kind.expected_action() {
                return Err(CatalogError::CorrectActionMismatch {
                    index,
                    sender: scenario.sender.clone(),
                    kind: scenario.kind,
                    found: scenario.correct_action,
                });
            }
        }
        Ok(())
    }

    /// Number of scenarios in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the catalog has no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Look up a scenario by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScenarioDefinition> {
        self.scenarios.get(index)
    }
}
