//! Runtime notifications and the most-recent-first store.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

use crate::constants::DEFAULT_MASK_PLACEHOLDER;
use crate::data::{ScenarioDefinition, ScenarioKind};

/// Unique identifier for a live notification within a session.
pub type NotificationId = u64;

/// A scenario instance currently awaiting a user decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    /// Index of the originating scenario in the catalog.
    pub scenario_index: usize,
    pub kind: ScenarioKind,
    pub sender: String,
    pub avatar: String,
    pub message: String,
    pub masked_placeholder: String,
    /// Set at creation from the scenario kind; never changes afterwards.
    pub is_masked: bool,
    /// Whether the user has temporarily unmasked the content.
    pub revealed: bool,
    /// Arrival time on the session's virtual clock (display only).
    pub arrived_at: Duration,
}

impl Notification {
    /// Build a notification from a catalog entry.
    #[must_use]
    pub fn from_scenario(
        id: NotificationId,
        scenario_index: usize,
        scenario: &ScenarioDefinition,
        arrived_at: Duration,
    ) -> Self {
        Self {
            id,
            scenario_index,
            kind: scenario.kind,
            sender: scenario.sender.clone(),
            avatar: scenario.avatar.clone(),
            message: scenario.message.clone(),
            masked_placeholder: scenario
                .masked_placeholder
                .clone()
                .unwrap_or_else(|| DEFAULT_MASK_PLACEHOLDER.to_string()),
            is_masked: scenario.kind == ScenarioKind::Unsafe,
            revealed: false,
            arrived_at,
        }
    }

    /// The message body the display layer should render right now.
    #[must_use]
    pub fn display_body(&self) -> &str {
        if self.is_masked && !self.revealed {
            &self.masked_placeholder
        } else {
            &self.message
        }
    }
}

/// Mutable collection of currently-visible notifications.
///
/// The scripted sequential-delivery policy never holds more than one pending
/// notification, but the store stays a collection so overlapping delivery
/// remains representable. Newest entries sit at the front.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationStore {
    entries: SmallVec<[Notification; 2]>,
}

impl NotificationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a notification at the front (most recent first).
    pub fn insert(&mut self, notification: Notification) {
        self.entries.insert(0, notification);
    }

    /// Current notifications, most recent first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.entries
    }

    /// Look up a notification by id.
    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Look up a mutable notification by id.
    pub fn get_mut(&mut self, id: NotificationId) -> Option<&mut Notification> {
        self.entries.iter_mut().find(|n| n.id == id)
    }

    /// Remove and return a notification by id.
    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self.entries.iter().position(|n| n.id == id)?;
        Some(self.entries.remove(index))
    }

    /// Drop all notifications.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of visible notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
