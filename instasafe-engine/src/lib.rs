//! Instasafe Engine
//!
//! Platform-agnostic core for the Instasafe online-safety simulator: scripted
//! scenarios become timed notifications, user decisions are scored against
//! pre-labeled ground truth, and feedback pacing drives progression. This
//! crate provides all lifecycle logic without UI or platform-specific
//! dependencies; hosts own the clock and call [`SafetySession::advance`].

pub mod constants;
pub mod data;
pub mod feedback;
pub mod session;
pub mod store;
pub mod timers;
pub mod timing;

// Re-export commonly used types
pub use data::{CatalogError, CorrectAction, ScenarioCatalog, ScenarioDefinition, ScenarioKind};
pub use feedback::{FeedbackKind, FeedbackMessage};
pub use session::{
    Action, ActionOutcome, ActionParseError, EngineEvent, SafetySession, SessionPhase,
    SessionState,
};
pub use store::{Notification, NotificationId, NotificationStore};
pub use timers::{DeferredEffect, Epoch, ScheduledTask, TaskQueue};
pub use timing::TimingConfig;
