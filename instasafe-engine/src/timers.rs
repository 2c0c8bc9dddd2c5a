//! Cancellable one-shot tasks over a virtual clock.
//!
//! The engine never sleeps: every delay is a task queued here, and the host
//! advances the clock explicitly. Tasks carry the epoch they were scheduled
//! under so effects from an abandoned run are invalidated by bumping the
//! epoch rather than by racing real timers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Epoch counter distinguishing runs; advancing it cancels in-flight tasks.
pub type Epoch = u64;

/// A deferred engine effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredEffect {
    /// Make the notification for a catalog index visible.
    Deliver(usize),
    /// Clear the live feedback message and advance progression.
    ClearFeedback,
    /// Mark the session finished.
    Finish,
}

/// A single scheduled one-shot task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub epoch: Epoch,
    pub due: Duration,
    pub effect: DeferredEffect,
    seq: u64,
}

/// One-shot task queue keyed to a monotonically advancing virtual clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQueue {
    now: Duration,
    next_seq: u64,
    tasks: Vec<ScheduledTask>,
}

impl TaskQueue {
    /// Create an empty queue with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedule an effect to fire after `delay` under the given epoch.
    pub fn schedule(&mut self, epoch: Epoch, delay: Duration, effect: DeferredEffect) {
        let task = ScheduledTask {
            epoch,
            due: self.now + delay,
            effect,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.tasks.push(task);
    }

    /// Advance the clock and drain every task that became due, in due order
    /// (insertion order breaks ties).
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ScheduledTask> {
        self.now += elapsed;
        self.drain_due()
    }

    /// Drain tasks due at the current clock without advancing it.
    pub fn drain_due(&mut self) -> Vec<ScheduledTask> {
        let now = self.now;
        let mut due: Vec<ScheduledTask> = Vec::new();
        self.tasks.retain(|task| {
            if task.due <= now {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|task| (task.due, task.seq));
        due
    }

    /// Delay until the next pending task fires, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .map(|task| task.due.saturating_sub(self.now))
            .min()
    }

    /// Drop every task not scheduled under `epoch`.
    pub fn retain_epoch(&mut self, epoch: Epoch) {
        self.tasks.retain(|task| task.epoch == epoch);
    }

    /// Whether any task is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order_with_insertion_tiebreak() {
        let mut queue = TaskQueue::new();
        queue.schedule(1, Duration::from_millis(20), DeferredEffect::Finish);
        queue.schedule(1, Duration::from_millis(10), DeferredEffect::Deliver(0));
        queue.schedule(1, Duration::from_millis(10), DeferredEffect::ClearFeedback);

        let fired = queue.advance(Duration::from_millis(20));
        let effects: Vec<_> = fired.into_iter().map(|t| t.effect).collect();
        assert_eq!(
            effects,
            vec![
                DeferredEffect::Deliver(0),
                DeferredEffect::ClearFeedback,
                DeferredEffect::Finish
            ]
        );
        assert!(queue.is_idle());
    }

    #[test]
    fn not_due_tasks_stay_pending() {
        let mut queue = TaskQueue::new();
        queue.schedule(1, Duration::from_millis(100), DeferredEffect::Deliver(0));
        assert!(queue.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(queue.next_due(), Some(Duration::from_millis(50)));
        assert_eq!(queue.advance(Duration::from_millis(50)).len(), 1);
    }

    #[test]
    fn zero_delay_tasks_fire_without_time_passing() {
        let mut queue = TaskQueue::new();
        queue.schedule(1, Duration::ZERO, DeferredEffect::Deliver(0));
        assert_eq!(queue.drain_due().len(), 1);
    }

    #[test]
    fn retain_epoch_drops_stale_tasks() {
        let mut queue = TaskQueue::new();
        queue.schedule(1, Duration::from_millis(10), DeferredEffect::Deliver(0));
        queue.schedule(2, Duration::from_millis(10), DeferredEffect::Deliver(1));
        queue.retain_epoch(2);
        let fired = queue.advance(Duration::from_millis(10));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].effect, DeferredEffect::Deliver(1));
    }

    #[test]
    fn clock_is_monotonic_across_advances() {
        let mut queue = TaskQueue::new();
        queue.advance(Duration::from_millis(5));
        queue.advance(Duration::from_millis(7));
        assert_eq!(queue.now(), Duration::from_millis(12));
    }
}
