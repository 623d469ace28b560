//! Delayed, cancellable screen transitions.
//!
//! The scheduler keeps at most one pending task per key. Scheduling again
//! for the same key aborts the earlier task before it fires, and dropping
//! the scheduler aborts everything it still holds. Tasks run on the ambient
//! tokio runtime, so `schedule` must be called from within one.

use crate::ledger::Answer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Pause after a choice tap, so the selection renders before the screen
/// changes.
pub const CHOICE_CONFIRMATION_DELAY: Duration = Duration::from_millis(350);

/// How long to wait before applying a transition, by kind of answer.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct DelayPolicy {
    /// After single-choice taps
    pub choice_confirmation: Duration,
    /// After text confirmation, cost entry and button presses
    pub immediate: Duration,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            choice_confirmation: CHOICE_CONFIRMATION_DELAY,
            immediate: Duration::ZERO,
        }
    }
}

impl DelayPolicy {
    /// Policy with no delays at all.
    pub fn instant() -> Self {
        Self {
            choice_confirmation: Duration::ZERO,
            immediate: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, answer: &Answer) -> Duration {
        match answer {
            Answer::Choice(_) => self.choice_confirmation,
            Answer::Text(_) | Answer::PackCost(_) | Answer::Acknowledged => self.immediate,
        }
    }
}

/// One-pending-task-per-key timer.
///
/// # Example
///
/// ```rust
/// use checkin_flow::scheduler::TransitionScheduler;
/// use std::time::Duration;
/// use tokio::sync::oneshot;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut scheduler = TransitionScheduler::new();
/// let (tx, rx) = oneshot::channel();
///
/// scheduler.schedule("session-1", Duration::from_millis(5), move || {
///     let _ = tx.send("fired");
/// });
///
/// assert_eq!(rx.await.unwrap(), "fired");
/// # }
/// ```
#[derive(Debug)]
pub struct TransitionScheduler<K: Eq + Hash> {
    pending: HashMap<K, JoinHandle<()>>,
}

impl<K: Eq + Hash> Default for TransitionScheduler<K> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> TransitionScheduler<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `callback` once after `delay`, replacing any task still pending
    /// for `key`.
    pub fn schedule<F>(&mut self, key: K, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel(&key);

        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            callback();
        });
        self.pending.insert(key, handle);
    }

    /// Cancel the task pending for `key`. Returns whether a task that had
    /// not yet fired was cancelled.
    pub fn cancel(&mut self, key: &K) -> bool {
        match self.pending.remove(key) {
            Some(handle) => {
                let live = !handle.is_finished();
                handle.abort();
                live
            }
            None => false,
        }
    }

    /// Whether a not-yet-fired task is pending for `key`.
    pub fn is_pending(&self, key: &K) -> bool {
        self.pending.get(key).is_some_and(|h| !h.is_finished())
    }

    /// Forget handles of tasks that have already fired.
    pub fn prune(&mut self) {
        self.pending.retain(|_, handle| !handle.is_finished());
    }

    /// Cancel every pending task.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    /// Handles held, fired or not.
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.pending.len()
    }

    pub fn len(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Eq + Hash> Drop for TransitionScheduler<K> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
