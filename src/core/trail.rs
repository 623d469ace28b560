//! The trail of screens a session has passed through.
//!
//! The trail lives only as long as its session. It exists for diagnostics
//! and for checking that every screen entered was reachable; it is not a
//! record of past check-ins.

use super::screen::ScreenId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one applied transition.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScreenStep {
    /// The screen being left
    pub from: ScreenId,
    /// The screen entered
    pub to: ScreenId,
    /// When the transition was applied
    pub entered_at: DateTime<Utc>,
}

/// Ordered, immutable list of transitions.
///
/// `record` returns a new trail and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use checkin_flow::core::{ScreenId, ScreenStep, ScreenTrail};
/// use chrono::Utc;
///
/// let trail = ScreenTrail::new().record(ScreenStep {
///     from: ScreenId::new("start"),
///     to: ScreenId::new("how-many"),
///     entered_at: Utc::now(),
/// });
///
/// let path = trail.path();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[1], &ScreenId::new("how-many"));
/// ```
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ScreenTrail {
    steps: Vec<ScreenStep>,
}

impl ScreenTrail {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record a step, returning a new trail.
    pub fn record(&self, step: ScreenStep) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    /// Screens in the order they were entered, starting with the first
    /// step's origin.
    pub fn path(&self) -> Vec<&ScreenId> {
        let mut path = Vec::new();
        if let Some(first) = self.steps.first() {
            path.push(&first.from);
        }
        for step in &self.steps {
            path.push(&step.to);
        }
        path
    }

    /// Whether the trail ever entered `screen`.
    pub fn visited(&self, screen: &ScreenId) -> bool {
        self.steps
            .iter()
            .any(|s| &s.to == screen || &s.from == screen)
    }

    /// Time between the first and last applied transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.steps.first()?, self.steps.last()?);
        last.entered_at
            .signed_duration_since(first.entered_at)
            .to_std()
            .ok()
    }

    pub fn steps(&self) -> &[ScreenStep] {
        &self.steps
    }
}
