//! Check-in sessions.
//!
//! A [`Session`] is an explicit value. The controller never mutates one in
//! place; `submit` and `complete_transition` take the current session by
//! reference and hand back its successor, so a rejected input leaves the
//! caller holding the untouched original.

mod controller;
mod validation;

pub use controller::SessionController;
pub use validation::{parse_pack_cost, validate, Input, ValidationError};

use crate::calculator::DerivedFigures;
use crate::core::{Prompt, Requirement, ScreenId, ScreenTrail};
use crate::graph::FlowVariant;
use crate::ledger::{Answer, AnswerLedger};
use crate::preference::PackCost;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Unique identifier of a live session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A transition decided by `submit` but not yet applied.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PendingTransition {
    /// Identifies this transition; stale tickets are refused
    pub ticket: u64,
    /// Screen to enter
    pub to: ScreenId,
    /// How long to wait before entering it
    pub delay: Duration,
}

/// State of one pass through a flow.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) flow: FlowVariant,
    pub(crate) current: ScreenId,
    pub(crate) answers: AnswerLedger,
    pub(crate) preference: Option<PackCost>,
    pub(crate) pending: Option<PendingTransition>,
    pub(crate) figures: Option<DerivedFigures>,
    pub(crate) trail: ScreenTrail,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) next_ticket: u64,
}

impl Session {
    pub(crate) fn new(flow: FlowVariant, start: ScreenId, preference: Option<PackCost>) -> Self {
        Self {
            id: SessionId::new(),
            flow,
            current: start,
            answers: AnswerLedger::new(),
            preference,
            pending: None,
            figures: None,
            trail: ScreenTrail::new(),
            started_at: Utc::now(),
            next_ticket: 1,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn flow(&self) -> FlowVariant {
        self.flow
    }

    pub fn current_screen(&self) -> &ScreenId {
        &self.current
    }

    pub fn answers(&self) -> &AnswerLedger {
        &self.answers
    }

    /// Answer recorded on `screen`, if any.
    pub fn answer(&self, screen: &str) -> Option<&Answer> {
        self.answers.get(&ScreenId::new(screen))
    }

    /// Pack cost as last read from the store.
    pub fn preference(&self) -> Option<PackCost> {
        self.preference
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Input is locked while a transition is pending.
    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    /// Figures computed when the current screen was entered.
    pub fn figures(&self) -> Option<&DerivedFigures> {
        self.figures.as_ref()
    }

    pub fn trail(&self) -> &ScreenTrail {
        &self.trail
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// What the presentation layer needs to draw the current screen.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScreenView {
    pub flow: FlowVariant,
    pub screen: ScreenId,
    pub prompt: Prompt,
    pub requirement: Requirement,
    /// Answer already given on this screen, for highlighting a selection
    pub selected: Option<Answer>,
    pub figures: Option<DerivedFigures>,
    /// Disable the continue affordance and option buttons
    pub locked: bool,
    pub terminal: bool,
}
