//! Crate-level error type.

use crate::config::ConfigError;
use crate::core::ScreenId;
use crate::graph::{BuildError, FlowVariant, GraphIntegrityError};
use crate::preference::PreferenceError;
use crate::session::{SessionId, ValidationError};
use thiserror::Error;

/// Errors returned by the session controller and runtime.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Input did not fit the current screen; nothing changed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The flow graph has no route for the session's state
    #[error(transparent)]
    Graph(#[from] GraphIntegrityError),

    #[error(transparent)]
    Preference(#[from] PreferenceError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No flow registered for variant '{flow}'")]
    UnknownFlow { flow: FlowVariant },

    #[error("Screen '{screen}' is not part of the session's flow")]
    UnknownScreen { screen: ScreenId },

    #[error("No live session with id {id}")]
    UnknownSession { id: SessionId },

    #[error("Screen '{screen}' is already transitioning; input ignored")]
    TransitionPending { screen: ScreenId },

    #[error("Session ended on terminal screen '{screen}'")]
    SessionComplete { screen: ScreenId },

    #[error("Session is on '{screen}', not on a terminal screen")]
    NotFinished { screen: ScreenId },

    #[error("Transition {ticket} is not pending")]
    StaleTransition { ticket: u64 },
}

impl FlowError {
    /// Whether the error is a user-input problem the screen can recover
    /// from by asking again.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
