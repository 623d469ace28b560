//! Flow graph errors.
//!
//! Every variant here is a defect in a flow definition, not something a user
//! can cause. The builder reports them all at once; at runtime the only one
//! that can surface is [`GraphIntegrityError::NoMatchingEdge`].

use crate::core::ScreenId;
use thiserror::Error;

/// A structural problem in a flow graph.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphIntegrityError {
    #[error("Flow has no screens")]
    NoScreens,

    #[error("Start screen '{start}' is not defined")]
    MissingStart { start: ScreenId },

    #[error("Screen '{screen}' is defined more than once")]
    DuplicateScreen { screen: ScreenId },

    #[error("Edge '{from}' -> '{to}' refers to undefined screen '{missing}'")]
    UnknownScreen {
        from: ScreenId,
        to: ScreenId,
        missing: ScreenId,
    },

    #[error("Terminal screen '{screen}' has outgoing edges")]
    TerminalHasEdges { screen: ScreenId },

    #[error("Edge from '{screen}' selects '{option}', which the screen does not offer")]
    UnknownOption { screen: ScreenId, option: String },

    #[error("Screen '{screen}' shows spend for '{count_screen}', which is not a choice screen in this flow")]
    BadCountScreen {
        screen: ScreenId,
        count_screen: ScreenId,
    },

    #[error("Screen '{screen}' has no edge for answer {answer} (preference set: {preference_set})")]
    Unroutable {
        screen: ScreenId,
        answer: String,
        preference_set: bool,
    },

    #[error("Screen '{screen}' has {matches} edges for answer {answer} (preference set: {preference_set})")]
    Ambiguous {
        screen: ScreenId,
        answer: String,
        preference_set: bool,
        matches: usize,
    },

    #[error("Screen '{screen}' cannot be reached from the start screen")]
    Unreachable { screen: ScreenId },

    #[error("No edge out of '{screen}' in flow '{flow}' matches the session state")]
    NoMatchingEdge { flow: String, screen: ScreenId },
}

/// Errors that can occur when building a flow definition.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Flow '{flow}' failed validation with {} violation(s)", .violations.len())]
    Invalid {
        flow: String,
        violations: Vec<GraphIntegrityError>,
    },

    #[error("Flow document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BuildError {
    /// Integrity violations, if this is a validation failure.
    pub fn violations(&self) -> &[GraphIntegrityError] {
        match self {
            Self::Invalid { violations, .. } => violations,
            Self::Parse(_) => &[],
        }
    }
}
