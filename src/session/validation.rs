//! Checking user input against a screen's requirement.

use crate::core::{Requirement, ScreenNode};
use crate::ledger::Answer;
use crate::preference::PackCost;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw event from the presentation layer.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Input {
    /// An option was tapped
    Choose(String),
    /// Text was confirmed
    Enter(String),
    /// A button was pressed
    Continue,
}

impl Input {
    pub fn choose(option: impl Into<String>) -> Self {
        Self::Choose(option.into())
    }

    pub fn enter(text: impl Into<String>) -> Self {
        Self::Enter(text.into())
    }
}

/// Input a screen cannot accept. The session is left unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Input is empty")]
    EmptyInput,

    #[error("'{input}' is not a positive number")]
    InvalidNumber { input: String },

    #[error("'{option}' is not one of the listed options")]
    NotAListedOption { option: String },

    #[error("Screen expects {expected}")]
    UnexpectedInput { expected: &'static str },
}

/// Validate `input` for `screen`, producing the answer to record.
///
/// # Example
///
/// ```rust
/// use checkin_flow::core::{Prompt, Requirement, ScreenNode};
/// use checkin_flow::session::{validate, Input, ValidationError};
///
/// let screen = ScreenNode::new("pack-cost", Prompt::new("Cost?"), Requirement::PackCost);
///
/// assert!(validate(&screen, &Input::enter("200")).is_ok());
/// assert_eq!(validate(&screen, &Input::enter("  ")), Err(ValidationError::EmptyInput));
/// assert!(matches!(
///     validate(&screen, &Input::enter("0")),
///     Err(ValidationError::InvalidNumber { .. })
/// ));
/// ```
pub fn validate(screen: &ScreenNode, input: &Input) -> Result<Answer, ValidationError> {
    match (&screen.requirement, input) {
        (Requirement::Choice { options }, Input::Choose(option)) => {
            if options.contains(option) {
                Ok(Answer::Choice(option.clone()))
            } else {
                Err(ValidationError::NotAListedOption {
                    option: option.clone(),
                })
            }
        }
        (Requirement::Choice { .. }, _) => Err(ValidationError::UnexpectedInput {
            expected: "one of the listed options",
        }),

        (Requirement::Text { required, .. }, Input::Enter(text)) => {
            if *required && text.trim().is_empty() {
                Err(ValidationError::EmptyInput)
            } else {
                Ok(Answer::Text(text.clone()))
            }
        }
        (Requirement::Text { .. }, _) => Err(ValidationError::UnexpectedInput {
            expected: "text",
        }),

        (Requirement::PackCost, Input::Enter(text)) => parse_pack_cost(text).map(Answer::PackCost),
        (Requirement::PackCost, _) => Err(ValidationError::UnexpectedInput {
            expected: "a pack cost",
        }),

        (Requirement::Acknowledge { .. }, Input::Continue) => Ok(Answer::Acknowledged),
        (Requirement::Acknowledge { .. }, _) => Err(ValidationError::UnexpectedInput {
            expected: "a button press",
        }),

        (Requirement::Terminal, _) => Err(ValidationError::UnexpectedInput {
            expected: "no input",
        }),
    }
}

/// Parse typed text as a strictly positive decimal.
pub fn parse_pack_cost(text: &str) -> Result<PackCost, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    let invalid = || ValidationError::InvalidNumber {
        input: trimmed.to_string(),
    };
    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    PackCost::new(value).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Prompt;

    fn choice() -> ScreenNode {
        ScreenNode::new(
            "start",
            Prompt::new("Did you?"),
            Requirement::Choice {
                options: vec!["Yes".into(), "No".into()],
            },
        )
    }

    fn text(required: bool) -> ScreenNode {
        ScreenNode::new(
            "what",
            Prompt::new("What?"),
            Requirement::Text {
                required,
                placeholder: None,
            },
        )
    }

    #[test]
    fn choice_accepts_listed_option() {
        assert_eq!(
            validate(&choice(), &Input::choose("No")),
            Ok(Answer::Choice("No".into()))
        );
    }

    #[test]
    fn choice_rejects_unlisted_option() {
        assert_eq!(
            validate(&choice(), &Input::choose("Maybe")),
            Err(ValidationError::NotAListedOption {
                option: "Maybe".into()
            })
        );
    }

    #[test]
    fn choice_rejects_text() {
        assert!(matches!(
            validate(&choice(), &Input::enter("Yes")),
            Err(ValidationError::UnexpectedInput { .. })
        ));
    }

    #[test]
    fn required_text_rejects_whitespace() {
        assert_eq!(
            validate(&text(true), &Input::enter("   \t")),
            Err(ValidationError::EmptyInput)
        );
    }

    #[test]
    fn required_text_keeps_raw_input() {
        assert_eq!(
            validate(&text(true), &Input::enter("  coffee ")),
            Ok(Answer::Text("  coffee ".into()))
        );
    }

    #[test]
    fn optional_text_accepts_blank() {
        assert_eq!(
            validate(&text(false), &Input::enter("")),
            Ok(Answer::Text(String::new()))
        );
    }

    #[test]
    fn pack_cost_parses_decimals() {
        assert_eq!(parse_pack_cost(" 12.50 ").map(PackCost::value), Ok(12.5));
    }

    #[test]
    fn pack_cost_rejects_bad_numbers() {
        for bad in ["0", "-3", "abc", "NaN", "inf", "12,50"] {
            assert!(
                matches!(parse_pack_cost(bad), Err(ValidationError::InvalidNumber { .. })),
                "{bad}"
            );
        }
        assert_eq!(parse_pack_cost(""), Err(ValidationError::EmptyInput));
    }

    #[test]
    fn terminal_accepts_nothing() {
        let done = ScreenNode::new("done", Prompt::new("Saved"), Requirement::Terminal);
        assert!(validate(&done, &Input::Continue).is_err());
    }

    #[test]
    fn acknowledge_requires_continue() {
        let screen = ScreenNode::new(
            "save",
            Prompt::new("Save?"),
            Requirement::Acknowledge {
                label: "Save".into(),
            },
        );

        assert_eq!(validate(&screen, &Input::Continue), Ok(Answer::Acknowledged));
        assert!(validate(&screen, &Input::choose("Save")).is_err());
    }
}
