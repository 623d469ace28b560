//! Screen nodes: the states of a check-in flow.
//!
//! A screen is plain data. It names itself, carries the prompt the
//! presentation layer renders, and declares what kind of input it accepts.
//! Nothing on a screen decides where the flow goes next; that is the job of
//! the edges in a [`FlowDefinition`](crate::graph::FlowDefinition).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a screen within a flow (e.g. `"how-many"`).
///
/// # Example
///
/// ```rust
/// use checkin_flow::core::ScreenId;
///
/// let id = ScreenId::new("pack-cost");
/// assert_eq!(id.as_str(), "pack-cost");
/// assert_eq!(id, "pack-cost");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ScreenId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl PartialEq<&str> for ScreenId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Copy shown on a screen.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Prompt {
    /// Main question or statement
    pub heading: String,
    /// Secondary line under the heading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Prompt {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// What a screen asks of the user before it can be left.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Requirement {
    /// Tap exactly one of the listed options.
    Choice { options: Vec<String> },

    /// Type a line of text. Blank text is rejected only when `required`.
    Text {
        required: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },

    /// Enter the cost of a pack; written to the preference store on success.
    PackCost,

    /// Press a single button to continue.
    Acknowledge { label: String },

    /// End of the flow. Accepts no input and has no outgoing edges.
    Terminal,
}

/// Derived figures a screen shows when it is entered.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Display {
    /// Today's spend and its monthly projection, from the count bucket
    /// answered on `count_screen`.
    Spend { count_screen: ScreenId },

    /// Savings from not smoking today, and the monthly equivalent.
    Savings,
}

/// A single screen of a flow.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScreenNode {
    pub id: ScreenId,
    pub prompt: Prompt,
    pub requirement: Requirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
}

impl ScreenNode {
    pub fn new(id: impl Into<ScreenId>, prompt: Prompt, requirement: Requirement) -> Self {
        Self {
            id: id.into(),
            prompt,
            requirement,
            display: None,
        }
    }

    pub fn showing(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    /// Terminal screens end the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self.requirement, Requirement::Terminal)
    }

    /// Options offered by a single-choice screen; empty otherwise.
    pub fn options(&self) -> &[String] {
        match &self.requirement {
            Requirement::Choice { options } => options,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(id: &str, options: &[&str]) -> ScreenNode {
        ScreenNode::new(
            id,
            Prompt::new("Pick one"),
            Requirement::Choice {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
        )
    }

    #[test]
    fn terminal_screens_are_identified() {
        let done = ScreenNode::new("done", Prompt::new("Saved"), Requirement::Terminal);
        let start = choice("start", &["Yes", "No"]);

        assert!(done.is_terminal());
        assert!(!start.is_terminal());
    }

    #[test]
    fn options_are_empty_for_non_choice_screens() {
        let text = ScreenNode::new(
            "what",
            Prompt::new("What was it?"),
            Requirement::Text {
                required: true,
                placeholder: None,
            },
        );

        assert!(text.options().is_empty());
        assert_eq!(choice("start", &["Yes", "No"]).options(), ["Yes", "No"]);
    }

    #[test]
    fn requirement_uses_tagged_representation() {
        let node = choice("start", &["Yes", "No"]);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["requirement"]["kind"], "choice");
        assert_eq!(json["id"], "start");
        assert!(json.get("display").is_none());
    }

    #[test]
    fn display_survives_serialization() {
        let node = ScreenNode::new(
            "financial",
            Prompt::new("Today"),
            Requirement::Acknowledge {
                label: "Continue".to_string(),
            },
        )
        .showing(Display::Spend {
            count_screen: ScreenId::new("how-many"),
        });

        let json = serde_json::to_string(&node).unwrap();
        let back: ScreenNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
