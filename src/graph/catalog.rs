//! The built-in check-in flows.
//!
//! All three variants share one engine; they differ only in the screens
//! and edges declared here.

use crate::calculator::COUNT_BUCKETS;
use crate::core::{Display, Prompt, Requirement, ScreenId, ScreenNode};
use crate::graph::builder::FlowBuilder;
use crate::graph::definition::FlowDefinition;
use crate::graph::error::BuildError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Identifier of a flow variant.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowVariant {
    QuickCheckIn,
    SmokeCheckBasic,
    SmokeCheckFinancial,
}

impl FlowVariant {
    pub const ALL: [FlowVariant; 3] = [
        Self::QuickCheckIn,
        Self::SmokeCheckBasic,
        Self::SmokeCheckFinancial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickCheckIn => "quick-check-in",
            Self::SmokeCheckBasic => "smoke-check-basic",
            Self::SmokeCheckFinancial => "smoke-check-financial",
        }
    }
}

impl fmt::Display for FlowVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown flow name.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown flow variant '{0}'")]
pub struct UnknownVariant(pub String);

impl FromStr for FlowVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Immutable set of flow definitions, one per variant.
#[derive(Clone, Debug, Default)]
pub struct FlowCatalog {
    flows: HashMap<FlowVariant, Arc<FlowDefinition>>,
}

impl FlowCatalog {
    /// Catalog holding the three built-in flows.
    pub fn standard() -> Result<Self, BuildError> {
        Ok(Self::default()
            .with(FlowVariant::QuickCheckIn, quick_check_in()?)
            .with(FlowVariant::SmokeCheckBasic, smoke_check_basic()?)
            .with(FlowVariant::SmokeCheckFinancial, smoke_check_financial()?))
    }

    /// Register (or replace) the definition for a variant.
    pub fn with(mut self, variant: FlowVariant, definition: FlowDefinition) -> Self {
        self.flows.insert(variant, Arc::new(definition));
        self
    }

    pub fn definition(&self, variant: FlowVariant) -> Option<Arc<FlowDefinition>> {
        self.flows.get(&variant).cloned()
    }
}

fn choice(id: &str, prompt: Prompt, options: &[&str]) -> ScreenNode {
    ScreenNode::new(
        id,
        prompt,
        Requirement::Choice {
            options: options.iter().map(|o| o.to_string()).collect(),
        },
    )
}

fn button(id: &str, prompt: Prompt, label: &str) -> ScreenNode {
    ScreenNode::new(
        id,
        prompt,
        Requirement::Acknowledge {
            label: label.to_string(),
        },
    )
}

fn terminal(id: &str) -> ScreenNode {
    ScreenNode::new(id, Prompt::new("Saved"), Requirement::Terminal)
}

fn pack_cost(id: &str) -> ScreenNode {
    ScreenNode::new(
        id,
        Prompt::new("How much does a pack cost you?")
            .with_detail("We only ask once. It stays on this device."),
        Requirement::PackCost,
    )
}

const FEEL_OPTIONS: [&str; 3] = ["Okay", "Neutral", "Not great"];
const URGE_OPTIONS: [&str; 4] = ["Morning", "Afternoon", "Evening", "Late night"];

/// Did you consume today? A free-text "what" and a feeling on the yes path.
pub fn quick_check_in() -> Result<FlowDefinition, BuildError> {
    FlowBuilder::new(FlowVariant::QuickCheckIn.as_str(), "start")
        .screen(choice(
            "start",
            Prompt::new("Did you consume today?").with_detail("Just a simple awareness moment."),
            &["Yes", "No"],
        ))
        .screen(button(
            "no-end",
            Prompt::new("Stayed aligned today.").with_detail("That matters."),
            "Finish",
        ))
        .screen(ScreenNode::new(
            "what",
            Prompt::new("What did you consume?"),
            Requirement::Text {
                required: true,
                placeholder: Some("Type here...".to_string()),
            },
        ))
        .screen(choice(
            "feel",
            Prompt::new("How do you feel about it right now?"),
            &FEEL_OPTIONS,
        ))
        .screen(button("save", Prompt::new("Ready to save?"), "Save Check-In"))
        .screen(terminal("done"))
        .branch("start", "Yes", "what")
        .branch("start", "No", "no-end")
        .then("no-end", "done")
        .then("what", "feel")
        .then("feel", "save")
        .then("save", "done")
        .build()
}

/// Screens shared by both smoke-check variants. Edges are added by the
/// caller so each variant can splice in its own branches.
fn smoke_check_screens(name: &str) -> FlowBuilder {
    FlowBuilder::new(name, "start")
        .screen(choice(
            "start",
            Prompt::new("Did you smoke a cigarette today?")
                .with_detail("Just a moment of honesty."),
            &["Yes", "No"],
        ))
        .screen(choice(
            "how-many",
            Prompt::new("How many cigarettes did you smoke?"),
            &COUNT_BUCKETS,
        ))
        .screen(choice(
            "urge-time",
            Prompt::new("When did the urge feel strongest?"),
            &URGE_OPTIONS,
        ))
        .screen(choice(
            "feel",
            Prompt::new("How do you feel about it now?"),
            &FEEL_OPTIONS,
        ))
        .screen(ScreenNode::new(
            "reflection",
            Prompt::new("What would you like to do differently next time?"),
            Requirement::Text {
                required: false,
                placeholder: Some("e.g. Wait 10 min before lighting up".to_string()),
            },
        ))
        .screen(button(
            "yes-done",
            Prompt::new("Awareness is how change begins.")
                .with_detail("Tomorrow is another opportunity, and you're capable of it."),
            "Done",
        ))
        .screen(button(
            "no-reinforce",
            Prompt::new("You stayed smoke-free today.")
                .with_detail("That choice matters more than you think."),
            "Continue",
        ))
        .screen(button(
            "no-close",
            Prompt::new("You're strengthening your control.")
                .with_detail("Keep showing up for yourself. It's working."),
            "Finish Check-In",
        ))
        .screen(terminal("final-done"))
        .branch("start", "Yes", "how-many")
        .branch("start", "No", "no-reinforce")
        .then("urge-time", "feel")
        .then("feel", "reflection")
        .then("reflection", "yes-done")
        .then("yes-done", "final-done")
        .then("no-close", "final-done")
}

/// Smoke check without money figures.
pub fn smoke_check_basic() -> Result<FlowDefinition, BuildError> {
    smoke_check_screens(FlowVariant::SmokeCheckBasic.as_str())
        .then("how-many", "urge-time")
        .then("no-reinforce", "no-close")
        .build()
}

/// Smoke check with spend and savings figures. The pack cost is asked for
/// once, the first time either path needs it.
pub fn smoke_check_financial() -> Result<FlowDefinition, BuildError> {
    smoke_check_screens(FlowVariant::SmokeCheckFinancial.as_str())
        .screen(pack_cost("pack-cost"))
        .screen(
            button(
                "financial",
                Prompt::new("Here's what today cost you.")
                    .with_detail("Seeing it is part of the change."),
                "Continue",
            )
            .showing(Display::Spend {
                count_screen: ScreenId::new("how-many"),
            }),
        )
        .screen(pack_cost("no-pack-cost"))
        .screen(
            button(
                "no-savings",
                Prompt::new("Here's what you kept today.")
                    .with_detail("Every smoke-free day adds up."),
                "Continue",
            )
            .showing(Display::Savings),
        )
        .on_preference("how-many", "financial", "pack-cost")
        .then("pack-cost", "financial")
        .then("financial", "urge-time")
        .on_preference("no-reinforce", "no-savings", "no-pack-cost")
        .then("no-pack-cost", "no-savings")
        .then("no-savings", "no-close")
        .build()
}
