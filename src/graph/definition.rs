//! Immutable flow definitions and next-screen resolution.

use crate::core::{Condition, EdgeContext, ScreenId, ScreenNode};
use crate::graph::builder::FlowBuilder;
use crate::graph::error::{BuildError, GraphIntegrityError};
use crate::ledger::Answer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Conditional link between two screens.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub from: ScreenId,
    #[serde(flatten)]
    pub when: Condition,
    pub to: ScreenId,
}

impl Edge {
    pub fn new(from: impl Into<ScreenId>, when: Condition, to: impl Into<ScreenId>) -> Self {
        Self {
            from: from.into(),
            when,
            to: to.into(),
        }
    }
}

/// Serialized shape of a flow, before validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowDocument {
    pub name: String,
    pub start: ScreenId,
    pub screens: Vec<ScreenNode>,
    pub edges: Vec<Edge>,
}

/// A validated, immutable screen graph.
///
/// Only [`FlowBuilder`] creates these, so every definition in hand has
/// passed the integrity checks: every screen is reachable, terminals have no
/// edges, and every answer on every screen matches exactly one edge.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "FlowDocument", into = "FlowDocument")]
pub struct FlowDefinition {
    name: String,
    start: ScreenId,
    screens: Vec<ScreenNode>,
    edges: Vec<Edge>,
    index: HashMap<ScreenId, usize>,
}

impl FlowDefinition {
    /// Assemble a definition. Callers must have validated the parts.
    pub(crate) fn assemble(
        name: String,
        start: ScreenId,
        screens: Vec<ScreenNode>,
        edges: Vec<Edge>,
    ) -> Self {
        let index = screens
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self {
            name,
            start,
            screens,
            edges,
            index,
        }
    }

    /// Parse and validate a JSON flow document.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let document: FlowDocument = serde_json::from_str(json)?;
        FlowBuilder::from(document).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> &ScreenNode {
        // Validated on build: the start screen always exists.
        &self.screens[self.index[&self.start]]
    }

    pub fn screen(&self, id: &ScreenId) -> Option<&ScreenNode> {
        self.index.get(id).map(|&i| &self.screens[i])
    }

    pub fn screens(&self) -> &[ScreenNode] {
        &self.screens
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `screen`, in declared order.
    pub fn edges_from<'a>(&'a self, screen: &'a ScreenId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.from == screen)
    }

    /// Resolve the screen that follows `current`.
    ///
    /// Edges are tried in declared order and the first satisfied one wins.
    /// Conditions see only `answer` (the answer just given on `current`) and
    /// whether a pack cost is stored.
    ///
    /// # Errors
    ///
    /// [`GraphIntegrityError::NoMatchingEdge`] when nothing matches. With a
    /// validated graph this only happens for terminal screens or for answers
    /// the screen would have rejected.
    pub fn next_screen(
        &self,
        current: &ScreenId,
        answer: Option<&Answer>,
        preference_set: bool,
    ) -> Result<&ScreenNode, GraphIntegrityError> {
        let ctx = EdgeContext::new(answer, preference_set);
        let no_match = || GraphIntegrityError::NoMatchingEdge {
            flow: self.name.clone(),
            screen: current.clone(),
        };

        let edge = self
            .edges_from(current)
            .find(|e| e.when.check(&ctx))
            .ok_or_else(no_match)?;

        self.screen(&edge.to).ok_or_else(no_match)
    }
}

impl TryFrom<FlowDocument> for FlowDefinition {
    type Error = BuildError;

    fn try_from(document: FlowDocument) -> Result<Self, Self::Error> {
        FlowBuilder::from(document).build()
    }
}

impl From<FlowDefinition> for FlowDocument {
    fn from(definition: FlowDefinition) -> Self {
        Self {
            name: definition.name,
            start: definition.start,
            screens: definition.screens,
            edges: definition.edges,
        }
    }
}

impl PartialEq for FlowDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.start == other.start
            && self.screens == other.screens
            && self.edges == other.edges
    }
}
