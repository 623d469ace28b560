//! Builder for flow definitions.
//!
//! `build` runs every integrity check and accumulates ALL violations with
//! Stillwater's `Validation`, so a flow author sees every problem in one
//! pass instead of fixing them one at a time.

use crate::core::{Condition, Display, EdgeContext, Requirement, ScreenId, ScreenNode};
use crate::graph::definition::{Edge, FlowDefinition, FlowDocument};
use crate::graph::error::{BuildError, GraphIntegrityError};
use crate::ledger::Answer;
use std::collections::{HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<GraphIntegrityError>>;

/// Fluent builder for [`FlowDefinition`].
///
/// # Example
///
/// ```rust
/// use checkin_flow::core::{Prompt, Requirement, ScreenNode};
/// use checkin_flow::graph::FlowBuilder;
///
/// let flow = FlowBuilder::new("tiny", "start")
///     .screen(ScreenNode::new(
///         "start",
///         Prompt::new("Ready?"),
///         Requirement::Acknowledge { label: "Go".into() },
///     ))
///     .screen(ScreenNode::new("done", Prompt::new("Saved"), Requirement::Terminal))
///     .then("start", "done")
///     .build()
///     .unwrap();
///
/// assert_eq!(flow.start().id, "start");
/// ```
#[derive(Clone, Debug)]
pub struct FlowBuilder {
    name: String,
    start: ScreenId,
    screens: Vec<ScreenNode>,
    edges: Vec<Edge>,
}

impl FlowBuilder {
    pub fn new(name: impl Into<String>, start: impl Into<ScreenId>) -> Self {
        Self {
            name: name.into(),
            start: start.into(),
            screens: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a screen.
    pub fn screen(mut self, screen: ScreenNode) -> Self {
        self.screens.push(screen);
        self
    }

    /// Add an edge with an explicit condition.
    pub fn edge(
        mut self,
        from: impl Into<ScreenId>,
        when: Condition,
        to: impl Into<ScreenId>,
    ) -> Self {
        self.edges.push(Edge::new(from, when, to));
        self
    }

    /// Add an unconditional edge.
    pub fn then(self, from: impl Into<ScreenId>, to: impl Into<ScreenId>) -> Self {
        self.edge(from, Condition::Always, to)
    }

    /// Add an edge taken when `option` is chosen on `from`.
    pub fn branch(
        self,
        from: impl Into<ScreenId>,
        option: impl Into<String>,
        to: impl Into<ScreenId>,
    ) -> Self {
        self.edge(from, Condition::selected(option), to)
    }

    /// Add a pair of edges split on whether a pack cost is stored.
    pub fn on_preference(
        self,
        from: impl Into<ScreenId>,
        when_set: impl Into<ScreenId>,
        when_unset: impl Into<ScreenId>,
    ) -> Self {
        let from = from.into();
        self.edge(from.clone(), Condition::PreferenceSet, when_set)
            .edge(from, Condition::PreferenceUnset, when_unset)
    }

    /// Validate and build the definition.
    ///
    /// # Errors
    ///
    /// [`BuildError::Invalid`] listing every integrity violation found.
    pub fn build(self) -> Result<FlowDefinition, BuildError> {
        match self.validate() {
            Validation::Success(_) => Ok(FlowDefinition::assemble(
                self.name,
                self.start,
                self.screens,
                self.edges,
            )),
            Validation::Failure(errors) => {
                let violations: Vec<GraphIntegrityError> = errors.iter().cloned().collect();
                tracing::error!(flow = %self.name, count = violations.len(), "flow definition rejected");
                Err(BuildError::Invalid {
                    flow: self.name,
                    violations,
                })
            }
        }
    }

    fn validate(&self) -> Check {
        let checks = vec![
            self.check_screens(),
            self.check_edge_endpoints(),
            self.check_terminals(),
            self.check_options(),
            self.check_displays(),
            self.check_routing(),
            self.check_reachability(),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    fn lookup(&self, id: &ScreenId) -> Option<&ScreenNode> {
        self.screens.iter().find(|s| &s.id == id)
    }

    fn check_screens(&self) -> Check {
        let mut violations = Vec::new();

        if self.screens.is_empty() {
            violations.push(GraphIntegrityError::NoScreens);
        } else if self.lookup(&self.start).is_none() {
            violations.push(GraphIntegrityError::MissingStart {
                start: self.start.clone(),
            });
        }

        let mut seen = HashSet::new();
        for screen in &self.screens {
            if !seen.insert(&screen.id) {
                violations.push(GraphIntegrityError::DuplicateScreen {
                    screen: screen.id.clone(),
                });
            }
        }

        collect(violations)
    }

    fn check_edge_endpoints(&self) -> Check {
        let violations = self
            .edges
            .iter()
            .flat_map(|edge| {
                [&edge.from, &edge.to]
                    .into_iter()
                    .filter(|end| self.lookup(end).is_none())
                    .map(|missing| GraphIntegrityError::UnknownScreen {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: missing.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        collect(violations)
    }

    fn check_terminals(&self) -> Check {
        let violations = self
            .screens
            .iter()
            .filter(|s| s.is_terminal())
            .filter(|s| self.edges.iter().any(|e| e.from == s.id))
            .map(|s| GraphIntegrityError::TerminalHasEdges {
                screen: s.id.clone(),
            })
            .collect();

        collect(violations)
    }

    fn check_options(&self) -> Check {
        let mut violations = Vec::new();

        for edge in &self.edges {
            let Condition::Selected { option } = &edge.when else {
                continue;
            };
            let offered = self
                .lookup(&edge.from)
                .is_some_and(|s| s.options().contains(option));
            if !offered {
                violations.push(GraphIntegrityError::UnknownOption {
                    screen: edge.from.clone(),
                    option: option.clone(),
                });
            }
        }

        collect(violations)
    }

    /// Spend figures read the count bucket from a choice screen of the
    /// same flow.
    fn check_displays(&self) -> Check {
        let violations = self
            .screens
            .iter()
            .filter_map(|s| match &s.display {
                Some(Display::Spend { count_screen }) => {
                    let is_choice = self.lookup(count_screen).is_some_and(|c| {
                        matches!(c.requirement, Requirement::Choice { .. })
                    });
                    (!is_choice).then(|| GraphIntegrityError::BadCountScreen {
                        screen: s.id.clone(),
                        count_screen: count_screen.clone(),
                    })
                }
                _ => None,
            })
            .collect();

        collect(violations)
    }

    /// Every acceptable answer on every non-terminal screen, under every
    /// preference state it can be submitted in, must match exactly one edge.
    fn check_routing(&self) -> Check {
        let mut violations = Vec::new();

        for screen in self.screens.iter().filter(|s| !s.is_terminal()) {
            for answer in sample_answers(screen) {
                for &preference_set in preference_states(screen) {
                    let ctx = EdgeContext::new(Some(&answer), preference_set);
                    let matches = self
                        .edges
                        .iter()
                        .filter(|e| e.from == screen.id && e.when.check(&ctx))
                        .count();

                    let label = describe(&answer);
                    match matches {
                        1 => {}
                        0 => violations.push(GraphIntegrityError::Unroutable {
                            screen: screen.id.clone(),
                            answer: label,
                            preference_set,
                        }),
                        n => violations.push(GraphIntegrityError::Ambiguous {
                            screen: screen.id.clone(),
                            answer: label,
                            preference_set,
                            matches: n,
                        }),
                    }
                }
            }
        }

        collect(violations)
    }

    fn check_reachability(&self) -> Check {
        if self.lookup(&self.start).is_none() {
            // Reported by check_screens.
            return Validation::success(());
        }

        let mut reached: HashSet<&ScreenId> = HashSet::new();
        let mut queue = VecDeque::from([&self.start]);
        while let Some(id) = queue.pop_front() {
            if !reached.insert(id) {
                continue;
            }
            queue.extend(self.edges.iter().filter(|e| &e.from == id).map(|e| &e.to));
        }

        let violations = self
            .screens
            .iter()
            .filter(|s| !reached.contains(&s.id))
            .map(|s| GraphIntegrityError::Unreachable {
                screen: s.id.clone(),
            })
            .collect();

        collect(violations)
    }
}

impl From<FlowDocument> for FlowBuilder {
    fn from(document: FlowDocument) -> Self {
        Self {
            name: document.name,
            start: document.start,
            screens: document.screens,
            edges: document.edges,
        }
    }
}

/// One representative answer per distinct routing outcome. Only choice
/// answers can influence `Selected` edges; any other answer kind routes the
/// same way, so one stand-in is enough.
fn sample_answers(screen: &ScreenNode) -> Vec<Answer> {
    match &screen.requirement {
        Requirement::Choice { options } => {
            options.iter().cloned().map(Answer::Choice).collect()
        }
        _ => vec![Answer::Acknowledged],
    }
}

/// A cost-entry screen writes the preference before routing, so it is only
/// ever left with the preference set.
fn preference_states(screen: &ScreenNode) -> &'static [bool] {
    match screen.requirement {
        Requirement::PackCost => &[true],
        _ => &[false, true],
    }
}

fn describe(answer: &Answer) -> String {
    match answer {
        Answer::Choice(label) => format!("'{label}'"),
        _ => "<any>".to_string(),
    }
}

fn collect(violations: Vec<GraphIntegrityError>) -> Check {
    let checks: Vec<Check> = violations.into_iter().map(Validation::fail).collect();
    Validation::all_vec(checks).map(|_| ())
}
