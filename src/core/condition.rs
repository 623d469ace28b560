//! Edge conditions for choosing the next screen.
//!
//! Conditions are pure predicates over a deliberately narrow context: the
//! answer just given on the screen being left, and whether a pack cost is
//! already stored. They never look at earlier answers.

use crate::ledger::Answer;
use serde::{Deserialize, Serialize};

/// Everything an edge condition is allowed to read.
#[derive(Clone, Copy, Debug)]
pub struct EdgeContext<'a> {
    /// Answer recorded on the screen being left, if any
    pub answer: Option<&'a Answer>,
    /// Whether the preference store currently holds a pack cost
    pub preference_set: bool,
}

impl<'a> EdgeContext<'a> {
    pub fn new(answer: Option<&'a Answer>, preference_set: bool) -> Self {
        Self {
            answer,
            preference_set,
        }
    }
}

/// Pure predicate guarding an edge.
///
/// # Example
///
/// ```rust
/// use checkin_flow::core::{Condition, EdgeContext};
/// use checkin_flow::ledger::Answer;
///
/// let yes = Answer::Choice("Yes".to_string());
/// let ctx = EdgeContext::new(Some(&yes), false);
///
/// assert!(Condition::selected("Yes").check(&ctx));
/// assert!(!Condition::selected("No").check(&ctx));
/// assert!(Condition::PreferenceUnset.check(&ctx));
/// assert!(Condition::Always.check(&ctx));
/// ```
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "kebab-case")]
pub enum Condition {
    /// Always satisfied.
    Always,

    /// Satisfied when the screen's choice answer equals `option`.
    Selected { option: String },

    /// Satisfied when a pack cost is stored.
    PreferenceSet,

    /// Satisfied when no pack cost is stored yet.
    PreferenceUnset,
}

impl Condition {
    pub fn selected(option: impl Into<String>) -> Self {
        Self::Selected {
            option: option.into(),
        }
    }

    /// Evaluate the condition. Pure: same context, same result.
    pub fn check(&self, ctx: &EdgeContext<'_>) -> bool {
        match self {
            Self::Always => true,
            Self::Selected { option } => {
                matches!(ctx.answer, Some(Answer::Choice(chosen)) if chosen == option)
            }
            Self::PreferenceSet => ctx.preference_set,
            Self::PreferenceUnset => !ctx.preference_set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_matches_only_the_named_option() {
        let no = Answer::Choice("No".to_string());
        let ctx = EdgeContext::new(Some(&no), true);

        assert!(Condition::selected("No").check(&ctx));
        assert!(!Condition::selected("Yes").check(&ctx));
    }

    #[test]
    fn selected_never_matches_text_answers() {
        let text = Answer::Text("No".to_string());
        let ctx = EdgeContext::new(Some(&text), false);

        assert!(!Condition::selected("No").check(&ctx));
    }

    #[test]
    fn selected_without_answer_is_unsatisfied() {
        let ctx = EdgeContext::new(None, false);
        assert!(!Condition::selected("Yes").check(&ctx));
    }

    #[test]
    fn preference_conditions_are_complementary() {
        for set in [true, false] {
            let ctx = EdgeContext::new(None, set);
            assert_ne!(
                Condition::PreferenceSet.check(&ctx),
                Condition::PreferenceUnset.check(&ctx)
            );
        }
    }

    #[test]
    fn condition_is_deterministic() {
        let yes = Answer::Choice("Yes".to_string());
        let ctx = EdgeContext::new(Some(&yes), true);
        let condition = Condition::selected("Yes");

        assert_eq!(condition.check(&ctx), condition.check(&ctx));
    }

    #[test]
    fn condition_serializes_with_tag() {
        let json = serde_json::to_value(Condition::selected("Yes")).unwrap();
        assert_eq!(json["when"], "selected");
        assert_eq!(json["option"], "Yes");

        let back: Condition = serde_json::from_str(r#"{"when":"preference-unset"}"#).unwrap();
        assert_eq!(back, Condition::PreferenceUnset);
    }
}
