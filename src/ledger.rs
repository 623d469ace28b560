//! Answers collected during a single session.

use crate::core::ScreenId;
use crate::preference::PackCost;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A validated answer to one screen.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// Label of the chosen option
    Choice(String),
    /// Text as typed, untrimmed
    Text(String),
    /// Pack cost entered on a cost-entry screen
    PackCost(PackCost),
    /// Continue button pressed
    Acknowledged,
}

impl Answer {
    /// Chosen option label, for choice answers.
    pub fn choice(&self) -> Option<&str> {
        match self {
            Self::Choice(label) => Some(label),
            _ => None,
        }
    }
}

/// Answers keyed by the screen that produced them.
///
/// Recording on a screen that already has an answer replaces it; the ledger
/// keeps no history.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct AnswerLedger {
    entries: BTreeMap<ScreenId, Answer>,
}

impl AnswerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer, returning a new ledger.
    pub fn record(&self, screen: ScreenId, answer: Answer) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(screen, answer);
        Self { entries }
    }

    pub fn get(&self, screen: &ScreenId) -> Option<&Answer> {
        self.entries.get(screen)
    }

    /// Chosen option on `screen`, if it was a choice screen and was answered.
    pub fn choice(&self, screen: &ScreenId) -> Option<&str> {
        self.get(screen).and_then(Answer::choice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ScreenId, &Answer)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_overwrites_previous_answer() {
        let screen = ScreenId::new("feel");
        let ledger = AnswerLedger::new()
            .record(screen.clone(), Answer::Choice("Okay".to_string()))
            .record(screen.clone(), Answer::Choice("Not great".to_string()));

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.choice(&screen), Some("Not great"));
    }

    #[test]
    fn record_is_immutable() {
        let ledger = AnswerLedger::new();
        let next = ledger.record(ScreenId::new("start"), Answer::Choice("Yes".to_string()));

        assert!(ledger.is_empty());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn choice_ignores_other_answer_kinds() {
        let screen = ScreenId::new("what");
        let ledger = AnswerLedger::new().record(screen.clone(), Answer::Text("coffee".into()));

        assert_eq!(ledger.choice(&screen), None);
        assert_eq!(ledger.get(&screen), Some(&Answer::Text("coffee".into())));
    }

    #[test]
    fn answer_serializes_with_kind_and_value() {
        let json = serde_json::to_value(Answer::Choice("2–3".to_string())).unwrap();
        assert_eq!(json["kind"], "choice");
        assert_eq!(json["value"], "2–3");
    }
}
