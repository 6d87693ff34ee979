//! Conditional-clue gating
//!
//! A clue is surfaced at most once per NPC per session, only when the
//! player's question mentions its keyword and is phrased as a question.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::npc::scope::QuestionScope;

/// A fact an NPC shares only when asked about its topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionalClue {
    pub keyword: &'static str,
    pub clue: &'static str,
}

/// Clues already surfaced, per NPC key, in reveal order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClueLedger {
    revealed: BTreeMap<String, Vec<String>>,
}

impl ClueLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revealed(&self, npc: &str) -> &[String] {
        self.revealed.get(npc).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_revealed(&self, npc: &str, clue: &str) -> bool {
        self.revealed(npc).iter().any(|c| c == clue)
    }

    pub fn total_revealed(&self) -> usize {
        self.revealed.values().map(Vec::len).sum()
    }

    /// Clues this question may surface, without recording them
    ///
    /// Non-broad questions get at most one new clue.
    pub fn select(
        &self,
        npc: &str,
        clues: &[ConditionalClue],
        question: &str,
        scope: QuestionScope,
    ) -> Vec<String> {
        let lower = question.to_lowercase();
        if !lower.contains('?') {
            return Vec::new();
        }

        let mut selected: Vec<String> = Vec::new();
        for c in clues {
            if lower.contains(&c.keyword.to_lowercase())
                && !self.is_revealed(npc, c.clue)
                && !selected.iter().any(|s| s == c.clue)
            {
                selected.push(c.clue.to_string());
            }
        }

        if scope != QuestionScope::Broad {
            selected.truncate(1);
        }
        selected
    }

    /// Mark clues as surfaced
    pub fn record(&mut self, npc: &str, clues: &[String]) {
        let entry = self.revealed.entry(npc.to_string()).or_default();
        for clue in clues {
            if !entry.contains(clue) {
                entry.push(clue.clone());
            }
        }
    }

    /// Select and record in one step
    pub fn reveal(
        &mut self,
        npc: &str,
        clues: &[ConditionalClue],
        question: &str,
        scope: QuestionScope,
    ) -> Vec<String> {
        let selected = self.select(npc, clues, question, scope);
        self.record(npc, &selected);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLUES: &[ConditionalClue] = &[
        ConditionalClue { keyword: "pig", clue: "Several families keep pigs right beside their houses." },
        ConditionalClue { keyword: "evening", clue: "Children play outside near the paddies until after dark." },
    ];

    #[test]
    fn test_clue_revealed_once() {
        let mut ledger = ClueLedger::new();
        let first = ledger.reveal("mama_kofi", CLUES, "Do you keep pigs?", QuestionScope::Narrow);
        assert_eq!(first.len(), 1);
        let second = ledger.reveal("mama_kofi", CLUES, "Do you keep pigs?", QuestionScope::Narrow);
        assert!(second.is_empty());
    }

    #[test]
    fn test_ledger_is_per_npc() {
        let mut ledger = ClueLedger::new();
        ledger.reveal("mama_kofi", CLUES, "Any pigs nearby?", QuestionScope::Narrow);
        let other = ledger.reveal("foreman_rex", CLUES, "Any pigs nearby?", QuestionScope::Narrow);
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn test_question_mark_required() {
        let ledger = ClueLedger::new();
        assert!(ledger.select("mama_kofi", CLUES, "tell me about pigs", QuestionScope::Narrow).is_empty());
    }

    #[test]
    fn test_narrow_question_gets_one_clue() {
        let ledger = ClueLedger::new();
        let q = "What about pigs and the evening?";
        assert_eq!(ledger.select("mama_kofi", CLUES, q, QuestionScope::Narrow).len(), 1);
        assert_eq!(ledger.select("mama_kofi", CLUES, q, QuestionScope::Broad).len(), 2);
    }

    #[test]
    fn test_select_does_not_record() {
        let ledger = ClueLedger::new();
        ledger.select("mama_kofi", CLUES, "pigs?", QuestionScope::Narrow);
        assert_eq!(ledger.total_revealed(), 0);
    }
}
