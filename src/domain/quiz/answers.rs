//! Recorded quiz answers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::category::{Category, Choice};

/// How recorded answers feed the classifier.
///
/// The quiz asks several questions per category, and two evolutions of the
/// flow disagreed on what that history means. The mode makes the fork an
/// explicit configuration instead of a side effect of the data structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Tally every recorded answer in the category; majority wins, ties
    /// break to the most recently recorded answer. Default.
    MajorityPerCategory,

    /// Only the final answer recorded in each category counts.
    LastAnswerWins,
}

impl Default for ScoringMode {
    fn default() -> Self {
        Self::MajorityPerCategory
    }
}

/// Append-only log of `(category, choice)` pairs in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerLog {
    entries: Vec<(Category, Choice)>,
}

impl AnswerLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one answer. Earlier answers in the same category are kept;
    /// whether they count is the classifier's [`ScoringMode`] decision.
    pub fn record(&mut self, category: Category, choice: Choice) {
        self.entries.push((category, choice));
    }

    /// Number of recorded answers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in arrival order.
    pub fn entries(&self) -> &[(Category, Choice)] {
        &self.entries
    }

    /// Choices recorded for one category, oldest first.
    pub fn choices_for(&self, category: Category) -> Vec<Choice> {
        self.entries
            .iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, choice)| *choice)
            .collect()
    }

    /// Latest choice recorded for one category, if any.
    pub fn latest_for(&self, category: Category) -> Option<Choice> {
        self.entries
            .iter()
            .rev()
            .find(|(c, _)| *c == category)
            .map(|(_, choice)| *choice)
    }

    /// Persisted snapshot: JSON object mapping each answered category's key
    /// to its latest choice, in fixed category order.
    pub fn snapshot(&self) -> Value {
        let mut map = Map::new();
        for category in Category::ALL {
            if let Some(choice) = self.latest_for(category) {
                map.insert(category.key().to_string(), Value::String(choice.token().into()));
            }
        }
        Value::Object(map)
    }
}
