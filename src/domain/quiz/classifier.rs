//! Scoring and reconciliation of skin codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::foundation::{MatchPercent, ValidationError};

use super::answers::{AnswerLog, ScoringMode};
use super::category::{Category, Choice};

/// A 4-letter Baumann type code, one letter per axis in fixed order
/// (O/D, S/R, P/N, W/T).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkinCode(String);

impl SkinCode {
    /// Validates and normalizes a raw code: trims, uppercases, truncates to
    /// four characters, then requires exactly four ASCII letters.
    pub fn try_new(raw: &str) -> Result<Self, ValidationError> {
        let normalized: String = raw.trim().to_uppercase().chars().take(4).collect();
        if normalized.len() != 4 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid_format(
                "skin_code",
                format!("expected 4 letters, got '{}'", raw.trim()),
            ));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable rendering of each letter's trait.
    ///
    /// Unknown letters (possible in external codes) render as "unclassified".
    pub fn describe(&self) -> String {
        let parts: Vec<&str> = self
            .0
            .chars()
            .map(|letter| match letter {
                'O' => "oily",
                'D' => "dry",
                'S' => "sensitive",
                'R' => "resistant",
                'P' => "pigmentation-prone",
                'N' => "evenly pigmented",
                'W' => "wrinkle-prone",
                'T' => "tight",
                _ => "unclassified",
            })
            .collect();
        format!("Skin traits: {}.", parts.join(", "))
    }
}

impl fmt::Display for SkinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SkinCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

/// Classification preconditions that cannot be recovered by re-prompting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// A category has no recorded answers, so no letter can be derived.
    #[error("No answers recorded for category {0}")]
    MissingCategory(Category),
}

/// Derives the 4-letter code from recorded answers.
///
/// Under [`ScoringMode::MajorityPerCategory`] each axis tallies A against B
/// over every answer recorded for it; the majority letter wins and an exact
/// tie breaks to the most recently recorded answer in that axis (a real,
/// history-dependent rule, not a fixed default). Under
/// [`ScoringMode::LastAnswerWins`] only the final answer per axis counts.
pub fn classify(log: &AnswerLog, mode: ScoringMode) -> Result<SkinCode, ClassifyError> {
    let mut code = String::with_capacity(4);
    for category in Category::ALL {
        let letter = match mode {
            ScoringMode::MajorityPerCategory => {
                let choices = log.choices_for(category);
                let last = *choices
                    .last()
                    .ok_or(ClassifyError::MissingCategory(category))?;
                let a = choices.iter().filter(|c| **c == Choice::A).count();
                let b = choices.len() - a;
                if a > b {
                    category.letter_a()
                } else if b > a {
                    category.letter_b()
                } else {
                    category.letter_for(last)
                }
            }
            ScoringMode::LastAnswerWins => {
                let last = log
                    .latest_for(category)
                    .ok_or(ClassifyError::MissingCategory(category))?;
                category.letter_for(last)
            }
        };
        code.push(letter);
    }
    Ok(SkinCode(code))
}

/// Result of reconciling the quiz code with the externally supplied code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Merged verdict: shared letters where the codes agree, the external
    /// letter where they disagree.
    pub final_code: String,

    /// Share of the four slots that agreed.
    pub match_percent: MatchPercent,
}

/// Reconciles two codes position-wise.
///
/// Both inputs are normalized (trim, uppercase, truncate to four). An empty
/// side yields the other side unchanged with a 0% match rather than an
/// undefined result. On disagreement at a slot the `secondary` (externally
/// supplied) letter wins; favoring the external signal on conflict is a
/// deliberate compatibility rule.
pub fn merge(primary: &str, secondary: &str) -> MergeOutcome {
    let primary: String = primary.trim().to_uppercase().chars().take(4).collect();
    let secondary: String = secondary.trim().to_uppercase().chars().take(4).collect();

    if primary.is_empty() {
        return MergeOutcome {
            final_code: secondary,
            match_percent: MatchPercent::ZERO,
        };
    }
    if secondary.is_empty() {
        return MergeOutcome {
            final_code: primary,
            match_percent: MatchPercent::ZERO,
        };
    }

    let mut matches = 0u32;
    let mut final_code = String::with_capacity(4);
    for (quiz, external) in primary.chars().zip(secondary.chars()) {
        if quiz == external {
            matches += 1;
            final_code.push(quiz);
        } else {
            final_code.push(external);
        }
    }

    MergeOutcome {
        final_code,
        match_percent: MatchPercent::from_ratio(matches, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn log_of(entries: &[(Category, Choice)]) -> AnswerLog {
        let mut log = AnswerLog::new();
        for (category, choice) in entries {
            log.record(*category, *choice);
        }
        log
    }

    fn full_log(od: &[Choice], sr: &[Choice], pn: &[Choice], wt: &[Choice]) -> AnswerLog {
        let mut log = AnswerLog::new();
        for c in od {
            log.record(Category::OilyDry, *c);
        }
        for c in sr {
            log.record(Category::SensitiveResistant, *c);
        }
        for c in pn {
            log.record(Category::PigmentedNonPigmented, *c);
        }
        for c in wt {
            log.record(Category::WrinkleProneTight, *c);
        }
        log
    }

    mod classify_majority {
        use super::*;
        use crate::domain::quiz::Choice::{A, B};

        #[test]
        fn majority_wins_per_category() {
            let log = full_log(&[A, A, B], &[B, B], &[A], &[A, B, B]);
            let code = classify(&log, ScoringMode::MajorityPerCategory).unwrap();
            assert_eq!(code.as_str(), "ORPT");
        }

        #[test]
        fn all_a_answers_yield_first_letters() {
            let log = full_log(&[A], &[A], &[A], &[A]);
            let code = classify(&log, ScoringMode::MajorityPerCategory).unwrap();
            assert_eq!(code.as_str(), "OSPW");
        }

        #[test]
        fn all_b_answers_yield_second_letters() {
            let log = full_log(&[B], &[B], &[B], &[B]);
            let code = classify(&log, ScoringMode::MajorityPerCategory).unwrap();
            assert_eq!(code.as_str(), "DRNT");
        }

        #[test]
        fn tie_breaks_to_last_recorded_answer() {
            let log = full_log(&[A, B], &[B, A], &[A], &[A]);
            let code = classify(&log, ScoringMode::MajorityPerCategory).unwrap();
            // O/D tied, last was B -> D; S/R tied, last was A -> S
            assert_eq!(code.as_str(), "DSPW");
        }

        #[test]
        fn missing_category_is_an_error() {
            let log = log_of(&[(Category::OilyDry, A)]);
            let err = classify(&log, ScoringMode::MajorityPerCategory).unwrap_err();
            assert_eq!(
                err,
                ClassifyError::MissingCategory(Category::SensitiveResistant)
            );
        }
    }

    mod classify_last_answer_wins {
        use super::*;
        use crate::domain::quiz::Choice::{A, B};

        #[test]
        fn only_final_answer_counts() {
            // Majority in O/D is A, but the last answer is B.
            let log = full_log(&[A, A, B], &[B], &[A], &[B]);
            let code = classify(&log, ScoringMode::LastAnswerWins).unwrap();
            assert_eq!(code.as_str(), "DRPT");
        }

        #[test]
        fn matches_majority_when_single_answer_per_category() {
            let log = full_log(&[A], &[B], &[A], &[B]);
            let majority = classify(&log, ScoringMode::MajorityPerCategory).unwrap();
            let last = classify(&log, ScoringMode::LastAnswerWins).unwrap();
            assert_eq!(majority, last);
        }
    }

    mod merge_rules {
        use super::*;

        #[test]
        fn empty_secondary_keeps_primary_at_zero_match() {
            let outcome = merge("OSPW", "");
            assert_eq!(outcome.final_code, "OSPW");
            assert_eq!(outcome.match_percent, MatchPercent::ZERO);
        }

        #[test]
        fn empty_primary_keeps_secondary_at_zero_match() {
            let outcome = merge("", "DRNT");
            assert_eq!(outcome.final_code, "DRNT");
            assert_eq!(outcome.match_percent, MatchPercent::ZERO);
        }

        #[test]
        fn equal_codes_match_fully() {
            let outcome = merge("OSPW", "OSPW");
            assert_eq!(outcome.final_code, "OSPW");
            assert_eq!(outcome.match_percent, MatchPercent::HUNDRED);
        }

        #[test]
        fn disagreement_takes_the_external_letter() {
            let outcome = merge("OSPW", "OSPT");
            assert_eq!(outcome.final_code, "OSPT");
            assert_eq!(outcome.match_percent.value(), 75.0);
        }

        #[test]
        fn total_disagreement_is_the_external_code() {
            let outcome = merge("OSPW", "DRNT");
            assert_eq!(outcome.final_code, "DRNT");
            assert_eq!(outcome.match_percent, MatchPercent::ZERO);
        }

        #[test]
        fn inputs_are_normalized_before_comparison() {
            let outcome = merge("  ospw ", "ospwXYZ");
            assert_eq!(outcome.final_code, "OSPW");
            assert_eq!(outcome.match_percent, MatchPercent::HUNDRED);
        }
    }

    mod skin_code {
        use super::*;

        #[test]
        fn try_new_normalizes_case_and_whitespace() {
            assert_eq!(SkinCode::try_new(" ospw ").unwrap().as_str(), "OSPW");
        }

        #[test]
        fn try_new_rejects_short_or_non_alphabetic() {
            assert!(SkinCode::try_new("OS").is_err());
            assert!(SkinCode::try_new("O5PW").is_err());
            assert!(SkinCode::try_new("").is_err());
        }

        #[test]
        fn describe_spells_out_each_trait() {
            let code = SkinCode::try_new("ORPT").unwrap();
            assert_eq!(
                code.describe(),
                "Skin traits: oily, resistant, pigmentation-prone, tight."
            );
        }
    }

    proptest! {
        /// Reordering answers within a category never changes the outcome
        /// unless the category is tied, and a strict majority can never tie.
        #[test]
        fn majority_is_order_invariant_without_ties(
            a_count in 0usize..5,
            b_count in 0usize..5,
            seed in any::<u64>(),
        ) {
            prop_assume!(a_count != b_count);
            prop_assume!(a_count + b_count > 0);

            let mut choices: Vec<Choice> = std::iter::repeat(Choice::A)
                .take(a_count)
                .chain(std::iter::repeat(Choice::B).take(b_count))
                .collect();

            // Cheap deterministic shuffle.
            let len = choices.len();
            for i in 0..len {
                let j = (seed as usize).wrapping_mul(31).wrapping_add(i * 17) % len;
                choices.swap(i, j);
            }

            let log = full_log(&choices, &[Choice::A], &[Choice::A], &[Choice::A]);
            let shuffled = classify(&log, ScoringMode::MajorityPerCategory).unwrap();

            let expected = if a_count > b_count { 'O' } else { 'D' };
            prop_assert_eq!(shuffled.as_str().chars().next().unwrap(), expected);
        }

        /// The merged letter at every position is either the shared letter or
        /// the secondary's, never the primary's alone.
        #[test]
        fn merged_letters_never_come_from_primary_alone(
            primary in "[A-Z]{4}",
            secondary in "[A-Z]{4}",
        ) {
            let outcome = merge(&primary, &secondary);
            for (merged, external) in outcome.final_code.chars().zip(secondary.chars()) {
                prop_assert_eq!(merged, external);
            }
        }
    }
}
