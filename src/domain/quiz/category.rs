//! Scoring axes of the Baumann skin-type rubric.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the four fixed scoring axes.
///
/// Each axis maps choice `A` to its first letter and choice `B` to its
/// second. The order of [`Category::ALL`] is the order letters appear in a
/// skin code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Oily vs dry.
    #[serde(rename = "O/D")]
    OilyDry,

    /// Sensitive vs resistant.
    #[serde(rename = "S/R")]
    SensitiveResistant,

    /// Pigmented vs non-pigmented.
    #[serde(rename = "P/N")]
    PigmentedNonPigmented,

    /// Wrinkle-prone vs tight.
    #[serde(rename = "W/T")]
    WrinkleProneTight,
}

impl Category {
    /// All categories in skin-code order.
    pub const ALL: [Category; 4] = [
        Category::OilyDry,
        Category::SensitiveResistant,
        Category::PigmentedNonPigmented,
        Category::WrinkleProneTight,
    ];

    /// The letter contributed by choice A on this axis.
    pub fn letter_a(&self) -> char {
        match self {
            Category::OilyDry => 'O',
            Category::SensitiveResistant => 'S',
            Category::PigmentedNonPigmented => 'P',
            Category::WrinkleProneTight => 'W',
        }
    }

    /// The letter contributed by choice B on this axis.
    pub fn letter_b(&self) -> char {
        match self {
            Category::OilyDry => 'D',
            Category::SensitiveResistant => 'R',
            Category::PigmentedNonPigmented => 'N',
            Category::WrinkleProneTight => 'T',
        }
    }

    /// The letter a given choice maps to on this axis.
    pub fn letter_for(&self, choice: Choice) -> char {
        match choice {
            Choice::A => self.letter_a(),
            Choice::B => self.letter_b(),
        }
    }

    /// Slash-separated key used in persisted answer snapshots ("O/D" etc.).
    pub fn key(&self) -> &'static str {
        match self {
            Category::OilyDry => "O/D",
            Category::SensitiveResistant => "S/R",
            Category::PigmentedNonPigmented => "P/N",
            Category::WrinkleProneTight => "W/T",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A forced binary answer to one quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
}

impl Choice {
    /// The literal token the front end sends for this choice.
    pub fn token(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Choice {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Choice::A),
            "B" => Ok(Choice::B),
            other => Err(ValidationError::unknown_token(other)),
        }
    }
}
