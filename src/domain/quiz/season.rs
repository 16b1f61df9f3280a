//! Seasonal context for care recommendations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Time of year the subject is shopping routines for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    AutumnWinter,
    SpringSummer,
}

impl Season {
    /// The literal token the front end sends for this season.
    pub fn token(&self) -> &'static str {
        match self {
            Season::AutumnWinter => "autumn_winter",
            Season::SpringSummer => "spring_summer",
        }
    }

    /// Human-readable label for prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Season::AutumnWinter => "Autumn / Winter",
            Season::SpringSummer => "Spring / Summer",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for Season {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "autumn_winter" => Ok(Season::AutumnWinter),
            "spring_summer" => Ok(Season::SpringSummer),
            other => Err(ValidationError::unknown_token(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for season in [Season::AutumnWinter, Season::SpringSummer] {
            let parsed: Season = season.token().parse().unwrap();
            assert_eq!(parsed, season);
        }
    }

    #[test]
    fn serde_uses_snake_case_tokens() {
        let json = serde_json::to_string(&Season::AutumnWinter).unwrap();
        assert_eq!(json, "\"autumn_winter\"");
        let back: Season = serde_json::from_str("\"spring_summer\"").unwrap();
        assert_eq!(back, Season::SpringSummer);
    }

    #[test]
    fn unknown_token_is_rejected() {
        assert!("winter".parse::<Season>().is_err());
    }
}
