//! Match percentage value object (0-100 scale, two decimal places).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Percentage of code positions that agree between the quiz-derived and the
/// externally supplied skin codes.
///
/// Stored rounded to two decimal places so persisted values are stable
/// across backends.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchPercent(f64);

impl MatchPercent {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100.0);

    /// Creates a MatchPercent, clamping to [0, 100] and rounding to 2 dp.
    pub fn new(value: f64) -> Self {
        let clamped = value.clamp(0.0, 100.0);
        Self((clamped * 100.0).round() / 100.0)
    }

    /// Creates a MatchPercent from a matched-slot count out of a total.
    pub fn from_ratio(matches: u32, total: u32) -> Self {
        if total == 0 {
            return Self::ZERO;
        }
        Self::new(f64::from(matches) / f64::from(total) * 100.0)
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for MatchPercent {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for MatchPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
