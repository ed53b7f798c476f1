//! Closely spaced prime pairs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of adjacent primes by their gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PairKind {
    /// Gap of 2.
    Twin,
    /// Gap of 4.
    Cousin,
    /// Gap of 6.
    Sexy,
}

impl PairKind {
    /// All kinds in ascending gap order.
    pub const ALL: [PairKind; 3] = [PairKind::Twin, PairKind::Cousin, PairKind::Sexy];

    /// Classify a gap; other gaps produce no pair.
    pub fn from_gap(gap: u128) -> Option<Self> {
        match gap {
            2 => Some(PairKind::Twin),
            4 => Some(PairKind::Cousin),
            6 => Some(PairKind::Sexy),
            _ => None,
        }
    }

    /// The gap this kind stands for.
    pub fn gap(&self) -> u128 {
        match self {
            PairKind::Twin => 2,
            PairKind::Cousin => 4,
            PairKind::Sexy => 6,
        }
    }

    /// Capitalized label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            PairKind::Twin => "Twin",
            PairKind::Cousin => "Cousin",
            PairKind::Sexy => "Sexy",
        }
    }
}

impl fmt::Display for PairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairKind::Twin => write!(f, "twin"),
            PairKind::Cousin => write!(f, "cousin"),
            PairKind::Sexy => write!(f, "sexy"),
        }
    }
}

/// Two adjacent primes `(low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct PrimePair {
    pub low: u128,
    pub high: u128,
}

impl PrimePair {
    pub fn new(low: u128, high: u128) -> Self {
        PrimePair { low, high }
    }

    /// `high - low`, saturating at zero for malformed pairs.
    pub fn gap(&self) -> u128 {
        self.high.saturating_sub(self.low)
    }

    /// Kind implied by the gap, if any.
    pub fn kind(&self) -> Option<PairKind> {
        PairKind::from_gap(self.gap())
    }
}

impl From<(u128, u128)> for PrimePair {
    fn from((low, high): (u128, u128)) -> Self {
        PrimePair { low, high }
    }
}
