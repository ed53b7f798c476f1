//! Report configuration types.

use crate::error::{ReportError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caps on the materialized samples of a report.
///
/// Aggregates are always computed over the full data; these only bound what
/// is stored for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SampleLimits {
    /// Maximum gaps kept in `gaps.sample`.
    #[serde(default = "default_gap_sample")]
    pub gaps: usize,
    /// Maximum pairs kept per kind.
    #[serde(default = "default_pair_sample")]
    pub pairs_per_kind: usize,
    /// Maximum primes kept in `prime_sample`.
    #[serde(default = "default_prime_sample")]
    pub primes: usize,
}

fn default_gap_sample() -> usize {
    100
}

fn default_pair_sample() -> usize {
    50
}

fn default_prime_sample() -> usize {
    1000
}

impl Default for SampleLimits {
    fn default() -> Self {
        Self {
            gaps: default_gap_sample(),
            pairs_per_kind: default_pair_sample(),
            primes: default_prime_sample(),
        }
    }
}

impl SampleLimits {
    /// Every limit must be at least 1.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("gaps", self.gaps),
            ("pairs_per_kind", self.pairs_per_kind),
            ("primes", self.primes),
        ] {
            if value == 0 {
                return Err(ReportError::InvalidConfig(format!(
                    "sample limit '{}' must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Complete report configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportConfig {
    /// Custom report title for rendered output.
    #[serde(default)]
    pub title: Option<String>,
    /// Sample caps.
    #[serde(default)]
    pub limits: SampleLimits,
}

impl ReportConfig {
    /// Create a new report configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the sample caps.
    pub fn with_limits(mut self, limits: SampleLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Load configuration from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
