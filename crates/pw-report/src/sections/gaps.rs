//! Gaps section.

use pw_math::GapSummary;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gap statistics over the full gap list plus a capped sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GapsSection {
    pub min: u128,
    pub max: u128,
    pub mean: f64,
    /// Steps where a value did not exceed its predecessor. Their gaps are
    /// kept as magnitudes and never classified as pairs.
    #[serde(default)]
    pub non_increasing: u64,
    /// First gaps in sequence order.
    pub sample: Vec<u128>,
}

impl GapsSection {
    pub fn new(summary: GapSummary, sample: Vec<u128>) -> Self {
        Self {
            min: summary.min,
            max: summary.max,
            mean: summary.mean,
            non_increasing: summary.non_increasing,
            sample,
        }
    }
}
