//! Summary section: count, width and densities.

use pw_math::DensityEstimate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Headline numbers of a report. All zero for an empty dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummarySection {
    /// Number of primes.
    pub count: u64,
    /// `end - start`.
    pub width: u128,
    /// Observed primes per 100 integers.
    pub density_real: f64,
    /// `100 / ln(midpoint)`.
    pub density_theoretical: f64,
    /// `density_real - density_theoretical`.
    pub density_difference: f64,
}

impl SummarySection {
    pub fn new(count: u64, width: u128, density: DensityEstimate) -> Self {
        Self {
            count,
            width,
            density_real: density.real,
            density_theoretical: density.theoretical,
            density_difference: density.difference,
        }
    }
}
