//! Observed vs. predicted prime density, with domain guards.
//!
//! Both densities are percentages. The prediction is the Prime Number
//! Theorem's local density `1 / ln(x)` evaluated at the interval midpoint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Percentage of integers in an interval of `width` that are prime.
///
/// Returns 0 when `width == 0`.
pub fn real_density(count: u64, width: u128) -> f64 {
    if width == 0 {
        return 0.0;
    }
    (count as f64 / width as f64) * 100.0
}

/// Prime Number Theorem density `100 / ln(midpoint)`.
///
/// Returns 0 when `midpoint <= 1` (or NaN), where the logarithm is
/// non-positive or undefined.
pub fn theoretical_density(midpoint: f64) -> f64 {
    if midpoint.is_nan() || midpoint <= 1.0 {
        return 0.0;
    }
    (1.0 / midpoint.ln()) * 100.0
}

/// Real and theoretical density of one interval.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct DensityEstimate {
    /// Observed density in percent.
    pub real: f64,
    /// Predicted density in percent.
    pub theoretical: f64,
    /// `real - theoretical`; positive means denser than predicted.
    pub difference: f64,
}

impl DensityEstimate {
    /// Compute both densities for `count` primes in an interval.
    pub fn compute(count: u64, width: u128, midpoint: f64) -> Self {
        let real = real_density(count, width);
        let theoretical = theoretical_density(midpoint);
        DensityEstimate {
            real,
            theoretical,
            difference: real - theoretical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn real_density_zero_width() {
        assert_eq!(real_density(5, 0), 0.0);
        assert_eq!(real_density(0, 0), 0.0);
    }

    #[test]
    fn real_density_basic() {
        assert!(approx_eq(real_density(2, 120), 2.0 / 120.0 * 100.0, 1e-12));
        assert!(approx_eq(real_density(25, 100), 25.0, 1e-12));
    }

    #[test]
    fn real_density_huge_width_is_finite() {
        let d = real_density(1_000_000, u128::MAX);
        assert!(d.is_finite());
        assert!(d > 0.0);
    }

    #[test]
    fn theoretical_density_guards() {
        assert_eq!(theoretical_density(1.0), 0.0);
        assert_eq!(theoretical_density(0.5), 0.0);
        assert_eq!(theoretical_density(0.0), 0.0);
        assert_eq!(theoretical_density(-10.0), 0.0);
        assert_eq!(theoretical_density(f64::NAN), 0.0);
    }

    #[test]
    fn theoretical_density_known_value() {
        let e = std::f64::consts::E;
        assert!(approx_eq(theoretical_density(e), 100.0, 1e-10));
        assert!(approx_eq(theoretical_density(70.0), 100.0 / 70.0f64.ln(), 1e-12));
    }

    #[test]
    fn theoretical_density_near_one_is_large_but_finite() {
        let d = theoretical_density(1.0 + 1e-9);
        assert!(d.is_finite());
        assert!(d > 1e9);
    }

    #[test]
    fn estimate_difference_sign() {
        let est = DensityEstimate::compute(2, 120, 70.0);
        assert!(approx_eq(est.difference, est.real - est.theoretical, 1e-15));
        assert!(est.difference < 0.0);

        let dense = DensityEstimate::compute(30, 100, 60.0);
        assert!(dense.difference > 0.0);
    }

    #[test]
    fn estimate_default_is_zero() {
        let est = DensityEstimate::default();
        assert_eq!(est.real, 0.0);
        assert_eq!(est.theoretical, 0.0);
        assert_eq!(est.difference, 0.0);
    }
}
