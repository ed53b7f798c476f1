//! Property-based tests for pw-math.
//!
//! Uses proptest to verify the density guards and gap accumulator hold across
//! many random inputs.

use proptest::prelude::*;
use pw_math::{real_density, theoretical_density, DensityEstimate, GapAccumulator};

// ============================================================================
// Density properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Zero width always yields zero real density.
    #[test]
    fn real_density_zero_width(count in 0u64..u64::MAX) {
        prop_assert_eq!(real_density(count, 0), 0.0);
    }

    /// Real density is finite and non-negative for any non-zero width.
    #[test]
    fn real_density_finite(count in 0u64..1_000_000, width in 1u128..u128::MAX) {
        let d = real_density(count, width);
        prop_assert!(d.is_finite());
        prop_assert!(d >= 0.0);
    }

    /// Midpoints at or below 1 never reach the logarithm.
    #[test]
    fn theoretical_density_guard(mid in -1.0e12..=1.0f64) {
        prop_assert_eq!(theoretical_density(mid), 0.0);
    }

    /// Above the guard, the prediction is positive and decreasing.
    #[test]
    fn theoretical_density_decreasing(a in 2.0..1.0e30f64, factor in 1.5..100.0f64) {
        let b = a * factor;
        let da = theoretical_density(a);
        let db = theoretical_density(b);
        prop_assert!(da > 0.0 && db > 0.0);
        prop_assert!(db < da, "density({}) = {} not < density({}) = {}", b, db, a, da);
    }

    /// Difference carries the sign of real - theoretical.
    #[test]
    fn estimate_difference_consistent(count in 0u64..10_000, width in 0u128..1_000_000, mid in 0.0..1.0e9f64) {
        let est = DensityEstimate::compute(count, width, mid);
        prop_assert_eq!(est.difference, est.real - est.theoretical);
    }
}

// ============================================================================
// Gap accumulator properties
// ============================================================================

fn ascending(max_len: usize) -> impl Strategy<Value = Vec<u128>> {
    (any::<u64>(), prop::collection::vec(1u64..10_000, 0..max_len)).prop_map(|(start, steps)| {
        let mut value = start as u128;
        let mut out = vec![value];
        for step in steps {
            value += step as u128;
            out.push(value);
        }
        out
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// One gap per adjacent pair, each strictly positive.
    #[test]
    fn gap_count_matches_pairs(values in ascending(200)) {
        let mut acc = GapAccumulator::new();
        let gaps: Vec<u128> = values.iter().filter_map(|&v| acc.push(v)).collect();
        prop_assert_eq!(gaps.len(), values.len() - 1);
        prop_assert_eq!(acc.count() as usize, values.len() - 1);
        prop_assert!(gaps.iter().all(|&g| g > 0));
    }

    /// Gaps telescope: their sum is last - first.
    #[test]
    fn gap_sum_telescopes(values in ascending(200)) {
        let mut acc = GapAccumulator::new();
        for &v in &values {
            acc.push(v);
        }
        prop_assert_eq!(acc.total(), values[values.len() - 1] - values[0]);
    }

    /// min <= mean <= max whenever there is at least one gap.
    #[test]
    fn mean_between_extremes(values in ascending(200)) {
        prop_assume!(values.len() >= 2);
        let mut acc = GapAccumulator::new();
        for &v in &values {
            acc.push(v);
        }
        let s = acc.summary();
        prop_assert!(s.min as f64 <= s.mean + 1e-9);
        prop_assert!(s.mean <= s.max as f64 + 1e-9);
    }
}
