//! Streaming gap statistics.
//!
//! `GapAccumulator` folds consecutive values one at a time so the full gap
//! list never has to be materialized.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum, maximum and mean of a gap list.
///
/// All fields are zero for an empty gap list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct GapSummary {
    pub min: u128,
    pub max: u128,
    pub mean: f64,
    /// Steps where a value did not exceed its predecessor.
    #[serde(default)]
    pub non_increasing: u64,
}

/// Running gap statistics over an ascending sequence.
#[derive(Debug, Clone, Default)]
pub struct GapAccumulator {
    previous: Option<u128>,
    count: u64,
    min: Option<u128>,
    max: Option<u128>,
    sum: u128,
    non_increasing: u64,
}

impl GapAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next value; returns the gap to the previous value, if any.
    ///
    /// Input is expected to be strictly increasing. A non-increasing step is
    /// recorded as its absolute difference and counted in
    /// [`GapAccumulator::non_increasing`].
    pub fn push(&mut self, value: u128) -> Option<u128> {
        let gap = self.previous.map(|prev| value.abs_diff(prev));
        if self.previous.is_some_and(|prev| value <= prev) {
            self.non_increasing += 1;
        }
        self.previous = Some(value);

        if let Some(gap) = gap {
            self.count += 1;
            self.min = Some(self.min.map_or(gap, |m| m.min(gap)));
            self.max = Some(self.max.map_or(gap, |m| m.max(gap)));
            self.sum = self.sum.saturating_add(gap);
        }
        gap
    }

    /// Number of gaps seen (values pushed minus one).
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Steps that went backwards or repeated a value.
    pub fn non_increasing(&self) -> u64 {
        self.non_increasing
    }

    /// Sum of all gaps.
    pub fn total(&self) -> u128 {
        self.sum
    }

    /// Arithmetic mean of the gaps, 0 when there are none.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum as f64 / self.count as f64
    }

    pub fn summary(&self) -> GapSummary {
        GapSummary {
            min: self.min.unwrap_or(0),
            max: self.max.unwrap_or(0),
            mean: self.mean(),
            non_increasing: self.non_increasing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(values: &[u128]) -> (GapAccumulator, Vec<u128>) {
        let mut acc = GapAccumulator::new();
        let gaps = values.iter().filter_map(|&v| acc.push(v)).collect();
        (acc, gaps)
    }

    #[test]
    fn empty_summary_is_zero() {
        let acc = GapAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.summary(), GapSummary::default());
    }

    #[test]
    fn single_value_has_no_gap() {
        let (acc, gaps) = feed(&[11]);
        assert!(gaps.is_empty());
        assert_eq!(acc.summary(), GapSummary::default());
    }

    #[test]
    fn gaps_of_small_primes() {
        let (acc, gaps) = feed(&[11, 13, 17, 19]);
        assert_eq!(gaps, vec![2, 4, 2]);
        let s = acc.summary();
        assert_eq!(s.min, 2);
        assert_eq!(s.max, 4);
        assert!((s.mean - 8.0 / 3.0).abs() < 1e-12);
        assert_eq!(acc.total(), 8);
    }

    #[test]
    fn single_gap() {
        let (acc, gaps) = feed(&[11, 133]);
        assert_eq!(gaps, vec![122]);
        let s = acc.summary();
        assert_eq!((s.min, s.max), (122, 122));
        assert_eq!(s.mean, 122.0);
    }

    #[test]
    fn non_increasing_step_does_not_panic() {
        let (acc, gaps) = feed(&[20, 10]);
        assert_eq!(gaps, vec![10]);
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.non_increasing(), 1);
    }

    #[test]
    fn repeated_and_backward_steps_are_counted() {
        let (acc, gaps) = feed(&[11, 11, 17, 13, 19]);
        assert_eq!(gaps, vec![0, 6, 4, 6]);
        assert_eq!(acc.summary().non_increasing, 2);

        let (acc, _) = feed(&[11, 13, 17]);
        assert_eq!(acc.non_increasing(), 0);
    }

    #[test]
    fn large_values_keep_exact_gaps() {
        let base: u128 = 10u128.pow(22);
        let (acc, gaps) = feed(&[base + 1, base + 7, base + 13]);
        assert_eq!(gaps, vec![6, 6]);
        assert_eq!(acc.summary().mean, 6.0);
    }
}
