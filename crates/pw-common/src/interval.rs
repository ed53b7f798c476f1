//! Covered numeric interval.

use crate::wheel::{WHEEL_BASE_OFFSET, WHEEL_MODULUS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed interval `[start, end]` described by an archive.
///
/// Invariant: `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Interval {
    /// First value of the interval.
    pub start: u128,
    /// Last value of the interval.
    pub end: u128,
}

impl Interval {
    /// Create an interval, returning `None` if `end < start`.
    pub fn new(start: u128, end: u128) -> Option<Self> {
        (end >= start).then_some(Interval { start, end })
    }

    /// Interval covered by `bucket_count` wheel buckets anchored at `reference`.
    ///
    /// `start = reference * 60 + 10`, `end = start + 60 * (bucket_count - 1)`.
    /// Returns `None` when `bucket_count == 0` or the bounds overflow `u128`.
    pub fn from_wheel(reference: u128, bucket_count: usize) -> Option<Self> {
        let last_bucket = u128::try_from(bucket_count.checked_sub(1)?).ok()?;
        let start = reference
            .checked_mul(WHEEL_MODULUS)?
            .checked_add(WHEEL_BASE_OFFSET)?;
        let end = start.checked_add(last_bucket.checked_mul(WHEEL_MODULUS)?)?;
        Some(Interval { start, end })
    }

    /// `end - start`.
    pub fn width(&self) -> u128 {
        self.end - self.start
    }

    /// `(start + end) / 2` as a float, computed without integer overflow.
    pub fn midpoint(&self) -> f64 {
        self.start as f64 / 2.0 + self.end as f64 / 2.0
    }

    /// `isqrt(end) + 1`, the trial-division bound for the interval.
    pub fn root_bound(&self) -> u128 {
        self.end.isqrt() + 1
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
