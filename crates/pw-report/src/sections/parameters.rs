//! Parameters section: interval and provenance.

use pw_common::Interval;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What was analyzed and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParametersSection {
    /// First value of the interval.
    pub start: u128,
    /// Last bucket start of the interval.
    pub end: u128,
    /// Archive path or label, when known.
    pub source_id: Option<String>,
    /// Number of primes decoded from the archive.
    pub loaded_element_count: u64,
    /// Sieve bound of the producing run, `isqrt(end) + 1`.
    pub root_bound: u128,
    /// SHA-256 of the archive bytes, when read from bytes or a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,
}

impl ParametersSection {
    pub fn new(interval: Interval, loaded_element_count: u64) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            source_id: None,
            loaded_element_count,
            root_bound: interval.root_bound(),
            source_sha256: None,
        }
    }

    /// Interval described by `start` and `end`, if ordered.
    pub fn interval(&self) -> Option<Interval> {
        Interval::new(self.start, self.end)
    }
}
