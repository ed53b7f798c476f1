//! JSON payloads of the commands that do not emit a report.

use pw_archive::ArchiveSource;
use pw_common::{Interval, SCHEMA_VERSION};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output of `pw-core decode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DecodeOutput {
    pub schema_version: String,
    pub source: ArchiveSource,
    pub interval: Interval,
    /// Number of decoded values.
    pub count: u64,
    /// Whether `primes` was cut short by `--limit`.
    pub truncated: bool,
    /// Decoded values in archive order.
    pub primes: Vec<u128>,
}

impl DecodeOutput {
    /// Build from a full decode, keeping at most `limit` values.
    pub fn new(
        source: ArchiveSource,
        interval: Interval,
        primes: &[u128],
        limit: Option<usize>,
    ) -> Self {
        let shown = limit.map_or(primes.len(), |l| l.min(primes.len()));
        DecodeOutput {
            schema_version: SCHEMA_VERSION.to_string(),
            source,
            interval,
            count: primes.len() as u64,
            truncated: shown < primes.len(),
            primes: primes[..shown].to_vec(),
        }
    }
}

/// Output of `pw-core encode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EncodeOutput {
    pub schema_version: String,
    /// Where the archive was written.
    pub path: String,
    pub reference: u128,
    pub interval: Interval,
    pub bucket_count: u64,
    pub prime_count: u64,
    pub sha256: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> ArchiveSource {
        pw_archive::ArchiveReader::from_bytes(b"[[1, 3], 0]", "inline")
            .unwrap()
            .source()
            .clone()
    }

    #[test]
    fn limit_truncates() {
        let interval = Interval::new(10, 10).unwrap();
        let out = DecodeOutput::new(source(), interval, &[11, 13, 17], Some(2));
        assert_eq!(out.count, 3);
        assert!(out.truncated);
        assert_eq!(out.primes, vec![11, 13]);
    }

    #[test]
    fn no_limit_keeps_everything() {
        let interval = Interval::new(10, 10).unwrap();
        let out = DecodeOutput::new(source(), interval, &[11, 13], None);
        assert!(!out.truncated);
        assert_eq!(out.primes.len(), 2);

        let out = DecodeOutput::new(source(), interval, &[11, 13], Some(10));
        assert!(!out.truncated);
    }
}
