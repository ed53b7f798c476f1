//! Archive decoding.
//!
//! Reconstructs `start + 60 * bucket + offset` for every offset, in bucket
//! order and then archive order inside each bucket. Nothing is sorted or
//! deduplicated.

use crate::archive::CompactArchive;
use crate::error::MalformedArchive;
use pw_common::{residue_index, Interval, WHEEL_MODULUS};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered primes reconstructed from an archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PrimeSequence(Vec<u128>);

impl PrimeSequence {
    pub fn as_slice(&self) -> &[u128] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, u128> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<u128> {
        self.0
    }
}

impl From<Vec<u128>> for PrimeSequence {
    fn from(values: Vec<u128>) -> Self {
        PrimeSequence(values)
    }
}

impl<'a> IntoIterator for &'a PrimeSequence {
    type Item = &'a u128;
    type IntoIter = std::slice::Iter<'a, u128>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Decoder behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject offsets whose value is not on a wheel residue, and offsets that
    /// are not strictly increasing inside their bucket.
    pub strict_wheel: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        DecodeOptions { strict_wheel: true }
    }
}

/// Result of decoding an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArchive {
    pub interval: Interval,
    pub primes: PrimeSequence,
}

impl DecodedArchive {
    pub fn into_parts(self) -> (Interval, PrimeSequence) {
        (self.interval, self.primes)
    }
}

/// Decode an archive, reproducing offsets as stored.
pub fn decode(archive: &CompactArchive) -> Result<DecodedArchive, MalformedArchive> {
    decode_with(archive, DecodeOptions::default())
}

/// Decode an archive with explicit options.
pub fn decode_with(
    archive: &CompactArchive,
    options: DecodeOptions,
) -> Result<DecodedArchive, MalformedArchive> {
    let interval = archive.interval()?;
    let mut primes = Vec::with_capacity(archive.offset_count());

    for (index, bucket) in archive.buckets().iter().enumerate() {
        let overflow = || MalformedArchive::Overflow { bucket: index };
        // start + 60 * index <= end, which the interval already proved fits.
        let base = interval.start + WHEEL_MODULUS * index as u128;

        let mut previous: Option<u64> = None;
        for (position, &offset) in bucket.offsets().iter().enumerate() {
            let value = base.checked_add(u128::from(offset)).ok_or_else(overflow)?;
            if options.strict_wheel {
                check_wheel_offset(index, position, offset, value, previous)?;
            }
            previous = Some(offset);
            primes.push(value);
        }
    }

    debug!(
        buckets = archive.bucket_count(),
        primes = primes.len(),
        start = %interval.start,
        end = %interval.end,
        strict = options.strict_wheel,
        "Archive decoded"
    );

    Ok(DecodedArchive {
        interval,
        primes: PrimeSequence(primes),
    })
}

fn check_wheel_offset(
    bucket: usize,
    position: usize,
    offset: u64,
    value: u128,
    previous: Option<u64>,
) -> Result<(), MalformedArchive> {
    if u128::from(offset) >= WHEEL_MODULUS || residue_index(value % WHEEL_MODULUS).is_none() {
        return Err(MalformedArchive::OffsetOutsideWheel {
            bucket,
            position,
            offset,
        });
    }
    if previous.is_some_and(|p| p >= offset) {
        return Err(MalformedArchive::UnorderedOffsets { bucket, position });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(json: &str) -> CompactArchive {
        CompactArchive::from_json_str(json).unwrap()
    }

    #[test]
    fn decodes_sparse_buckets() {
        let decoded = decode(&archive("[[1], [], [3], 0]")).unwrap();
        assert_eq!(decoded.interval.start, 10);
        assert_eq!(decoded.interval.end, 130);
        assert_eq!(decoded.primes.as_slice(), &[11, 133]);
    }

    #[test]
    fn wrapped_and_scalar_reference_decode_identically() {
        let scalar = decode(&archive("[[1, 3, 7], [1], 5]")).unwrap();
        let wrapped = decode(&archive("[[1, 3, 7], [1], [5]]")).unwrap();
        assert_eq!(scalar, wrapped);
        assert_eq!(scalar.interval.start, 310);
        assert_eq!(scalar.primes.as_slice(), &[311, 313, 317, 371]);
    }

    #[test]
    fn all_empty_buckets_decode_to_nothing() {
        let decoded = decode(&archive("[[], [], [], 2]")).unwrap();
        assert!(decoded.primes.is_empty());
        assert_eq!(decoded.interval.width(), 120);
    }

    #[test]
    fn keeps_archive_order_within_bucket() {
        let decoded = decode(&archive("[[7, 1], 0]")).unwrap();
        assert_eq!(decoded.primes.as_slice(), &[17, 11]);
    }

    #[test]
    fn keeps_duplicates() {
        let decoded = decode(&archive("[[1, 1], 0]")).unwrap();
        assert_eq!(decoded.primes.as_slice(), &[11, 11]);
    }

    #[test]
    fn decoding_is_deterministic() {
        let a = archive("[[1, 3, 7, 9], [], [1, 7], [19]]");
        assert_eq!(decode(&a).unwrap(), decode(&a).unwrap());
    }

    #[test]
    fn decodes_22_digit_values_exactly() {
        let decoded = decode(&archive("[[1], [3], 1234567890123456789012]")).unwrap();
        let start: u128 = 1_234_567_890_123_456_789_012 * 60 + 10;
        assert_eq!(decoded.primes.as_slice(), &[start + 1, start + 63]);
        assert!(start.to_string().len() >= 22);
    }

    #[test]
    fn offset_overflow_is_malformed() {
        let a = CompactArchive::new(
            vec![crate::Bucket::new(vec![u64::MAX])],
            crate::ReferenceValue::Scalar((u128::MAX - 10) / 60),
        )
        .unwrap();
        assert!(matches!(
            decode(&a),
            Err(MalformedArchive::Overflow { bucket: 0 })
        ));
    }

    #[test]
    fn strict_accepts_wheel_offsets() {
        let decoded = decode_with(&archive("[[1, 3, 7, 9], [], [3], 0]"), DecodeOptions::strict())
            .unwrap();
        assert_eq!(decoded.primes.as_slice(), &[11, 13, 17, 19, 133]);
    }

    #[test]
    fn strict_rejects_off_wheel_offsets() {
        // 10 + 5 = 15 is divisible by 5.
        let err = decode_with(&archive("[[1, 5], 0]"), DecodeOptions::strict()).unwrap_err();
        assert_eq!(
            err,
            MalformedArchive::OffsetOutsideWheel {
                bucket: 0,
                position: 1,
                offset: 5
            }
        );

        let err = decode_with(&archive("[[61], 0]"), DecodeOptions::strict()).unwrap_err();
        assert!(matches!(err, MalformedArchive::OffsetOutsideWheel { .. }));
    }

    #[test]
    fn strict_rejects_unordered_offsets() {
        let err = decode_with(&archive("[[7, 1], 0]"), DecodeOptions::strict()).unwrap_err();
        assert_eq!(
            err,
            MalformedArchive::UnorderedOffsets {
                bucket: 0,
                position: 1
            }
        );
    }

    #[test]
    fn lenient_reproduces_off_wheel_offsets() {
        let decoded = decode(&archive("[[5, 61], 0]")).unwrap();
        assert_eq!(decoded.primes.as_slice(), &[15, 71]);
    }

    #[test]
    fn into_parts_returns_interval_and_primes() {
        let (interval, primes) = decode(&archive("[[1], 0]")).unwrap().into_parts();
        assert_eq!(interval.width(), 0);
        assert_eq!(primes.into_vec(), vec![11]);
    }
}
