//! Archive writer.
//!
//! Packs an ascending list of primes into the compact form. It never checks
//! primality; whatever is pushed is what gets stored.

use crate::archive::{Bucket, CompactArchive, ReferenceValue};
use crate::{ArchiveError, Result};
use pw_common::{WHEEL_BASE_OFFSET, WHEEL_MODULUS};
use std::path::Path;
use tracing::{debug, info};

/// Upper bound on buckets a single writer will allocate.
pub const MAX_BUCKETS: usize = 1 << 26;

/// Incremental builder for a [`CompactArchive`].
#[derive(Debug, Clone)]
pub struct ArchiveWriter {
    reference: u128,
    start: u128,
    wrapped: bool,
    buckets: Vec<Bucket>,
    last: Option<u128>,
}

impl ArchiveWriter {
    /// Start an archive whose first bucket begins at `reference * 60 + 10`.
    pub fn new(reference: u128) -> Result<Self> {
        let start = reference
            .checked_mul(WHEEL_MODULUS)
            .and_then(|v| v.checked_add(WHEEL_BASE_OFFSET))
            .ok_or_else(|| ArchiveError::Encode {
                value: reference,
                reason: "reference value is too large".to_string(),
            })?;
        Ok(ArchiveWriter {
            reference,
            start,
            wrapped: false,
            buckets: Vec::new(),
            last: None,
        })
    }

    /// Encode an ascending list of primes in one go.
    ///
    /// The reference value is chosen so the first prime lands in bucket 0.
    pub fn for_primes(primes: &[u128]) -> Result<CompactArchive> {
        let first = primes.first().copied().unwrap_or(WHEEL_BASE_OFFSET);
        if first < WHEEL_BASE_OFFSET {
            return Err(ArchiveError::Encode {
                value: first,
                reason: format!("values below {} cannot be stored", WHEEL_BASE_OFFSET),
            });
        }
        let mut writer = Self::new((first - WHEEL_BASE_OFFSET) / WHEEL_MODULUS)?;
        for &prime in primes {
            writer.push(prime)?;
        }
        writer.finish()
    }

    /// Emit the reference value as `[rif]` instead of `rif`.
    pub fn with_wrapped_reference(mut self) -> Self {
        self.wrapped = true;
        self
    }

    /// First value the archive can hold.
    pub fn start(&self) -> u128 {
        self.start
    }

    /// Append the next prime. Values must be strictly increasing.
    pub fn push(&mut self, value: u128) -> Result<()> {
        if value < self.start {
            return Err(ArchiveError::Encode {
                value,
                reason: format!("below the archive start {}", self.start),
            });
        }
        if let Some(last) = self.last {
            if value <= last {
                return Err(ArchiveError::Encode {
                    value,
                    reason: format!("not greater than the previous value {}", last),
                });
            }
        }

        let distance = value - self.start;
        let index = usize::try_from(distance / WHEEL_MODULUS)
            .ok()
            .filter(|&i| i < MAX_BUCKETS)
            .ok_or_else(|| ArchiveError::Encode {
                value,
                reason: format!("more than {} buckets past the archive start", MAX_BUCKETS),
            })?;
        // Remainder of a division by 60 always fits.
        let offset = (distance % WHEEL_MODULUS) as u64;

        if self.buckets.len() <= index {
            self.buckets.resize_with(index + 1, Bucket::default);
        }
        self.buckets[index].push(offset);
        self.last = Some(value);
        Ok(())
    }

    /// Extend with empty buckets until there are at least `bucket_count`.
    pub fn pad_to(&mut self, bucket_count: usize) -> Result<()> {
        if bucket_count > MAX_BUCKETS {
            return Err(ArchiveError::Encode {
                value: bucket_count as u128,
                reason: format!("bucket count exceeds {}", MAX_BUCKETS),
            });
        }
        if self.buckets.len() < bucket_count {
            self.buckets.resize_with(bucket_count, Bucket::default);
        }
        Ok(())
    }

    /// Number of buckets allocated so far.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Build the archive. An empty writer yields a single empty bucket.
    pub fn finish(mut self) -> Result<CompactArchive> {
        if self.buckets.is_empty() {
            self.buckets.push(Bucket::default());
        }
        let reference = if self.wrapped {
            ReferenceValue::Wrapped(self.reference)
        } else {
            ReferenceValue::Scalar(self.reference)
        };
        let archive = CompactArchive::new(self.buckets, reference)?;
        // The last bucket's start must fit as well.
        archive.interval()?;
        debug!(
            buckets = archive.bucket_count(),
            offsets = archive.offset_count(),
            "Archive built"
        );
        Ok(archive)
    }

    /// Build the archive and serialize it.
    pub fn write_to_vec(self) -> Result<(Vec<u8>, CompactArchive)> {
        let archive = self.finish()?;
        let data = archive.to_json_vec()?;
        Ok((data, archive))
    }

    /// Build the archive and write it to `path`.
    pub fn write(self, path: &Path) -> Result<CompactArchive> {
        let (data, archive) = self.write_to_vec()?;
        std::fs::write(path, &data)?;
        info!(
            path = %path.display(),
            bytes = data.len(),
            buckets = archive.bucket_count(),
            "Archive written"
        );
        Ok(archive)
    }
}
