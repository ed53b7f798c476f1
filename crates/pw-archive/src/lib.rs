//! Compact wheel-mod-60 prime archives.
//!
//! An archive lists which integers of a large interval are prime without
//! storing the integers themselves. It is a positional JSON list:
//!
//! ```text
//! [ [o, o, ...],   <- bucket 0: offsets inside [start, start + 60)
//!   [],            <- bucket 1
//!   [o, ...],      <- bucket 2
//!   rif ]          <- reference value, or [rif]
//! ```
//!
//! with `start = rif * 60 + 10` and each prime reconstructed as
//! `start + 60 * bucket + offset`.
//!
//! # Example
//!
//! ```
//! use pw_archive::{decode, CompactArchive};
//!
//! let archive = CompactArchive::from_json_slice(b"[[1], [], [3], 0]").unwrap();
//! let decoded = decode(&archive).unwrap();
//!
//! assert_eq!(decoded.interval.start, 10);
//! assert_eq!(decoded.interval.end, 130);
//! assert_eq!(decoded.primes.as_slice(), &[11, 133]);
//! ```

pub mod archive;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod writer;

pub use archive::{Bucket, CompactArchive, ReferenceValue};
pub use decoder::{decode, decode_with, DecodeOptions, DecodedArchive, PrimeSequence};
pub use error::{ArchiveError, MalformedArchive, Result};
pub use reader::{compute_sha256, ArchiveReader, ArchiveSource};
pub use writer::{ArchiveWriter, MAX_BUCKETS};
