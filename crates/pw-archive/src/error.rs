//! Error types for archive operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, decoding or writing archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive file does not exist
    #[error("archive not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Bytes are not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON is valid but does not describe a wheel archive
    #[error("malformed archive: {0}")]
    Malformed(#[from] MalformedArchive),

    /// A value cannot be placed in the archive being written
    #[error("cannot encode {value}: {reason}")]
    Encode { value: u128, reason: String },
}

/// Structural problems with an archive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedArchive {
    #[error("archive is empty")]
    Empty,

    #[error("expected a list of buckets followed by a reference value, found {found}")]
    NotAList { found: String },

    #[error("archive has a reference value but no buckets")]
    NoBuckets,

    #[error("reference value: expected a non-negative integer or a single-element list, found {found}")]
    Reference { found: String },

    #[error("bucket {bucket}: expected a list of offsets, found {found}")]
    Bucket { bucket: usize, found: String },

    #[error("bucket {bucket}, position {position}: expected a non-negative integer offset, found {found}")]
    Offset {
        bucket: usize,
        position: usize,
        found: String,
    },

    #[error("bucket {bucket}, position {position}: offset {offset} does not land on a wheel residue")]
    OffsetOutsideWheel {
        bucket: usize,
        position: usize,
        offset: u64,
    },

    #[error("bucket {bucket}, position {position}: offsets must be strictly increasing")]
    UnorderedOffsets { bucket: usize, position: usize },

    #[error("bucket {bucket}: value exceeds the 128-bit range")]
    Overflow { bucket: usize },
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, ArchiveError>;

impl From<ArchiveError> for pw_common::Error {
    fn from(err: ArchiveError) -> Self {
        match err {
            ArchiveError::Io(e) => pw_common::Error::Io(e),
            ArchiveError::NotFound { path } => pw_common::Error::ArchiveNotFound {
                path: path.display().to_string(),
            },
            // An archive that is not JSON is still a malformed archive
            ArchiveError::Json(e) => {
                pw_common::Error::MalformedArchive(format!("invalid JSON: {}", e))
            }
            ArchiveError::Malformed(m) => pw_common::Error::MalformedArchive(m.to_string()),
            e @ ArchiveError::Encode { .. } => pw_common::Error::MalformedArchive(e.to_string()),
        }
    }
}

impl From<MalformedArchive> for pw_common::Error {
    fn from(err: MalformedArchive) -> Self {
        pw_common::Error::MalformedArchive(err.to_string())
    }
}
