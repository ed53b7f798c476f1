//! Archive reader.
//!
//! Reads an archive file in one scoped read, fingerprints the bytes and parses
//! them. Decoding stays a separate, I/O-free step.

use crate::decoder::{decode_with, DecodeOptions, DecodedArchive};
use crate::{ArchiveError, CompactArchive, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Where an archive came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ArchiveSource {
    /// Path or caller-supplied label.
    pub id: String,
    /// File stem, when the archive was read from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem: Option<String>,
    /// SHA-256 of the raw archive bytes (64 hex characters).
    pub sha256: String,
    /// Size of the raw archive in bytes.
    pub bytes: u64,
}

impl ArchiveSource {
    fn new(id: String, stem: Option<String>, data: &[u8]) -> Self {
        ArchiveSource {
            id,
            stem,
            sha256: compute_sha256(data),
            bytes: data.len() as u64,
        }
    }
}

/// Compute the hex SHA-256 of `data`.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// A parsed archive together with its provenance.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    archive: CompactArchive,
    source: ArchiveSource,
}

impl ArchiveReader {
    /// Read and parse an archive file.
    pub fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ArchiveError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ArchiveError::Io(e),
        })?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        let reader = Self::parse(&data, path.display().to_string(), stem)?;

        info!(
            path = %path.display(),
            bytes = reader.source.bytes,
            buckets = reader.archive.bucket_count(),
            offsets = reader.archive.offset_count(),
            "Archive opened"
        );
        Ok(reader)
    }

    /// Parse an archive held in memory.
    pub fn from_bytes(data: &[u8], source_id: impl Into<String>) -> Result<Self> {
        Self::parse(data, source_id.into(), None)
    }

    fn parse(data: &[u8], id: String, stem: Option<String>) -> Result<Self> {
        let source = ArchiveSource::new(id, stem, data);
        let archive = CompactArchive::from_json_slice(data)?;
        debug!(source = %source.id, sha256 = %source.sha256, "Archive parsed");
        Ok(ArchiveReader { archive, source })
    }

    pub fn archive(&self) -> &CompactArchive {
        &self.archive
    }

    pub fn source(&self) -> &ArchiveSource {
        &self.source
    }

    /// Decode the archive.
    pub fn decode(&self, options: DecodeOptions) -> Result<DecodedArchive> {
        Ok(decode_with(&self.archive, options)?)
    }

    pub fn into_parts(self) -> (CompactArchive, ArchiveSource) {
        (self.archive, self.source)
    }
}
