//! Error types for report generation and persistence.

use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while building, saving or loading reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Archive read or decode error.
    #[error("failed to read archive: {0}")]
    ArchiveError(#[from] pw_archive::ArchiveError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Loaded report breaks a structural rule.
    #[error("invalid report: {0}")]
    InvalidReport(String),

    /// Loaded report was written by an incompatible schema.
    #[error("report schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<ReportError> for pw_common::Error {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::ArchiveError(e) => e.into(),
            ReportError::JsonError(e) => pw_common::Error::InvalidReport(e.to_string()),
            ReportError::IoError(e) => pw_common::Error::Io(e),
            ReportError::InvalidReport(msg) => pw_common::Error::InvalidReport(msg),
            ReportError::SchemaMismatch { expected, actual } => {
                pw_common::Error::SchemaMismatch { expected, actual }
            }
            ReportError::InvalidConfig(msg) => pw_common::Error::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_common_codes() {
        let err: pw_common::Error = ReportError::InvalidReport("bad".into()).into();
        assert_eq!(err.code(), 30);

        let err: pw_common::Error = ReportError::SchemaMismatch {
            expected: "1.0.0".into(),
            actual: "2.0.0".into(),
        }
        .into();
        assert_eq!(err.code(), 31);

        let err: pw_common::Error = ReportError::InvalidConfig("zero".into()).into();
        assert_eq!(err.code(), 10);
    }
}
