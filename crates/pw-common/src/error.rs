//! Error types for Prime Wheel.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Malformed Archive
//!   Reason: malformed archive: bucket 3, position 1: expected a non-negative integer offset, found "x"
//!   Fix: Regenerate the archive, or inspect it with 'pw-core decode --strict <file>'.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 20,
//!   "category": "archive",
//!   "message": "malformed archive: archive is empty",
//!   "recoverable": false,
//!   "suggested_action": "inspect_archive"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Prime Wheel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings and config file errors.
    Config,
    /// Archive decoding errors.
    Archive,
    /// Report loading and validation errors.
    Report,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Archive => write!(f, "archive"),
            ErrorCategory::Report => write!(f, "report"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested follow-up for automation consuming errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Retry the operation.
    Retry,
    /// Fix or reset the settings file.
    FixConfig,
    /// Inspect or regenerate the archive.
    InspectArchive,
    /// Re-run the analysis from the archive.
    Reanalyze,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::FixConfig => write!(f, "fix_config"),
            SuggestedAction::InspectArchive => write!(f, "inspect_archive"),
            SuggestedAction::Reanalyze => write!(f, "reanalyze"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for Prime Wheel.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    // Archive errors (20-29)
    #[error("malformed archive: {0}")]
    MalformedArchive(String),

    #[error("archive not found: {path}")]
    ArchiveNotFound { path: String },

    // Report errors (30-39)
    #[error("invalid report: {0}")]
    InvalidReport(String),

    #[error("report schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch { expected: String, actual: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Archive errors
    /// - 30-39: Report errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSetting { .. } => 11,
            Error::MalformedArchive(_) => 20,
            Error::ArchiveNotFound { .. } => 21,
            Error::InvalidReport(_) => 30,
            Error::SchemaMismatch { .. } => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSetting { .. } => ErrorCategory::Config,
            Error::MalformedArchive(_) | Error::ArchiveNotFound { .. } => ErrorCategory::Archive,
            Error::InvalidReport(_) | Error::SchemaMismatch { .. } => ErrorCategory::Report,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable.
    ///
    /// Decoding and analysis are deterministic, so a malformed archive stays
    /// malformed; only environment problems are worth retrying.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) | Error::InvalidSetting { .. } => true,
            Error::MalformedArchive(_) => false,
            Error::ArchiveNotFound { .. } => true,
            Error::InvalidReport(_) | Error::SchemaMismatch { .. } => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
        }
    }

    /// Returns the suggested action for automation.
    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) | Error::InvalidSetting { .. } => SuggestedAction::FixConfig,
            Error::MalformedArchive(_) => SuggestedAction::InspectArchive,
            Error::ArchiveNotFound { .. } => SuggestedAction::ManualIntervention,
            Error::InvalidReport(_) | Error::SchemaMismatch { .. } => SuggestedAction::Reanalyze,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'pw-core config show' to see the resolved settings, or check the TOML syntax of the config file."
            }
            Error::InvalidSetting { .. } => {
                "Sample limits must be at least 1. Fix the value in the config file or environment."
            }
            Error::MalformedArchive(_) => {
                "Regenerate the archive, or inspect it with 'pw-core decode --strict <file>'."
            }
            Error::ArchiveNotFound { .. } => {
                "Check the path passed with --archive or PW_ARCHIVE, or pass the archive explicitly."
            }
            Error::InvalidReport(_) => {
                "The saved report is inconsistent. Re-run 'pw-core analyze <archive> --save'."
            }
            Error::SchemaMismatch { .. } => {
                "The report was written by an incompatible version. Re-run the analysis from the archive."
            }
            Error::Io(_) => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => {
                "Invalid JSON. Check syntax with 'jq . <file>' or regenerate the file."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidSetting { .. } => "Invalid Setting",
            Error::MalformedArchive(_) => "Malformed Archive",
            Error::ArchiveNotFound { .. } => "Archive Not Found",
            Error::InvalidReport(_) => "Invalid Report",
            Error::SchemaMismatch { .. } => "Report Schema Mismatch",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Suggested action for automation.
    pub suggested_action: SuggestedAction,

    /// Additional structured context (e.g., file path).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidSetting { key, .. } => {
                context.insert("key".to_string(), serde_json::json!(key));
            }
            Error::ArchiveNotFound { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::SchemaMismatch { expected, actual } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
