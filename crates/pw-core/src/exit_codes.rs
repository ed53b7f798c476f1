//! Exit codes for the pw-core CLI.
//!
//! Exit code ranges:
//! - 0-9: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/input errors (recoverable by user action)
//! - 20-29: Internal and environment errors

use pw_common::Error;

/// Exit codes for pw-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// The archive decoded to no primes; the report is degenerate
    EmptyDataset = 1,

    /// Invalid arguments
    ArgsError = 10,

    /// The archive does not follow the compact layout
    MalformedArchive = 11,

    /// A saved report failed validation or has a foreign schema
    ReportInvalid = 12,

    /// Settings could not be loaded or are out of range
    ConfigError = 13,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Codes below 10 describe the data, not a failure.
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Get the error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::EmptyDataset => "OK_EMPTY_DATASET",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::MalformedArchive => "ERR_MALFORMED_ARCHIVE",
            ExitCode::ReportInvalid => "ERR_REPORT_INVALID",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a workspace error.
    pub fn for_error(err: &Error) -> ExitCode {
        match err {
            Error::Config(_) | Error::InvalidSetting { .. } => ExitCode::ConfigError,
            Error::MalformedArchive(_) => ExitCode::MalformedArchive,
            Error::InvalidReport(_) | Error::SchemaMismatch { .. } => ExitCode::ReportInvalid,
            Error::ArchiveNotFound { .. } | Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        ExitCode::for_error(err)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
