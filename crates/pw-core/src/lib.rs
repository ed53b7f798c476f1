//! Prime Wheel core library.
//!
//! Everything the `pw-core` binary needs besides argument parsing:
//! - `exit_codes`: the stable process exit contract
//! - `logging`: tracing setup with human or JSONL output on stderr
//! - `settings`: analysis settings resolved from flags, env and TOML
//! - `schema`: JSON Schema output for the persisted types
//! - `output`: JSON payloads of the non-report commands

pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod schema;
pub mod settings;

pub use exit_codes::ExitCode;
pub use output::{DecodeOutput, EncodeOutput};
pub use settings::{
    AnalysisSettings, ConfigSource, ResolvedSettings, SettingsError, SettingsOverrides,
};
