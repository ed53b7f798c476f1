//! Prime Wheel common types, constants, and errors.
//!
//! This crate provides foundational types shared across the workspace:
//! - The wheel-mod-60 layout (modulus, base offset, the 16 coprime residues)
//! - The covered numeric `Interval`
//! - Close prime pair classification (`PairKind`, `PrimePair`)
//! - Common error types with stable codes
//! - Output formats

pub mod error;
pub mod interval;
pub mod output;
pub mod pairs;
pub mod wheel;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use interval::Interval;
pub use output::OutputFormat;
pub use pairs::{PairKind, PrimePair};
pub use wheel::{residue_index, residue_of, WHEEL_BASE_OFFSET, WHEEL_MODULUS, WHEEL_RESIDUES};

/// Schema version for serialized reports and archives.
pub const SCHEMA_VERSION: &str = "1.0.0";
