//! Statistics over decoded prime wheel archives.
//!
//! Turns the ordered primes of an archive into a fixed-schema
//! [`StatisticsReport`], persists reports as JSON and renders them for the
//! terminal.
//!
//! # Sections
//!
//! - Parameters: interval, provenance, root bound
//! - Summary: count, width, real and theoretical density
//! - Gaps: min, max, mean and a capped sample
//! - Residues: count per wheel residue modulo 60
//! - Special pairs: twin, cousin and sexy primes with full counts
//!
//! # Example
//!
//! ```
//! use pw_archive::{ArchiveReader, DecodeOptions};
//! use pw_report::StatisticsEngine;
//!
//! let reader = ArchiveReader::from_bytes(b"[[1, 3, 7, 9], 0]", "inline").unwrap();
//! let engine = StatisticsEngine::default_config();
//! let report = engine.generate_from_reader(&reader, DecodeOptions::default()).unwrap();
//!
//! assert_eq!(report.summary.count, 4);
//! assert_eq!(report.special_pairs.twin.count, 2);
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod render;
pub mod sections;
pub mod store;

pub use config::{ReportConfig, SampleLimits};
pub use error::{ReportError, Result};
pub use generator::{StatisticsEngine, StatisticsReport};
pub use render::{group_digits, render, render_markdown, render_summary};
pub use store::{
    default_report_file_name, load_report, load_report_with, report_from_slice, save_report,
};
