//! Report persistence.
//!
//! Reports are saved as pretty JSON and validated when loaded back, so a
//! saved report can be shown without the archive it came from.

use crate::config::SampleLimits;
use crate::error::Result;
use crate::generator::StatisticsReport;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info};

/// Write `report` to `path` as pretty JSON.
pub fn save_report(report: &StatisticsReport, path: &Path) -> Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    std::fs::write(path, &json)?;
    info!(path = %path.display(), bytes = json.len(), "Report saved");
    Ok(())
}

/// Load and validate a report written with the default sample limits.
pub fn load_report(path: &Path) -> Result<StatisticsReport> {
    load_report_with(path, &SampleLimits::default())
}

/// Load a report and validate it against `limits`.
pub fn load_report_with(path: &Path, limits: &SampleLimits) -> Result<StatisticsReport> {
    let data = std::fs::read(path)?;
    let report = report_from_slice(&data, limits)?;
    info!(path = %path.display(), count = report.summary.count, "Report loaded");
    Ok(report)
}

/// Parse and validate a report held in memory.
pub fn report_from_slice(data: &[u8], limits: &SampleLimits) -> Result<StatisticsReport> {
    let report: StatisticsReport = serde_json::from_slice(data)?;
    report.validate(limits)?;
    debug!(schema_version = %report.schema_version, "Report validated");
    Ok(report)
}

/// `stats_<stem>.json` for a known archive, otherwise a timestamped name.
pub fn default_report_file_name(stem: Option<&str>, now: DateTime<Utc>) -> String {
    match stem.map(str::trim).filter(|s| !s.is_empty()) {
        Some(stem) => format!("stats_{}.json", stem),
        None => format!("stats_{}.json", now.format("%Y%m%d_%H%M%S")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::generator::StatisticsEngine;
    use chrono::TimeZone;
    use pw_common::Interval;
    use tempfile::TempDir;

    fn sample_report() -> StatisticsReport {
        StatisticsEngine::default_config()
            .analyze(&[11, 13, 17, 19, 71, 73], Interval::new(10, 70).unwrap())
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        let report = sample_report();

        save_report(&report, &path).unwrap();
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn load_preserves_wide_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wide.json");
        let start: u128 = 1_234_567_890_123_456_789_012 * 60 + 10;
        let report = StatisticsEngine::default_config()
            .analyze(&[start + 1, start + 3], Interval::new(start, start).unwrap());

        save_report(&report, &path).unwrap();
        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.prime_sample, vec![start + 1, start + 3]);
        assert_eq!(loaded.special_pairs.twin.count, 1);
    }

    #[test]
    fn rejects_report_missing_a_residue() {
        let mut value = serde_json::to_value(sample_report()).unwrap();
        value["residue_distribution"]
            .as_object_mut()
            .unwrap()
            .remove("59");
        let bytes = serde_json::to_vec(&value).unwrap();
        let err = report_from_slice(&bytes, &SampleLimits::default()).unwrap_err();
        assert!(matches!(err, ReportError::JsonError(_)));
    }

    #[test]
    fn rejects_oversized_samples() {
        let report = sample_report();
        let bytes = serde_json::to_vec(&report).unwrap();
        let tight = SampleLimits {
            primes: 2,
            ..SampleLimits::default()
        };
        let err = report_from_slice(&bytes, &tight).unwrap_err();
        assert!(matches!(err, ReportError::InvalidReport(_)));
    }

    #[test]
    fn rejects_foreign_schema_version() {
        let mut report = sample_report();
        report.schema_version = "9.0.0".to_string();
        let bytes = serde_json::to_vec(&report).unwrap();
        let err = report_from_slice(&bytes, &SampleLimits::default()).unwrap_err();
        assert!(matches!(err, ReportError::SchemaMismatch { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_report(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ReportError::IoError(_)));
    }

    #[test]
    fn default_names() {
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            default_report_file_name(Some("primes_0"), now),
            "stats_primes_0.json"
        );
        assert_eq!(
            default_report_file_name(None, now),
            "stats_20240305_140709.json"
        );
        assert_eq!(
            default_report_file_name(Some("  "), now),
            "stats_20240305_140709.json"
        );
    }
}
