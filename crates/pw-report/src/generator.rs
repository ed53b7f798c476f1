//! Statistics engine and report record.

use crate::config::{ReportConfig, SampleLimits};
use crate::error::{ReportError, Result};
use crate::sections::*;

use chrono::{DateTime, Utc};
use pw_archive::{ArchiveReader, ArchiveSource, DecodeOptions};
use pw_common::{Interval, SCHEMA_VERSION};
use pw_math::{DensityEstimate, GapAccumulator};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Complete statistics for one decoded archive.
///
/// Immutable once built; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatisticsReport {
    /// Report schema version.
    pub schema_version: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Set when the archive decoded to no primes.
    pub is_empty: bool,
    pub parameters: ParametersSection,
    pub summary: SummarySection,
    pub gaps: GapsSection,
    pub residue_distribution: ResidueDistribution,
    pub special_pairs: SpecialPairsSection,
    /// First primes in sequence order.
    pub prime_sample: Vec<u128>,
}

impl StatisticsReport {
    pub fn interval(&self) -> Option<Interval> {
        self.parameters.interval()
    }

    /// Check the structural rules every report obeys.
    ///
    /// Samples must respect `limits` and never exceed the counts they sample.
    pub fn validate(&self, limits: &SampleLimits) -> Result<()> {
        let expected_major = SCHEMA_VERSION.split('.').next();
        if self.schema_version.split('.').next() != expected_major {
            return Err(ReportError::SchemaMismatch {
                expected: SCHEMA_VERSION.to_string(),
                actual: self.schema_version.clone(),
            });
        }

        let invalid = |msg: String| Err(ReportError::InvalidReport(msg));

        if self.parameters.start > self.parameters.end {
            return invalid(format!(
                "interval start {} exceeds end {}",
                self.parameters.start, self.parameters.end
            ));
        }
        if self.is_empty != (self.summary.count == 0) {
            return invalid(format!(
                "is_empty is {} but count is {}",
                self.is_empty, self.summary.count
            ));
        }
        if self.parameters.loaded_element_count != self.summary.count {
            return invalid(format!(
                "loaded_element_count {} differs from count {}",
                self.parameters.loaded_element_count, self.summary.count
            ));
        }
        if self.residue_distribution.total() > self.summary.count {
            return invalid("residue counts exceed the prime count".to_string());
        }

        let gap_count = self.summary.count.saturating_sub(1);
        check_sample("gaps.sample", self.gaps.sample.len(), limits.gaps, gap_count)?;
        check_sample(
            "prime_sample",
            self.prime_sample.len(),
            limits.primes,
            self.summary.count,
        )?;
        if self.gaps.non_increasing > gap_count {
            return invalid(format!(
                "{} non-increasing steps but only {} gaps",
                self.gaps.non_increasing, gap_count
            ));
        }
        if self.special_pairs.total() > gap_count.saturating_sub(self.gaps.non_increasing) {
            return invalid("pair counts exceed the gap count".to_string());
        }
        for kind in pw_common::PairKind::ALL {
            let stats = self.special_pairs.get(kind);
            let name = format!("special_pairs.{}.sample", kind);
            check_sample(&name, stats.sample.len(), limits.pairs_per_kind, stats.count)?;
            if stats.sample.iter().any(|p| p.kind() != Some(kind)) {
                return invalid(format!("{} holds a pair that is not {}", name, kind));
            }
        }
        Ok(())
    }
}

fn check_sample(name: &str, len: usize, cap: usize, count: u64) -> Result<()> {
    if len > cap {
        return Err(ReportError::InvalidReport(format!(
            "{} has {} entries, limit is {}",
            name, len, cap
        )));
    }
    if len as u64 > count {
        return Err(ReportError::InvalidReport(format!(
            "{} has {} entries but only {} exist",
            name, len, count
        )));
    }
    Ok(())
}

/// Builds [`StatisticsReport`]s from decoded primes.
pub struct StatisticsEngine {
    config: ReportConfig,
}

impl StatisticsEngine {
    /// Create an engine with configuration.
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Create an engine with default configuration.
    pub fn default_config() -> Self {
        Self::new(ReportConfig::default())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Compute statistics over `primes` in a single pass.
    ///
    /// Aggregates cover every prime; only the samples are capped. An empty
    /// input yields a report flagged `is_empty` with zeroed figures.
    pub fn analyze(&self, primes: &[u128], interval: Interval) -> StatisticsReport {
        let limits = &self.config.limits;
        let count = primes.len() as u64;
        let parameters = ParametersSection::new(interval, count);

        if primes.is_empty() {
            debug!(start = %interval.start, end = %interval.end, "No primes to analyze");
            return StatisticsReport {
                schema_version: SCHEMA_VERSION.to_string(),
                generated_at: Utc::now(),
                is_empty: true,
                parameters,
                summary: SummarySection::default(),
                gaps: GapsSection::default(),
                residue_distribution: ResidueDistribution::default(),
                special_pairs: SpecialPairsSection::default(),
                prime_sample: Vec::new(),
            };
        }

        let mut gaps = GapAccumulator::new();
        let mut gap_sample = Vec::with_capacity(limits.gaps.min(primes.len()));
        let mut residues = ResidueDistribution::new();
        let mut pairs = SpecialPairsSection::default();
        let mut off_wheel = 0u64;

        for (index, &value) in primes.iter().enumerate() {
            if !residues.record(value) {
                off_wheel += 1;
            }
            if let Some(gap) = gaps.push(value) {
                if gap_sample.len() < limits.gaps {
                    gap_sample.push(gap);
                }
                let previous = primes[index - 1];
                if value > previous {
                    pairs.record(previous, value, gap, limits.pairs_per_kind);
                }
            }
        }

        if off_wheel > 0 {
            warn!(count = off_wheel, "Values outside the wheel residues were not counted");
        }
        if gaps.non_increasing() > 0 {
            warn!(
                count = gaps.non_increasing(),
                "Sequence is not strictly increasing; those steps form no pairs"
            );
        }

        let width = interval.width();
        let density = DensityEstimate::compute(count, width, interval.midpoint());
        let prime_sample = primes[..primes.len().min(limits.primes)].to_vec();

        debug!(
            count,
            gaps = gaps.count(),
            twin = pairs.twin.count,
            cousin = pairs.cousin.count,
            sexy = pairs.sexy.count,
            "Statistics computed"
        );

        StatisticsReport {
            schema_version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            is_empty: false,
            parameters,
            summary: SummarySection::new(count, width, density),
            gaps: GapsSection::new(gaps.summary(), gap_sample),
            residue_distribution: residues,
            special_pairs: pairs,
            prime_sample,
        }
    }

    /// Analyze and attach the archive's provenance.
    pub fn analyze_source(
        &self,
        primes: &[u128],
        interval: Interval,
        source: &ArchiveSource,
    ) -> StatisticsReport {
        let mut report = self.analyze(primes, interval);
        report.parameters.source_id = Some(source.id.clone());
        report.parameters.source_sha256 = Some(source.sha256.clone());
        report
    }

    /// Decode the archive behind `reader` and analyze it.
    pub fn generate_from_reader(
        &self,
        reader: &ArchiveReader,
        options: DecodeOptions,
    ) -> Result<StatisticsReport> {
        let decoded = reader.decode(options)?;
        let report =
            self.analyze_source(decoded.primes.as_slice(), decoded.interval, reader.source());

        info!(
            source = %reader.source().id,
            count = report.summary.count,
            is_empty = report.is_empty,
            "Report generated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_common::{PairKind, PrimePair};

    fn interval(start: u128, end: u128) -> Interval {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn analyzes_sparse_archive() {
        let engine = StatisticsEngine::default_config();
        let report = engine.analyze(&[11, 133], interval(10, 130));

        assert!(!report.is_empty);
        assert_eq!(report.summary.count, 2);
        assert_eq!(report.summary.width, 120);
        assert!((report.summary.density_real - 2.0 / 120.0 * 100.0).abs() < 1e-12);
        assert!((report.summary.density_theoretical - 100.0 / 70f64.ln()).abs() < 1e-12);
        assert_eq!(report.gaps.sample, vec![122]);
        assert_eq!((report.gaps.min, report.gaps.max), (122, 122));
        assert_eq!(report.gaps.mean, 122.0);
        assert_eq!(report.special_pairs.total(), 0);
        assert_eq!(report.residue_distribution.count(11), Some(1));
        assert_eq!(report.residue_distribution.count(13), Some(1));
        assert_eq!(report.prime_sample, vec![11, 133]);
        assert_eq!(report.parameters.root_bound, 12);
    }

    #[test]
    fn classifies_small_prime_pairs() {
        let engine = StatisticsEngine::default_config();
        let report = engine.analyze(&[11, 13, 17, 19], interval(10, 10));

        assert_eq!(report.gaps.sample, vec![2, 4, 2]);
        assert_eq!(report.special_pairs.twin.count, 2);
        assert_eq!(
            report.special_pairs.twin.sample,
            vec![PrimePair::new(11, 13), PrimePair::new(17, 19)]
        );
        assert_eq!(report.special_pairs.cousin.count, 1);
        assert_eq!(report.special_pairs.cousin.sample, vec![PrimePair::new(13, 17)]);
        assert_eq!(report.special_pairs.sexy.count, 0);
        // Zero width: real density guard.
        assert_eq!(report.summary.density_real, 0.0);
    }

    #[test]
    fn empty_input_is_flagged_not_an_error() {
        let engine = StatisticsEngine::default_config();
        let report = engine.analyze(&[], interval(10, 190));

        assert!(report.is_empty);
        assert_eq!(report.summary, SummarySection::default());
        assert_eq!(report.gaps, GapsSection::default());
        assert_eq!(report.residue_distribution.total(), 0);
        assert!(report.prime_sample.is_empty());
        assert_eq!((report.parameters.start, report.parameters.end), (10, 190));
        assert!(report.validate(&SampleLimits::default()).is_ok());
    }

    #[test]
    fn caps_samples_but_not_counts() {
        let limits = SampleLimits {
            gaps: 2,
            pairs_per_kind: 1,
            primes: 3,
        };
        let engine = StatisticsEngine::new(ReportConfig::new().with_limits(limits));
        let primes = [11, 13, 17, 19, 23, 29, 31, 37, 41, 43];
        let report = engine.analyze(&primes, interval(10, 10));

        assert_eq!(report.summary.count, 10);
        assert_eq!(report.gaps.sample, vec![2, 4]);
        assert_eq!(report.gaps.max, 6);
        assert_eq!(report.prime_sample, vec![11, 13, 17]);
        assert_eq!(report.special_pairs.twin.count, 4);
        assert_eq!(report.special_pairs.twin.sample.len(), 1);
        assert_eq!(report.special_pairs.cousin.count, 3);
        assert_eq!(report.special_pairs.get(PairKind::Sexy).count, 2);
        assert!(report.validate(&limits).is_ok());
    }

    #[test]
    fn off_wheel_values_are_skipped_in_distribution() {
        let engine = StatisticsEngine::default_config();
        let report = engine.analyze(&[11, 15, 17], interval(10, 10));
        assert_eq!(report.residue_distribution.total(), 2);
        assert_eq!(report.summary.count, 3);
    }

    #[test]
    fn backward_steps_form_no_pairs() {
        let engine = StatisticsEngine::default_config();
        let report = engine.analyze(&[17, 11, 11, 13], interval(10, 10));

        assert_eq!(report.gaps.sample, vec![6, 0, 2]);
        assert_eq!(report.gaps.non_increasing, 2);
        assert_eq!(report.special_pairs.sexy.count, 0);
        assert_eq!(report.special_pairs.twin.sample, vec![PrimePair::new(11, 13)]);
        assert!(report.validate(&SampleLimits::default()).is_ok());

        let mut r = report.clone();
        r.gaps.non_increasing = 4;
        assert!(r.validate(&SampleLimits::default()).is_err());
    }

    #[test]
    fn analysis_is_deterministic_apart_from_timestamp() {
        let engine = StatisticsEngine::default_config();
        let a = engine.analyze(&[11, 13, 17, 19, 71], interval(10, 70));
        let mut b = engine.analyze(&[11, 13, 17, 19, 71], interval(10, 70));
        b.generated_at = a.generated_at;
        assert_eq!(a, b);
    }

    #[test]
    fn validate_rejects_inconsistent_reports() {
        let engine = StatisticsEngine::default_config();
        let base = engine.analyze(&[11, 13, 17, 19], interval(10, 10));

        let mut r = base.clone();
        r.is_empty = true;
        assert!(matches!(
            r.validate(&SampleLimits::default()),
            Err(ReportError::InvalidReport(_))
        ));

        let mut r = base.clone();
        r.schema_version = "2.0.0".into();
        assert!(matches!(
            r.validate(&SampleLimits::default()),
            Err(ReportError::SchemaMismatch { .. })
        ));

        let mut r = base.clone();
        r.special_pairs.twin.sample.push(PrimePair::new(13, 17));
        assert!(r.validate(&SampleLimits::default()).is_err());

        let tight = SampleLimits {
            gaps: 1,
            ..SampleLimits::default()
        };
        assert!(base.validate(&tight).is_err());
    }

    #[test]
    fn generate_from_reader_records_provenance() {
        let reader = ArchiveReader::from_bytes(b"[[1, 3, 7], [], [3], 0]", "inline").unwrap();
        let engine = StatisticsEngine::default_config();
        let report = engine
            .generate_from_reader(&reader, DecodeOptions::default())
            .unwrap();
        assert_eq!(report.parameters.source_id.as_deref(), Some("inline"));
        assert_eq!(
            report.parameters.source_sha256.as_deref(),
            Some(reader.source().sha256.as_str())
        );
        assert_eq!(report.prime_sample, vec![11, 13, 17, 133]);
    }
}
