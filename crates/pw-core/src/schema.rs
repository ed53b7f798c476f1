//! JSON Schema generation for persisted and emitted types.
//!
//! ```bash
//! # List available schema types
//! pw-core schema --list
//!
//! # Generate schema for a specific type
//! pw-core schema StatisticsReport
//! ```

use crate::output::{DecodeOutput, EncodeOutput};
use crate::settings::AnalysisSettings;
use pw_archive::{ArchiveSource, CompactArchive};
use pw_common::{Interval, PairKind, PrimePair, StructuredError};
use pw_report::sections::{
    GapsSection, ParametersSection, ResidueDistribution, SpecialPairsSection, SummarySection,
};
use pw_report::{SampleLimits, StatisticsReport};
use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        // Archive
        ("CompactArchive", "Wheel-compressed prime archive: buckets then reference"),
        ("ArchiveSource", "Archive provenance: id, stem, SHA-256, size"),
        ("Interval", "Inclusive numeric interval covered by an archive"),
        // Report
        ("StatisticsReport", "Complete statistics report"),
        ("ParametersSection", "Interval and provenance of a report"),
        ("SummarySection", "Count, width and densities"),
        ("GapsSection", "Gap extremes, mean and sample"),
        ("ResidueDistribution", "Prime count per residue modulo 60"),
        ("SpecialPairsSection", "Twin, cousin and sexy prime pairs"),
        ("PrimePair", "Two consecutive primes"),
        ("PairKind", "Pair classification by gap"),
        // Configuration
        ("AnalysisSettings", "Settings file (config.toml)"),
        ("SampleLimits", "Caps on stored samples"),
        // Command payloads
        ("DecodeOutput", "Output of 'decode'"),
        ("EncodeOutput", "Output of 'encode'"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns `None` if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "CompactArchive" => schema_for!(CompactArchive),
        "ArchiveSource" => schema_for!(ArchiveSource),
        "Interval" => schema_for!(Interval),
        "StatisticsReport" => schema_for!(StatisticsReport),
        "ParametersSection" => schema_for!(ParametersSection),
        "SummarySection" => schema_for!(SummarySection),
        "GapsSection" => schema_for!(GapsSection),
        "ResidueDistribution" => schema_for!(ResidueDistribution),
        "SpecialPairsSection" => schema_for!(SpecialPairsSection),
        "PrimePair" => schema_for!(PrimePair),
        "PairKind" => schema_for!(PairKind),
        "AnalysisSettings" => schema_for!(AnalysisSettings),
        "SampleLimits" => schema_for!(SampleLimits),
        "DecodeOutput" => schema_for!(DecodeOutput),
        "EncodeOutput" => schema_for!(EncodeOutput),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}

/// Error payload for an unknown schema name.
pub fn unknown_schema_error(name: &str) -> StructuredError {
    let err = pw_common::Error::Config(format!("unknown schema type '{}'", name));
    StructuredError::from(&err).with_context(
        "available",
        available_schemas()
            .iter()
            .map(|(n, _)| *n)
            .collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_schemas_generate() {
        for (name, _desc) in available_schemas() {
            let schema = generate_schema(name);
            assert!(schema.is_some(), "Schema for '{}' should generate", name);
        }
    }

    #[test]
    fn test_unknown_schema_returns_none() {
        assert!(generate_schema("UnknownType").is_none());
        assert!(generate_schema("").is_none());
    }

    #[test]
    fn report_schema_lists_sections() {
        let schema = generate_schema("StatisticsReport").unwrap();
        let props = schema["properties"].as_object().unwrap();
        for key in [
            "parameters",
            "summary",
            "gaps",
            "residue_distribution",
            "special_pairs",
            "prime_sample",
        ] {
            assert!(props.contains_key(key), "missing {}", key);
        }
    }

    #[test]
    fn residue_schema_requires_all_keys() {
        let schema = generate_schema("ResidueDistribution").unwrap();
        assert_eq!(schema["required"].as_array().unwrap().len(), 16);
    }

    #[test]
    fn test_generate_all_schemas() {
        let all = generate_all_schemas();
        assert_eq!(all.len(), available_schemas().len());
        assert!(all.contains_key("CompactArchive"));
        assert!(all.contains_key("AnalysisSettings"));
    }

    #[test]
    fn unknown_schema_error_lists_names() {
        let err = unknown_schema_error("Nope");
        assert_eq!(err.code, 10);
        assert!(err.message.contains("Nope"));
        assert!(err.context.contains_key("available"));
    }
}
