//! No-mock archive integration tests.
//!
//! Exercises real files and the full parse → decode path:
//! - Writer output reads back through `ArchiveReader`
//! - Scalar and wrapped reference forms decode identically
//! - Strict wheel mode accepts everything the writer emits from wheel values
//! - References beyond 64 bits survive a file round trip

use proptest::prelude::*;
use pw_archive::{
    decode, decode_with, ArchiveError, ArchiveReader, ArchiveWriter, CompactArchive,
    DecodeOptions, MalformedArchive,
};
use pw_common::{residue_of, WHEEL_RESIDUES};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

/// Ascending values on wheel residues, starting at `reference * 60 + 10`.
///
/// Each mask selects which of the 16 residues are present in one bucket.
fn wheel_values(reference: u128, masks: &[u16]) -> Vec<u128> {
    let start = reference * 60 + 10;
    let mut values = Vec::new();
    for (bucket, &mask) in masks.iter().enumerate() {
        let mut offsets: Vec<u128> = WHEEL_RESIDUES
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, &r)| (u128::from(r) + 50) % 60)
            .collect();
        offsets.sort_unstable();
        let base = start + 60 * bucket as u128;
        values.extend(offsets.into_iter().map(|o| base + o));
    }
    values
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write archive");
    path
}

// ============================================================================
// File round trips
// ============================================================================

#[test]
fn scalar_and_wrapped_files_decode_identically() {
    let dir = TempDir::new().unwrap();
    let scalar = write_file(&dir, "scalar.json", "[[1, 3], [], [7], 5]");
    let wrapped = write_file(&dir, "wrapped.json", "[[1, 3], [], [7], [5]]");

    let a = ArchiveReader::open(&scalar).unwrap();
    let b = ArchiveReader::open(&wrapped).unwrap();
    assert_ne!(a.source().sha256, b.source().sha256);
    assert_eq!(
        a.decode(DecodeOptions::default()).unwrap(),
        b.decode(DecodeOptions::default()).unwrap()
    );
}

#[test]
fn wide_reference_survives_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let reference: u128 = 9_876_543_210_987_654_321_098;
    let path = dir.path().join("wide.json");

    let mut writer = ArchiveWriter::new(reference).unwrap();
    let start = writer.start();
    writer.push(start + 1).unwrap();
    writer.push(start + 63).unwrap();
    writer.write(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("9876543210987654321098"));

    let decoded = ArchiveReader::open(&path)
        .unwrap()
        .decode(DecodeOptions::strict())
        .unwrap();
    assert_eq!(decoded.primes.as_slice(), &[start + 1, start + 63]);
    assert_eq!(decoded.interval.start, start);
    assert_eq!(decoded.interval.end, start + 60);
}

#[test]
fn malformed_file_reports_position() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.json", r#"[[1], [3, 2.5], 0]"#);
    match ArchiveReader::open(&path).unwrap_err() {
        ArchiveError::Malformed(MalformedArchive::Offset {
            bucket, position, ..
        }) => assert_eq!((bucket, position), (1, 1)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn truncated_file_is_a_json_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "cut.json", "[[1, 3, 7], [1");
    assert!(matches!(
        ArchiveReader::open(&path).unwrap_err(),
        ArchiveError::Json(_)
    ));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Writer output decodes to the values that were pushed, in order.
    #[test]
    fn writer_output_decodes_to_input(
        reference in 0u128..1_000_000_000_000_000_000_000,
        masks in prop::collection::vec(any::<u16>(), 1..40),
    ) {
        let values = wheel_values(reference, &masks);
        prop_assume!(!values.is_empty());

        let archive = ArchiveWriter::for_primes(&values).unwrap();
        let decoded = decode_with(&archive, DecodeOptions::strict()).unwrap();
        prop_assert_eq!(decoded.primes.as_slice(), values.as_slice());
        prop_assert!(decoded.primes.iter().all(|&v| decoded.interval.start <= v));
    }

    /// Every decoded value of a wheel archive sits on a wheel residue.
    #[test]
    fn decoded_residues_stay_on_wheel(
        reference in 0u128..1_000_000,
        masks in prop::collection::vec(any::<u16>(), 1..20),
    ) {
        let values = wheel_values(reference, &masks);
        prop_assume!(!values.is_empty());
        let archive = ArchiveWriter::for_primes(&values).unwrap();
        for v in decode(&archive).unwrap().primes.iter() {
            prop_assert!(WHEEL_RESIDUES.contains(&residue_of(*v)));
        }
    }

    /// Interval width is 60 per bucket beyond the first.
    #[test]
    fn interval_tracks_bucket_count(
        reference in 0u128..u64::MAX as u128,
        buckets in 1usize..200,
    ) {
        let mut json = String::from("[");
        for _ in 0..buckets {
            json.push_str("[],");
        }
        json.push_str(&reference.to_string());
        json.push(']');

        let archive = CompactArchive::from_json_str(&json).unwrap();
        let decoded = decode(&archive).unwrap();
        prop_assert!(decoded.primes.is_empty());
        prop_assert_eq!(decoded.interval.start, reference * 60 + 10);
        prop_assert_eq!(decoded.interval.width(), 60 * (buckets as u128 - 1));
    }

    /// Arbitrary bytes never panic the parser.
    #[test]
    fn parser_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if let Ok(archive) = CompactArchive::from_json_slice(&bytes) {
            let _ = decode_with(&archive, DecodeOptions::strict());
        }
    }
}
