//! Fuzz target for the archive writer.
//!
//! Whatever the writer accepts must decode back to the same values.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pw_archive::{ArchiveReader, ArchiveWriter, DecodeOptions};

#[derive(Debug, Arbitrary)]
struct Input {
    reference: u64,
    /// Distances between consecutive values.
    steps: Vec<u16>,
    pad_to: Option<u8>,
    wrapped: bool,
}

fuzz_target!(|input: Input| {
    let Ok(mut writer) = ArchiveWriter::new(u128::from(input.reference)) else {
        return;
    };
    if input.wrapped {
        writer = writer.with_wrapped_reference();
    }

    let mut values = Vec::with_capacity(input.steps.len());
    let mut value = writer.start();
    for step in input.steps.iter().take(512) {
        value += u128::from(*step);
        if writer.push(value).is_err() {
            return;
        }
        values.push(value);
    }
    if let Some(pad) = input.pad_to {
        if writer.pad_to(usize::from(pad)).is_err() {
            return;
        }
    }

    let Ok((bytes, _)) = writer.write_to_vec() else {
        return;
    };
    let reader = ArchiveReader::from_bytes(&bytes, "fuzz").expect("written archive reads back");
    let decoded = reader
        .decode(DecodeOptions::default())
        .expect("written archive decodes");
    assert_eq!(decoded.primes.as_slice(), values.as_slice());
});
