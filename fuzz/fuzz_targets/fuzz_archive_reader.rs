//! Fuzz target for compact archive parsing and decoding.
//!
//! Archives are plain JSON files that may be hand-edited, so arbitrary bytes
//! must produce an error, never a panic or an overflow.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pw_archive::{ArchiveReader, DecodeOptions};

fuzz_target!(|data: &[u8]| {
    let Ok(reader) = ArchiveReader::from_bytes(data, "fuzz") else {
        return;
    };
    for options in [DecodeOptions::default(), DecodeOptions::strict()] {
        if let Ok(decoded) = reader.decode(options) {
            let primes = decoded.primes.as_slice();
            assert!(primes.iter().all(|p| decoded.interval.start <= *p));
        }
    }
});
