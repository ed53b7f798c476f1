//! Fuzz target for loading saved statistics reports.
//!
//! Reports are reloaded without their archive, so validation has to reject
//! any inconsistent document without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pw_report::{report_from_slice, SampleLimits};

fuzz_target!(|data: &[u8]| {
    let _ = report_from_slice(data, &SampleLimits::default());
});
