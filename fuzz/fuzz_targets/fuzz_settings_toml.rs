//! Fuzz target for settings file parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pw_core::AnalysisSettings;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(settings) = AnalysisSettings::from_toml(text) {
        let _ = settings.validate();
        let _ = settings.to_toml();
    }
});
