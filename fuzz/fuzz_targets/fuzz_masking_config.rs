//! Fuzz target for masking.json configuration parsing.
//!
//! Tests that configuration parsing handles arbitrary input without
//! panicking, and that any accepted document builds a usable engine.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lm_mask::MaskingConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = MaskingConfig::from_json_str(text) {
        let _ = config.engine().format("phone=13812345678 name=alice");
    }
});
