//! Fuzz target for the TOML configuration parser.
//!
//! Run with: cargo +nightly fuzz run fuzz_config_parser
//!
//! Any configuration that parses must also pass validation.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = crashview_config::AppConfig::parse(s) {
            assert!(config.validate().is_ok());
            assert!(config.extractor.radius <= crashview_config::MAX_RADIUS);
        }
    }
});
