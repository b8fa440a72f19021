//! Fuzz target for Cargo.toml dependency extraction.
//!
//! Goal: the parser should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_cargo_manifest
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cargo.toml must be UTF-8
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = modguard_repo::fuzz::parse_cargo_manifest(text);
    }
});
