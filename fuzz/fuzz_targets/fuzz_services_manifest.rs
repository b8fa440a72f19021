//! Fuzz target for the module manifest (`services.json`) parser.
//!
//! Any byte sequence may be rejected as malformed, but must never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_services_manifest
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = modguard_repo::fuzz::parse_services_manifest(data);
});
