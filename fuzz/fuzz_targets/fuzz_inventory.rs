//! Fuzz target for component inventory JSON.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_inventory
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = modguard_repo::fuzz::parse_inventory(text);
    }
});
