#![no_main]

use libfuzzer_sys::fuzz_target;
use saffron_core::parse_mnemonic;

fuzz_target!(|data: &[u8]| {
    // Arbitrary UTF-8 fed to the mnemonic parser must never panic.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_mnemonic(s);
    }
});
