#![no_main]

use libfuzzer_sys::fuzz_target;
use saffron_core::resolve_credential;
use saffron_core::tx::{decode_tx_body, parse_key_hash};

fuzz_target!(|data: &[u8]| {
    // None of the string-facing parsers may panic on arbitrary input.
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = resolve_credential(s);
        let _ = parse_key_hash(s);
        let _ = decode_tx_body(s);
    }
});
