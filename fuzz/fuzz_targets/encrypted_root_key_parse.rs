#![no_main]

use libfuzzer_sys::fuzz_target;
use saffron_core::EncryptedRootKey;

fuzz_target!(|data: &[u8]| {
    // Deserializing arbitrary bytes must never panic — always Ok or Err.
    if let Ok(key) = EncryptedRootKey::from_bytes(data) {
        // Round-trip serialization of an accepted input must not panic either
        let bytes = key.to_bytes();
        let _ = EncryptedRootKey::from_bytes(&bytes);
    }
});
