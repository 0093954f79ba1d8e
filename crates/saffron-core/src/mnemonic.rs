//! BIP-39 mnemonic handling
//!
//! Only what wallet creation needs: parsing, generation and entropy
//! extraction. Display formatting of recovery phrases lives with the UI,
//! not here.

use bip39::{Language, Mnemonic};
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Error, Debug)]
pub enum MnemonicError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
}

/// Generate a new BIP-39 mnemonic (24 words, English).
///
/// The word data is secret key material; the returned handle wipes it when
/// dropped.
pub fn generate_mnemonic() -> Result<Zeroizing<Mnemonic>, MnemonicError> {
    Mnemonic::generate_in(Language::English, 24)
        .map(Zeroizing::new)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))
}

/// Parse a mnemonic from words, wiped on drop like generated ones
pub fn parse_mnemonic(words: &str) -> Result<Zeroizing<Mnemonic>, MnemonicError> {
    Mnemonic::parse_in(Language::English, words)
        .map(Zeroizing::new)
        .map_err(|e| MnemonicError::InvalidMnemonic(e.to_string()))
}

/// Recover the raw entropy a mnemonic encodes.
///
/// The buffer is zeroized on drop; callers feed it straight into root key
/// generation and let it fall out of scope.
pub fn mnemonic_to_entropy(mnemonic: &Mnemonic) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(mnemonic.to_entropy())
}
