//! Saffron Core
//!
//! Key-management primitives for the Saffron wallet.
//!
//! # Key Derivation
//!
//! From a single BIP-39 mnemonic, an extended root key is generated with the
//! Icarus scheme and per-account payment/stake keys are derived along the
//! CIP-1852 path: m/1852'/1815'/account'/role/0.
//!
//! # Encrypted Storage
//!
//! The root key is encrypted at rest using Argon2id + AES-256-GCM and only
//! ever decrypted inside a single operation's scope.

pub mod address;
pub mod keys;
pub mod mnemonic;
pub mod tx;
pub mod vault;

pub use address::{
    build_addresses, resolve_credential, AddressError, Addresses, Credential, CredentialKind,
    NetworkId,
};
pub use keys::{derive_account, root_key_from_entropy, AccountKeyPair, KeyError, SigningKey};
pub use mnemonic::{generate_mnemonic, mnemonic_to_entropy, parse_mnemonic, MnemonicError};
pub use tx::{TxError, VkeyWitness, WitnessSet};
pub use vault::{decrypt_root_key, encrypt_root_key, EncryptedRootKey, VaultError};
