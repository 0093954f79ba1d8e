//! Hierarchical key derivation
//!
//! Derives per-account signing keys from the wallet's extended root key
//! along the fixed CIP-1852 path:
//!
//! ```text
//! m / 1852' / 1815' / account' / role / 0
//! ```
//!
//! Role 0 is the external (payment) chain, role 2 the staking chain.
//! The first three segments are hardened, the last two are not.
//! Each derived extended key is reduced to a raw signing key before it
//! leaves this module; raw keys zeroize themselves on drop.

use cryptoxide::blake2b::Blake2b;
use cryptoxide::digest::Digest;
use cryptoxide::ed25519;
use cryptoxide::hmac::Hmac;
use cryptoxide::pbkdf2::pbkdf2;
use cryptoxide::sha2::Sha512;
use ed25519_bip32::{DerivationScheme, XPrv, XPRV_SIZE};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::address::{encode_bech32, AddressError, PUBLIC_KEY_HRP};
use crate::vault::ROOT_KEY_LEN;

/// CIP-1852 purpose segment
pub const PURPOSE: u32 = 1852;

/// Cardano coin type segment
pub const COIN_TYPE: u32 = 1815;

/// External (payment) chain role
pub const ROLE_EXTERNAL: u32 = 0;

/// Staking chain role
pub const ROLE_STAKING: u32 = 2;

/// First index of the hardened range
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// PBKDF2 iteration count for Icarus master key generation
const ICARUS_PBKDF2_ITERS: u32 = 4096;

/// Size of a public key hash (blake2b-224)
pub const KEY_HASH_LEN: usize = 28;

/// Offset an index into the hardened half of the derivation space
pub const fn harden(index: u32) -> u32 {
    HARDENED_OFFSET + index
}

#[derive(Error, Debug)]
pub enum KeyError {
    /// Account index falls in the hardened range and cannot be hardened again.
    #[error("invalid account index {0}: must be below 2^31")]
    InvalidAccountIndex(u32),
    #[error("invalid root key: {0}")]
    InvalidRootKey(String),
}

/// Derive the extended root key from BIP-39 entropy (Icarus scheme).
///
/// PBKDF2-HMAC-SHA512 with the entropy as salt, an empty passphrase as
/// password and 4096 iterations, normalized into a valid extended key.
/// This matches `Bip32PrivateKey.from_bip39_entropy` with an empty
/// passphrase. The intermediate buffer is wiped before returning.
pub fn root_key_from_entropy(entropy: &[u8]) -> Zeroizing<[u8; ROOT_KEY_LEN]> {
    let mut buf = [0u8; XPRV_SIZE];
    let mut mac = Hmac::new(Sha512::new(), b"");
    pbkdf2(&mut mac, entropy, ICARUS_PBKDF2_ITERS, &mut buf);
    let xprv = XPrv::normalize_bytes_force3rd(buf);
    buf.zeroize();

    let mut root_key = Zeroizing::new([0u8; ROOT_KEY_LEN]);
    root_key.copy_from_slice(xprv.as_ref());
    root_key
}

/// Blake2b-224 hash of a public key, the credential form used in addresses
pub fn public_key_hash(public_key: &[u8; 32]) -> [u8; KEY_HASH_LEN] {
    let mut hasher = Blake2b::new(KEY_HASH_LEN);
    hasher.input(public_key);
    let mut out = [0u8; KEY_HASH_LEN];
    hasher.result(&mut out);
    out
}

/// Verify an ed25519 signature under a public key
pub fn verify(message: &[u8], public_key: &[u8; 32], signature: &[u8; 64]) -> bool {
    ed25519::verify(message, public_key, signature)
}

/// A raw (non-hierarchical) signing key reduced from a derived extended key.
///
/// Holds the 64-byte extended ed25519 secret and its public key. The secret
/// half is wiped when the key is dropped, on every exit path of the operation
/// that created it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    extended: [u8; 64],
    public: [u8; 32],
}

impl SigningKey {
    fn from_xprv(xprv: &XPrv) -> Self {
        let mut extended = [0u8; 64];
        extended.copy_from_slice(&xprv.as_ref()[0..64]);
        Self {
            extended,
            public: xprv.public().public_key(),
        }
    }

    /// Sign raw message bytes, returning a 64-byte ed25519 signature
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        ed25519::signature_extended(message, &self.extended)
    }

    /// The 32-byte public key
    pub fn public_key(&self) -> [u8; 32] {
        self.public
    }

    /// Blake2b-224 hash of the public key
    pub fn key_hash(&self) -> [u8; KEY_HASH_LEN] {
        public_key_hash(&self.public)
    }

    /// Public key in its standard bech32 encoding (`ed25519_pk…`)
    pub fn public_key_bech32(&self) -> Result<String, AddressError> {
        encode_bech32(PUBLIC_KEY_HRP, &self.public)
    }
}

/// The payment and stake signing keys of one account
pub struct AccountKeyPair {
    pub payment: SigningKey,
    pub stake: SigningKey,
}

/// Derive the payment and stake keys for `account_index`.
///
/// Pure function of its inputs: the same root key and index always produce
/// byte-identical keys. Indices at or above 2^31 cannot be hardened and
/// fail with [`KeyError::InvalidAccountIndex`].
pub fn derive_account(
    root_key: &[u8; ROOT_KEY_LEN],
    account_index: u32,
) -> Result<AccountKeyPair, KeyError> {
    if account_index >= HARDENED_OFFSET {
        return Err(KeyError::InvalidAccountIndex(account_index));
    }

    let root = XPrv::from_slice_verified(root_key)
        .map_err(|e| KeyError::InvalidRootKey(format!("{e:?}")))?;

    let account = root
        .derive(DerivationScheme::V2, harden(PURPOSE))
        .derive(DerivationScheme::V2, harden(COIN_TYPE))
        .derive(DerivationScheme::V2, harden(account_index));

    let payment = account
        .derive(DerivationScheme::V2, ROLE_EXTERNAL)
        .derive(DerivationScheme::V2, 0);
    let stake = account
        .derive(DerivationScheme::V2, ROLE_STAKING)
        .derive(DerivationScheme::V2, 0);

    Ok(AccountKeyPair {
        payment: SigningKey::from_xprv(&payment),
        stake: SigningKey::from_xprv(&stake),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_root_key() -> Zeroizing<[u8; ROOT_KEY_LEN]> {
        // Entropy of the BIP-39 vector "abandon ... about"
        root_key_from_entropy(&[0u8; 16])
    }

    #[test]
    fn test_root_key_is_deterministic() {
        let a = root_key_from_entropy(&[7u8; 32]);
        let b = root_key_from_entropy(&[7u8; 32]);
        assert_eq!(*a, *b);

        let c = root_key_from_entropy(&[8u8; 32]);
        assert_ne!(*a, *c);
    }

    #[test]
    fn test_root_key_is_normalized() {
        let root = test_root_key();
        // Scalar clamping per the V2 scheme: low 3 bits clear, top bits 0b010
        assert_eq!(root[0] & 0b0000_0111, 0);
        assert_eq!(root[31] & 0b1110_0000, 0b0100_0000);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let root = test_root_key();
        let pair1 = derive_account(&root, 0).unwrap();
        let pair2 = derive_account(&root, 0).unwrap();

        assert_eq!(pair1.payment.public_key(), pair2.payment.public_key());
        assert_eq!(pair1.stake.public_key(), pair2.stake.public_key());
        assert_eq!(pair1.payment.extended, pair2.payment.extended);
        assert_eq!(pair1.stake.extended, pair2.stake.extended);
    }

    #[test]
    fn test_distinct_accounts_distinct_keys() {
        let root = test_root_key();
        let pair0 = derive_account(&root, 0).unwrap();
        let pair1 = derive_account(&root, 1).unwrap();

        assert_ne!(pair0.payment.public_key(), pair1.payment.public_key());
        assert_ne!(pair0.stake.public_key(), pair1.stake.public_key());
    }

    #[test]
    fn test_payment_and_stake_keys_differ() {
        let root = test_root_key();
        let pair = derive_account(&root, 0).unwrap();
        assert_ne!(pair.payment.public_key(), pair.stake.public_key());
        assert_ne!(pair.payment.key_hash(), pair.stake.key_hash());
    }

    #[test]
    fn test_hardened_index_rejected() {
        let root = test_root_key();
        let result = derive_account(&root, HARDENED_OFFSET);
        assert!(matches!(result, Err(KeyError::InvalidAccountIndex(_))));

        let result = derive_account(&root, u32::MAX);
        assert!(matches!(result, Err(KeyError::InvalidAccountIndex(_))));
    }

    #[test]
    fn test_max_valid_index_accepted() {
        let root = test_root_key();
        assert!(derive_account(&root, HARDENED_OFFSET - 1).is_ok());
    }

    #[test]
    fn test_sign_and_verify() {
        let root = test_root_key();
        let pair = derive_account(&root, 0).unwrap();

        let message = b"hello";
        let signature = pair.payment.sign(message);
        assert!(verify(message, &pair.payment.public_key(), &signature));

        // Wrong message or wrong key must not verify
        assert!(!verify(b"hell0", &pair.payment.public_key(), &signature));
        assert!(!verify(message, &pair.stake.public_key(), &signature));
    }

    #[test]
    fn test_public_key_bech32_prefix() {
        let root = test_root_key();
        let pair = derive_account(&root, 0).unwrap();
        let encoded = pair.payment.public_key_bech32().unwrap();
        assert!(encoded.starts_with("ed25519_pk1"));
    }

    #[test]
    fn test_key_hash_length() {
        let root = test_root_key();
        let pair = derive_account(&root, 0).unwrap();
        assert_eq!(pair.payment.key_hash().len(), KEY_HASH_LEN);
        assert_eq!(
            pair.payment.key_hash(),
            public_key_hash(&pair.payment.public_key())
        );
    }
}
