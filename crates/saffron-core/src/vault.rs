//! Root key vault
//!
//! Password-based encryption for the wallet's master key using
//! Argon2id + AES-256-GCM.
//!
//! # Security Notes
//!
//! - Argon2id is memory-hard (resistant to GPU/ASIC attacks)
//! - AES-256-GCM provides authenticated encryption
//! - Each encryption uses a fresh random salt and nonce
//! - Password is never stored; the derived AEAD key is zeroized after use
//! - A wrong password or tampered ciphertext fails authentication cleanly,
//!   it never yields garbage plaintext

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

/// Argon2id parameters (OWASP recommendations for 2024+)
/// - m_cost: 64 MiB memory
/// - t_cost: 3 iterations
/// - p_cost: 4 parallel threads
const ARGON2_M_COST: u32 = 65536; // 64 MiB
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;
const ARGON2_OUTPUT_LEN: usize = 32; // 256 bits for AES-256

/// Salt length for Argon2id key derivation
pub const SALT_LEN: usize = 32;

/// Nonce length for AES-256-GCM
pub const NONCE_LEN: usize = 12;

/// Length of a serialized extended root key (64-byte extended secret
/// followed by a 32-byte chain code)
pub const ROOT_KEY_LEN: usize = 96;

#[derive(Error, Debug)]
pub enum VaultError {
    /// Authentication failed: wrong password or corrupted ciphertext.
    #[error("wrong password or corrupted data")]
    WrongPassword,
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),
    #[error("invalid encrypted root key format")]
    InvalidFormat,
}

/// Encrypted root key format:
/// [salt (32 bytes)][nonce (12 bytes)][ciphertext (96 + 16 bytes)]
/// Total: 156 bytes for a 96-byte extended root key
#[derive(Clone)]
pub struct EncryptedRootKey {
    /// Salt used for Argon2id key derivation
    salt: [u8; SALT_LEN],
    /// Nonce used for AES-256-GCM
    nonce: [u8; NONCE_LEN],
    /// Encrypted root key + authentication tag
    ciphertext: Vec<u8>,
}

impl EncryptedRootKey {
    /// Serialize to bytes: salt || nonce || ciphertext
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SALT_LEN + NONCE_LEN + self.ciphertext.len());
        bytes.extend_from_slice(&self.salt);
        bytes.extend_from_slice(&self.nonce);
        bytes.extend_from_slice(&self.ciphertext);
        bytes
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        // Minimum size: salt + nonce + at least 1 byte ciphertext + 16 byte tag
        if bytes.len() < SALT_LEN + NONCE_LEN + 17 {
            return Err(VaultError::InvalidFormat);
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];

        salt.copy_from_slice(&bytes[0..SALT_LEN]);
        nonce.copy_from_slice(&bytes[SALT_LEN..SALT_LEN + NONCE_LEN]);
        let ciphertext = bytes[SALT_LEN + NONCE_LEN..].to_vec();

        Ok(Self {
            salt,
            nonce,
            ciphertext,
        })
    }

    /// Hex form used by persistence layers
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse the hex form produced by [`EncryptedRootKey::to_hex`]
    pub fn from_hex(s: &str) -> Result<Self, VaultError> {
        let bytes = hex::decode(s).map_err(|_| VaultError::InvalidFormat)?;
        Self::from_bytes(&bytes)
    }
}

/// Derive an encryption key from a password using Argon2id
fn derive_key(
    password: &str,
    salt: &[u8; SALT_LEN],
) -> Result<Zeroizing<[u8; ARGON2_OUTPUT_LEN]>, VaultError> {
    let params = Params::new(
        ARGON2_M_COST,
        ARGON2_T_COST,
        ARGON2_P_COST,
        Some(ARGON2_OUTPUT_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; ARGON2_OUTPUT_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut *key)
        .map_err(|e| VaultError::KeyDerivationFailed(e.to_string()))?;

    Ok(key)
}

/// Encrypt an extended root key with a password
///
/// Uses Argon2id for key derivation and AES-256-GCM for encryption.
/// Each call generates a new random salt and nonce; a salt/nonce pair
/// is never reused across calls.
pub fn encrypt_root_key(
    password: &str,
    root_key: &[u8; ROOT_KEY_LEN],
) -> Result<EncryptedRootKey, VaultError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let nonce_arr = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&nonce_arr);

    let key = derive_key(password, &salt)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), root_key.as_slice())
        .map_err(|e| VaultError::EncryptionFailed(e.to_string()))?;

    Ok(EncryptedRootKey {
        salt,
        nonce,
        ciphertext,
    })
}

/// Decrypt an encrypted root key with a password
///
/// The only failure mode for a wrong password or tampered data is
/// [`VaultError::WrongPassword`]; authentication happens before any
/// plaintext is released.
pub fn decrypt_root_key(
    password: &str,
    encrypted: &EncryptedRootKey,
) -> Result<Zeroizing<[u8; ROOT_KEY_LEN]>, VaultError> {
    let key = derive_key(password, &encrypted.salt)?;

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&*key));
    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&encrypted.nonce),
            encrypted.ciphertext.as_slice(),
        )
        .map_err(|_| VaultError::WrongPassword)?;
    let plaintext = Zeroizing::new(plaintext);

    if plaintext.len() != ROOT_KEY_LEN {
        return Err(VaultError::WrongPassword);
    }

    let mut root_key = Zeroizing::new([0u8; ROOT_KEY_LEN]);
    root_key.copy_from_slice(&plaintext);
    Ok(root_key)
}
