//! Persistence contract for the account registry
//!
//! The wallet core never talks to a concrete storage backend; it reads and
//! writes through [`WalletStore`]. The encrypted root key is written exactly
//! once per wallet, accounts form an ordered index → record mapping, and a
//! separate pointer tracks which account is current.

use std::collections::BTreeMap;

use saffron_core::EncryptedRootKey;
use thiserror::Error;

use crate::account::Account;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Narrow persistence contract the wallet core depends on.
pub trait WalletStore {
    /// The encrypted root key, if a wallet has been created.
    fn get_encrypted_root_key(&self) -> Result<Option<EncryptedRootKey>, StoreError>;

    /// Persist the encrypted root key. The core asserts absence before
    /// calling; a store may additionally refuse overwrites.
    fn set_encrypted_root_key(&mut self, key: &EncryptedRootKey) -> Result<(), StoreError>;

    /// Ordered mapping from account index to account record.
    fn get_accounts(&self) -> Result<BTreeMap<u32, Account>, StoreError>;

    fn set_accounts(&mut self, accounts: &BTreeMap<u32, Account>) -> Result<(), StoreError>;

    /// Index of the current account, if any account exists yet.
    fn get_current_account_index(&self) -> Result<Option<u32>, StoreError>;

    fn set_current_account_index(&mut self, index: u32) -> Result<(), StoreError>;
}

/// In-process store for tests and embedders without their own persistence.
#[derive(Default)]
pub struct MemoryStore {
    encrypted_root_key: Option<EncryptedRootKey>,
    accounts: BTreeMap<u32, Account>,
    current_account: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WalletStore for MemoryStore {
    fn get_encrypted_root_key(&self) -> Result<Option<EncryptedRootKey>, StoreError> {
        Ok(self.encrypted_root_key.clone())
    }

    fn set_encrypted_root_key(&mut self, key: &EncryptedRootKey) -> Result<(), StoreError> {
        self.encrypted_root_key = Some(key.clone());
        Ok(())
    }

    fn get_accounts(&self) -> Result<BTreeMap<u32, Account>, StoreError> {
        Ok(self.accounts.clone())
    }

    fn set_accounts(&mut self, accounts: &BTreeMap<u32, Account>) -> Result<(), StoreError> {
        self.accounts = accounts.clone();
        Ok(())
    }

    fn get_current_account_index(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.current_account)
    }

    fn set_current_account_index(&mut self, index: u32) -> Result<(), StoreError> {
        self.current_account = Some(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saffron_core::encrypt_root_key;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryStore::new();
        assert!(store.get_encrypted_root_key().unwrap().is_none());
        assert!(store.get_accounts().unwrap().is_empty());
        assert!(store.get_current_account_index().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_roundtrips() {
        let mut store = MemoryStore::new();

        let encrypted = encrypt_root_key("pw", &[9u8; 96]).unwrap();
        store.set_encrypted_root_key(&encrypted).unwrap();
        let loaded = store.get_encrypted_root_key().unwrap().unwrap();
        assert_eq!(loaded.to_bytes(), encrypted.to_bytes());

        store.set_current_account_index(3).unwrap();
        assert_eq!(store.get_current_account_index().unwrap(), Some(3));
    }
}
