//! Wallet bootstrap and signing engine
//!
//! Every operation that needs key material takes the password again: the
//! root key is decrypted inside the call, the account keys are derived from
//! it, and both are wiped before the call returns — success or error. Nothing
//! decrypted survives between operations.

use saffron_core::address::{self, NetworkId};
use saffron_core::keys::{self, AccountKeyPair, KeyError};
use saffron_core::tx::{self, TxError, VkeyWitness, WitnessSet};
use saffron_core::vault::{self, VaultError};
use saffron_core::{mnemonic, AddressError, CredentialKind};
use thiserror::Error;

use crate::account::{Account, Avatar};
use crate::events::{AddressChange, AddressNotifier};
use crate::store::{StoreError, WalletStore};

#[derive(Error, Debug)]
pub enum WalletError {
    /// Root key decryption failed to authenticate.
    #[error("wrong password")]
    WrongPassword,
    /// An address or requested key hash resolves to no known signing key.
    #[error("no matching key hash")]
    NoKeyHash,
    /// The derived key does not hash to the credential the caller supplied.
    #[error("key hashes do not match")]
    KeyHashMismatch,
    #[error("invalid account index {0}")]
    InvalidAccountIndex(u32),
    /// Wallet creation attempted while a master key already exists.
    #[error("wallet store is not empty")]
    StoreNotEmpty,
    /// No wallet has been created yet.
    #[error("no wallet present")]
    NoWallet,
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    #[error("invalid transaction body")]
    InvalidBody,
    #[error("cryptographic operation failed: {0}")]
    Crypto(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<VaultError> for WalletError {
    fn from(e: VaultError) -> Self {
        match e {
            VaultError::WrongPassword => WalletError::WrongPassword,
            other => WalletError::Crypto(other.to_string()),
        }
    }
}

impl From<KeyError> for WalletError {
    fn from(e: KeyError) -> Self {
        match e {
            KeyError::InvalidAccountIndex(index) => WalletError::InvalidAccountIndex(index),
            other => WalletError::Crypto(other.to_string()),
        }
    }
}

impl From<AddressError> for WalletError {
    fn from(e: AddressError) -> Self {
        match e {
            AddressError::NoKeyHash => WalletError::NoKeyHash,
            other => WalletError::Crypto(other.to_string()),
        }
    }
}

impl From<TxError> for WalletError {
    fn from(e: TxError) -> Self {
        match e {
            TxError::NoKeyHash => WalletError::NoKeyHash,
            TxError::InvalidBody => WalletError::InvalidBody,
            other => WalletError::Crypto(other.to_string()),
        }
    }
}

/// Result of signing opaque data on behalf of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSignature {
    /// Hex-encoded ed25519 signature
    pub signature: String,
    /// Bech32-encoded public key that produced it
    pub public_key: String,
}

/// The wallet core: account bootstrap plus the signing engine, generic over
/// the persistence backend.
pub struct Wallet<S> {
    store: S,
    network: NetworkId,
    notifier: Option<Box<dyn AddressNotifier>>,
}

impl<S: WalletStore> Wallet<S> {
    pub fn new(store: S, network: NetworkId) -> Self {
        Self {
            store,
            network,
            notifier: None,
        }
    }

    /// Attach a best-effort listener for address changes.
    pub fn with_notifier(mut self, notifier: Box<dyn AddressNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the wallet from a recovery phrase and create account 0.
    ///
    /// A wallet holds exactly one master key: if an encrypted root key is
    /// already present this fails with [`WalletError::StoreNotEmpty`] before
    /// any key material is produced or anything is written. The parsed
    /// mnemonic, entropy and root key buffers are all wiped before returning.
    pub fn create_wallet(
        &mut self,
        name: &str,
        mnemonic_words: &str,
        password: &str,
    ) -> Result<Account, WalletError> {
        if self.store.get_encrypted_root_key()?.is_some() {
            return Err(WalletError::StoreNotEmpty);
        }

        let parsed = mnemonic::parse_mnemonic(mnemonic_words)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        let entropy = mnemonic::mnemonic_to_entropy(&parsed);
        drop(parsed);
        let root_key = keys::root_key_from_entropy(&entropy);
        drop(entropy);

        let encrypted = vault::encrypt_root_key(password, &root_key)?;
        drop(root_key);

        self.store.set_encrypted_root_key(&encrypted)?;
        log::info!("wallet created");

        self.create_account(name, password)
    }

    /// Create the next account: derive its keys, build its addresses,
    /// persist it and make it current.
    pub fn create_account(&mut self, name: &str, password: &str) -> Result<Account, WalletError> {
        let mut accounts = self.store.get_accounts()?;
        let account_index = accounts.len() as u32;

        let (payment_pub, stake_pub) = {
            let pair = self.request_account_key(password, account_index)?;
            (pair.payment.public_key(), pair.stake.public_key())
            // pair dropped here, signing keys wiped
        };

        let addresses = address::build_addresses(&payment_pub, &stake_pub, self.network)?;

        let account = Account {
            index: account_index,
            payment_addr: addresses.payment,
            reward_addr: addresses.reward,
            name: name.to_string(),
            avatar: Avatar::random(),
        };

        accounts.insert(account_index, account.clone());
        self.store.set_accounts(&accounts)?;
        self.store.set_current_account_index(account_index)?;
        log::info!("account {} created", account_index);

        if let Some(notifier) = &self.notifier {
            notifier.addresses_changed(&AddressChange::for_account(&account));
        }

        Ok(account)
    }

    /// Sign opaque data on behalf of a payment or reward address.
    ///
    /// The engine proves the derived key actually corresponds to the
    /// caller-supplied address before signing: the key's public-key hash must
    /// equal the address credential byte for byte, otherwise the call fails
    /// with [`WalletError::KeyHashMismatch`].
    pub fn sign_data(
        &self,
        address: &str,
        message: &[u8],
        password: &str,
    ) -> Result<DataSignature, WalletError> {
        let credential = address::resolve_credential(address)?;

        let account_index = self.current_account_index()?;
        let pair = self.request_account_key(password, account_index)?;

        let key = match credential.kind {
            CredentialKind::Payment => &pair.payment,
            CredentialKind::Stake => &pair.stake,
        };

        if key.key_hash() != credential.hash {
            return Err(WalletError::KeyHashMismatch);
        }

        let signature = key.sign(message);
        Ok(DataSignature {
            signature: hex::encode(signature),
            public_key: key.public_key_bech32()?,
        })
    }

    /// Sign a transaction body for the requested key hashes and return the
    /// canonical witness-set encoding as hex.
    ///
    /// Order is preserved and duplicates each produce a witness. A hash that
    /// matches neither the payment nor the stake key aborts the whole call
    /// with [`WalletError::NoKeyHash`]; a partial witness set is never
    /// returned.
    pub fn sign_tx(
        &self,
        tx_body_hex: &str,
        key_hashes: &[String],
        password: &str,
    ) -> Result<String, WalletError> {
        let body = tx::decode_tx_body(tx_body_hex)?;
        let tx_hash = tx::hash_tx_body(&body);

        let account_index = self.current_account_index()?;
        let pair = self.request_account_key(password, account_index)?;
        let payment_hash = pair.payment.key_hash();
        let stake_hash = pair.stake.key_hash();

        let mut witnesses = WitnessSet::new();
        for requested in key_hashes {
            let requested = tx::parse_key_hash(requested)?;
            let key = if requested == payment_hash {
                &pair.payment
            } else if requested == stake_hash {
                &pair.stake
            } else {
                return Err(WalletError::NoKeyHash);
            };
            witnesses.push(VkeyWitness::new(key.public_key(), key.sign(&tx_hash)));
        }

        Ok(witnesses.to_hex()?)
    }

    fn current_account_index(&self) -> Result<u32, WalletError> {
        self.store
            .get_current_account_index()?
            .ok_or(WalletError::NoWallet)
    }

    /// Decrypt the root key and derive one account's key pair.
    ///
    /// The decrypted root key lives only inside this call; the returned pair
    /// wipes itself when the caller drops it.
    fn request_account_key(
        &self,
        password: &str,
        account_index: u32,
    ) -> Result<AccountKeyPair, WalletError> {
        let encrypted = self
            .store
            .get_encrypted_root_key()?
            .ok_or(WalletError::NoWallet)?;
        let root_key = vault::decrypt_root_key(password, &encrypted)?;
        Ok(keys::derive_account(&root_key, account_index)?)
    }
}
