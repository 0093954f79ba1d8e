//! Saffron Wallet
//!
//! Wallet bootstrap, the account registry contract and the signing engine.
//!
//! The flow mirrors how a wallet actually runs: a store supplies the
//! encrypted root key and the account list, every signing call takes the
//! password again, derives the current account's keys, proves they match the
//! requested credential, signs, and wipes them.
//!
//! ```
//! use saffron_core::NetworkId;
//! use saffron_wallet::{MemoryStore, Wallet};
//!
//! let mut wallet = Wallet::new(MemoryStore::new(), NetworkId::Mainnet);
//! let mnemonic = "abandon abandon abandon abandon abandon abandon abandon \
//!                 abandon abandon abandon abandon about";
//! let account = wallet.create_wallet("Main", mnemonic, "hunter2 horse staple").unwrap();
//! assert!(account.payment_addr.starts_with("addr1"));
//!
//! let signed = wallet
//!     .sign_data(&account.payment_addr, b"hello", "hunter2 horse staple")
//!     .unwrap();
//! assert!(signed.public_key.starts_with("ed25519_pk1"));
//! ```

pub mod account;
pub mod events;
pub mod store;
pub mod wallet;

pub use account::{Account, Avatar, Mood};
pub use events::{AddressChange, AddressNotifier, LogNotifier};
pub use store::{MemoryStore, StoreError, WalletStore};
pub use wallet::{DataSignature, Wallet, WalletError};
