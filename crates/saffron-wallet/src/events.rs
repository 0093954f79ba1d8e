//! Address-change notifications
//!
//! When the current account changes, listeners (a dapp bridge, a UI) are told
//! which addresses are now active. Delivery is fire-and-forget: a notifier
//! must never affect the correctness of derivation or signing.

use crate::account::Account;

/// The active addresses after an account change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressChange {
    /// Active payment addresses (a single account exposes one)
    pub payment_addr: Vec<String>,
    /// Active reward address
    pub reward_addr: String,
}

impl AddressChange {
    pub fn for_account(account: &Account) -> Self {
        Self {
            payment_addr: vec![account.payment_addr.clone()],
            reward_addr: account.reward_addr.clone(),
        }
    }
}

/// Best-effort sink for address-change events.
pub trait AddressNotifier {
    fn addresses_changed(&self, change: &AddressChange);
}

/// Default notifier: logs the change and nothing else.
pub struct LogNotifier;

impl AddressNotifier for LogNotifier {
    fn addresses_changed(&self, change: &AddressChange) {
        log::info!(
            "active addresses changed: payment={:?} reward={}",
            change.payment_addr,
            change.reward_addr
        );
    }
}
