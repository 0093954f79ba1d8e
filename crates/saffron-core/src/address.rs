//! Shelley address building and credential extraction
//!
//! A base address packs a header byte, the payment key hash and the stake
//! key hash; a reward address packs a header byte and the stake key hash.
//! Both are bech32-encoded. The resolver walks the other direction: given
//! an address string it recovers the key hash and whether it plays the
//! payment or the stake role. No private key material is touched here.

use bech32::{self, FromBase32, ToBase32, Variant};
use thiserror::Error;

use crate::keys::{public_key_hash, KEY_HASH_LEN};

/// Header type nibble of a key/key base address
const HEADER_TYPE_BASE: u8 = 0b0000;

/// Header type nibble of a key reward address
const HEADER_TYPE_REWARD: u8 = 0b1110;

/// Bech32 HRP for public keys (CIP-5)
pub const PUBLIC_KEY_HRP: &str = "ed25519_pk";

/// Five-character prefix tagging a payment credential
pub const PAYMENT_PREFIX: &str = "hbas_";

/// Five-character prefix tagging a stake credential
pub const STAKE_PREFIX: &str = "hrew_";

#[derive(Error, Debug)]
pub enum AddressError {
    /// The address shape carries no extractable key hash
    /// (unsupported type, script credential, or malformed encoding).
    #[error("address does not contain a supported key hash")]
    NoKeyHash,
    #[error("bech32 encoding failed: {0}")]
    Encoding(#[from] bech32::Error),
}

/// Network discriminant carried in the address header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkId {
    Mainnet,
    Testnet,
}

impl NetworkId {
    /// The network nibble of the address header byte
    pub fn id(self) -> u8 {
        match self {
            NetworkId::Mainnet => 1,
            NetworkId::Testnet => 0,
        }
    }

    fn payment_hrp(self) -> &'static str {
        match self {
            NetworkId::Mainnet => "addr",
            NetworkId::Testnet => "addr_test",
        }
    }

    fn reward_hrp(self) -> &'static str {
        match self {
            NetworkId::Mainnet => "stake",
            NetworkId::Testnet => "stake_test",
        }
    }
}

/// The two address forms of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addresses {
    /// Base address (payment credential + stake credential)
    pub payment: String,
    /// Reward address (stake credential only)
    pub reward: String,
}

/// Which role a credential plays inside an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Payment,
    Stake,
}

impl CredentialKind {
    /// The five-character prefix class of this credential kind
    pub fn prefix(self) -> &'static str {
        match self {
            CredentialKind::Payment => PAYMENT_PREFIX,
            CredentialKind::Stake => STAKE_PREFIX,
        }
    }
}

/// A key hash extracted from an address, tagged with its role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub kind: CredentialKind,
    pub hash: [u8; KEY_HASH_LEN],
}

impl Credential {
    /// Encode the key hash under the role's prefix, e.g. `hbas_1…`
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        encode_bech32(self.kind.prefix(), &self.hash)
    }
}

pub(crate) fn encode_bech32(hrp: &str, payload: &[u8]) -> Result<String, AddressError> {
    Ok(bech32::encode(hrp, payload.to_base32(), Variant::Bech32)?)
}

/// Build the payment (base) and reward addresses for an account.
///
/// Pure function of the two public keys and the network id.
pub fn build_addresses(
    payment_pub: &[u8; 32],
    stake_pub: &[u8; 32],
    network: NetworkId,
) -> Result<Addresses, AddressError> {
    let payment_hash = public_key_hash(payment_pub);
    let stake_hash = public_key_hash(stake_pub);

    let mut base = Vec::with_capacity(1 + 2 * KEY_HASH_LEN);
    base.push((HEADER_TYPE_BASE << 4) | network.id());
    base.extend_from_slice(&payment_hash);
    base.extend_from_slice(&stake_hash);

    let mut reward = Vec::with_capacity(1 + KEY_HASH_LEN);
    reward.push((HEADER_TYPE_REWARD << 4) | network.id());
    reward.extend_from_slice(&stake_hash);

    Ok(Addresses {
        payment: encode_bech32(network.payment_hrp(), &base)?,
        reward: encode_bech32(network.reward_hrp(), &reward)?,
    })
}

/// Extract the credential an address encodes.
///
/// Base addresses with a key payment credential yield that credential;
/// key reward addresses yield the stake credential. Every other address
/// shape fails with [`AddressError::NoKeyHash`].
pub fn resolve_credential(address: &str) -> Result<Credential, AddressError> {
    let (hrp, data, _variant) = bech32::decode(address).map_err(|_| AddressError::NoKeyHash)?;
    let bytes = Vec::<u8>::from_base32(&data).map_err(|_| AddressError::NoKeyHash)?;

    let header = *bytes.first().ok_or(AddressError::NoKeyHash)?;
    let mut hash = [0u8; KEY_HASH_LEN];

    match (hrp.as_str(), header >> 4) {
        ("addr" | "addr_test", HEADER_TYPE_BASE) => {
            if bytes.len() != 1 + 2 * KEY_HASH_LEN {
                return Err(AddressError::NoKeyHash);
            }
            hash.copy_from_slice(&bytes[1..1 + KEY_HASH_LEN]);
            Ok(Credential {
                kind: CredentialKind::Payment,
                hash,
            })
        }
        ("stake" | "stake_test", HEADER_TYPE_REWARD) => {
            if bytes.len() != 1 + KEY_HASH_LEN {
                return Err(AddressError::NoKeyHash);
            }
            hash.copy_from_slice(&bytes[1..1 + KEY_HASH_LEN]);
            Ok(Credential {
                kind: CredentialKind::Stake,
                hash,
            })
        }
        _ => Err(AddressError::NoKeyHash),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{derive_account, root_key_from_entropy};

    fn test_pubkeys() -> ([u8; 32], [u8; 32]) {
        let root = root_key_from_entropy(&[3u8; 16]);
        let pair = derive_account(&root, 0).unwrap();
        (pair.payment.public_key(), pair.stake.public_key())
    }

    #[test]
    fn test_mainnet_address_prefixes() {
        let (payment_pub, stake_pub) = test_pubkeys();
        let addrs = build_addresses(&payment_pub, &stake_pub, NetworkId::Mainnet).unwrap();
        assert!(addrs.payment.starts_with("addr1"));
        assert!(addrs.reward.starts_with("stake1"));
    }

    #[test]
    fn test_testnet_address_prefixes() {
        let (payment_pub, stake_pub) = test_pubkeys();
        let addrs = build_addresses(&payment_pub, &stake_pub, NetworkId::Testnet).unwrap();
        assert!(addrs.payment.starts_with("addr_test1"));
        assert!(addrs.reward.starts_with("stake_test1"));
    }

    #[test]
    fn test_build_is_pure() {
        let (payment_pub, stake_pub) = test_pubkeys();
        let a = build_addresses(&payment_pub, &stake_pub, NetworkId::Mainnet).unwrap();
        let b = build_addresses(&payment_pub, &stake_pub, NetworkId::Mainnet).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_resolve_payment_credential() {
        let (payment_pub, stake_pub) = test_pubkeys();
        let addrs = build_addresses(&payment_pub, &stake_pub, NetworkId::Mainnet).unwrap();

        let credential = resolve_credential(&addrs.payment).unwrap();
        assert_eq!(credential.kind, CredentialKind::Payment);
        assert_eq!(credential.hash, public_key_hash(&payment_pub));
        assert!(credential.to_bech32().unwrap().starts_with(PAYMENT_PREFIX));
    }

    #[test]
    fn test_resolve_stake_credential() {
        let (payment_pub, stake_pub) = test_pubkeys();
        let addrs = build_addresses(&payment_pub, &stake_pub, NetworkId::Mainnet).unwrap();

        let credential = resolve_credential(&addrs.reward).unwrap();
        assert_eq!(credential.kind, CredentialKind::Stake);
        assert_eq!(credential.hash, public_key_hash(&stake_pub));
        assert!(credential.to_bech32().unwrap().starts_with(STAKE_PREFIX));
    }

    #[test]
    fn test_resolve_testnet_addresses() {
        let (payment_pub, stake_pub) = test_pubkeys();
        let addrs = build_addresses(&payment_pub, &stake_pub, NetworkId::Testnet).unwrap();
        assert_eq!(
            resolve_credential(&addrs.payment).unwrap().kind,
            CredentialKind::Payment
        );
        assert_eq!(
            resolve_credential(&addrs.reward).unwrap().kind,
            CredentialKind::Stake
        );
    }

    #[test]
    fn test_unsupported_addresses_rejected() {
        // Not bech32 at all
        assert!(matches!(
            resolve_credential("definitely not an address"),
            Err(AddressError::NoKeyHash)
        ));

        // Valid bech32 but an unrelated HRP
        let foreign = encode_bech32("npub", &[1u8; 32]).unwrap();
        assert!(matches!(
            resolve_credential(&foreign),
            Err(AddressError::NoKeyHash)
        ));

        // Correct HRP but wrong header type (enterprise address, type 0b0110)
        let mut bytes = vec![(0b0110 << 4) | 1u8];
        bytes.extend_from_slice(&[2u8; KEY_HASH_LEN]);
        let enterprise = encode_bech32("addr", &bytes).unwrap();
        assert!(matches!(
            resolve_credential(&enterprise),
            Err(AddressError::NoKeyHash)
        ));

        // Correct HRP and type but truncated payload
        let mut bytes = vec![0x01u8];
        bytes.extend_from_slice(&[2u8; KEY_HASH_LEN]);
        let truncated = encode_bech32("addr", &bytes).unwrap();
        assert!(matches!(
            resolve_credential(&truncated),
            Err(AddressError::NoKeyHash)
        ));
    }
}
