//! Transaction hashing and witness-set assembly
//!
//! A witness set is the CBOR map `{ 0: [[vkey, signature], …] }` attached to
//! a transaction to authorize its inputs. The transaction hash signed by each
//! witness is the blake2b-256 digest of the CBOR-encoded transaction body.

use std::io::Cursor;

use cbor_event::de::Deserializer;
use cbor_event::se::Serializer;
use cbor_event::{Len, Special, Type};
use cryptoxide::blake2b::Blake2b;
use cryptoxide::digest::Digest;
use thiserror::Error;

use bech32::FromBase32;

use crate::address::{PAYMENT_PREFIX, STAKE_PREFIX};
use crate::keys::KEY_HASH_LEN;

/// Size of a transaction hash (blake2b-256)
pub const TX_HASH_LEN: usize = 32;

/// Witness-set map key holding the vkey witnesses
const WITNESS_SET_VKEYS_KEY: u64 = 0;

/// Nesting bound while walking a transaction body; real bodies stay shallow
const MAX_BODY_DEPTH: u8 = 64;

#[derive(Error, Debug)]
pub enum TxError {
    /// The transaction body is not valid hex or not a CBOR map.
    #[error("invalid transaction body")]
    InvalidBody,
    /// A requested key hash is not in a recognizable encoding.
    #[error("key hash could not be parsed")]
    NoKeyHash,
    #[error("witness set encoding failed: {0}")]
    Cbor(#[from] cbor_event::Error),
}

/// Decode a hex transaction body and check it is a complete CBOR map.
///
/// The whole value is walked, not just the outer header, so a body whose
/// map announces entries it does not contain fails with
/// [`TxError::InvalidBody`] instead of being signed.
pub fn decode_tx_body(tx_body_hex: &str) -> Result<Vec<u8>, TxError> {
    let bytes = hex::decode(tx_body_hex).map_err(|_| TxError::InvalidBody)?;
    let mut raw = Deserializer::from(Cursor::new(bytes.as_slice()));
    match raw.cbor_type() {
        Ok(Type::Map) => {}
        _ => return Err(TxError::InvalidBody),
    }
    skip_value(&mut raw, MAX_BODY_DEPTH).map_err(|_| TxError::InvalidBody)?;
    Ok(bytes)
}

/// Consume one CBOR value, descending into containers.
fn skip_value(
    raw: &mut Deserializer<Cursor<&[u8]>>,
    depth: u8,
) -> Result<(), cbor_event::Error> {
    let depth = depth
        .checked_sub(1)
        .ok_or_else(|| cbor_event::Error::CustomError("nesting too deep".to_string()))?;
    match raw.cbor_type()? {
        Type::UnsignedInteger => {
            raw.unsigned_integer()?;
        }
        Type::NegativeInteger => {
            raw.negative_integer()?;
        }
        Type::Bytes => {
            raw.bytes()?;
        }
        Type::Text => {
            raw.text()?;
        }
        Type::Array => match raw.array()? {
            Len::Len(n) => {
                for _ in 0..n {
                    skip_value(raw, depth)?;
                }
            }
            Len::Indefinite => loop {
                if matches!(raw.cbor_type()?, Type::Special) {
                    if let Special::Break = raw.special()? {
                        break;
                    }
                } else {
                    skip_value(raw, depth)?;
                }
            },
        },
        Type::Map => match raw.map()? {
            Len::Len(n) => {
                for _ in 0..n {
                    skip_value(raw, depth)?;
                    skip_value(raw, depth)?;
                }
            }
            Len::Indefinite => loop {
                if matches!(raw.cbor_type()?, Type::Special) {
                    if let Special::Break = raw.special()? {
                        break;
                    }
                } else {
                    skip_value(raw, depth)?;
                    skip_value(raw, depth)?;
                }
            },
        },
        Type::Tag => {
            raw.tag()?;
            skip_value(raw, depth)?;
        }
        Type::Special => {
            raw.special()?;
        }
    }
    Ok(())
}

/// Blake2b-256 digest of the encoded transaction body
pub fn hash_tx_body(tx_body: &[u8]) -> [u8; TX_HASH_LEN] {
    let mut hasher = Blake2b::new(TX_HASH_LEN);
    hasher.input(tx_body);
    let mut out = [0u8; TX_HASH_LEN];
    hasher.result(&mut out);
    out
}

/// Parse a requested signing key hash.
///
/// Accepts the hex form used on the wire and the bech32 credential form
/// under the [`PAYMENT_PREFIX`] or [`STAKE_PREFIX`] prefix; anything else
/// fails with [`TxError::NoKeyHash`].
pub fn parse_key_hash(s: &str) -> Result<[u8; KEY_HASH_LEN], TxError> {
    let bytes = match hex::decode(s) {
        Ok(bytes) => bytes,
        Err(_) => {
            let (hrp, data, _variant) = bech32::decode(s).map_err(|_| TxError::NoKeyHash)?;
            if hrp != PAYMENT_PREFIX && hrp != STAKE_PREFIX {
                return Err(TxError::NoKeyHash);
            }
            Vec::<u8>::from_base32(&data).map_err(|_| TxError::NoKeyHash)?
        }
    };
    if bytes.len() != KEY_HASH_LEN {
        return Err(TxError::NoKeyHash);
    }
    let mut hash = [0u8; KEY_HASH_LEN];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

/// One vkey witness: a public key and its signature over the transaction hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VkeyWitness {
    pub vkey: [u8; 32],
    pub signature: [u8; 64],
}

impl VkeyWitness {
    pub fn new(vkey: [u8; 32], signature: [u8; 64]) -> Self {
        Self { vkey, signature }
    }
}

/// An ordered collection of vkey witnesses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WitnessSet {
    vkeys: Vec<VkeyWitness>,
}

impl WitnessSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a witness, preserving insertion order
    pub fn push(&mut self, witness: VkeyWitness) {
        self.vkeys.push(witness);
    }

    pub fn len(&self) -> usize {
        self.vkeys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vkeys.is_empty()
    }

    /// Canonical CBOR encoding: `{ 0: [[vkey, signature], …] }`
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        let mut se = Serializer::new_vec();
        se.write_map(Len::Len(1))?;
        se.write_unsigned_integer(WITNESS_SET_VKEYS_KEY)?;
        se.write_array(Len::Len(self.vkeys.len() as u64))?;
        for witness in &self.vkeys {
            se.write_array(Len::Len(2))?;
            se.write_bytes(&witness.vkey[..])?;
            se.write_bytes(&witness.signature[..])?;
        }
        Ok(se.finalize())
    }

    /// Hex form of the canonical encoding, the external wire format
    pub fn to_hex(&self) -> Result<String, TxError> {
        Ok(hex::encode(self.to_bytes()?))
    }
}
