//! BLAKE2b-256 digests over canonical encodings.

use blake2b_simd::Params as Blake2bParams;
use serde::{Deserialize, Serialize};

use crate::data::Data;
use crate::types::*;

/// Domain separators for BLAKE2b-256 derivations.
const DS_TX_V1: &[u8; 16] = b"charms.tx.v1\0\0\0\0"; // 12 + 4 = 16
const DS_DATA_V1: &[u8; 16] = b"charms.data.v1\0\0"; // 14 + 2 = 16
const DS_APP_V1: &[u8; 16] = b"charms.app.v1\0\0\0"; // 13 + 3 = 16

/// Digest binding a transaction's canonical bytes into one 32-byte value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
pub struct TxDigest(#[serde(with = "crate::hexutil::hex_array")] pub [u8; 32]);

fn blake2b_256(personal: &[u8; 16], input: &[u8]) -> [u8; 32] {
    let hash = Blake2bParams::new().hash_length(32).personal(personal).hash(input);
    let mut out = [0u8; 32];
    out.copy_from_slice(hash.as_bytes());
    out
}

/// Content digest of a transaction, including its charm states and spell.
pub fn tx_digest(tx: &Transaction) -> TxDigest {
    TxDigest(blake2b_256(DS_TX_V1, &tx.to_canonical_bytes()))
}

pub fn data_digest(d: &Data) -> [u8; 32] {
    blake2b_256(DS_DATA_V1, &d.to_canonical_bytes())
}

/// Identity of an app: tag, verification key handle and parameters.
pub fn app_digest(app: &App) -> [u8; 32] {
    let mut buf = Vec::with_capacity(4 + app.tag.len() + VK_HASH_LEN);
    crate::encode::encode_bytes(app.tag.as_bytes(), &mut buf);
    buf.extend_from_slice(&app.vk_hash);
    buf.extend_from_slice(&app.params.to_canonical_bytes());
    blake2b_256(DS_APP_V1, &buf)
}

impl Transaction {
    pub fn digest(&self) -> TxDigest { tx_digest(self) }
}
