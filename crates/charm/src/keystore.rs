//! Key storage seam and sealed records built on the cipher.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::cipher::{CipherError, CipherState, Tag, KEY_LEN};

pub type Key = Zeroizing<[u8; KEY_LEN]>;

/// Where cipher keys live. Callers that persist keys provide their own
/// implementation; [`MemoryKeyStore`] keeps them in process memory.
pub trait KeyStore {
    fn get(&self, id: &str) -> Option<Key>;
    fn put(&mut self, id: &str, key: [u8; KEY_LEN]);
}

/// In-memory key store. Keys are wiped when replaced or dropped.
#[derive(Default)]
pub struct MemoryKeyStore {
    keys: HashMap<String, Key>,
}

impl MemoryKeyStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.keys.len() }

    pub fn is_empty(&self) -> bool { self.keys.is_empty() }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self, id: &str) -> Option<Key> {
        self.keys.get(id).cloned()
    }

    fn put(&mut self, id: &str, key: [u8; KEY_LEN]) {
        self.keys.insert(id.to_owned(), Zeroizing::new(key));
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SealError {
    #[error("unknown key: {0}")]
    UnknownKey(String),
    #[error(transparent)]
    Cipher(#[from] CipherError),
}

/// Ciphertext with the nonce and tag needed to open it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct SealedRecord {
    #[serde(with = "primitives::hexutil::hex_vec")]
    pub nonce: Vec<u8>,
    #[serde(with = "primitives::hexutil::hex_vec")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "primitives::hexutil::hex_array")]
    pub tag: Tag,
}

pub fn seal_with_key(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<SealedRecord, CipherError> {
    let mut cipher = CipherState::new(key, nonce)?;
    let mut ciphertext = plaintext.to_vec();
    let tag = cipher.encrypt(&mut ciphertext);
    Ok(SealedRecord { nonce: nonce.to_vec(), ciphertext, tag })
}

/// `Ok(None)` when the tag does not verify.
pub fn open_with_key(key: &[u8], record: &SealedRecord) -> Result<Option<Vec<u8>>, CipherError> {
    let mut cipher = CipherState::new(key, &record.nonce)?;
    let mut buf = record.ciphertext.clone();
    if cipher.decrypt(&mut buf, &record.tag) {
        Ok(Some(buf))
    } else {
        Ok(None)
    }
}

/// Seal `plaintext` under the key stored as `id`.
pub fn seal<S: KeyStore + ?Sized>(
    store: &S,
    id: &str,
    nonce: &[u8],
    plaintext: &[u8],
) -> Result<SealedRecord, SealError> {
    let key = store.get(id).ok_or_else(|| SealError::UnknownKey(id.to_owned()))?;
    Ok(seal_with_key(key.as_slice(), nonce, plaintext)?)
}

pub fn open<S: KeyStore + ?Sized>(store: &S, id: &str, record: &SealedRecord) -> Result<Option<Vec<u8>>, SealError> {
    let key = store.get(id).ok_or_else(|| SealError::UnknownKey(id.to_owned()))?;
    Ok(open_with_key(key.as_slice(), record)?)
}
