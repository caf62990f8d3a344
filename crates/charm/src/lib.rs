//! Charm: a 64-byte permutation with an authenticated stream cipher and a
//! sponge hash built on top of it.
//!
//! Not a vetted AEAD. Tag comparison is not constant-time.

pub mod permute;
pub mod cipher;
pub mod sponge;
pub mod keystore;

pub use cipher::{CipherError, CipherState, Tag, KEY_LEN, MAX_NONCE_LEN, MIN_NONCE_LEN, TAG_LEN};
pub use keystore::{open, open_with_key, seal, seal_with_key, KeyStore, MemoryKeyStore, SealError, SealedRecord};
pub use permute::{permute, STATE_LEN};
pub use sponge::{hash, hash_hex, Digest, DIGEST_LEN};
