//! Keystream cipher with a 16-byte authentication tag.
//!
//! State layout: key at 0..32, nonce at 32..48 (zero-padded when shorter),
//! counter at 48..64 (little-endian). Each keystream block is the state after
//! one permutation; the counter is bumped after every block.

use core::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::permute::{permute, STATE_LEN};

pub const KEY_LEN: usize = 32;
pub const MIN_NONCE_LEN: usize = 8;
pub const MAX_NONCE_LEN: usize = 16;
pub const TAG_LEN: usize = 16;

const NONCE_OFFSET: usize = 32;
const COUNTER_OFFSET: usize = 48;

pub type Tag = [u8; TAG_LEN];

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    #[error("invalid key length: expected 32 bytes, got {0}")]
    InvalidKeyLength(usize),
    #[error("invalid nonce length: expected 8..=16 bytes, got {0}")]
    InvalidNonceLength(usize),
}

/// One cipher instance per message. Reusing an instance continues the
/// keystream where the previous message stopped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherState {
    state: [u8; STATE_LEN],
    block: [u8; STATE_LEN],
    pos: usize,
}

impl fmt::Debug for CipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherState").field("pos", &self.pos).finish_non_exhaustive()
    }
}

impl CipherState {
    pub fn new(key: &[u8], nonce: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength(key.len()));
        }
        if !(MIN_NONCE_LEN..=MAX_NONCE_LEN).contains(&nonce.len()) {
            return Err(CipherError::InvalidNonceLength(nonce.len()));
        }
        let mut state = [0u8; STATE_LEN];
        state[..KEY_LEN].copy_from_slice(key);
        state[NONCE_OFFSET..NONCE_OFFSET + nonce.len()].copy_from_slice(nonce);
        permute(&mut state);
        Ok(Self { state, block: [0u8; STATE_LEN], pos: STATE_LEN })
    }

    fn refill(&mut self) {
        permute(&mut self.state);
        self.block = self.state;
        increment_counter(&mut self.state);
        self.pos = 0;
    }

    fn next_keystream_byte(&mut self) -> u8 {
        if self.pos == STATE_LEN {
            self.refill();
        }
        let k = self.block[self.pos];
        self.pos += 1;
        k
    }

    /// Advance past the keystream and fold the accumulated ciphertext into the
    /// first 16 state bytes.
    fn finish_tag(&mut self, mut acc: Tag) -> Tag {
        permute(&mut self.state);
        for (t, s) in acc.iter_mut().zip(&self.state[..TAG_LEN]) {
            *t ^= s;
        }
        acc
    }

    /// Encrypt `msg` in place and return its tag.
    pub fn encrypt(&mut self, msg: &mut [u8]) -> Tag {
        let mut acc = [0u8; TAG_LEN];
        for (i, b) in msg.iter_mut().enumerate() {
            *b ^= self.next_keystream_byte();
            acc[i % TAG_LEN] ^= *b;
        }
        self.finish_tag(acc)
    }

    /// Verify `tag` over `ct`, then decrypt in place. On mismatch neither `ct`
    /// nor this instance is modified.
    pub fn decrypt(&mut self, ct: &mut [u8], tag: &Tag) -> bool {
        let mut ahead = self.clone();
        let mut keystream = Zeroizing::new(vec![0u8; ct.len()]);
        let mut acc = [0u8; TAG_LEN];
        for (i, (k, c)) in keystream.iter_mut().zip(ct.iter()).enumerate() {
            *k = ahead.next_keystream_byte();
            acc[i % TAG_LEN] ^= *c;
        }
        let expected = ahead.finish_tag(acc);
        let diff = expected.iter().zip(tag.iter()).fold(0u8, |d, (a, b)| d | (a ^ b));
        if diff != 0 {
            tracing::debug!(len = ct.len(), "charm tag mismatch");
            return false;
        }
        for (c, k) in ct.iter_mut().zip(keystream.iter()) {
            *c ^= k;
        }
        *self = ahead;
        true
    }
}

fn increment_counter(state: &mut [u8; STATE_LEN]) {
    for b in state[COUNTER_OFFSET..].iter_mut() {
        *b = b.wrapping_add(1);
        if *b != 0 {
            break;
        }
    }
}
