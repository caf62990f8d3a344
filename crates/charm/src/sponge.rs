//! Sponge hash over the Charm permutation.

use crate::permute::{permute, STATE_LEN};

pub const DIGEST_LEN: usize = 32;
/// Bytes absorbed per permutation call.
pub const RATE: usize = 32;

const LEN_PREFIX: usize = 4;

pub type Digest = [u8; DIGEST_LEN];

/// Hash `message` to 32 bytes.
///
/// The state starts with the message length (u32 LE, wrapping) in bytes 0..4;
/// each 32-byte chunk is XORed into bytes 4..36 and followed by a permutation.
/// The empty message still permutes once.
pub fn hash(message: &[u8]) -> Digest {
    let mut state = [0u8; STATE_LEN];
    state[..LEN_PREFIX].copy_from_slice(&(message.len() as u32).to_le_bytes());
    if message.is_empty() {
        permute(&mut state);
    }
    for chunk in message.chunks(RATE) {
        for (s, m) in state[LEN_PREFIX..LEN_PREFIX + RATE].iter_mut().zip(chunk) {
            *s ^= m;
        }
        permute(&mut state);
    }
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&state[..DIGEST_LEN]);
    out
}

pub fn hash_hex(message: &[u8]) -> String {
    primitives::bytes_to_hex(&hash(message))
}
