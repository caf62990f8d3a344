//! Byte-oriented ARX permutation over a 64-byte state.
//!
//! The state is four lanes of sixteen byte-words. Each round injects a round
//! constant into every lane, runs the butterfly over column or diagonal
//! groups (alternating), then chains every byte with its neighbour 17 bytes
//! ahead so lanes feed into each other. Every step is invertible.

pub const STATE_LEN: usize = 64;
pub const ROUNDS: usize = 20;

const LANES: usize = 4;
const LANE_LEN: usize = 16;
const CHAIN_STRIDE: usize = 17;

const RC: [u8; ROUNDS] = [
    0x01, 0x82, 0x8a, 0x00, 0x8b, 0x01, 0x81, 0x09, 0x8a, 0x88,
    0x09, 0x0a, 0x8b, 0x8b, 0x89, 0x03, 0x02, 0x80, 0x0a, 0x0a,
];

const COLUMNS: [[usize; 4]; 4] = [[0, 4, 8, 12], [1, 5, 9, 13], [2, 6, 10, 14], [3, 7, 11, 15]];
const DIAGONALS: [[usize; 4]; 4] = [[0, 5, 10, 15], [1, 6, 11, 12], [2, 7, 8, 13], [3, 4, 9, 14]];

#[inline(always)]
fn butterfly(s: &mut [u8; STATE_LEN], a: usize, b: usize, c: usize, d: usize) {
    s[a] = s[a].wrapping_add(s[b]);
    s[d] ^= s[a];
    s[d] = s[d].rotate_left(4);
    s[c] = s[c].wrapping_add(s[d]);
    s[b] ^= s[c];
    s[b] = s[b].rotate_left(5);
}

/// Permute `state` in place. Deterministic and total.
pub fn permute(state: &mut [u8; STATE_LEN]) {
    for (round, rc) in RC.iter().enumerate() {
        let groups = if round % 2 == 0 { &COLUMNS } else { &DIAGONALS };
        for lane in 0..LANES {
            let base = lane * LANE_LEN;
            state[base] ^= rc ^ ((lane as u8) << 4);
            for &[a, b, c, d] in groups {
                butterfly(state, base + a, base + b, base + c, base + d);
            }
        }
        for i in 0..STATE_LEN {
            state[i] ^= state[(i + CHAIN_STRIDE) % STATE_LEN];
        }
    }
}
