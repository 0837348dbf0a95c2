//! ChaCha20 keystream generator
//!
//! This module provides the ChaCha20 block function in its original
//! 64-bit counter layout (DJB variant: 64-bit counter, 64-bit nonce).
//! The index stream only ever needs a long deterministic keystream from a
//! single key, so the nonce is fixed to zero and the wide counter makes
//! wrap-around unreachable for any realistic buffer size.
//!
//! This is not an encryption API. Nothing here authenticates data and the
//! keystream must never be reused for confidentiality.

use zeroize::Zeroize;

/// `"expand 32-byte k"` as little-endian words.
const SIGMA: [u32; 4] = [0x6170_7865, 0x3320_646e, 0x7962_2d32, 0x6b20_6574];

/// Size of one keystream block in bytes.
pub(crate) const BLOCK_LEN: usize = 64;

#[inline(always)]
fn quarter_round(s: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(16);

    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(12);

    s[a] = s[a].wrapping_add(s[b]);
    s[d] = (s[d] ^ s[a]).rotate_left(8);

    s[c] = s[c].wrapping_add(s[d]);
    s[b] = (s[b] ^ s[c]).rotate_left(7);
}

/// Ten double rounds (column then diagonal).
fn double_rounds(s: &mut [u32; 16]) {
    for _ in 0..10 {
        quarter_round(s, 0, 4, 8, 12);
        quarter_round(s, 1, 5, 9, 13);
        quarter_round(s, 2, 6, 10, 14);
        quarter_round(s, 3, 7, 11, 15);

        quarter_round(s, 0, 5, 10, 15);
        quarter_round(s, 1, 6, 11, 12);
        quarter_round(s, 2, 7, 8, 13);
        quarter_round(s, 3, 4, 9, 14);
    }
}

/// Keystream state: a fixed key and a running block counter.
#[derive(Clone)]
pub(crate) struct Keystream {
    key: [u32; 8],
    counter: u64,
}

impl Keystream {
    pub(crate) fn new(key: &[u8; 32]) -> Self {
        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        Self {
            key: words,
            counter: 0,
        }
    }

    /// Produces the next 64-byte keystream block and advances the counter.
    pub(crate) fn next_block(&mut self) -> [u8; BLOCK_LEN] {
        let mut state = [0u32; 16];
        state[0..4].copy_from_slice(&SIGMA);
        state[4..12].copy_from_slice(&self.key);
        state[12] = self.counter as u32;
        state[13] = (self.counter >> 32) as u32;
        // words 14 and 15 hold the nonce, which stays zero

        let original = state;
        double_rounds(&mut state);

        state
            .iter_mut()
            .zip(&original)
            .for_each(|(s, o)| *s = s.wrapping_add(*o));

        self.counter = self.counter.wrapping_add(1);

        let mut out = [0u8; BLOCK_LEN];
        out.chunks_exact_mut(4)
            .zip(&state)
            .for_each(|(c, &w)| c.copy_from_slice(&w.to_le_bytes()));
        out
    }
}

impl Drop for Keystream {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8439, appendix A.1, test vector #1 (all-zero key, nonce, counter)
    #[test]
    fn zero_key_first_block_matches_rfc8439() {
        let expected: [u8; 64] = [
            0x76, 0xb8, 0xe0, 0xad, 0xa0, 0xf1, 0x3d, 0x90, 0x40, 0x5d, 0x6a, 0xe5, 0x53, 0x86,
            0xbd, 0x28, 0xbd, 0xd2, 0x19, 0xb8, 0xa0, 0x8d, 0xed, 0x1a, 0xa8, 0x36, 0xef, 0xcc,
            0x8b, 0x77, 0x0d, 0xc7, 0xda, 0x41, 0x59, 0x7c, 0x51, 0x57, 0x48, 0x8d, 0x77, 0x24,
            0xe0, 0x3f, 0xb8, 0xd8, 0x4a, 0x37, 0x6a, 0x43, 0xb8, 0xf4, 0x15, 0x18, 0xa1, 0x1c,
            0xc3, 0x87, 0xb6, 0x69, 0xb2, 0xee, 0x65, 0x86,
        ];

        let mut ks = Keystream::new(&[0u8; 32]);
        assert_eq!(ks.next_block(), expected);
    }

    #[test]
    fn counter_advances_between_blocks() {
        let mut ks = Keystream::new(&[7u8; 32]);
        let first = ks.next_block();
        let second = ks.next_block();
        assert_ne!(first, second);
    }
}
