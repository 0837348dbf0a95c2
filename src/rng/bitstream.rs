//! ChaCha20-backed index stream.
//!
//! The stream is keyed by SHA-256 of a seed (the hashing session uses the
//! salt), then reads the ChaCha20 keystream eight bytes at a time. Two
//! streams built from the same seed yield the same sequence forever.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use super::IndexStream;
use super::chacha20::{BLOCK_LEN, Keystream};

/// Deterministic pseudorandom stream seeded once per hash invocation.
#[derive(Clone)]
pub struct Bitstream {
    keystream: Keystream,
    block: [u8; BLOCK_LEN],
    offset: usize,
}

impl Bitstream {
    /// Creates a stream keyed by `SHA-256(seed)`.
    ///
    /// Any seed length is accepted; the session layer is responsible for
    /// enforcing a minimum salt length.
    pub fn from_seed(seed: &[u8]) -> Self {
        let mut key = [0u8; 32];
        key.copy_from_slice(&Sha256::digest(seed));
        let keystream = Keystream::new(&key);
        key.zeroize();

        Self {
            keystream,
            block: [0u8; BLOCK_LEN],
            // forces a refill on the first read
            offset: BLOCK_LEN,
        }
    }

    /// Copies the next `out.len()` keystream bytes into `out`.
    pub fn fill_bytes(&mut self, out: &mut [u8]) {
        let mut written = 0;

        while written < out.len() {
            if self.offset == BLOCK_LEN {
                self.block = self.keystream.next_block();
                self.offset = 0;
            }

            let take = (BLOCK_LEN - self.offset).min(out.len() - written);
            out[written..written + take]
                .copy_from_slice(&self.block[self.offset..self.offset + take]);

            self.offset += take;
            written += take;
        }
    }
}

impl IndexStream for Bitstream {
    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }
}

impl Drop for Bitstream {
    fn drop(&mut self) {
        self.block.zeroize();
    }
}
