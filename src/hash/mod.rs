//! Hash primitives used by the derivation code.
//!
//! The only primitive exposed here is [`hash_long`], a variable-length
//! hash built from SHA-512 in counter mode. It plays the role that
//! `H'` plays in Argon2: turning an arbitrary list of inputs into an
//! arbitrary number of output bytes.

use sha2::{Digest, Sha512};

/// Output size of the underlying SHA-512 compression, in bytes.
pub const DIGEST_LEN: usize = 64;

/// Variable-length hash over a list of input parts.
///
/// The parts are absorbed into a 64-byte seed, each prefixed with its
/// length as a little-endian `u64` so that `["ab", "c"]` and `["a", "bc"]`
/// never collide. The output is then produced in 64-byte chunks:
///
/// ```text
/// seed  = SHA-512(|P0| || P0 || |P1| || P1 || ...)
/// out_k = SHA-512(seed || k)
/// ```
///
/// The last chunk is truncated to fill `out` exactly. The cost is linear
/// in the total input length plus the output length.
///
/// `parts` is any iterator of byte slices, so callers can chain borrowed
/// views together without collecting them first.
pub fn hash_long<'p, I>(out: &mut [u8], parts: I)
where
    I: IntoIterator<Item = &'p [u8]>,
{
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    let seed = hasher.finalize();

    for (counter, chunk) in out.chunks_mut(DIGEST_LEN).enumerate() {
        let mut hasher = Sha512::new();
        hasher.update(&seed);
        hasher.update((counter as u64).to_le_bytes());
        let digest = hasher.finalize();
        chunk.copy_from_slice(&digest[..chunk.len()]);
    }
}
