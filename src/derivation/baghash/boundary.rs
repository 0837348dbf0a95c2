//! Expansion at the edges of the mixing process.
//!
//! The same expander is used twice: once to stretch (password, salt) into
//! the initial half-buffer, and once to squeeze the final half-buffer into
//! the output tag. In between, the buffer is only touched by the mixing
//! rounds.

use crate::hash::hash_long;

/// Expands `input` and `salt` into exactly `out.len()` bytes.
///
/// Deterministic: the same `(input, salt, out.len())` always produces the
/// same bytes, and a shorter output is a prefix of a longer one. Pass an
/// empty `salt` when there is none; lengths are bound into the hash, so an
/// empty salt is distinct from any non-empty one.
pub fn expand_into(out: &mut [u8], input: &[u8], salt: &[u8]) {
    hash_long(out, [input, salt]);
}
