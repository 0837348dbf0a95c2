//! Block compression for BagHash.
//!
//! The compression function folds an ordered sequence of equally sized
//! blocks into one output block of the same size. It never reads the
//! output slice and never writes its inputs, so the mixing loop can hand it
//! borrowed views straight out of the working buffer. Inputs arrive as an
//! iterator and the XOR accumulator is owned by the caller, so a call does
//! not allocate.

use std::iter;

use thiserror::Error;
use zeroize::Zeroize;

use super::params::CombineMode;
use crate::hash::hash_long;

/// Largest number of input blocks accepted by [`compress`].
pub const MAX_COMPRESS_BLOCKS: usize = 256;

/// Domain tag for [`CombineMode::Default`].
const TAG_HASH: &[u8] = b"baghash:hash";

/// Domain tag for [`CombineMode::Xor`].
const TAG_XOR: &[u8] = b"baghash:xor";

/// Errors raised by [`compress`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressError {
    /// Nothing to compress.
    #[error("compression needs at least one input block")]
    NoInputs,
    /// More inputs than [`MAX_COMPRESS_BLOCKS`].
    #[error("{0} input blocks exceeds the maximum of {max}", max = MAX_COMPRESS_BLOCKS)]
    TooManyInputs(usize),
    /// An input does not have the output's length.
    #[error("input block {index} is {actual} bytes, expected {expected}")]
    BlockSizeMismatch {
        /// Position of the offending input.
        index: usize,
        /// Output block size.
        expected: usize,
        /// Length of the offending input.
        actual: usize,
    },
    /// The XOR accumulator does not have the output's length.
    #[error("accumulator is {actual} bytes, expected {expected}")]
    AccumulatorSize {
        /// Output block size.
        expected: usize,
        /// Length of the accumulator received.
        actual: usize,
    },
}

/// Compresses `blocks` into `out`.
///
/// - [`CombineMode::Default`]: `out = H'(tag || B0 || B1 || ...)`. The
///   inputs are hashed in the order given, so swapping two of them changes
///   the result.
/// - [`CombineMode::Xor`]: `out = H'(tag || B0 ^ B1 ^ ...)`. Order does not
///   matter, which is why the XOR mode samples distinct neighbors.
///
/// # Parameters
/// - `out`: destination block; its length is the block size
/// - `blocks`: `1..=MAX_COMPRESS_BLOCKS` inputs of exactly `out.len()` bytes
/// - `mode`: how the inputs are combined
/// - `acc`: XOR scratch of exactly `out.len()` bytes; ignored in default mode
///
/// # Returns
/// `Ok(())` once `out` is fully written. On error `out` is left untouched.
///
/// # Security Notes
/// - `acc` holds the XOR of the inputs while hashing and is zeroized
///   before returning.
pub fn compress<'b, I>(
    out: &mut [u8],
    blocks: I,
    mode: CombineMode,
    acc: &mut [u8],
) -> Result<(), CompressError>
where
    I: IntoIterator<Item = &'b [u8]>,
    I::IntoIter: Clone,
{
    let blocks = blocks.into_iter();

    let mut count = 0;
    let mut mismatch = None;
    for (index, block) in blocks.clone().enumerate() {
        count += 1;
        if mismatch.is_none() && block.len() != out.len() {
            mismatch = Some(CompressError::BlockSizeMismatch {
                index,
                expected: out.len(),
                actual: block.len(),
            });
        }
    }

    if count == 0 {
        return Err(CompressError::NoInputs);
    }
    if count > MAX_COMPRESS_BLOCKS {
        return Err(CompressError::TooManyInputs(count));
    }
    if let Some(err) = mismatch {
        return Err(err);
    }

    match mode {
        CombineMode::Default => {
            hash_long(out, iter::once(TAG_HASH).chain(blocks));
        }
        CombineMode::Xor => {
            if acc.len() != out.len() {
                return Err(CompressError::AccumulatorSize {
                    expected: out.len(),
                    actual: acc.len(),
                });
            }

            acc.fill(0);
            for block in blocks {
                acc.iter_mut().zip(block).for_each(|(a, b)| *a ^= b);
            }
            hash_long(out, [TAG_XOR, &acc[..]]);
            acc.zeroize();
        }
    }

    Ok(())
}
