//! Pseudorandom index generation
//!
//! The mixing rounds pick their neighbor blocks from a deterministic,
//! sequentially consumed stream of integers. This module defines that
//! abstraction ([`IndexStream`]) and the ChaCha20-backed implementation
//! used by the hashing session ([`Bitstream`]).
//!
//! The stream is always passed explicitly to whoever needs randomness.
//! There is no global generator, so a test can swap in any deterministic
//! stub by implementing [`IndexStream::next_u64`].

pub(crate) mod chacha20;
mod bitstream;

use thiserror::Error;

pub use bitstream::Bitstream;

/// Errors raised while drawing indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// An index was requested from the empty range `[0, 0)`.
    #[error("cannot draw an index below zero")]
    EmptyRange,

    /// More pairwise-distinct values were requested than the range holds.
    #[error("requested {requested} distinct indices below {bound}")]
    TooManyDistinct {
        /// Number of values requested.
        requested: usize,
        /// Exclusive upper bound of the range.
        bound: usize,
    },
}

/// A deterministic source of pseudorandom integers.
///
/// Implementors only provide [`next_u64`](Self::next_u64); bounded and
/// distinct sampling are derived from it so that every implementation
/// consumes its raw output the same way.
pub trait IndexStream {
    /// Returns the next 64 uniformly distributed bits.
    fn next_u64(&mut self) -> u64;

    /// Draws one integer uniformly from `[0, bound)`.
    ///
    /// Uses rejection sampling under the smallest all-ones mask covering
    /// `bound - 1`, so the result is unbiased. Each attempt consumes one
    /// `u64`; the expected number of attempts is below two.
    fn rand_int(&mut self, bound: usize) -> Result<usize, StreamError> {
        if bound == 0 {
            return Err(StreamError::EmptyRange);
        }

        let max = (bound - 1) as u64;
        let mask = u64::MAX.checked_shr(max.leading_zeros()).unwrap_or(0);

        loop {
            let candidate = self.next_u64() & mask;
            if candidate <= max {
                return Ok(candidate as usize);
            }
        }
    }

    /// Fills `out` with integers drawn from `[0, bound)`.
    ///
    /// With `distinct` set, the values are pairwise distinct: a draw that
    /// repeats an earlier value is discarded and redrawn, and the accepted
    /// values keep their draw order. Asking for more distinct values than
    /// the range holds fails before anything is consumed.
    fn rand_ints(
        &mut self,
        out: &mut [usize],
        bound: usize,
        distinct: bool,
    ) -> Result<(), StreamError> {
        if out.is_empty() {
            return Ok(());
        }

        if distinct && out.len() > bound {
            return Err(StreamError::TooManyDistinct {
                requested: out.len(),
                bound,
            });
        }

        let mut filled = 0;
        while filled < out.len() {
            let candidate = self.rand_int(bound)?;
            if distinct && out[..filled].contains(&candidate) {
                continue;
            }
            out[filled] = candidate;
            filled += 1;
        }

        Ok(())
    }
}
