//! Row degree generation for the XOR combine mode.
//!
//! In XOR mode each round behaves like multiplying the previous half-buffer
//! by a random sparse matrix. The number of nonzero entries per row (the
//! row weight, i.e. how many neighbors get XORed in) follows a truncated
//! ideal soliton distribution:
//!
//! ```text
//! P(1) = 1/n,  P(k) = 1/(k(k-1))  for 2 <= k < cap,  P(cap) = remainder
//! ```
//!
//! where `n` is the number of rows and `cap = min(n, MAX_NEIGHBORS)`. Most
//! rows are light, a long tail of rows is heavy, and the expected weight
//! grows like `ln n`.

use thiserror::Error;

use super::core::Error;
use super::params::MAX_NEIGHBORS;
use crate::rng::IndexStream;

/// Fixed-point scale of the cumulative distribution table.
const SCALE: u64 = 1 << 32;

/// Errors raised by the degree generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegreeError {
    /// A matrix needs at least one row.
    #[error("degree generator needs at least one row")]
    NoRows,
    /// The running row counter overflowed.
    #[error("degree generator exhausted")]
    Exhausted,
}

/// Per-row weight generator over matrices of a fixed row count.
#[derive(Debug)]
pub struct DegreeGenerator {
    n_rows: usize,
    /// `cdf[k - 1]` is `P(weight <= k)` scaled by [`SCALE`].
    cdf: Vec<u64>,
    rows_emitted: u64,
}

impl DegreeGenerator {
    /// Builds a generator for matrices with `n_rows` rows.
    ///
    /// # Parameters
    /// - `n_rows`: rows per matrix; the mixing state passes the number of
    ///   blocks in one half
    ///
    /// # Returns
    /// A generator whose weights lie in `1..=min(n_rows, MAX_NEIGHBORS)`.
    /// Fails with [`DegreeError::NoRows`] for an empty matrix, and with
    /// [`Error::Alloc`] if the distribution table cannot be allocated.
    ///
    /// # Security Notes
    /// - The table depends only on `n_rows`. Weights are drawn from the
    ///   index stream alone, so they never depend on the password.
    pub fn new(n_rows: usize) -> Result<Self, Error> {
        if n_rows == 0 {
            return Err(DegreeError::NoRows.into());
        }

        let cap = n_rows.min(MAX_NEIGHBORS);
        let mut cdf = Vec::new();
        cdf.try_reserve_exact(cap).map_err(|_| Error::Alloc)?;

        let n = n_rows as u64;
        for k in 1..cap as u64 {
            // 1/n + sum_{j=2..k} 1/(j(j-1)) = 1/n + 1 - 1/k
            cdf.push(SCALE / n + SCALE - SCALE / k);
        }
        cdf.push(SCALE);

        Ok(Self {
            n_rows,
            cdf,
            rows_emitted: 0,
        })
    }

    /// Number of rows per matrix.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Largest weight this generator can return.
    pub fn max_weight(&self) -> usize {
        self.cdf.len()
    }

    /// Index of the next row within the current matrix.
    pub fn current_row(&self) -> usize {
        (self.rows_emitted % self.n_rows as u64) as usize
    }

    /// Draws the weight of the next row.
    ///
    /// Consumes one `u64` from `stream` and always returns a value in
    /// `1..=max_weight()`. Once `n_rows` rows have been drawn, the next
    /// call starts a fresh matrix.
    pub fn next_row_weight<S: IndexStream>(&mut self, stream: &mut S) -> Result<usize, DegreeError> {
        self.rows_emitted = self
            .rows_emitted
            .checked_add(1)
            .ok_or(DegreeError::Exhausted)?;

        let r = stream.next_u64() >> 32;
        Ok(self.cdf.partition_point(|&c| c <= r) + 1)
    }
}
