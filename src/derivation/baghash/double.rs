//! Double-buffer mixing strategy.
//!
//! The working buffer is split into two equal halves of `n_blocks / 2`
//! blocks. At any time one half is the *source* (the last finished round,
//! or the initial fill) and the other is the *destination*. A round writes
//! every destination row, in order, from:
//!
//! - the sequential predecessor: destination row `i - 1`, or for row 0 the
//!   last source row, and
//! - a pseudorandom set of source rows.
//!
//! The predecessor chain makes each round strictly sequential. Sampling
//! from the whole source half forces the previous round to stay in memory
//! (or be recomputed). When the round is done the two halves swap roles;
//! no bytes move.

use std::iter;
use std::ops::Range;

use tracing::{debug, trace};

use super::block::compress;
use super::boundary::expand_into;
use super::core::Error;
use super::degree::DegreeGenerator;
use super::params::{CombineMode, Dimensions, MAX_NEIGHBORS, ParamError};
use crate::rng::IndexStream;

/// One of the two halves of the working buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Half {
    /// Blocks `[0, n_blocks / 2)`.
    Lower,
    /// Blocks `[n_blocks / 2, n_blocks)`.
    Upper,
}

impl Half {
    fn other(self) -> Self {
        match self {
            Half::Lower => Half::Upper,
            Half::Upper => Half::Lower,
        }
    }
}

/// Mode-specific row policy.
#[derive(Debug)]
enum Combiner {
    /// Same neighbor count on every row, repeats allowed.
    Default { n_neighbors: usize },
    /// Per-row neighbor count, pairwise distinct neighbors.
    Xor(DegreeGenerator),
}

impl Combiner {
    fn mode(&self) -> CombineMode {
        match self {
            Combiner::Default { .. } => CombineMode::Default,
            Combiner::Xor(_) => CombineMode::Xor,
        }
    }
}

/// Splits `buffer` into `(source, destination)` views.
fn split_roles(buffer: &mut [u8], half_len: usize, source: Half) -> (&[u8], &mut [u8]) {
    let (lower, upper) = buffer.split_at_mut(half_len);
    match source {
        Half::Lower => (&*lower, upper),
        Half::Upper => (&*upper, lower),
    }
}

/// Mixing state over a borrowed working buffer.
///
/// Lifecycle: [`init`](Self::init), [`fill`](Self::fill), any number of
/// [`mix`](Self::mix) rounds, [`extract`](Self::extract), then
/// [`free`](Self::free). The buffer itself belongs to the caller; the
/// state only decides which half is read and which is written.
///
/// A failed round leaves the destination half partially overwritten. The
/// state is then poisoned and every later call except `free` fails with
/// [`Error::Poisoned`].
pub struct DoubleBuffer<'a> {
    buffer: &'a mut [u8],
    dims: Dimensions,
    source: Half,
    combiner: Combiner,
    /// Scratch space for one row's sampled neighbor indices.
    neighbors: Vec<usize>,
    /// One block of XOR accumulator for the compressor.
    acc: Vec<u8>,
    rounds: u32,
    poisoned: bool,
}

/// Allocates `len` zeroed elements, reporting failure instead of aborting.
fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, Error> {
    let mut scratch = Vec::new();
    scratch.try_reserve_exact(len).map_err(|_| Error::Alloc)?;
    scratch.resize(len, T::default());
    Ok(scratch)
}

impl<'a> DoubleBuffer<'a> {
    /// Sets up the two half-buffer views over `buffer`.
    ///
    /// The lower half starts as the source. In XOR mode a degree generator
    /// over `n_blocks / 2` rows is built; `n_neighbors` is only used in
    /// default mode. All per-row scratch space is allocated here, so the
    /// mixing rounds never allocate.
    ///
    /// # Parameters
    /// - `buffer`: working memory of exactly `dims.total_len()` bytes
    /// - `dims`: buffer shape from [`Dimensions::new`]
    /// - `combine`: row combine policy
    /// - `n_neighbors`: neighbors per row in default mode, at most
    ///   [`MAX_NEIGHBORS`]
    ///
    /// # Returns
    /// A state whose source is the lower half and whose round count is 0.
    /// Fails with [`Error::BufferSize`] on a length mismatch,
    /// [`Error::Params`] on too many neighbors, or [`Error::Alloc`] if the
    /// scratch space or degree table cannot be allocated.
    ///
    /// # Security Notes
    /// - The buffer contents are not read or written, and nothing is
    ///   retained when `init` fails.
    pub fn init(
        buffer: &'a mut [u8],
        dims: Dimensions,
        combine: CombineMode,
        n_neighbors: usize,
    ) -> Result<Self, Error> {
        if buffer.len() != dims.total_len() {
            return Err(Error::BufferSize {
                expected: dims.total_len(),
                actual: buffer.len(),
            });
        }

        let combiner = match combine {
            CombineMode::Default => {
                if n_neighbors > MAX_NEIGHBORS {
                    return Err(ParamError::TooManyNeighbors(n_neighbors).into());
                }
                Combiner::Default { n_neighbors }
            }
            CombineMode::Xor => Combiner::Xor(DegreeGenerator::new(dims.blocks_per_buf())?),
        };

        let scratch_len = match &combiner {
            Combiner::Default { n_neighbors } => *n_neighbors,
            Combiner::Xor(generator) => generator.max_weight(),
        };
        let neighbors: Vec<usize> = try_zeroed(scratch_len)?;
        let acc: Vec<u8> = try_zeroed(dims.block_size())?;

        debug!(
            n_blocks = dims.n_blocks(),
            block_size = dims.block_size(),
            mode = ?combine,
            "initialized double-buffer mixing state"
        );

        Ok(Self {
            buffer,
            dims,
            source: Half::Lower,
            combiner,
            neighbors,
            acc,
            rounds: 0,
            poisoned: false,
        })
    }

    /// Writes the initial content of the source half.
    ///
    /// Exactly `block_size * n_blocks / 2` bytes are expanded from
    /// `(password, salt)`. The destination half is left as it was.
    pub fn fill(&mut self, password: &[u8], salt: &[u8]) -> Result<(), Error> {
        self.check_usable()?;

        let range = self.half_range(self.source);
        expand_into(&mut self.buffer[range], password, salt);

        debug!(bytes = self.dims.half_len(), "filled source half");
        Ok(())
    }

    /// Runs one mixing round, then swaps the roles of the two halves.
    ///
    /// Rows are written in strictly increasing order; row `i` depends on
    /// row `i - 1` of the same round.
    ///
    /// # Parameters
    /// - `stream`: index stream shared by every round of one hash; it is
    ///   advanced by this call and never reset
    ///
    /// # Returns
    /// `Ok(())` after every destination row is written and the halves have
    /// swapped. Any collaborator error aborts the round, poisons the state
    /// and is returned unchanged.
    ///
    /// # Security Notes
    /// - Neighbor indices depend only on the stream, never on buffer
    ///   contents, so the access pattern is independent of the password.
    pub fn mix<S: IndexStream>(&mut self, stream: &mut S) -> Result<(), Error> {
        self.check_usable()?;

        if let Err(err) = self.mix_rows(stream) {
            self.poisoned = true;
            return Err(err);
        }

        self.source = self.source.other();
        self.rounds += 1;

        debug!(round = self.rounds, source = ?self.source, "mixing round complete");
        Ok(())
    }

    fn mix_rows<S: IndexStream>(&mut self, stream: &mut S) -> Result<(), Error> {
        let block_size = self.dims.block_size();
        let blocks_per_buf = self.dims.blocks_per_buf();
        let mode = self.combiner.mode();
        let distinct = mode == CombineMode::Xor;

        let (src, dst) = split_roles(self.buffer, self.dims.half_len(), self.source);

        for i in 0..blocks_per_buf {
            let row_neighbors = match &mut self.combiner {
                Combiner::Default { n_neighbors } => *n_neighbors,
                Combiner::Xor(generator) => generator.next_row_weight(stream)?,
            };

            let neighbors = &mut self.neighbors[..row_neighbors];
            stream.rand_ints(neighbors, blocks_per_buf, distinct)?;
            trace!(row = i, ?neighbors, "sampled neighbors");

            let (written, rest) = dst.split_at_mut(i * block_size);
            let predecessor: &[u8] = if i == 0 {
                &src[(blocks_per_buf - 1) * block_size..]
            } else {
                &written[(i - 1) * block_size..]
            };

            let inputs = iter::once(predecessor).chain(
                neighbors
                    .iter()
                    .map(move |&n| &src[n * block_size..(n + 1) * block_size]),
            );

            compress(&mut rest[..block_size], inputs, mode, &mut self.acc)?;
        }

        Ok(())
    }

    /// Expands the current source half into `out_len` output bytes.
    ///
    /// # Parameters
    /// - `out_len`: number of output bytes; any length is accepted here,
    ///   the session layer bounds it
    ///
    /// # Returns
    /// The expansion of the whole source half (`block_size * n_blocks / 2`
    /// bytes) with an empty salt. A shorter output is a prefix of a longer
    /// one. Fails with [`Error::Alloc`] if the output cannot be allocated.
    ///
    /// # Security Notes
    /// - After at least one round the source half is the last round's
    ///   output, so the tag depends on every round.
    pub fn extract(&self, out_len: usize) -> Result<Vec<u8>, Error> {
        self.check_usable()?;

        let mut out: Vec<u8> = try_zeroed(out_len)?;

        expand_into(&mut out, self.source_view(), &[]);

        debug!(out_len, round = self.rounds, "extracted output");
        Ok(out)
    }

    /// Releases the state and anything it allocated.
    ///
    /// The buffer and the index stream belong to the caller and are left
    /// alone.
    pub fn free(self) {
        debug!(rounds = self.rounds, poisoned = self.poisoned, "freeing mixing state");
    }

    /// Dimensions this state was built with.
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// The half currently labeled source.
    pub fn source_half(&self) -> Half {
        self.source
    }

    /// Number of completed rounds.
    pub fn rounds_completed(&self) -> u32 {
        self.rounds
    }

    /// Whether a failed round has poisoned this state.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Read-only view of the source half.
    pub fn source_view(&self) -> &[u8] {
        &self.buffer[self.half_range(self.source)]
    }

    /// Read-only view of the destination half.
    pub fn destination_view(&self) -> &[u8] {
        &self.buffer[self.half_range(self.source.other())]
    }

    fn half_range(&self, half: Half) -> Range<usize> {
        let half_len = self.dims.half_len();
        match half {
            Half::Lower => 0..half_len,
            Half::Upper => half_len..2 * half_len,
        }
    }

    fn check_usable(&self) -> Result<(), Error> {
        if self.poisoned {
            return Err(Error::Poisoned);
        }
        Ok(())
    }
}
