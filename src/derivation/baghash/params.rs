//! Parameter definitions and validation for BagHash.
//!
//! This module defines the tunable cost parameters and turns them into the
//! buffer dimensions the mixing core runs on. All size arithmetic happens
//! here, with overflow checks, so the core can trust its inputs.

use thiserror::Error;

use super::block::MAX_COMPRESS_BLOCKS;

/// Largest number of pseudorandom neighbors mixed into one row.
///
/// One extra compression input is always taken by the sequential
/// predecessor, so this is one less than [`MAX_COMPRESS_BLOCKS`].
pub const MAX_NEIGHBORS: usize = MAX_COMPRESS_BLOCKS - 1;

/// Largest accepted output length in bytes.
pub const MAX_TAG_LEN: usize = 1024;

/// Shortest accepted salt in bytes.
pub const MIN_SALT_LEN: usize = 8;

/// Default upper bound on the working buffer: 1 GiB.
pub const DEFAULT_MAX_MEMORY: usize = 1 << 30;

/// How the inputs of one row are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombineMode {
    /// Fixed neighbor count, sampled with replacement, hashed in order.
    #[default]
    Default,
    /// Per-row neighbor count from the degree generator, sampled without
    /// replacement, XORed together before hashing.
    Xor,
}

/// Configuration parameters for BagHash.
///
/// # Recommended values
///
/// Memory is `n_blocks * block_size` bytes; only half of it is live input
/// to any given round. Raise `n_blocks` first, then `rounds`.
#[derive(Clone, Debug)]
pub struct BagHashParams {
    /// Total number of blocks in the buffer (even, at least 2).
    pub n_blocks: usize,
    /// Size of one block in bytes (at least 1).
    pub block_size: usize,
    /// Neighbors per row in [`CombineMode::Default`]. Ignored for XOR.
    pub n_neighbors: usize,
    /// Row combine policy.
    pub combine: CombineMode,
    /// Number of mixing rounds (at least 1).
    pub rounds: u32,
    /// Output length in bytes (`1..=MAX_TAG_LEN`).
    pub tag_len: usize,
    /// Upper bound on `n_blocks * block_size`, in bytes.
    pub max_memory: usize,
}

/// Errors that can occur during parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// At least one mixing round is required.
    #[error("at least one mixing round is required")]
    TooFewRounds,
    /// Two halves of at least one block each are required.
    #[error("at least two blocks are required, got {0}")]
    TooFewBlocks(usize),
    /// The buffer is split in two equal halves.
    #[error("block count must be even, got {0}")]
    OddBlockCount(usize),
    /// Blocks cannot be empty.
    #[error("block size must be non-zero")]
    ZeroBlockSize,
    /// The row inputs would exceed what the compressor accepts.
    #[error("{0} neighbors exceeds the maximum of {max}", max = MAX_NEIGHBORS)]
    TooManyNeighbors(usize),
    /// Output length out of range.
    #[error("tag length {0} is outside 1..={max}", max = MAX_TAG_LEN)]
    TagLengthInvalid(usize),
    /// `n_blocks * block_size` does not fit in `usize`.
    #[error("buffer size {n_blocks} x {block_size} overflows")]
    MemoryOverflow {
        /// Requested block count.
        n_blocks: usize,
        /// Requested block size.
        block_size: usize,
    },
    /// The buffer is larger than the configured limit.
    #[error("buffer of {requested} bytes exceeds the limit of {limit}")]
    MemoryLimitExceeded {
        /// Requested buffer size.
        requested: usize,
        /// Configured limit.
        limit: usize,
    },
    /// Salt shorter than [`MIN_SALT_LEN`].
    #[error("salt must be at least {min} bytes, got {0}", min = MIN_SALT_LEN)]
    SaltTooShort(usize),
}

/// Buffer dimensions derived from validated parameters.
///
/// The fields are private so that every value goes through
/// [`Dimensions::new`]; the mixing core relies on `n_blocks`,
/// `blocks_per_buf`, `half_len` and `total_len` agreeing with each other.
///
/// ```compile_fail
/// use baghash::derivation::baghash::params::Dimensions;
///
/// let dims = Dimensions {
///     block_size: 16,
///     n_blocks: 4,
///     blocks_per_buf: 4,
///     half_len: 32,
///     total_len: 64,
/// };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    block_size: usize,
    n_blocks: usize,
    blocks_per_buf: usize,
    half_len: usize,
    total_len: usize,
}

impl Dimensions {
    /// Derives the dimensions of a `n_blocks` by `block_size` buffer.
    ///
    /// Checks the shape invariants and the multiplication, but not any
    /// memory limit; see [`BagHashParams::validate`] for the full policy.
    ///
    /// # Parameters
    /// - `n_blocks`: total block count, even and at least 2
    /// - `block_size`: bytes per block, at least 1
    ///
    /// # Returns
    /// Dimensions where `blocks_per_buf * 2 == n_blocks`,
    /// `half_len == blocks_per_buf * block_size` and
    /// `total_len == 2 * half_len`, or the first violated constraint.
    pub fn new(n_blocks: usize, block_size: usize) -> Result<Self, ParamError> {
        if n_blocks < 2 {
            return Err(ParamError::TooFewBlocks(n_blocks));
        }
        if n_blocks % 2 != 0 {
            return Err(ParamError::OddBlockCount(n_blocks));
        }
        if block_size == 0 {
            return Err(ParamError::ZeroBlockSize);
        }

        let total_len = n_blocks
            .checked_mul(block_size)
            .ok_or(ParamError::MemoryOverflow {
                n_blocks,
                block_size,
            })?;
        let blocks_per_buf = n_blocks / 2;

        Ok(Self {
            block_size,
            n_blocks,
            blocks_per_buf,
            // n_blocks is even, so this is exact
            half_len: total_len / 2,
            total_len,
        })
    }

    /// Size of one block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Total number of blocks.
    pub fn n_blocks(&self) -> usize {
        self.n_blocks
    }

    /// Blocks in each half.
    pub fn blocks_per_buf(&self) -> usize {
        self.blocks_per_buf
    }

    /// Bytes in each half.
    pub fn half_len(&self) -> usize {
        self.half_len
    }

    /// Bytes in the whole buffer.
    pub fn total_len(&self) -> usize {
        self.total_len
    }
}

impl BagHashParams {
    /// Validates the parameters and derives the buffer dimensions.
    pub fn validate(&self) -> Result<Dimensions, ParamError> {
        if self.rounds < 1 {
            return Err(ParamError::TooFewRounds);
        }

        let dims = Dimensions::new(self.n_blocks, self.block_size)?;

        if self.n_neighbors > MAX_NEIGHBORS {
            return Err(ParamError::TooManyNeighbors(self.n_neighbors));
        }

        if self.tag_len < 1 || self.tag_len > MAX_TAG_LEN {
            return Err(ParamError::TagLengthInvalid(self.tag_len));
        }

        if dims.total_len() > self.max_memory {
            return Err(ParamError::MemoryLimitExceeded {
                requested: dims.total_len(),
                limit: self.max_memory,
            });
        }

        Ok(dims)
    }

    pub(crate) fn validate_salt(salt: &[u8]) -> Result<(), ParamError> {
        if salt.len() < MIN_SALT_LEN {
            return Err(ParamError::SaltTooShort(salt.len()));
        }
        Ok(())
    }
}

impl Default for BagHashParams {
    /// 16384 blocks of 64 bytes (1 MiB), 3 neighbors, 3 rounds, 32-byte tag.
    fn default() -> Self {
        Self {
            n_blocks: 16 * 1024,
            block_size: 64,
            n_neighbors: 3,
            combine: CombineMode::Default,
            rounds: 3,
            tag_len: 32,
            max_memory: DEFAULT_MAX_MEMORY,
        }
    }
}
