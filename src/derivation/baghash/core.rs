use thiserror::Error;
use tracing::debug;
use zeroize::Zeroize;

use super::block::CompressError;
use super::degree::DegreeError;
use super::double::DoubleBuffer;
use super::params::{BagHashParams, Dimensions, ParamError};
use crate::rng::{Bitstream, StreamError};

/// Errors that can occur during BagHash computation.
///
/// Collaborator errors are wrapped unchanged so the caller can tell which
/// stage failed.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parameter values or salt.
    #[error("invalid parameters: {0}")]
    Params(#[from] ParamError),
    /// A buffer or state allocation failed.
    #[error("memory allocation failed")]
    Alloc,
    /// The buffer handed to the mixing state has the wrong length.
    #[error("buffer is {actual} bytes, expected {expected}")]
    BufferSize {
        /// Length implied by the dimensions.
        expected: usize,
        /// Length of the buffer received.
        actual: usize,
    },
    /// The index stream failed.
    #[error("index generation failed: {0}")]
    Stream(#[from] StreamError),
    /// The degree generator failed.
    #[error("degree generation failed: {0}")]
    Degree(#[from] DegreeError),
    /// The block compressor failed.
    #[error("compression failed: {0}")]
    Compress(#[from] CompressError),
    /// An earlier mixing round failed; the state is unusable.
    #[error("mixing state is poisoned by an earlier failure")]
    Poisoned,
}

/// Computes a BagHash of the given password.
///
/// # Arguments
///
/// * `password` - The password to hash
/// * `salt` - A random salt (minimum 8 bytes, recommended 16+ bytes)
/// * `params` - BagHash parameters (buffer shape, rounds, combine mode, tag length)
///
/// # Returns
///
/// The derived key (tag) as a byte vector, or an error if parameters are
/// invalid or the buffer cannot be allocated.
///
/// # Example
///
/// ```rust
/// use ::baghash::derivation::{BagHashParams, baghash};
///
/// let params = BagHashParams {
///     n_blocks: 64,
///     ..BagHashParams::default()
/// };
///
/// let tag = baghash(b"my_password", b"random_salt_16b!", &params).unwrap();
/// assert_eq!(tag.len(), 32);
/// ```
pub fn baghash(password: &[u8], salt: &[u8], params: &BagHashParams) -> Result<Vec<u8>, Error> {
    let dims = params.validate()?;
    BagHashParams::validate_salt(salt)?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(dims.total_len())
        .map_err(|_| Error::Alloc)?;
    buffer.resize(dims.total_len(), 0u8);

    // The index stream is seeded once and shared by every round.
    let mut stream = Bitstream::from_seed(salt);

    let result = run(&mut buffer, password, salt, params, dims, &mut stream);
    buffer.zeroize();

    debug!(
        rounds = params.rounds,
        total_len = dims.total_len(),
        ok = result.is_ok(),
        "baghash session finished"
    );
    result
}

fn run(
    buffer: &mut [u8],
    password: &[u8],
    salt: &[u8],
    params: &BagHashParams,
    dims: Dimensions,
    stream: &mut Bitstream,
) -> Result<Vec<u8>, Error> {
    let mut state = DoubleBuffer::init(buffer, dims, params.combine, params.n_neighbors)?;

    state.fill(password, salt)?;
    for _ in 0..params.rounds {
        state.mix(stream)?;
    }
    let tag = state.extract(params.tag_len)?;

    state.free();
    Ok(tag)
}
