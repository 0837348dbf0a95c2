//! Memory-hard password hashing
//!
//! This crate implements BagHash, a password hashing function whose cost
//! is dominated by memory: evaluating it requires a large pseudorandom
//! buffer, and every attempt to evaluate it with less memory forces a
//! proportional amount of recomputation.
//!
//! The focus is on **clarity, predictability, and auditability**. Every
//! piece of the construction is a small module with explicit inputs, and
//! all randomness flows through a deterministic stream that is passed
//! around explicitly rather than held in global state.
//!
//! # Module overview
//!
//! - `derivation`
//!   The BagHash password hashing function: parameters and validation,
//!   the double-buffer mixing state, the block compressor, the expander
//!   used at the boundaries, and the degree generator used by the XOR
//!   combine mode.
//!
//! - `rng`
//!   The pseudorandom index stream used to pick neighbor blocks. It is a
//!   ChaCha20 keystream keyed from the salt, consumed sequentially across
//!   all mixing rounds of one hash invocation.
//!
//! - `hash`
//!   The variable-length hash (SHA-512 in counter mode) underlying both
//!   the expander and the block compressor.
//!
//! # Quick start
//!
//! ```rust
//! use ::baghash::derivation::{BagHashParams, CombineMode, baghash};
//!
//! let params = BagHashParams {
//!     n_blocks: 128,
//!     block_size: 64,
//!     combine: CombineMode::Xor,
//!     rounds: 2,
//!     ..BagHashParams::default()
//! };
//!
//! let tag = baghash(b"hunter2", b"saltsalt", &params).unwrap();
//! assert_eq!(tag.len(), params.tag_len);
//! ```
//!
//! # Logging
//!
//! Lifecycle events are emitted through `tracing` at `debug` level, and
//! the neighbors sampled for each row at `trace` level. The crate never
//! installs a subscriber.

pub mod derivation;
pub mod hash;
pub mod rng;
