//! Key derivation functions.
//!
//! Currently provides BagHash, a memory-hard password hashing function
//! built on a double-buffer mixing strategy.

pub mod baghash;

pub use baghash::core::{Error, baghash};
pub use baghash::params::{BagHashParams, CombineMode, ParamError};
