//! BagHash memory-hard password hashing, double-buffer variant.
//!
//! BagHash derives a tag from a password and salt by forcing the evaluator
//! to materialize a large pseudorandom buffer and touch it repeatedly, so
//! that using less memory costs proportionally more computation.
//!
//! # Algorithm Overview
//!
//! 1. **Fill**: expand (password, salt) into the lower half of the buffer.
//! 2. **Mix**: for each round, write every row of the other half from its
//!    sequential predecessor and a pseudorandom set of rows of the half
//!    written last, then swap the roles of the halves.
//! 3. **Extract**: expand the half written last into the output tag.
//!
//! # Combine Modes
//!
//! - **Default**: a fixed number of neighbors per row, sampled with
//!   replacement and hashed in order together with the predecessor.
//! - **XOR**: a per-row number of neighbors drawn from a soliton-like
//!   degree distribution, sampled without replacement and XORed together
//!   before hashing.
//!
//! # Memory Organization
//!
//! The buffer holds `n_blocks` blocks of `block_size` bytes, split into a
//! lower and an upper half. The roles (source and destination) alternate
//! every round; data is never copied between the halves.
//!
//! The index stream that picks neighbors is seeded from the salt, so the
//! memory access pattern is independent of the password.

pub mod block;
pub mod boundary;
pub mod core;
pub mod degree;
pub mod double;
pub mod params;
