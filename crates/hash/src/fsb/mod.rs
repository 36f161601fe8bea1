// Copyright 2024-2025 Irreducible Inc.

//! The FSB (fast syndrome-based) hash family.
//!
//! Each compression decodes the chaining syndrome concatenated with one
//! message block into `w` column indices of a quasi-cyclic binary matrix and
//! XORs the selected columns into the next r-bit syndrome. Length accounting
//! is in bits and the final syndrome truncates to the digest width.

mod digest;
mod matrix;

pub use digest::{Fsb160, Fsb224, Fsb256, Fsb384, Fsb512};
