// Copyright 2024-2025 Irreducible Inc.

//! The [JH](https://www3.ntu.edu.sg/home/wuhj/research/jh/jh_round3.pdf) hash
//! family.
//!
//! One 1024-bit state and one 42-round permutation E8 serve all four output
//! widths; variants differ only in their derived initial value and in how
//! many trailing bytes of the final state they publish. Round constants and
//! initial values are generated in-engine from the published round-zero
//! constant, so the module carries no large tables.

mod compress;
mod digest;

pub use digest::{Jh224, Jh256, Jh384, Jh512};
