// Copyright 2024-2025 Irreducible Inc.

//! The [Grøstl](https://www.groestl.info/Groestl.pdf) hash family.
//!
//! The short variants (224/256) run a 512-bit state through 10 rounds of the
//! P/Q permutation pair; the long variants (384/512) use a 1024-bit state and
//! 14 rounds. Both share one table layer combining SubBytes, ShiftBytes and
//! MixBytes per column.

mod compress1024;
mod compress512;
mod digest;
pub(crate) mod table;

pub use digest::{Groestl224, Groestl256, Groestl384, Groestl512};
