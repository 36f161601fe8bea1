// Copyright 2024-2025 Irreducible Inc.

//! The [BLAKE](https://www.aumasson.jp/blake/blake.pdf) hash family.
//!
//! Two compression cores: a 32-bit one shared by BLAKE-224/256 (14 rounds)
//! and a 64-bit one shared by BLAKE-384/512 (16 rounds). All four variants
//! accept an optional salt — 16 bytes for the 32-bit family, 32 bytes for the
//! 64-bit family — folded into the working vector of every compression and
//! into the final feed-forward.

mod compress256;
mod compress512;
mod digest;

pub use digest::{Blake224, Blake256, Blake384, Blake512};
