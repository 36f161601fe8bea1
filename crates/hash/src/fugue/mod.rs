// Copyright 2024-2025 Irreducible Inc.

//! The Fugue hash family.
//!
//! Fugue consumes the message one 32-bit big-endian word at a time. Each word
//! is folded into a 30-word (224/256) or 36-word (384/512) register pipeline
//! by a TIX step followed by two to four super-rounds of rotate / column-mix
//! / SMIX; the SMIX core substitutes 16 bytes through the AES S-box and
//! diffuses them with the Super-Mix matrix. Length accounting is in bits.

mod digest;
mod smix;

pub use digest::{Fugue224, Fugue256, Fugue384, Fugue512};
