// Copyright 2023-2025 Irreducible Inc.

//! Streaming digest engine for the BLAKE, Grøstl, JH, Fugue and FSB hash
//! families.
//!
//! Every variant is a concrete type behind the same contract: incremental
//! [`Hasher::update`], non-destructive [`Hasher::sum`], [`Hasher::reset`],
//! fixed output and block widths, and a binary checkpoint format via
//! [`Resumable`] for suspending a computation across process boundaries. The
//! types also implement the RustCrypto [`digest`] traits, so they drop into
//! `digest::Digest`-generic callers.

pub mod blake;
mod block;
pub mod fsb;
pub mod fugue;
pub mod groestl;
mod hasher;
pub mod jh;
mod macros;
mod state;

pub use blake::{Blake224, Blake256, Blake384, Blake512};
pub use fsb::{Fsb160, Fsb224, Fsb256, Fsb384, Fsb512};
pub use fugue::{Fugue224, Fugue256, Fugue384, Fugue512};
pub use groestl::{Groestl224, Groestl256, Groestl384, Groestl512};
pub use hasher::{hash, Hasher, InvalidSaltLength, Resumable};
pub use jh::{Jh224, Jh256, Jh384, Jh512};
pub use state::StateError;
