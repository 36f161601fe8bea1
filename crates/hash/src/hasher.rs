// Copyright 2023-2025 Irreducible Inc.

use crate::state::StateError;

/// Trait representing streaming cryptographic hash state over byte input.
///
/// This interface is largely based on the [`digest::Digest`] trait, except that
/// finalization borrows the state instead of consuming it: [`Hasher::sum_into`]
/// runs the padding schedule on an internal copy, so a hasher stays writable
/// after producing a digest and interleaved `update`/`sum` calls observe the
/// same bytes an uninterrupted computation would.
pub trait Hasher: Clone {
	/// Digest width in bytes.
	fn output_size(&self) -> usize;

	/// Compression block width in bytes.
	fn block_size(&self) -> usize;

	/// Absorbs `data`. The entire input is always consumed; streaming cannot
	/// fail.
	fn update(&mut self, data: impl AsRef<[u8]>);

	/// Absorbs input in a chained manner.
	#[must_use]
	fn chain_update(mut self, data: impl AsRef<[u8]>) -> Self {
		self.update(data);
		self
	}

	/// Appends the digest of everything absorbed so far to `out` without
	/// disturbing the streaming state.
	fn sum_into(&self, out: &mut Vec<u8>);

	/// Digest of everything absorbed so far; the state stays writable.
	fn sum(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.output_size());
		self.sum_into(&mut out);
		out
	}

	/// Returns to the construction-time state, keeping any configured salt.
	fn reset(&mut self);
}

/// Suspend/resume support for streaming hashes.
///
/// The marshaled form captures every mutable field of the hasher — register
/// words, the buffered tail, length counters and auxiliary flags — so that a
/// computation interrupted at an arbitrary byte boundary resumes into the
/// digest an uninterrupted run would have produced.
pub trait Resumable: Sized {
	/// Serializes the full mutable state into a fixed-size blob.
	fn marshal_state(&self) -> Vec<u8>;

	/// Reconstructs a live hasher from [`Resumable::marshal_state`] output.
	///
	/// Rejects blobs with a foreign magic tag, a wrong total length or
	/// inconsistent fields; there is no partial recovery.
	fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError>;
}

/// Error returned when constructing a salted hasher with a salt of the wrong
/// width for the family.
#[derive(Debug, thiserror::Error)]
#[error("invalid salt length: expected {expected} bytes, got {got}")]
pub struct InvalidSaltLength {
	pub expected: usize,
	pub got: usize,
}

/// Hashes `data` in one call.
pub fn hash<H: Hasher + Default>(data: impl AsRef<[u8]>) -> Vec<u8> {
	H::default().chain_update(data).sum()
}
