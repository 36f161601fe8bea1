// Copyright 2024-2025 Irreducible Inc.

//! Plumbing shared by the per-family checkpoint codecs.
//!
//! Every marshaled state is one fixed-size big-endian frame: an 8-byte ASCII
//! magic tag naming (family, width, version), the register words, the
//! buffered tail padded to the family's block width, the length counter and
//! any auxiliary flags. Validation is strict — magic first, then the exact
//! frame length, then field consistency — and never recovers partially.

use basalt_utils::serialization;

/// Width of the magic tag opening every marshaled state frame.
pub(crate) const MAGIC_LEN: usize = 8;

/// Failure modes of [`crate::Resumable::unmarshal_state`].
#[derive(Debug, thiserror::Error)]
pub enum StateError {
	#[error("state blob carries a foreign magic tag")]
	MagicMismatch,
	#[error("state blob is {got} bytes, expected {expected}")]
	LengthMismatch { expected: usize, got: usize },
	#[error("state blob fields are inconsistent: {0}")]
	Inconsistent(&'static str),
	#[error("state blob ended prematurely: {0}")]
	Truncated(#[from] serialization::Error),
}

/// Checks the frame envelope and returns the payload following the magic tag.
pub(crate) fn check_frame<'a>(
	bytes: &'a [u8],
	magic: &[u8; MAGIC_LEN],
	expected: usize,
) -> Result<&'a [u8], StateError> {
	if bytes.len() < MAGIC_LEN || bytes[..MAGIC_LEN] != magic[..] {
		return Err(StateError::MagicMismatch);
	}
	if bytes.len() != expected {
		return Err(StateError::LengthMismatch {
			expected,
			got: bytes.len(),
		});
	}
	Ok(&bytes[MAGIC_LEN..])
}

/// Zero-pads `tail` to the family block width for the fixed-size frame.
pub(crate) fn padded_tail<const N: usize>(tail: &[u8]) -> [u8; N] {
	let mut padded = [0u8; N];
	padded[..tail.len()].copy_from_slice(tail);
	padded
}
