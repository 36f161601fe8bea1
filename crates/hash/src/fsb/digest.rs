// Copyright 2024-2025 Irreducible Inc.

use basalt_utils::{DeserializeBytes, SerializeBytes};
use digest::consts::{U115, U155, U20, U28, U32, U48, U60, U64, U84, U96};
use lazy_static::lazy_static;

use super::matrix::{
	read_bits, Matrix, PARAMS_160, PARAMS_224, PARAMS_256, PARAMS_384, PARAMS_512,
};
use crate::{
	block::BlockBuffer,
	macros::impl_digest_traits,
	state::{self, StateError},
	Hasher, Resumable,
};

lazy_static! {
	static ref MATRIX_160: Matrix = Matrix::expand(&PARAMS_160);
	static ref MATRIX_224: Matrix = Matrix::expand(&PARAMS_224);
	static ref MATRIX_256: Matrix = Matrix::expand(&PARAMS_256);
	static ref MATRIX_384: Matrix = Matrix::expand(&PARAMS_384);
	static ref MATRIX_512: Matrix = Matrix::expand(&PARAMS_512);
}

macro_rules! fsb_variant {
	(
		$name:ident, $params:ident, $matrix:ident, $r_words:expr, $block_bytes:expr,
		$out_bytes:expr, $out_size:ty, $block_size:ty, $magic:expr
	) => {
		#[derive(Clone)]
		pub struct $name {
			syndrome: [u64; $r_words],
			bits: u64,
			buf: BlockBuffer<{ $block_bytes }>,
		}

		impl $name {
			const MAGIC: [u8; state::MAGIC_LEN] = *$magic;
			const STATE_LEN: usize = state::MAGIC_LEN + 8 * $r_words + $block_bytes + 8;

			pub fn new() -> Self {
				Self {
					syndrome: [0u64; $r_words],
					bits: 0,
					buf: BlockBuffer::default(),
				}
			}

			/// Decodes the chaining syndrome concatenated with one message
			/// block into `w` column indices and XORs the selected circulant
			/// columns into the next syndrome.
			fn compress(syndrome: &mut [u64; $r_words], block: &[u8; $block_bytes]) {
				let matrix = &*$matrix;
				let mut input = [0u8; 8 * $r_words + $block_bytes];
				for (chunk, word) in input.chunks_exact_mut(8).zip(syndrome.iter()) {
					chunk.copy_from_slice(&word.to_be_bytes());
				}
				input[8 * $r_words..].copy_from_slice(block);

				let piece = $params.n / $params.w;
				let mut next = [0u64; $r_words];
				for i in 0..$params.w {
					let chunk = read_bits(&input, i * $params.idx_bits, $params.idx_bits);
					matrix.xor_column(&mut next, i * piece + chunk);
				}
				*syndrome = next;
			}
		}

		impl Hasher for $name {
			fn output_size(&self) -> usize {
				$out_bytes
			}

			fn block_size(&self) -> usize {
				$block_bytes
			}

			fn update(&mut self, data: impl AsRef<[u8]>) {
				let data = data.as_ref();
				let syndrome = &mut self.syndrome;
				self.buf.update(data, |block| Self::compress(syndrome, block));
				self.bits = self.bits.wrapping_add((data.len() as u64) << 3);
			}

			fn sum_into(&self, out: &mut Vec<u8>) {
				let mut syndrome = self.syndrome;
				let mut buf = self.buf.clone();

				// A '1' bit closes the message, zeros fill the block, and the
				// bit length rides in one final block of its own.
				let mut pad = [0u8; $block_bytes];
				pad[0] = 0x80;
				let fill = $block_bytes - buf.filled();
				buf.update(&pad[..fill], |block| Self::compress(&mut syndrome, block));

				let mut last = [0u8; $block_bytes];
				last[$block_bytes - 8..].copy_from_slice(&self.bits.to_be_bytes());
				buf.update(&last, |block| Self::compress(&mut syndrome, block));
				debug_assert_eq!(buf.filled(), 0);

				let mut bytes = [0u8; 8 * $r_words];
				for (chunk, word) in bytes.chunks_exact_mut(8).zip(syndrome.iter()) {
					chunk.copy_from_slice(&word.to_be_bytes());
				}
				out.extend_from_slice(&bytes[8 * $r_words - $out_bytes..]);
			}

			fn reset(&mut self) {
				self.syndrome = [0u64; $r_words];
				self.bits = 0;
				self.buf.reset();
			}
		}

		impl Resumable for $name {
			fn marshal_state(&self) -> Vec<u8> {
				let mut out = Vec::with_capacity(Self::STATE_LEN);
				out.extend_from_slice(&Self::MAGIC);
				self.syndrome[..].serialize(&mut out).expect("vec write cannot fail");
				state::padded_tail::<{ $block_bytes }>(self.buf.tail())
					.serialize(&mut out)
					.expect("vec write cannot fail");
				self.bits.serialize(&mut out).expect("vec write cannot fail");
				out
			}

			fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError> {
				let mut payload = state::check_frame(bytes, &Self::MAGIC, Self::STATE_LEN)?;
				let mut syndrome = [0u64; $r_words];
				for w in &mut syndrome {
					*w = u64::deserialize(&mut payload)?;
				}
				let tail = <[u8; $block_bytes]>::deserialize(&mut payload)?;
				let bits = u64::deserialize(&mut payload)?;

				if bits % 8 != 0 {
					return Err(StateError::Inconsistent("bit count not byte-aligned"));
				}
				let nx = ((bits >> 3) % $block_bytes as u64) as usize;
				Ok(Self {
					syndrome,
					bits,
					buf: BlockBuffer::from_tail(&tail[..nx]),
				})
			}
		}

		impl_digest_traits!($name, $out_size, $block_size);
	};
}

fsb_variant!(Fsb160, PARAMS_160, MATRIX_160, 10, 60, 20, U20, U60, b"fsb160.1");
fsb_variant!(Fsb224, PARAMS_224, MATRIX_224, 14, 84, 28, U28, U84, b"fsb224.1");
fsb_variant!(Fsb256, PARAMS_256, MATRIX_256, 16, 96, 32, U32, U96, b"fsb256.1");
fsb_variant!(Fsb384, PARAMS_384, MATRIX_384, 23, 115, 48, U48, U115, b"fsb384.1");
fsb_variant!(Fsb512, PARAMS_512, MATRIX_512, 31, 155, 64, U64, U155, b"fsb512.1");

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hash;

	#[test]
	fn test_output_sizes() {
		assert_eq!(hash::<Fsb160>(b"x").len(), 20);
		assert_eq!(hash::<Fsb224>(b"x").len(), 28);
		assert_eq!(hash::<Fsb256>(b"x").len(), 32);
		assert_eq!(hash::<Fsb384>(b"x").len(), 48);
		assert_eq!(hash::<Fsb512>(b"x").len(), 64);
	}

	#[test]
	fn test_input_sensitivity() {
		assert_ne!(hash::<Fsb256>(b""), hash::<Fsb256>(b"\0"));
		assert_ne!(hash::<Fsb256>(b"a"), hash::<Fsb256>(b"b"));
		assert_ne!(hash::<Fsb256>(b"ab"), hash::<Fsb256>(b"ab\0"));
	}

	#[test]
	fn test_chunked_updates_match_single_write() {
		// 96 bytes is one full Fsb256 block; straddle it.
		let data: Vec<u8> = (0u8..200).collect();
		let whole = hash::<Fsb256>(&data);

		for split in [1, 95, 96, 97, 199] {
			let mut hasher = Fsb256::new();
			hasher.update(&data[..split]);
			hasher.update(&data[split..]);
			assert_eq!(hasher.sum(), whole, "split at {split}");
		}
	}

	#[test]
	fn test_sum_is_non_destructive() {
		let mut hasher = Fsb160::new();
		hasher.update(b"checkpointable");
		let first = hasher.sum();
		assert_eq!(first, hasher.sum());

		hasher.update(b" stream");
		assert_eq!(hasher.sum(), hash::<Fsb160>(b"checkpointable stream"));
	}

	#[test]
	fn test_reset_matches_fresh_instance() {
		let mut hasher = Fsb512::new();
		hasher.update(b"discarded");
		hasher.reset();
		assert_eq!(hasher.sum(), hash::<Fsb512>(b""));
	}

	#[test]
	fn test_marshal_unmarshal_resumes() {
		let data: Vec<u8> = (0u8..=149).collect();
		for split in [0, 1, 59, 60, 61, 150] {
			let mut first = Fsb160::new();
			first.update(&data[..split]);
			let blob = first.marshal_state();

			let mut resumed = Fsb160::unmarshal_state(&blob).unwrap();
			resumed.update(&data[split..]);
			assert_eq!(resumed.sum(), hash::<Fsb160>(&data), "split at {split}");
		}
	}

	#[test]
	fn test_unmarshal_rejects_corruption() {
		let blob = Fsb256::new().chain_update(b"partial block").marshal_state();

		let mut magic_flipped = blob.clone();
		magic_flipped[2] ^= 0x04;
		assert!(matches!(
			Fsb256::unmarshal_state(&magic_flipped),
			Err(StateError::MagicMismatch)
		));

		assert!(matches!(
			Fsb256::unmarshal_state(&blob[..blob.len() - 1]),
			Err(StateError::LengthMismatch { .. })
		));

		assert!(matches!(
			Fsb512::unmarshal_state(&blob),
			Err(StateError::MagicMismatch)
		));
	}
}
