// Copyright 2024-2025 Irreducible Inc.

use basalt_utils::{DeserializeBytes, SerializeBytes};
use digest::consts::{U28, U32, U48, U64};
use lazy_static::lazy_static;

use super::compress::{derive_iv, f8, BLOCK, STATE};
use crate::{
	block::BlockBuffer,
	macros::impl_digest_traits,
	state::{self, StateError},
	Hasher, Resumable,
};

lazy_static! {
	static ref IV224: [u8; STATE] = derive_iv(224);
	static ref IV256: [u8; STATE] = derive_iv(256);
	static ref IV384: [u8; STATE] = derive_iv(384);
	static ref IV512: [u8; STATE] = derive_iv(512);
}

#[derive(Clone)]
struct Core {
	h: [u8; STATE],
	len: u64,
}

impl Core {
	fn process(&mut self, block: &[u8; BLOCK]) {
		f8(&mut self.h, block);
	}
}

/// A block-aligned message takes a single padding block (0x80, zero fill,
/// 128-bit big-endian bit length in the last 16 bytes); any other tail
/// closes its own block with 0x80 and zeros, and the length rides in a
/// second, otherwise-zero block.
fn checksum(core: &mut Core, buf: &mut BlockBuffer<BLOCK>) {
	let bit_len = ((core.len as u128) << 3).to_be_bytes();
	let filled = buf.filled();

	let mut last = [0u8; BLOCK];
	last[BLOCK - 16..].copy_from_slice(&bit_len);

	if filled == 0 {
		last[0] = 0x80;
		buf.update(&last, |block| core.process(block));
	} else {
		let pad = {
			let mut pad = [0u8; BLOCK];
			pad[0] = 0x80;
			pad
		};
		buf.update(&pad[..BLOCK - filled], |block| core.process(block));
		buf.update(&last, |block| core.process(block));
	}
	debug_assert_eq!(buf.filled(), 0);
}

macro_rules! jh_variant {
	($name:ident, $iv:ident, $out_bytes:expr, $out_size:ty, $magic:expr) => {
		#[derive(Clone)]
		pub struct $name {
			core: Core,
			buf: BlockBuffer<BLOCK>,
		}

		impl $name {
			const MAGIC: [u8; state::MAGIC_LEN] = *$magic;
			const STATE_LEN: usize = state::MAGIC_LEN + STATE + BLOCK + 8;

			pub fn new() -> Self {
				Self {
					core: Core { h: *$iv, len: 0 },
					buf: BlockBuffer::default(),
				}
			}
		}

		impl Hasher for $name {
			fn output_size(&self) -> usize {
				$out_bytes
			}

			fn block_size(&self) -> usize {
				BLOCK
			}

			fn update(&mut self, data: impl AsRef<[u8]>) {
				let data = data.as_ref();
				let core = &mut self.core;
				self.buf.update(data, |block| core.process(block));
				self.core.len = self.core.len.wrapping_add(data.len() as u64);
			}

			fn sum_into(&self, out: &mut Vec<u8>) {
				let mut core = self.core.clone();
				let mut buf = self.buf.clone();
				checksum(&mut core, &mut buf);
				out.extend_from_slice(&core.h[STATE - $out_bytes..]);
			}

			fn reset(&mut self) {
				self.core = Core { h: *$iv, len: 0 };
				self.buf.reset();
			}
		}

		impl Resumable for $name {
			fn marshal_state(&self) -> Vec<u8> {
				let mut out = Vec::with_capacity(Self::STATE_LEN);
				out.extend_from_slice(&Self::MAGIC);
				self.core.h.serialize(&mut out).expect("vec write cannot fail");
				state::padded_tail::<BLOCK>(self.buf.tail())
					.serialize(&mut out)
					.expect("vec write cannot fail");
				self.core.len.serialize(&mut out).expect("vec write cannot fail");
				out
			}

			fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError> {
				let mut payload = state::check_frame(bytes, &Self::MAGIC, Self::STATE_LEN)?;
				let h = <[u8; STATE]>::deserialize(&mut payload)?;
				let tail = <[u8; BLOCK]>::deserialize(&mut payload)?;
				let len = u64::deserialize(&mut payload)?;

				let nx = (len % BLOCK as u64) as usize;
				Ok(Self {
					core: Core { h, len },
					buf: BlockBuffer::from_tail(&tail[..nx]),
				})
			}
		}

		impl_digest_traits!($name, $out_size, U64);
	};
}

jh_variant!(Jh224, IV224, 28, U28, b"jh.224.1");
jh_variant!(Jh256, IV256, 32, U32, b"jh.256.1");
jh_variant!(Jh384, IV384, 48, U48, b"jh.384.1");
jh_variant!(Jh512, IV512, 64, U64, b"jh.512.1");

#[cfg(test)]
mod tests {
	use hex_literal::hex;

	use super::*;
	use crate::hash;

	#[test]
	fn test_jh224_empty() {
		assert_eq!(
			hash::<Jh224>(b""),
			hex!("2c99df889b019309051c60fecc2bd285a774940e43175b76b2626630")
		);
	}

	#[test]
	fn test_jh256_empty() {
		assert_eq!(
			hash::<Jh256>(b""),
			hex!("46e64619c18bb0a92a5e87185a47eef83ca747b8fcc8e1412921357e326df434")
		);
	}

	#[test]
	fn test_chunked_updates_match_single_write() {
		let data: Vec<u8> = (0u8..130).collect();
		let whole = hash::<Jh512>(&data);

		for split in [1, 63, 64, 65, 129] {
			let mut hasher = Jh512::new();
			hasher.update(&data[..split]);
			hasher.update(&data[split..]);
			assert_eq!(hasher.sum(), whole, "split at {split}");
		}
	}

	#[test]
	fn test_sum_is_non_destructive() {
		let mut hasher = Jh256::new();
		hasher.update(b"alpha");
		let first = hasher.sum();
		assert_eq!(first, hasher.sum());

		hasher.update(b"beta");
		assert_eq!(hasher.sum(), hash::<Jh256>(b"alphabeta"));
	}

	#[test]
	fn test_reset_matches_fresh_instance() {
		let mut hasher = Jh384::new();
		hasher.update(b"discarded");
		hasher.reset();
		assert_eq!(hasher.sum(), hash::<Jh384>(b""));
	}

	#[test]
	fn test_marshal_unmarshal_resumes() {
		let data: Vec<u8> = (0u8..=149).collect();
		for split in [0, 1, 63, 64, 65, 128, 150] {
			let mut first = Jh256::new();
			first.update(&data[..split]);
			let blob = first.marshal_state();

			let mut resumed = Jh256::unmarshal_state(&blob).unwrap();
			resumed.update(&data[split..]);
			assert_eq!(resumed.sum(), hash::<Jh256>(&data), "split at {split}");
		}
	}

	#[test]
	fn test_unmarshal_rejects_corruption() {
		let blob = Jh256::new().chain_update(b"buffered tail").marshal_state();

		let mut magic_flipped = blob.clone();
		magic_flipped[0] ^= 0x01;
		assert!(matches!(
			Jh256::unmarshal_state(&magic_flipped),
			Err(StateError::MagicMismatch)
		));

		assert!(matches!(
			Jh256::unmarshal_state(&blob[..blob.len() - 1]),
			Err(StateError::LengthMismatch { .. })
		));

		assert!(matches!(
			Jh224::unmarshal_state(&blob),
			Err(StateError::MagicMismatch)
		));
	}
}
