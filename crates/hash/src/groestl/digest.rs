// Copyright 2024-2025 Irreducible Inc.

use basalt_utils::{DeserializeBytes, SerializeBytes};
use digest::consts::{U128, U28, U32, U48, U64};

use super::{compress1024, compress512};
use crate::{
	block::BlockBuffer,
	macros::impl_digest_traits,
	state::{self, StateError},
	Hasher, Resumable,
};

const BLOCK_SHORT: usize = 64;
const BLOCK_LONG: usize = 128;

#[derive(Clone)]
struct ShortCore {
	state: [u64; compress512::COLS],
	blocks: u64,
}

impl ShortCore {
	fn new(out_bits: u64) -> Self {
		let mut state = [0u64; compress512::COLS];
		state[compress512::COLS - 1] = out_bits;
		Self { state, blocks: 0 }
	}

	fn process(&mut self, block: &[u8; BLOCK_SHORT]) {
		compress512::compress(&mut self.state, block);
		self.blocks = self.blocks.wrapping_add(1);
	}
}

#[derive(Clone)]
struct LongCore {
	state: [u64; compress1024::COLS],
	blocks: u64,
}

impl LongCore {
	fn new(out_bits: u64) -> Self {
		let mut state = [0u64; compress1024::COLS];
		state[compress1024::COLS - 1] = out_bits;
		Self { state, blocks: 0 }
	}

	fn process(&mut self, block: &[u8; BLOCK_LONG]) {
		compress1024::compress(&mut self.state, block);
		self.blocks = self.blocks.wrapping_add(1);
	}
}

/// Pads with 0x80, zero fill and the big-endian total *block* count, then
/// applies the output transform `trunc(P(x) ⊕ x)`. The length field needs 8
/// bytes, so a tail of 56 bytes or more spills into a second padding block.
fn checksum_short(core: &mut ShortCore, buf: &mut BlockBuffer<BLOCK_SHORT>) -> [u8; 64] {
	let filled = buf.filled();
	let extra_blocks = if filled >= BLOCK_SHORT - 8 { 2 } else { 1 };
	let total_blocks = core.blocks.wrapping_add(extra_blocks);

	let mut pad = [0u8; 2 * BLOCK_SHORT];
	pad[0] = 0x80;
	let pad_len = extra_blocks as usize * BLOCK_SHORT - filled;
	pad[pad_len - 8..pad_len].copy_from_slice(&total_blocks.to_be_bytes());
	buf.update(&pad[..pad_len], |block| core.process(block));
	debug_assert_eq!(buf.filled(), 0);

	let mut x = core.state;
	compress512::p(&mut x);
	for (xi, si) in x.iter_mut().zip(core.state) {
		*xi ^= si;
	}
	compress512::state_to_bytes(&x)
}

fn checksum_long(core: &mut LongCore, buf: &mut BlockBuffer<BLOCK_LONG>) -> [u8; 128] {
	let filled = buf.filled();
	let extra_blocks = if filled >= BLOCK_LONG - 8 { 2 } else { 1 };
	let total_blocks = core.blocks.wrapping_add(extra_blocks);

	let mut pad = [0u8; 2 * BLOCK_LONG];
	pad[0] = 0x80;
	let pad_len = extra_blocks as usize * BLOCK_LONG - filled;
	pad[pad_len - 8..pad_len].copy_from_slice(&total_blocks.to_be_bytes());
	buf.update(&pad[..pad_len], |block| core.process(block));
	debug_assert_eq!(buf.filled(), 0);

	let mut x = core.state;
	compress1024::p(&mut x);
	for (xi, si) in x.iter_mut().zip(core.state) {
		*xi ^= si;
	}
	compress1024::state_to_bytes(&x)
}

macro_rules! groestl_variant {
	(
		$name:ident, $core:ident, $checksum:ident, $block:expr, $cols:expr,
		$out_bits:expr, $out_bytes:expr, $out_size:ty, $block_size:ty, $magic:expr
	) => {
		#[derive(Clone)]
		pub struct $name {
			core: $core,
			buf: BlockBuffer<{ $block }>,
		}

		impl $name {
			const MAGIC: [u8; state::MAGIC_LEN] = *$magic;
			const STATE_LEN: usize = state::MAGIC_LEN + 8 * $cols + $block + 8;

			pub fn new() -> Self {
				Self {
					core: $core::new($out_bits),
					buf: BlockBuffer::default(),
				}
			}
		}

		impl Hasher for $name {
			fn output_size(&self) -> usize {
				$out_bytes
			}

			fn block_size(&self) -> usize {
				$block
			}

			fn update(&mut self, data: impl AsRef<[u8]>) {
				let core = &mut self.core;
				self.buf.update(data.as_ref(), |block| core.process(block));
			}

			fn sum_into(&self, out: &mut Vec<u8>) {
				let mut core = self.core.clone();
				let mut buf = self.buf.clone();
				let full = $checksum(&mut core, &mut buf);
				out.extend_from_slice(&full[full.len() - $out_bytes..]);
			}

			fn reset(&mut self) {
				self.core = $core::new($out_bits);
				self.buf.reset();
			}
		}

		impl Resumable for $name {
			fn marshal_state(&self) -> Vec<u8> {
				let mut out = Vec::with_capacity(Self::STATE_LEN);
				out.extend_from_slice(&Self::MAGIC);
				self.core.state[..].serialize(&mut out).expect("vec write cannot fail");
				state::padded_tail::<{ $block }>(self.buf.tail())
					.serialize(&mut out)
					.expect("vec write cannot fail");
				let len = self
					.core
					.blocks
					.wrapping_mul($block as u64)
					.wrapping_add(self.buf.filled() as u64);
				len.serialize(&mut out).expect("vec write cannot fail");
				out
			}

			fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError> {
				let mut payload = state::check_frame(bytes, &Self::MAGIC, Self::STATE_LEN)?;
				let mut words = [0u64; $cols];
				for w in &mut words {
					*w = u64::deserialize(&mut payload)?;
				}
				let tail = <[u8; $block]>::deserialize(&mut payload)?;
				let len = u64::deserialize(&mut payload)?;

				let nx = (len % $block as u64) as usize;
				Ok(Self {
					core: $core {
						state: words,
						blocks: len.wrapping_sub(nx as u64) / $block as u64,
					},
					buf: BlockBuffer::from_tail(&tail[..nx]),
				})
			}
		}

		impl_digest_traits!($name, $out_size, $block_size);
	};
}

groestl_variant!(
	Groestl224, ShortCore, checksum_short, BLOCK_SHORT, compress512::COLS,
	224, 28, U28, U64, b"grl224.1"
);
groestl_variant!(
	Groestl256, ShortCore, checksum_short, BLOCK_SHORT, compress512::COLS,
	256, 32, U32, U64, b"grl256.1"
);
groestl_variant!(
	Groestl384, LongCore, checksum_long, BLOCK_LONG, compress1024::COLS,
	384, 48, U48, U128, b"grl384.1"
);
groestl_variant!(
	Groestl512, LongCore, checksum_long, BLOCK_LONG, compress1024::COLS,
	512, 64, U64, U128, b"grl512.1"
);
