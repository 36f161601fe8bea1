// Copyright 2024-2025 Irreducible Inc.

use basalt_utils::{DeserializeBytes, SerializeBytes};
use digest::consts::{U128, U28, U32, U48, U64};

use super::{compress256, compress512};
use crate::{
	block::BlockBuffer,
	macros::impl_digest_traits,
	state::{self, StateError},
	Hasher, InvalidSaltLength, Resumable,
};

/// Message-word permutation schedule, shared by both compression cores.
pub(super) const SIGMA: [[usize; 16]; 10] = [
	[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
	[14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
	[11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
	[7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
	[9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
	[2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
	[12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
	[13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
	[6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
	[10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
];

const BLOCK256: usize = 64;
const BLOCK512: usize = 128;

#[derive(Clone, Debug)]
struct Core256 {
	h: [u32; 8],
	s: [u32; 4],
	t: u64,
	nullt: bool,
}

impl Core256 {
	fn new(iv: &[u32; 8], s: [u32; 4]) -> Self {
		Self {
			h: *iv,
			s,
			t: 0,
			nullt: false,
		}
	}

	fn process(&mut self, block: &[u8; BLOCK256]) {
		self.t = self.t.wrapping_add(512);
		compress256::compress(&mut self.h, &self.s, self.t, self.nullt, block);
	}
}

#[derive(Clone)]
struct Core512 {
	h: [u64; 8],
	s: [u64; 4],
	t: u64,
	nullt: bool,
}

impl Core512 {
	fn new(iv: &[u64; 8], s: [u64; 4]) -> Self {
		Self {
			h: *iv,
			s,
			t: 0,
			nullt: false,
		}
	}

	fn process(&mut self, block: &[u8; BLOCK512]) {
		self.t = self.t.wrapping_add(1024);
		compress512::compress(&mut self.h, &self.s, self.t, self.nullt, block);
	}
}

fn write256(core: &mut Core256, buf: &mut BlockBuffer<BLOCK256>, data: &[u8]) {
	buf.update(data, |block| core.process(block));
}

fn write512(core: &mut Core512, buf: &mut BlockBuffer<BLOCK512>, data: &[u8]) {
	buf.update(data, |block| core.process(block));
}

/// Padding for the 32-bit family. One block holds up to 55 message bytes
/// plus 0x80-padding, the domain byte and the 64-bit bit length. A tail of exactly 55 bytes packs the padding and domain bits
/// into the single byte 0x81 (0x80 for the truncated variant). The counter is
/// pre-adjusted so that each synthetic block nets exactly the message bits it
/// carries, and `nullt` marks a final block with no message bits at all.
fn checksum256(core: &mut Core256, buf: &mut BlockBuffer<BLOCK256>, full_width: bool) -> [u8; 32] {
	let nx = buf.filled() as u64;
	let bit_len = core.t.wrapping_add(nx << 3).to_be_bytes();

	if nx == 55 {
		core.t = core.t.wrapping_sub(8);
		let pad = if full_width { [0x81] } else { [0x80] };
		write256(core, buf, &pad);
	} else {
		let mut pad = [0u8; BLOCK256];
		pad[0] = 0x80;
		if nx < 55 {
			if nx == 0 {
				core.nullt = true;
			}
			core.t = core.t.wrapping_sub(440 - (nx << 3));
			write256(core, buf, &pad[..(55 - nx) as usize]);
		} else {
			core.t = core.t.wrapping_sub(512 - (nx << 3));
			write256(core, buf, &pad[..(64 - nx) as usize]);
			core.t = core.t.wrapping_sub(440);
			write256(core, buf, &pad[1..56]);
			core.nullt = true;
		}
		let domain = if full_width { [0x01] } else { [0x00] };
		write256(core, buf, &domain);
		core.t = core.t.wrapping_sub(8);
	}
	core.t = core.t.wrapping_sub(64);
	write256(core, buf, &bit_len);

	let mut out = [0u8; 32];
	for (chunk, word) in out.chunks_exact_mut(4).zip(core.h) {
		chunk.copy_from_slice(&word.to_be_bytes());
	}
	out
}

/// Padding for the 64-bit family; up to 111 message bytes fit in the final
/// block and the length field is two big-endian 64-bit words.
fn checksum512(core: &mut Core512, buf: &mut BlockBuffer<BLOCK512>, full_width: bool) -> [u8; 64] {
	let nx = buf.filled() as u64;
	let low = core.t.wrapping_add(nx << 3);
	let mut bit_len = [0u8; 16];
	bit_len[8..].copy_from_slice(&low.to_be_bytes());

	if nx == 111 {
		core.t = core.t.wrapping_sub(8);
		let pad = if full_width { [0x81] } else { [0x80] };
		write512(core, buf, &pad);
	} else {
		let mut pad = [0u8; BLOCK512];
		pad[0] = 0x80;
		if nx < 111 {
			if nx == 0 {
				core.nullt = true;
			}
			core.t = core.t.wrapping_sub(888 - (nx << 3));
			write512(core, buf, &pad[..(111 - nx) as usize]);
		} else {
			core.t = core.t.wrapping_sub(1024 - (nx << 3));
			write512(core, buf, &pad[..(128 - nx) as usize]);
			core.t = core.t.wrapping_sub(888);
			write512(core, buf, &pad[1..112]);
			core.nullt = true;
		}
		let domain = if full_width { [0x01] } else { [0x00] };
		write512(core, buf, &domain);
		core.t = core.t.wrapping_sub(8);
	}
	core.t = core.t.wrapping_sub(128);
	write512(core, buf, &bit_len);

	let mut out = [0u8; 64];
	for (chunk, word) in out.chunks_exact_mut(8).zip(core.h) {
		chunk.copy_from_slice(&word.to_be_bytes());
	}
	out
}

fn salt256(salt: &[u8]) -> Result<[u32; 4], InvalidSaltLength> {
	if salt.len() != 16 {
		return Err(InvalidSaltLength {
			expected: 16,
			got: salt.len(),
		});
	}
	let mut s = [0u32; 4];
	for (w, chunk) in s.iter_mut().zip(salt.chunks_exact(4)) {
		*w = u32::from_be_bytes(chunk.try_into().expect("chunk is 4 bytes"));
	}
	Ok(s)
}

fn salt512(salt: &[u8]) -> Result<[u64; 4], InvalidSaltLength> {
	if salt.len() != 32 {
		return Err(InvalidSaltLength {
			expected: 32,
			got: salt.len(),
		});
	}
	let mut s = [0u64; 4];
	for (w, chunk) in s.iter_mut().zip(salt.chunks_exact(8)) {
		*w = u64::from_be_bytes(chunk.try_into().expect("chunk is 8 bytes"));
	}
	Ok(s)
}

macro_rules! blake32_variant {
	($name:ident, $iv:expr, $full_width:expr, $out_bytes:expr, $out_size:ty, $magic:expr) => {
		#[derive(Clone, Debug)]
		pub struct $name {
			core: Core256,
			buf: BlockBuffer<BLOCK256>,
		}

		impl $name {
			const MAGIC: [u8; state::MAGIC_LEN] = *$magic;
			const STATE_LEN: usize = state::MAGIC_LEN + 32 + 16 + BLOCK256 + 8 + 1;

			pub fn new() -> Self {
				Self {
					core: Core256::new(&$iv, [0u32; 4]),
					buf: BlockBuffer::default(),
				}
			}

			/// Salted construction; the salt must be exactly 16 bytes.
			pub fn with_salt(salt: &[u8]) -> Result<Self, InvalidSaltLength> {
				Ok(Self {
					core: Core256::new(&$iv, salt256(salt)?),
					buf: BlockBuffer::default(),
				})
			}
		}

		impl Hasher for $name {
			fn output_size(&self) -> usize {
				$out_bytes
			}

			fn block_size(&self) -> usize {
				BLOCK256
			}

			fn update(&mut self, data: impl AsRef<[u8]>) {
				let core = &mut self.core;
				self.buf.update(data.as_ref(), |block| core.process(block));
			}

			fn sum_into(&self, out: &mut Vec<u8>) {
				let mut core = self.core.clone();
				let mut buf = self.buf.clone();
				let digest = checksum256(&mut core, &mut buf, $full_width);
				out.extend_from_slice(&digest[..$out_bytes]);
			}

			fn reset(&mut self) {
				self.core = Core256::new(&$iv, self.core.s);
				self.buf.reset();
			}
		}

		impl Resumable for $name {
			fn marshal_state(&self) -> Vec<u8> {
				let mut out = Vec::with_capacity(Self::STATE_LEN);
				out.extend_from_slice(&Self::MAGIC);
				self.core.h[..].serialize(&mut out).expect("vec write cannot fail");
				self.core.s[..].serialize(&mut out).expect("vec write cannot fail");
				state::padded_tail::<BLOCK256>(self.buf.tail())
					.serialize(&mut out)
					.expect("vec write cannot fail");
				let bits = self.core.t.wrapping_add((self.buf.filled() as u64) << 3);
				bits.serialize(&mut out).expect("vec write cannot fail");
				out.push(self.core.nullt as u8);
				out
			}

			fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError> {
				let mut payload = state::check_frame(bytes, &Self::MAGIC, Self::STATE_LEN)?;
				let mut h = [0u32; 8];
				for w in &mut h {
					*w = u32::deserialize(&mut payload)?;
				}
				let mut s = [0u32; 4];
				for w in &mut s {
					*w = u32::deserialize(&mut payload)?;
				}
				let tail = <[u8; BLOCK256]>::deserialize(&mut payload)?;
				let bits = u64::deserialize(&mut payload)?;
				let [flag] = <[u8; 1]>::deserialize(&mut payload)?;

				if bits % 8 != 0 {
					return Err(StateError::Inconsistent("bit count not byte-aligned"));
				}
				let nullt = match flag {
					0 => false,
					1 => true,
					_ => return Err(StateError::Inconsistent("flag byte out of range")),
				};
				let nx = ((bits % 512) / 8) as usize;

				Ok(Self {
					core: Core256 {
						h,
						s,
						t: bits.wrapping_sub((nx as u64) << 3),
						nullt,
					},
					buf: BlockBuffer::from_tail(&tail[..nx]),
				})
			}
		}

		impl_digest_traits!($name, $out_size, U64);
	};
}

macro_rules! blake64_variant {
	($name:ident, $iv:expr, $full_width:expr, $out_bytes:expr, $out_size:ty, $magic:expr) => {
		#[derive(Clone)]
		pub struct $name {
			core: Core512,
			buf: BlockBuffer<BLOCK512>,
		}

		impl $name {
			const MAGIC: [u8; state::MAGIC_LEN] = *$magic;
			const STATE_LEN: usize = state::MAGIC_LEN + 64 + 32 + BLOCK512 + 8 + 1;

			pub fn new() -> Self {
				Self {
					core: Core512::new(&$iv, [0u64; 4]),
					buf: BlockBuffer::default(),
				}
			}

			/// Salted construction; the salt must be exactly 32 bytes.
			pub fn with_salt(salt: &[u8]) -> Result<Self, InvalidSaltLength> {
				Ok(Self {
					core: Core512::new(&$iv, salt512(salt)?),
					buf: BlockBuffer::default(),
				})
			}
		}

		impl Hasher for $name {
			fn output_size(&self) -> usize {
				$out_bytes
			}

			fn block_size(&self) -> usize {
				BLOCK512
			}

			fn update(&mut self, data: impl AsRef<[u8]>) {
				let core = &mut self.core;
				self.buf.update(data.as_ref(), |block| core.process(block));
			}

			fn sum_into(&self, out: &mut Vec<u8>) {
				let mut core = self.core.clone();
				let mut buf = self.buf.clone();
				let digest = checksum512(&mut core, &mut buf, $full_width);
				out.extend_from_slice(&digest[..$out_bytes]);
			}

			fn reset(&mut self) {
				self.core = Core512::new(&$iv, self.core.s);
				self.buf.reset();
			}
		}

		impl Resumable for $name {
			fn marshal_state(&self) -> Vec<u8> {
				let mut out = Vec::with_capacity(Self::STATE_LEN);
				out.extend_from_slice(&Self::MAGIC);
				self.core.h[..].serialize(&mut out).expect("vec write cannot fail");
				self.core.s[..].serialize(&mut out).expect("vec write cannot fail");
				state::padded_tail::<BLOCK512>(self.buf.tail())
					.serialize(&mut out)
					.expect("vec write cannot fail");
				let bits = self.core.t.wrapping_add((self.buf.filled() as u64) << 3);
				bits.serialize(&mut out).expect("vec write cannot fail");
				out.push(self.core.nullt as u8);
				out
			}

			fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError> {
				let mut payload = state::check_frame(bytes, &Self::MAGIC, Self::STATE_LEN)?;
				let mut h = [0u64; 8];
				for w in &mut h {
					*w = u64::deserialize(&mut payload)?;
				}
				let mut s = [0u64; 4];
				for w in &mut s {
					*w = u64::deserialize(&mut payload)?;
				}
				let tail = <[u8; BLOCK512]>::deserialize(&mut payload)?;
				let bits = u64::deserialize(&mut payload)?;
				let [flag] = <[u8; 1]>::deserialize(&mut payload)?;

				if bits % 8 != 0 {
					return Err(StateError::Inconsistent("bit count not byte-aligned"));
				}
				let nullt = match flag {
					0 => false,
					1 => true,
					_ => return Err(StateError::Inconsistent("flag byte out of range")),
				};
				let nx = ((bits % 1024) / 8) as usize;

				Ok(Self {
					core: Core512 {
						h,
						s,
						t: bits.wrapping_sub((nx as u64) << 3),
						nullt,
					},
					buf: BlockBuffer::from_tail(&tail[..nx]),
				})
			}
		}

		impl_digest_traits!($name, $out_size, U128);
	};
}

blake32_variant!(Blake224, compress256::IV224, false, 28, U28, b"blk224.1");
blake32_variant!(Blake256, compress256::IV256, true, 32, U32, b"blk256.1");
blake64_variant!(Blake384, compress512::IV384, false, 48, U48, b"blk384.1");
blake64_variant!(Blake512, compress512::IV512, true, 64, U64, b"blk512.1");
