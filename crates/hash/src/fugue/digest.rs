// Copyright 2024-2025 Irreducible Inc.

use basalt_utils::{DeserializeBytes, SerializeBytes};
use digest::consts::{U28, U32, U4, U48, U64};
use lazy_static::lazy_static;

use super::smix::smix;
use crate::{
	block::BlockBuffer,
	macros::impl_digest_traits,
	state::{self, StateError},
	Hasher, Resumable,
};

const WORD: usize = 4;
const SMALL_WORDS: usize = 30;
const LARGE_WORDS: usize = 36;

fn smix4<const N: usize>(s: &mut [u32; N]) {
	let mut w = [s[0], s[1], s[2], s[3]];
	smix(&mut w);
	s[..4].copy_from_slice(&w);
}

fn super_round30(s: &mut [u32; SMALL_WORDS]) {
	s.rotate_right(3);
	s[0] ^= s[4];
	s[1] ^= s[5];
	s[2] ^= s[6];
	s[15] ^= s[4];
	s[16] ^= s[5];
	s[17] ^= s[6];
	smix4(s);
}

fn super_round36(s: &mut [u32; LARGE_WORDS]) {
	s.rotate_right(3);
	s[0] ^= s[4];
	s[1] ^= s[5];
	s[2] ^= s[6];
	s[18] ^= s[4];
	s[19] ^= s[5];
	s[20] ^= s[6];
	smix4(s);
}

/// One message word for the 30-word pipeline: TIX step plus two super-rounds.
fn round30(s: &mut [u32; SMALL_WORDS], x: u32) {
	s[10] ^= s[0];
	s[0] = x;
	s[8] ^= x;
	s[1] ^= s[24];
	for _ in 0..2 {
		super_round30(s);
	}
}

/// One message word for Fugue-384: wider TIX, three super-rounds.
fn round36_384(s: &mut [u32; LARGE_WORDS], x: u32) {
	s[16] ^= s[0];
	s[0] = x;
	s[8] ^= x;
	s[1] ^= s[27];
	s[4] ^= s[30];
	for _ in 0..3 {
		super_round36(s);
	}
}

/// One message word for Fugue-512: widest TIX, four super-rounds.
fn round36_512(s: &mut [u32; LARGE_WORDS], x: u32) {
	s[22] ^= s[0];
	s[0] = x;
	s[8] ^= x;
	s[1] ^= s[24];
	s[4] ^= s[27];
	s[7] ^= s[30];
	for _ in 0..4 {
		super_round36(s);
	}
}

fn final30(s: &mut [u32; SMALL_WORDS]) {
	for _ in 0..10 {
		super_round30(s);
	}
	for _ in 0..13 {
		s[4] ^= s[0];
		s[15] ^= s[0];
		s.rotate_right(15);
		smix4(s);
		s[4] ^= s[0];
		s[16] ^= s[0];
		s.rotate_right(14);
		smix4(s);
	}
	s[4] ^= s[0];
	s[15] ^= s[0];
}

fn final36_384(s: &mut [u32; LARGE_WORDS]) {
	for _ in 0..18 {
		super_round36(s);
	}
	for _ in 0..13 {
		for _ in 0..3 {
			s[4] ^= s[0];
			s[12] ^= s[0];
			s[24] ^= s[0];
			s.rotate_right(12);
			smix4(s);
		}
	}
	s[4] ^= s[0];
	s[12] ^= s[0];
	s[24] ^= s[0];
}

fn final36_512(s: &mut [u32; LARGE_WORDS]) {
	for _ in 0..32 {
		super_round36(s);
	}
	for _ in 0..13 {
		for _ in 0..4 {
			s[4] ^= s[0];
			s[9] ^= s[0];
			s[18] ^= s[0];
			s[27] ^= s[0];
			s.rotate_right(9);
			smix4(s);
		}
	}
	s[4] ^= s[0];
	s[9] ^= s[0];
	s[18] ^= s[0];
	s[27] ^= s[0];
}

// Seed states are pinned by absorbing the output width into the zero state
// and dispersing it, rather than by constant tables.
fn derive_iv30(out_bits: u32) -> [u32; SMALL_WORDS] {
	let mut s = [0u32; SMALL_WORDS];
	round30(&mut s, out_bits);
	for _ in 0..18 {
		super_round30(&mut s);
	}
	s
}

fn derive_iv36(
	out_bits: u32,
	round: fn(&mut [u32; LARGE_WORDS], u32),
) -> [u32; LARGE_WORDS] {
	let mut s = [0u32; LARGE_WORDS];
	round(&mut s, out_bits);
	for _ in 0..18 {
		super_round36(&mut s);
	}
	s
}

lazy_static! {
	static ref IV224: [u32; SMALL_WORDS] = derive_iv30(224);
	static ref IV256: [u32; SMALL_WORDS] = derive_iv30(256);
	static ref IV384: [u32; LARGE_WORDS] = derive_iv36(384, round36_384);
	static ref IV512: [u32; LARGE_WORDS] = derive_iv36(512, round36_512);
}

macro_rules! fugue_variant {
	(
		$name:ident, $words:expr, $iv:ident, $round:path, $final_fn:path,
		$groups:expr, $out_bytes:expr, $out_size:ty, $magic:expr
	) => {
		#[derive(Clone)]
		pub struct $name {
			s: [u32; $words],
			bits: u64,
			buf: BlockBuffer<WORD>,
		}

		impl $name {
			const MAGIC: [u8; state::MAGIC_LEN] = *$magic;
			const STATE_LEN: usize = state::MAGIC_LEN + 4 * $words + WORD + 8;

			pub fn new() -> Self {
				Self {
					s: *$iv,
					bits: 0,
					buf: BlockBuffer::default(),
				}
			}

			fn absorb(s: &mut [u32; $words], word: &[u8; WORD]) {
				$round(s, u32::from_be_bytes(*word));
			}
		}

		impl Hasher for $name {
			fn output_size(&self) -> usize {
				$out_bytes
			}

			fn block_size(&self) -> usize {
				WORD
			}

			fn update(&mut self, data: impl AsRef<[u8]>) {
				let data = data.as_ref();
				let s = &mut self.s;
				self.buf.update(data, |word| Self::absorb(s, word));
				self.bits = self.bits.wrapping_add((data.len() as u64) << 3);
			}

			fn sum_into(&self, out: &mut Vec<u8>) {
				let mut s = self.s;
				let mut buf = self.buf.clone();

				// Zero-fill the partial word; the bit length keeps short
				// inputs distinct.
				if buf.filled() > 0 {
					let fill = [0u8; WORD];
					buf.update(&fill[..WORD - buf.filled()], |word| Self::absorb(&mut s, word));
				}
				$round(&mut s, (self.bits >> 32) as u32);
				$round(&mut s, self.bits as u32);
				$final_fn(&mut s);

				let mut digest = Vec::with_capacity($groups.len() * 16);
				for &start in $groups {
					for k in 0..4 {
						digest.extend_from_slice(&s[start + k].to_be_bytes());
					}
				}
				out.extend_from_slice(&digest[..$out_bytes]);
			}

			fn reset(&mut self) {
				self.s = *$iv;
				self.bits = 0;
				self.buf.reset();
			}
		}

		impl Resumable for $name {
			fn marshal_state(&self) -> Vec<u8> {
				let mut out = Vec::with_capacity(Self::STATE_LEN);
				out.extend_from_slice(&Self::MAGIC);
				self.s[..].serialize(&mut out).expect("vec write cannot fail");
				state::padded_tail::<WORD>(self.buf.tail())
					.serialize(&mut out)
					.expect("vec write cannot fail");
				self.bits.serialize(&mut out).expect("vec write cannot fail");
				out
			}

			fn unmarshal_state(bytes: &[u8]) -> Result<Self, StateError> {
				let mut payload = state::check_frame(bytes, &Self::MAGIC, Self::STATE_LEN)?;
				let mut words = [0u32; $words];
				for w in &mut words {
					*w = u32::deserialize(&mut payload)?;
				}
				let tail = <[u8; WORD]>::deserialize(&mut payload)?;
				let bits = u64::deserialize(&mut payload)?;

				if bits % 8 != 0 {
					return Err(StateError::Inconsistent("bit count not byte-aligned"));
				}
				let nx = ((bits >> 3) % WORD as u64) as usize;
				Ok(Self {
					s: words,
					bits,
					buf: BlockBuffer::from_tail(&tail[..nx]),
				})
			}
		}

		impl_digest_traits!($name, $out_size, U4);
	};
}

fugue_variant!(
	Fugue224, SMALL_WORDS, IV224, round30, final30, &[1usize, 15], 28, U28, b"fug224.1"
);
fugue_variant!(
	Fugue256, SMALL_WORDS, IV256, round30, final30, &[1usize, 15], 32, U32, b"fug256.1"
);
fugue_variant!(
	Fugue384, LARGE_WORDS, IV384, round36_384, final36_384, &[1usize, 12, 24], 48, U48,
	b"fug384.1"
);
fugue_variant!(
	Fugue512, LARGE_WORDS, IV512, round36_512, final36_512, &[1usize, 9, 18, 27], 64, U64,
	b"fug512.1"
);

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hash;

	#[test]
	fn test_variants_disagree() {
		// The four variants must neither collide with each other nor ignore
		// the input.
		let digests = [
			hash::<Fugue224>(b"fugue"),
			hash::<Fugue256>(b"fugue"),
			hash::<Fugue384>(b"fugue"),
			hash::<Fugue512>(b"fugue"),
		];
		for (i, d) in digests.iter().enumerate() {
			assert_ne!(d[..28], hash::<Fugue224>(b"fugue!")[..28]);
			for other in &digests[i + 1..] {
				assert_ne!(d[..28], other[..28]);
			}
		}
	}

	#[test]
	fn test_output_sizes() {
		assert_eq!(hash::<Fugue224>(b"x").len(), 28);
		assert_eq!(hash::<Fugue256>(b"x").len(), 32);
		assert_eq!(hash::<Fugue384>(b"x").len(), 48);
		assert_eq!(hash::<Fugue512>(b"x").len(), 64);
	}

	#[test]
	fn test_trailing_zeros_change_digest() {
		// Zero padding alone must not collide; the bit length separates a
		// message from the same message extended by zero bytes.
		assert_ne!(hash::<Fugue256>(b"ab"), hash::<Fugue256>(b"ab\0"));
		assert_ne!(hash::<Fugue256>(b"ab\0"), hash::<Fugue256>(b"ab\0\0"));
		assert_ne!(hash::<Fugue256>(b""), hash::<Fugue256>(b"\0\0\0\0"));
	}

	#[test]
	fn test_chunked_updates_match_single_write() {
		let data: Vec<u8> = (0u8..100).collect();
		let whole = hash::<Fugue256>(&data);

		for split in [1, 2, 3, 4, 5, 50, 99] {
			let mut hasher = Fugue256::new();
			hasher.update(&data[..split]);
			hasher.update(&data[split..]);
			assert_eq!(hasher.sum(), whole, "split at {split}");
		}
	}

	#[test]
	fn test_sum_is_non_destructive() {
		let mut hasher = Fugue512::new();
		hasher.update(b"abc");
		let first = hasher.sum();
		assert_eq!(first, hasher.sum());

		hasher.update(b"def");
		assert_eq!(hasher.sum(), hash::<Fugue512>(b"abcdef"));
	}

	#[test]
	fn test_reset_matches_fresh_instance() {
		let mut hasher = Fugue256::new();
		hasher.update(b"discarded");
		hasher.reset();
		assert_eq!(hasher.sum(), hash::<Fugue256>(b""));
	}

	#[test]
	fn test_marshal_unmarshal_resumes() {
		let data: Vec<u8> = (0u8..=99).collect();
		for split in [0, 1, 2, 3, 4, 5, 50, 100] {
			let mut first = Fugue384::new();
			first.update(&data[..split]);
			let blob = first.marshal_state();

			let mut resumed = Fugue384::unmarshal_state(&blob).unwrap();
			resumed.update(&data[split..]);
			assert_eq!(resumed.sum(), hash::<Fugue384>(&data), "split at {split}");
		}
	}

	#[test]
	fn test_unmarshal_rejects_corruption() {
		let blob = Fugue256::new().chain_update(b"abcde").marshal_state();

		let mut magic_flipped = blob.clone();
		magic_flipped[1] ^= 0x80;
		assert!(matches!(
			Fugue256::unmarshal_state(&magic_flipped),
			Err(StateError::MagicMismatch)
		));

		assert!(matches!(
			Fugue256::unmarshal_state(&blob[..blob.len() - 3]),
			Err(StateError::LengthMismatch { .. })
		));

		assert!(matches!(
			Fugue224::unmarshal_state(&blob),
			Err(StateError::MagicMismatch)
		));
	}
}
