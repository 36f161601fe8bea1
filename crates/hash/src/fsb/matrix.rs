// Copyright 2024-2025 Irreducible Inc.

use tracing::debug;

use crate::{groestl::Groestl512, Hasher};

/// Code parameters of one FSB variant: an `r × n` quasi-cyclic parity-check
/// matrix of circulant `r × r` blocks, and syndromes of weight `w`.
pub(super) struct Params {
	pub name: &'static str,
	/// Code length in bits.
	pub n: usize,
	/// Columns XORed per compression; one per decoded index chunk.
	pub w: usize,
	/// Syndrome width in bits; always a multiple of 64.
	pub r: usize,
	/// Width of one decoded index chunk: log2(n / w).
	pub idx_bits: usize,
}

pub(super) const PARAMS_160: Params = Params {
	name: "fsb160",
	n: 5 << 18,
	w: 80,
	r: 640,
	idx_bits: 14,
};
pub(super) const PARAMS_224: Params = Params {
	name: "fsb224",
	n: 7 << 18,
	w: 112,
	r: 896,
	idx_bits: 14,
};
pub(super) const PARAMS_256: Params = Params {
	name: "fsb256",
	n: 1 << 21,
	w: 128,
	r: 1024,
	idx_bits: 14,
};
pub(super) const PARAMS_384: Params = Params {
	name: "fsb384",
	n: 23 << 16,
	w: 184,
	r: 1472,
	idx_bits: 13,
};
pub(super) const PARAMS_512: Params = Params {
	name: "fsb512",
	n: 31 << 16,
	w: 248,
	r: 1984,
	idx_bits: 13,
};

/// The expanded distance matrix of one variant: the first column of every
/// circulant block, `r` bits each.
///
/// Circulant seed rows are expanded from a fixed Grøstl-512 chain rather
/// than the π-expansion tables used by the published proposal matrices; the
/// expansion is deterministic and happens once per process.
pub(super) struct Matrix {
	rows: Vec<Vec<u64>>,
	r: usize,
}

impl Matrix {
	pub fn expand(params: &Params) -> Self {
		let blocks = params.n / params.r;
		let r_words = params.r / 64;
		let seed = format!("fsb distance matrix v1/{}", params.name);

		let rows = (0..blocks)
			.map(|block| {
				let mut bytes = Vec::with_capacity(r_words * 8);
				let mut counter = 0u32;
				while bytes.len() < r_words * 8 {
					let mut hasher = Groestl512::new();
					hasher.update(seed.as_bytes());
					hasher.update((block as u32).to_be_bytes());
					hasher.update(counter.to_be_bytes());
					bytes.extend_from_slice(&hasher.sum());
					counter += 1;
				}
				bytes
					.chunks_exact(8)
					.take(r_words)
					.map(|chunk| u64::from_be_bytes(chunk.try_into().expect("chunk is 8 bytes")))
					.collect()
			})
			.collect();

		debug!(variant = params.name, blocks, r = params.r, "expanded fsb distance matrix");
		Self { rows, r: params.r }
	}

	/// XORs matrix column `col` into `syndrome`.
	pub fn xor_column(&self, syndrome: &mut [u64], col: usize) {
		let block = col / self.r;
		let rot = col % self.r;
		xor_rotated(syndrome, &self.rows[block], rot);
	}
}

/// `dst ^= rotate(src, rot)` over an `r`-bit vector stored MSB-first: bit
/// `(j + rot) mod r` of the rotated term equals bit `j` of `src`.
fn xor_rotated(dst: &mut [u64], src: &[u64], rot: usize) {
	let words = src.len();
	let wshift = rot / 64;
	let bshift = rot % 64;

	if bshift == 0 {
		for (i, d) in dst.iter_mut().enumerate() {
			*d ^= src[(i + words - wshift) % words];
		}
	} else {
		for (i, d) in dst.iter_mut().enumerate() {
			let cur = src[(i + words - wshift) % words];
			let prev = src[(i + 2 * words - wshift - 1) % words];
			*d ^= (cur >> bshift) | (prev << (64 - bshift));
		}
	}
}

/// Reads `count` bits MSB-first starting at bit offset `start`.
pub(super) fn read_bits(bytes: &[u8], start: usize, count: usize) -> usize {
	let mut acc = 0usize;
	for bit in start..start + count {
		acc = (acc << 1) | ((bytes[bit >> 3] >> (7 - (bit & 7))) & 1) as usize;
	}
	acc
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_bits() {
		let bytes = [0b1011_0001, 0b0100_0000];
		assert_eq!(read_bits(&bytes, 0, 4), 0b1011);
		assert_eq!(read_bits(&bytes, 4, 4), 0b0001);
		assert_eq!(read_bits(&bytes, 6, 5), 0b01010);
	}

	#[test]
	fn test_xor_rotated_identity() {
		let src = [0x8000_0000_0000_0001u64, 0x0f0f_0f0f_0f0f_0f0fu64];
		let mut dst = [0u64; 2];
		xor_rotated(&mut dst, &src, 0);
		assert_eq!(dst, src);
	}

	#[test]
	fn test_xor_rotated_single_bit() {
		// A vector with only the top bit set, rotated by k, sets exactly
		// bit k.
		let src = [0x8000_0000_0000_0000u64, 0];
		for rot in [1usize, 63, 64, 65, 127] {
			let mut dst = [0u64; 2];
			xor_rotated(&mut dst, &src, rot);
			let word = rot / 64;
			let expected = 1u64 << (63 - (rot % 64));
			for (i, d) in dst.iter().enumerate() {
				if i == word {
					assert_eq!(*d, expected, "rot {rot}");
				} else {
					assert_eq!(*d, 0, "rot {rot}");
				}
			}
		}
	}

	#[test]
	fn test_full_rotation_is_identity() {
		let src = [0x0123_4567_89ab_cdefu64, 0xfedc_ba98_7654_3210u64];
		let mut dst = [0u64; 2];
		// Rotating in two steps that sum to r must land back on the source.
		xor_rotated(&mut dst, &src, 40);
		let mut back = [0u64; 2];
		xor_rotated(&mut back, &dst, 128 - 40);
		assert_eq!(back, src);
	}
}
