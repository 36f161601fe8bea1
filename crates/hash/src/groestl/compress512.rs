// Copyright 2024-2025 Irreducible Inc.

use super::table::sub_shift_mix;

pub(super) const COLS: usize = 8;
const ROUNDS: u64 = 10;

const P_SHIFTS: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
const Q_SHIFTS: [usize; 8] = [1, 3, 5, 7, 0, 2, 4, 6];

pub(super) fn state_from_bytes(block: &[u8; 64]) -> [u64; COLS] {
	let mut m = [0u64; COLS];
	for (v, chunk) in m.iter_mut().zip(block.chunks_exact(8)) {
		*v = u64::from_be_bytes(chunk.try_into().expect("chunk is 8 bytes"));
	}
	m
}

pub(super) fn state_to_bytes(state: &[u64; COLS]) -> [u8; 64] {
	let mut out = [0u8; 64];
	for (chunk, v) in out.chunks_exact_mut(8).zip(state) {
		chunk.copy_from_slice(&v.to_be_bytes());
	}
	out
}

pub(super) fn p(h: &mut [u64; COLS]) {
	for r in 0..ROUNDS {
		for (j, col) in h.iter_mut().enumerate() {
			*col ^= (((j as u64) << 4) ^ r) << 56;
		}
		*h = sub_shift_mix(h, &P_SHIFTS);
	}
}

pub(super) fn q(h: &mut [u64; COLS]) {
	for r in 0..ROUNDS {
		for (j, col) in h.iter_mut().enumerate() {
			*col ^= 0xffff_ffff_ffff_ff00 ^ 0xff ^ ((j as u64) << 4) ^ r;
		}
		*h = sub_shift_mix(h, &Q_SHIFTS);
	}
}

/// `h ← P(h ⊕ m) ⊕ Q(m) ⊕ h`
pub(super) fn compress(h: &mut [u64; COLS], block: &[u8; 64]) {
	let m = state_from_bytes(block);

	let mut p_state = *h;
	for (pi, mi) in p_state.iter_mut().zip(m) {
		*pi ^= mi;
	}
	let mut q_state = m;

	p(&mut p_state);
	q(&mut q_state);

	for i in 0..COLS {
		h[i] ^= p_state[i] ^ q_state[i];
	}
}
