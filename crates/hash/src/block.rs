// Copyright 2024-2025 Irreducible Inc.

/// Fixed-width block accumulator shared by the streaming hash families.
///
/// Holds the short input tail between `update` calls; full blocks are handed
/// to the family's compression callback straight off the input slice. The
/// fill cursor is strictly less than `N` at every observable point — a block
/// is compressed the moment it completes.
#[derive(Clone, Debug)]
pub(crate) struct BlockBuffer<const N: usize> {
	block: [u8; N],
	filled: usize,
}

impl<const N: usize> Default for BlockBuffer<N> {
	fn default() -> Self {
		Self {
			block: [0u8; N],
			filled: 0,
		}
	}
}

impl<const N: usize> BlockBuffer<N> {
	/// Absorbs `data`, invoking `compress` once per completed block. Always
	/// consumes the entire input; a zero-length write is a no-op.
	pub fn update(&mut self, mut data: &[u8], mut compress: impl FnMut(&[u8; N])) {
		if self.filled != 0 {
			let to_copy = usize::min(data.len(), N - self.filled);
			self.block[self.filled..self.filled + to_copy].copy_from_slice(&data[..to_copy]);
			data = &data[to_copy..];
			self.filled += to_copy;

			if self.filled == N {
				compress(&self.block);
				self.filled = 0;
			}
		}

		let mut chunks = data.chunks_exact(N);
		for chunk in &mut chunks {
			compress(chunk.try_into().expect("chunk is N bytes"));
		}

		let remaining = chunks.remainder();
		if !remaining.is_empty() {
			self.block[..remaining.len()].copy_from_slice(remaining);
			self.filled = remaining.len();
		}
	}

	/// Number of buffered tail bytes, always `< N`.
	pub fn filled(&self) -> usize {
		self.filled
	}

	/// Buffered tail contents.
	pub fn tail(&self) -> &[u8] {
		&self.block[..self.filled]
	}

	/// Rebuilds a buffer holding `tail` verbatim.
	///
	/// Callers guarantee `tail.len() < N`; the state codec derives the tail
	/// length from the length counter before calling this.
	pub fn from_tail(tail: &[u8]) -> Self {
		debug_assert!(tail.len() < N);
		let mut block = [0u8; N];
		block[..tail.len()].copy_from_slice(tail);
		Self {
			block,
			filled: tail.len(),
		}
	}

	pub fn reset(&mut self) {
		self.filled = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	// Compression callback that records every block it sees.
	fn collect(seen: &mut Vec<[u8; 8]>) -> impl FnMut(&[u8; 8]) + '_ {
		|block| seen.push(*block)
	}

	#[test]
	fn test_chunked_writes_see_identical_blocks() {
		let data: Vec<u8> = (0u8..=41).collect();

		let mut whole = Vec::new();
		let mut buf = BlockBuffer::<8>::default();
		buf.update(&data, collect(&mut whole));
		assert_eq!(buf.filled(), 42 % 8);

		for split in 0..data.len() {
			let mut seen = Vec::new();
			let mut buf = BlockBuffer::<8>::default();
			buf.update(&data[..split], collect(&mut seen));
			buf.update(&data[split..], collect(&mut seen));
			assert_eq!(seen, whole);
			assert_eq!(buf.tail(), &data[data.len() - buf.filled()..]);
		}
	}

	#[test]
	fn test_zero_length_write_is_noop() {
		let mut seen = Vec::new();
		let mut buf = BlockBuffer::<8>::default();
		buf.update(&[], collect(&mut seen));
		assert!(seen.is_empty());
		assert_eq!(buf.filled(), 0);
	}

	#[test]
	fn test_exact_block_leaves_empty_tail() {
		let mut seen = Vec::new();
		let mut buf = BlockBuffer::<8>::default();
		buf.update(&[7u8; 16], collect(&mut seen));
		assert_eq!(seen.len(), 2);
		assert_eq!(buf.filled(), 0);
	}
}
