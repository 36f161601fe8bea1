// Copyright 2024-2025 Irreducible Inc.

//! Streaming-contract properties shared by every family: chunking invariance,
//! reset idempotence and non-destructive finalization.

use basalt_hash::{Blake256, Fsb160, Fugue256, Groestl512, Hasher, Jh224};
use proptest::prelude::*;

fn check_chunking<H: Hasher + Default>(data: &[u8], cuts: &[usize]) {
	let expected = H::default().chain_update(data).sum();

	let mut hasher = H::default();
	let mut rest = data;
	for &cut in cuts {
		let cut = cut % (rest.len() + 1);
		let (head, tail) = rest.split_at(cut);
		hasher.update(head);
		rest = tail;
	}
	hasher.update(rest);
	assert_eq!(hasher.sum(), expected);
}

fn check_reset_and_reuse<H: Hasher + Default>(data: &[u8]) {
	let empty = H::default().sum();
	let whole = H::default().chain_update(data).sum();

	let mut hasher = H::default();
	hasher.update(data);
	hasher.reset();
	assert_eq!(hasher.sum(), empty);

	// Interleaved sums must not disturb the stream.
	let mid = data.len() / 2;
	hasher.update(&data[..mid]);
	let _ = hasher.sum();
	hasher.update(&data[mid..]);
	assert_eq!(hasher.sum(), whole);
	assert_eq!(hasher.sum(), whole);
}

macro_rules! streaming_properties {
	($mod_name:ident, $hasher:ty) => {
		mod $mod_name {
			use super::*;

			proptest! {
				#[test]
				fn chunking_invariance(
					data in prop::collection::vec(any::<u8>(), 0..=512),
					cuts in prop::collection::vec(any::<usize>(), 0..=8),
				) {
					check_chunking::<$hasher>(&data, &cuts);
				}

				#[test]
				fn reset_and_interleaved_sums(
					data in prop::collection::vec(any::<u8>(), 0..=256),
				) {
					check_reset_and_reuse::<$hasher>(&data);
				}
			}
		}
	};
}

streaming_properties!(blake256, Blake256);
streaming_properties!(groestl512, Groestl512);
streaming_properties!(jh224, Jh224);
streaming_properties!(fugue256, Fugue256);
streaming_properties!(fsb160, Fsb160);
