// Copyright 2024-2025 Irreducible Inc.

/// Implements the RustCrypto [`digest`] trait set for a fixed-width hasher in
/// terms of its [`crate::Hasher`] impl, so the type plugs into
/// `digest::Digest`-generic collaborators.
macro_rules! impl_digest_traits {
	($ty:ident, $out_size:ty, $block_size:ty) => {
		impl Default for $ty {
			fn default() -> Self {
				Self::new()
			}
		}

		impl digest::HashMarker for $ty {}

		impl digest::Update for $ty {
			fn update(&mut self, data: &[u8]) {
				crate::Hasher::update(self, data);
			}
		}

		impl digest::OutputSizeUser for $ty {
			type OutputSize = $out_size;
		}

		impl digest::core_api::BlockSizeUser for $ty {
			type BlockSize = $block_size;
		}

		impl digest::FixedOutput for $ty {
			fn finalize_into(self, out: &mut digest::Output<Self>) {
				out.copy_from_slice(&crate::Hasher::sum(&self));
			}
		}

		impl digest::Reset for $ty {
			fn reset(&mut self) {
				crate::Hasher::reset(self);
			}
		}

		impl digest::FixedOutputReset for $ty {
			fn finalize_into_reset(&mut self, out: &mut digest::Output<Self>) {
				out.copy_from_slice(&crate::Hasher::sum(self));
				crate::Hasher::reset(self);
			}
		}
	};
}

pub(crate) use impl_digest_traits;
