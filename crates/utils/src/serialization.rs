// Copyright 2024-2025 Irreducible Inc.

use bytes::{Buf, BufMut};

#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
	#[error("Write buffer is full")]
	WriteBufferFull,
	#[error("Not enough data in read buffer to deserialize")]
	NotEnoughBytes,
}

/// Represents a type that can be serialized to a byte buffer.
///
/// All multi-byte integers are written big-endian so that serialized layouts
/// are identical across hosts.
pub trait SerializeBytes {
	fn serialize(&self, write_buf: impl BufMut) -> Result<(), Error>;
}

/// Represents a type that can be deserialized from a byte buffer.
pub trait DeserializeBytes {
	fn deserialize(read_buf: impl Buf) -> Result<Self, Error>
	where
		Self: Sized;
}

impl SerializeBytes for u32 {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), Error> {
		if write_buf.remaining_mut() < std::mem::size_of::<u32>() {
			return Err(Error::WriteBufferFull);
		}
		write_buf.put_u32(*self);
		Ok(())
	}
}

impl DeserializeBytes for u32 {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, Error> {
		if read_buf.remaining() < std::mem::size_of::<u32>() {
			return Err(Error::NotEnoughBytes);
		}
		Ok(read_buf.get_u32())
	}
}

impl SerializeBytes for u64 {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), Error> {
		if write_buf.remaining_mut() < std::mem::size_of::<u64>() {
			return Err(Error::WriteBufferFull);
		}
		write_buf.put_u64(*self);
		Ok(())
	}
}

impl DeserializeBytes for u64 {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, Error> {
		if read_buf.remaining() < std::mem::size_of::<u64>() {
			return Err(Error::NotEnoughBytes);
		}
		Ok(read_buf.get_u64())
	}
}

impl<const N: usize> SerializeBytes for [u8; N] {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), Error> {
		if write_buf.remaining_mut() < N {
			return Err(Error::WriteBufferFull);
		}
		write_buf.put_slice(self);
		Ok(())
	}
}

impl<const N: usize> DeserializeBytes for [u8; N] {
	fn deserialize(mut read_buf: impl Buf) -> Result<Self, Error> {
		if read_buf.remaining() < N {
			return Err(Error::NotEnoughBytes);
		}

		let mut ret = [0u8; N];
		read_buf.copy_to_slice(&mut ret);
		Ok(ret)
	}
}

impl<T: SerializeBytes> SerializeBytes for [T] {
	fn serialize(&self, mut write_buf: impl BufMut) -> Result<(), Error> {
		for elem in self {
			elem.serialize(&mut write_buf)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use rand::{rngs::StdRng, RngCore, SeedableRng};

	use super::*;

	#[test]
	fn test_array_serialize_deserialize() {
		let mut rng = StdRng::seed_from_u64(0);

		let mut data = [0u8; 32];
		rng.fill_bytes(&mut data);

		let mut buf = Vec::new();
		data.serialize(&mut buf).unwrap();

		let data_deserialized = <[u8; 32]>::deserialize(&mut buf.as_slice()).unwrap();
		assert_eq!(data_deserialized, data);
	}

	#[test]
	fn test_word_round_trip() {
		let mut buf = Vec::new();
		0xdead_beef_u32.serialize(&mut buf).unwrap();
		0x0123_4567_89ab_cdef_u64.serialize(&mut buf).unwrap();

		let mut read = buf.as_slice();
		assert_eq!(u32::deserialize(&mut read).unwrap(), 0xdead_beef);
		assert_eq!(u64::deserialize(&mut read).unwrap(), 0x0123_4567_89ab_cdef);
	}

	#[test]
	fn test_not_enough_bytes() {
		let buf = [0u8; 3];
		assert!(matches!(u32::deserialize(&mut buf.as_slice()), Err(Error::NotEnoughBytes)));
	}
}
