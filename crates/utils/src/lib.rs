// Copyright 2024-2025 Irreducible Inc.

pub mod serialization;

pub use serialization::{DeserializeBytes, SerializeBytes};
