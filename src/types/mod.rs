//! Ethereum data types used throughout the ABI.

/// A 4-byte method or error selector.
pub type Selector = [u8; 4];

// Re-export common ethereum datatypes with more specific names

pub use ethereum_types::{Address, H160, H256, U256};

mod i256;
pub use i256::{ParseI256Error, Sign, TryFromBigIntError, I256};

mod bytes;
pub use self::bytes::{deserialize_bytes, serialize_bytes, Bytes, ParseBytesError};
