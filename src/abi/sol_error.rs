//! Custom solidity errors and the built-in revert and panic payloads.

use crate::abi::decoder::decode;
use crate::abi::function::{encode_args, signature};
use crate::abi::ty::{TupleParam, Type};
use crate::abi::value::Value;
use crate::abi::AbiError;
use crate::types::{Bytes, Selector, U256};
use crate::utils::id;
use once_cell::sync::Lazy;
use std::fmt;

/// Selector of `Error(string)`, the payload of `require`/`revert` with a
/// reason string.
pub const REVERT_SELECTOR: Selector = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of `Panic(uint256)`, the payload of solidity runtime failures.
pub const PANIC_SELECTOR: Selector = [0x4e, 0x48, 0x7b, 0x71];

/// The built-in `Error(string)` declaration.
pub static REVERT: Lazy<SolError> = Lazy::new(|| SolError {
    name: "Error".to_string(),
    inputs: vec![TupleParam::new("reason", Type::String)],
});

/// The built-in `Panic(uint256)` declaration.
pub static PANIC: Lazy<SolError> = Lazy::new(|| SolError {
    name: "Panic".to_string(),
    inputs: vec![TupleParam::new("code", Type::Uint(256))],
});

/// A custom solidity error.
#[derive(Clone, Debug, PartialEq)]
pub struct SolError {
    /// Error name.
    pub name: String,
    /// Error parameters.
    pub inputs: Vec<TupleParam>,
}

impl SolError {
    /// The signature string the selector is derived from, e.g.
    /// `InsufficientBalance(uint256,uint256)`.
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    /// The 4-byte selector identifying this error in revert data.
    pub fn selector(&self) -> Selector {
        id(self.signature())
    }

    /// Whether `data` plausibly carries this error: the selector matches and
    /// the payload is a whole number of words.
    pub fn is_match(&self, data: &[u8]) -> bool {
        data.len() >= 4 && data[..4] == self.selector() && (data.len() - 4) % 32 == 0
    }

    /// Strips the selector and decodes the payload against the inputs.
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Value>, AbiError> {
        if data.len() < 4 || data[..4] != self.selector() {
            return Err(AbiError::SelectorMismatch)
        }
        let kinds: Vec<Type> = self.inputs.iter().map(|p| p.kind.clone()).collect();
        decode(&kinds, &data[4..])
    }

    /// Assembles revert data: `selector || encode(args)`.
    pub fn encode(&self, args: &[Value]) -> Result<Bytes, AbiError> {
        let encoded = encode_args(&self.inputs, args)?;
        let mut out = Vec::with_capacity(4 + encoded.len());
        out.extend_from_slice(&self.selector());
        out.extend_from_slice(&encoded);
        Ok(out.into())
    }
}

impl fmt::Display for SolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}{}", self.name, Type::Tuple(self.inputs.clone()))
    }
}

/// Decodes an `Error(string)` payload into the reason string.
pub fn decode_revert_reason(data: &[u8]) -> Result<String, AbiError> {
    let mut values = REVERT.decode(data)?;
    values
        .pop()
        .and_then(Value::into_string)
        .ok_or(AbiError::TruncatedInput)
}

/// Decodes a `Panic(uint256)` payload into the panic code. A valid payload is
/// exactly 36 bytes.
pub fn decode_panic_code(data: &[u8]) -> Result<U256, AbiError> {
    if data.len() != 36 {
        return Err(AbiError::LengthMismatch { expected: 36, got: data.len() })
    }
    let mut values = PANIC.decode(data)?;
    values
        .pop()
        .and_then(Value::into_uint)
        .map(|uint| uint.value())
        .ok_or(AbiError::TruncatedInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_selectors() {
        assert_eq!(REVERT.signature(), "Error(string)");
        assert_eq!(REVERT.selector(), REVERT_SELECTOR);
        assert_eq!(PANIC.signature(), "Panic(uint256)");
        assert_eq!(PANIC.selector(), PANIC_SELECTOR);
    }

    #[test]
    fn revert_round_trip() {
        let data = REVERT.encode(&[Value::String("nope".into())]).unwrap();
        assert_eq!(&data[..4], &REVERT_SELECTOR);
        assert_eq!(decode_revert_reason(&data).unwrap(), "nope");
    }

    #[test]
    fn decodes_known_revert_payload() {
        // "revert message"
        let data = [
            hex::decode("08c379a0").unwrap(),
            hex::decode(format!("{:0>64}", "20")).unwrap(),
            hex::decode(format!("{:0>64}", "e")).unwrap(),
            hex::decode(format!("{:0<64}", "726576657274206d657373616765")).unwrap(),
        ]
        .concat();
        assert_eq!(decode_revert_reason(&data).unwrap(), "revert message");
    }

    #[test]
    fn decodes_panic_code() {
        let data = [
            hex::decode("4e487b71").unwrap(),
            hex::decode(format!("{:0>64}", "2a")).unwrap(),
        ]
        .concat();
        assert_eq!(decode_panic_code(&data).unwrap(), U256::from(42));
    }

    #[test]
    fn panic_payload_must_be_36_bytes() {
        let mut data = [0u8; 40].to_vec();
        data[..4].copy_from_slice(&PANIC_SELECTOR);
        assert!(matches!(
            decode_panic_code(&data),
            Err(AbiError::LengthMismatch { expected: 36, got: 40 })
        ));
    }

    #[test]
    fn is_match_requires_word_aligned_payload() {
        let err = SolError {
            name: "Custom".into(),
            inputs: vec![TupleParam::new("x", Type::Uint(256))],
        };
        let good = err.encode(&[Value::uint(256, 1u64).unwrap()]).unwrap();
        assert!(err.is_match(&good));

        let mut bad = good.to_vec();
        bad.push(0);
        assert!(!err.is_match(&bad));
        assert!(!err.is_match(&[0, 1, 2]));
    }
}
