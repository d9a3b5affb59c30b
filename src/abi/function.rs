//! Contract methods: signature, selector and calldata assembly.

use crate::abi::decoder::decode;
use crate::abi::encoder::encode;
use crate::abi::tokens::default_mapper;
use crate::abi::ty::{Type, TupleParam};
use crate::abi::value::Value;
use crate::abi::AbiError;
use crate::types::{Bytes, Selector};
use crate::utils::id;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a function reads or modifies contract state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    /// Reads nothing, writes nothing.
    Pure,
    /// Reads state.
    View,
    /// Writes state.
    #[default]
    NonPayable,
    /// Writes state and accepts ether.
    Payable,
}

impl fmt::Display for StateMutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateMutability::Pure => f.write_str("pure"),
            StateMutability::View => f.write_str("view"),
            StateMutability::NonPayable => f.write_str("nonpayable"),
            StateMutability::Payable => f.write_str("payable"),
        }
    }
}

/// A contract method.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    /// Method name.
    pub name: String,
    /// Input parameters.
    pub inputs: Vec<TupleParam>,
    /// Output parameters.
    pub outputs: Vec<TupleParam>,
    /// Declared state mutability.
    pub state_mutability: StateMutability,
}

/// Renders `name(type1,type2,…)` with canonical types and no whitespace.
pub(crate) fn signature(name: &str, params: &[TupleParam]) -> String {
    let types = params.iter().map(|p| p.kind.canonical()).collect::<Vec<_>>().join(",");
    format!("{name}({types})")
}

/// Coerces loose argument values to their declared types through the default
/// mapper, then ABI-encodes them as a tuple.
pub(crate) fn encode_args(params: &[TupleParam], args: &[Value]) -> Result<Bytes, AbiError> {
    if params.len() != args.len() {
        return Err(AbiError::LengthMismatch { expected: params.len(), got: args.len() })
    }
    let mapper = default_mapper();
    let values = params
        .iter()
        .zip(args)
        .map(|(param, arg)| mapper.map_to_type(arg.clone(), &param.kind))
        .collect::<Result<Vec<_>, _>>()?;
    encode(&values)
}

impl Function {
    /// The signature string the selector is derived from, e.g.
    /// `transfer(address,uint256)`. Stable under whitespace and parameter
    /// name variation in the source declaration.
    pub fn signature(&self) -> String {
        signature(&self.name, &self.inputs)
    }

    /// The 4-byte selector: the first bytes of the Keccak-256 hash of the
    /// signature string.
    pub fn selector(&self) -> Selector {
        id(self.signature())
    }

    /// Assembles calldata: `selector || encode(args)`.
    pub fn encode_input(&self, args: &[Value]) -> Result<Bytes, AbiError> {
        let encoded = encode_args(&self.inputs, args)?;
        let mut out = Vec::with_capacity(4 + encoded.len());
        out.extend_from_slice(&self.selector());
        out.extend_from_slice(&encoded);
        Ok(out.into())
    }

    /// Disassembles calldata produced for this method, checking the selector.
    pub fn decode_input(&self, data: &[u8]) -> Result<Vec<Value>, AbiError> {
        if data.len() < 4 || data[..4] != self.selector() {
            return Err(AbiError::SelectorMismatch)
        }
        let kinds: Vec<Type> = self.inputs.iter().map(|p| p.kind.clone()).collect();
        decode(&kinds, &data[4..])
    }

    /// Encodes return data for this method's outputs (no selector).
    pub fn encode_output(&self, values: &[Value]) -> Result<Bytes, AbiError> {
        encode_args(&self.outputs, values)
    }

    /// Decodes return data against this method's outputs.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Value>, AbiError> {
        let kinds: Vec<Type> = self.outputs.iter().map(|p| p.kind.clone()).collect();
        decode(&kinds, data)
    }

    /// Decodes return data straight into a host type through the mapping
    /// bridge.
    pub fn decode_output_as<T: crate::abi::FromValues>(&self, data: &[u8]) -> Result<T, AbiError> {
        Ok(T::from_values(self.decode_output(data)?)?)
    }
}

impl fmt::Display for Function {
    /// The human declaration, with parameter names and mutability.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}{}", self.name, Type::Tuple(self.inputs.clone()))?;
        if self.state_mutability != StateMutability::NonPayable {
            write!(f, " {}", self.state_mutability)?;
        }
        if !self.outputs.is_empty() {
            write!(f, " returns {}", Type::Tuple(self.outputs.clone()))?;
        }
        Ok(())
    }
}
