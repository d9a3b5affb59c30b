//! Contract constructors: deployment calldata assembly.

use crate::abi::function::encode_args;
use crate::abi::ty::{TupleParam, Type};
use crate::abi::value::Value;
use crate::abi::AbiError;
use crate::types::Bytes;
use std::fmt;

/// A contract constructor. Constructors have no name and no selector; their
/// arguments are appended to the deployment bytecode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Constructor {
    /// Constructor parameters.
    pub inputs: Vec<TupleParam>,
}

impl Constructor {
    /// The signature rendering, `constructor(type1,type2,…)`.
    pub fn signature(&self) -> String {
        crate::abi::function::signature("constructor", &self.inputs)
    }

    /// Assembles deployment calldata: `bytecode || encode(args)`.
    pub fn encode_input(&self, bytecode: Bytes, args: &[Value]) -> Result<Bytes, AbiError> {
        let encoded = encode_args(&self.inputs, args)?;
        let mut out = Vec::with_capacity(bytecode.len() + encoded.len());
        out.extend_from_slice(&bytecode);
        out.extend_from_slice(&encoded);
        Ok(out.into())
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constructor{}", Type::Tuple(self.inputs.clone()))
    }
}
