//! The Ethereum contract ABI: the type system, the head/tail codec, and the
//! signature and JSON parsers.
//!
//! The layers, leaves first: [`Word`]/[`Words`] hold raw 32-byte units,
//! [`Int`]/[`Uint`] carry width-bounded integers, [`Type`] describes ABI
//! shapes, [`Value`] carries data, [`encode`]/[`decode`] translate between
//! the two and the wire, and [`Contract`] composes parsed
//! [`Function`]s/[`Event`]s/[`SolError`]s on top.

use crate::types::Bytes;

pub mod error;
pub use error::{AbiError, ParseError};

mod word;
pub use word::{required_words, Word, Words, WORD_LEN};

mod number;
pub use number::{check_bit_size, signed_bit_len, Int, Uint};

mod ty;
pub use ty::{event_value_params, EventParam, TupleParam, Type};

mod value;
pub use value::Value;

mod encoder;
pub use encoder::{encode, encode_value};

mod decoder;
pub use decoder::{decode, decode_value};

mod registry;
pub use registry::{default_registry, TypeEnv, TypeRegistry};

mod tokens;
pub use tokens::{
    default_mapper, fold_field_name, AbiType, FromValue, FromValues, IntoValue, IntoValues,
    Mapper, MappingError, ValueItem,
};

pub mod human_readable;
pub use human_readable::{
    lexer::HumanReadableParser, parse as parse_abi, parse_str as parse_abi_str, AbiParser,
};

pub mod struct_def;
pub use struct_def::SolStruct;

mod raw;
pub use raw::{AbiObject, Component, Item, JsonAbi, RawAbi};

mod function;
pub use function::{Function, StateMutability};

mod event;
pub use event::{Event, RawLog};

mod sol_error;
pub use sol_error::{
    decode_panic_code, decode_revert_reason, SolError, PANIC, PANIC_SELECTOR, REVERT,
    REVERT_SELECTOR,
};

mod constructor;
pub use constructor::Constructor;

mod contract;
pub use contract::{CallError, Contract, DecodedError, InternalKind, InternalType};

/// ABI-encodes values and returns the result as a `0x`-prefixed hex string.
pub fn encode_hex(values: &[Value]) -> Result<String, AbiError> {
    Ok(format!("0x{}", hex::encode(encode(values)?)))
}

/// ABI-decodes a hex string, with optional `0x` prefix.
pub fn decode_hex(types: &[Type], data: &str) -> Result<Vec<Value>, AbiError> {
    let bytes: Bytes = data.parse()?;
    decode(types, &bytes)
}
