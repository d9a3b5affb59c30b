//! The contract aggregate: methods, events, errors, constructor and
//! user-defined internal types.

use crate::abi::constructor::Constructor;
use crate::abi::error::{bail, format_err, ParseError, Result};
use crate::abi::event::Event;
use crate::abi::function::{Function, StateMutability};
use crate::abi::human_readable::lexer::HumanReadableParser;
use crate::abi::human_readable::AbiParser;
use crate::abi::raw::{Component, Item, JsonAbi, RawAbi};
use crate::abi::registry::TypeRegistry;
use crate::abi::sol_error::{
    decode_panic_code, decode_revert_reason, SolError, PANIC_SELECTOR, REVERT_SELECTOR,
};
use crate::abi::ty::{EventParam, TupleParam, Type};
use crate::types::{Bytes, Selector, H256, U256};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The kind of a user-defined internal type discovered in an ABI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InternalKind {
    /// `struct X`
    Struct,
    /// `enum X` — encodes as its underlying integer
    Enum,
    /// A user-defined value type.
    ValueType,
}

/// A user-defined internal type: the alias wrapping its representation.
#[derive(Clone, Debug, PartialEq)]
pub struct InternalType {
    pub kind: InternalKind,
    pub ty: Type,
}

/// An error returned by a node call, possibly carrying ABI-encoded revert
/// data.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct CallError {
    pub message: String,
    pub data: Option<Bytes>,
}

/// A structured contract error decoded out of revert data.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedError {
    /// `Error(string)` — `require`/`revert` with a reason.
    Revert(String),
    /// `Panic(uint256)` — a solidity runtime failure code.
    Panic(U256),
    /// A registered custom error; `data` is the payload after the selector.
    Custom { name: String, data: Bytes },
}

impl fmt::Display for DecodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedError::Revert(reason) => write!(f, "reverted: {reason}"),
            DecodedError::Panic(code) => write!(f, "panicked with code {code}"),
            DecodedError::Custom { name, .. } => write!(f, "custom error `{name}`"),
        }
    }
}

/// A parsed contract ABI.
#[derive(Clone, Debug, Default)]
pub struct Contract {
    /// The optional constructor.
    pub constructor: Option<Constructor>,
    /// Methods by name; the first declared overload is the canonical entry.
    pub methods: BTreeMap<String, Function>,
    /// Every method keyed by its full signature string, resolving overloads.
    pub methods_by_signature: BTreeMap<String, Function>,
    /// Events by name.
    pub events: BTreeMap<String, Event>,
    /// Custom errors by name.
    pub errors: BTreeMap<String, SolError>,
    /// User-defined internal types by short name.
    pub types: BTreeMap<String, InternalType>,
    /// Whether the contract declares a receive function.
    pub receive: bool,
    /// Whether the contract declares a fallback function.
    pub fallback: bool,
}

impl Contract {
    /// Loads a contract from JSON: either a bare descriptor array or an
    /// object with an `abi` key.
    pub fn from_json(s: &str) -> Result<Self> {
        let abi: JsonAbi = serde_json::from_str(s)?;
        Self::load(abi.into_raw())
    }

    /// Loads a contract from parsed raw descriptors.
    pub fn load(raw: RawAbi) -> Result<Self> {
        let mut contract = Contract::default();
        for item in raw {
            match item.type_field.as_str() {
                "constructor" => {
                    let inputs = convert_params(&item.inputs, &mut contract.types)?;
                    contract.constructor = Some(Constructor { inputs });
                }
                // an empty type string counts as a function
                "function" | "" => {
                    let function = Function {
                        name: item.name.clone().unwrap_or_default(),
                        inputs: convert_params(&item.inputs, &mut contract.types)?,
                        outputs: convert_params(&item.outputs, &mut contract.types)?,
                        state_mutability: item_mutability(&item),
                    };
                    contract.insert_method(function);
                }
                "event" => {
                    let mut inputs = Vec::with_capacity(item.inputs.len());
                    for component in &item.inputs {
                        let param = convert_param(component, &mut contract.types)?;
                        inputs.push(EventParam {
                            name: param.name,
                            kind: param.kind,
                            indexed: component.indexed.unwrap_or_default(),
                        });
                    }
                    contract.insert_event(Event {
                        name: item.name.clone().unwrap_or_default(),
                        inputs,
                        anonymous: item.anonymous.unwrap_or_default(),
                    });
                }
                "error" => {
                    let error = SolError {
                        name: item.name.clone().unwrap_or_default(),
                        inputs: convert_params(&item.inputs, &mut contract.types)?,
                    };
                    contract.insert_error(error);
                }
                "fallback" => contract.fallback = true,
                "receive" => contract.receive = true,
                other => bail!("Unsupported abi item type `{}`", other),
            }
        }
        Ok(contract)
    }

    /// Parses a human readable ABI document.
    pub fn from_human_readable(input: &[&str]) -> Result<Self> {
        AbiParser::new().parse(input)
    }

    pub(crate) fn insert_method(&mut self, function: Function) {
        self.methods_by_signature.insert(function.signature(), function.clone());
        self.methods.entry(function.name.clone()).or_insert(function);
    }

    pub(crate) fn insert_event(&mut self, event: Event) {
        self.events.insert(event.name.clone(), event);
    }

    pub(crate) fn insert_error(&mut self, error: SolError) {
        self.errors.insert(error.name.clone(), error);
    }

    /// The canonical method lookup by name.
    pub fn method(&self, name: &str) -> Option<&Function> {
        self.methods.get(name)
    }

    /// Resolves overloads by full signature string, e.g.
    /// `transfer(address,uint256)`.
    pub fn method_by_signature(&self, signature: &str) -> Option<&Function> {
        self.methods_by_signature.get(signature)
    }

    /// Finds the method whose selector matches the first 4 bytes of calldata.
    pub fn method_by_selector(&self, selector: Selector) -> Option<&Function> {
        self.methods_by_signature.values().find(|f| f.selector() == selector)
    }

    /// Event lookup by name.
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }

    /// Finds the event whose `topic0` matches.
    pub fn event_by_topic0(&self, topic0: H256) -> Option<&Event> {
        self.events.values().find(|e| e.signature() == topic0)
    }

    /// Error lookup by name.
    pub fn error(&self, name: &str) -> Option<&SolError> {
        self.errors.get(name)
    }

    /// Whether `data` is a revert, a panic, or matches a registered custom
    /// error's selector.
    pub fn is_error(&self, data: &[u8]) -> bool {
        if data.len() < 4 {
            return false
        }
        data[..4] == REVERT_SELECTOR ||
            data[..4] == PANIC_SELECTOR ||
            self.errors.values().any(|e| e.is_match(data))
    }

    /// Decodes revert data into a structured error, if it is one.
    pub fn to_error(&self, data: &[u8]) -> Option<DecodedError> {
        if data.len() < 4 {
            return None
        }
        if data[..4] == REVERT_SELECTOR {
            return decode_revert_reason(data).ok().map(DecodedError::Revert)
        }
        if data[..4] == PANIC_SELECTOR {
            return decode_panic_code(data).ok().map(DecodedError::Panic)
        }
        self.errors.values().find(|e| e.is_match(data)).map(|e| DecodedError::Custom {
            name: e.name.clone(),
            data: data[4..].to_vec().into(),
        })
    }

    /// Translates a call error carrying revert data into a structured error;
    /// errors without decodable data are returned unchanged.
    pub fn handle_error(&self, err: CallError) -> std::result::Result<DecodedError, CallError> {
        if let Some(decoded) = err.data.as_ref().and_then(|data| self.to_error(data)) {
            return Ok(decoded)
        }
        Err(err)
    }

    /// Copies the contract's internal types into a parser registry so that
    /// subsequent human readable signatures can resolve them by name.
    pub fn register_types(&self, registry: &mut TypeRegistry) {
        for (name, internal) in &self.types {
            registry.insert(name.clone(), internal.ty.clone());
        }
    }
}

fn item_mutability(item: &Item) -> StateMutability {
    match item.state_mutability.as_deref() {
        Some("pure") => StateMutability::Pure,
        Some("view") => StateMutability::View,
        Some("payable") => StateMutability::Payable,
        Some(_) => StateMutability::NonPayable,
        // pre-0.6 ABIs carry a `constant` flag instead
        None if item.constant == Some(true) => StateMutability::View,
        None => StateMutability::NonPayable,
    }
}

fn convert_params(
    components: &[Component],
    types: &mut BTreeMap<String, InternalType>,
) -> Result<Vec<TupleParam>> {
    components.iter().map(|c| convert_param(c, types)).collect()
}

fn convert_param(
    component: &Component,
    types: &mut BTreeMap<String, InternalType>,
) -> Result<TupleParam> {
    let (base_str, suffixes) = split_array_suffixes(&component.type_field)?;

    let base = if base_str == "tuple" {
        Type::Tuple(
            component
                .components
                .iter()
                .map(|c| convert_param(c, types))
                .collect::<Result<Vec<_>>>()?,
        )
    } else {
        HumanReadableParser::parse_type(base_str)
            .map_err(|_| ParseError::UnknownType(base_str.to_string()))?
    };

    // `internalType`, when it differs from `type`, names the element type
    let base = match component.internal_type.as_deref() {
        Some(internal) if internal != component.type_field => {
            apply_internal_type(internal, base, types)
        }
        _ => base,
    };

    let mut ty = base;
    for suffix in suffixes {
        ty = match suffix {
            Some(len) => Type::fixed_array(ty, len),
            None => Type::array(ty),
        };
    }

    Ok(TupleParam::new(component.name.clone(), ty))
}

/// Splits `uint256[2][]` into `("uint256", [Some(2), None])`.
fn split_array_suffixes(type_str: &str) -> Result<(&str, Vec<Option<usize>>)> {
    let base_end = type_str.find('[').unwrap_or(type_str.len());
    let (base, mut rest) = type_str.split_at(base_end);
    let mut suffixes = Vec::new();
    while !rest.is_empty() {
        let close = rest
            .find(']')
            .ok_or_else(|| format_err!("Unclosed array suffix in `{}`", type_str))?;
        let inner = &rest[1..close];
        if inner.is_empty() {
            suffixes.push(None);
        } else {
            let len: usize = inner
                .parse()
                .map_err(|_| format_err!("Invalid array size `{}` in `{}`", inner, type_str))?;
            suffixes.push(Some(len));
        }
        rest = &rest[close + 1..];
    }
    Ok((base, suffixes))
}

/// Interprets an `internalType` string, registering the discovered type and
/// returning the alias that replaces the base type.
fn apply_internal_type(
    internal: &str,
    base: Type,
    types: &mut BTreeMap<String, InternalType>,
) -> Type {
    let (kind, name) = if let Some(rest) = internal.strip_prefix("struct ") {
        (InternalKind::Struct, rest)
    } else if let Some(rest) = internal.strip_prefix("enum ") {
        (InternalKind::Enum, rest)
    } else if !internal.contains(' ') {
        (InternalKind::ValueType, internal)
    } else {
        // unknown prefix, leave the parameter as declared
        return base
    };

    // drop array suffixes and contract qualifiers: `struct A.X[2]` names `X`
    let name = name.split('[').next().unwrap_or(name);
    let name = name.rsplit('.').next().unwrap_or(name);
    if name.is_empty() {
        return base
    }

    let alias = Type::alias(name, base);
    types.insert(name.to_string(), InternalType { kind, ty: alias.clone() });
    alias
}
