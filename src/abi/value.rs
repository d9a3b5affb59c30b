//! Carriers of decoded and to-be-encoded data, mirroring [`Type`].

use crate::abi::number::{Int, Uint};
use crate::abi::ty::{Type, TupleParam};
use crate::abi::AbiError;
use crate::types::{Address, I256, U256};

/// An ABI value. Each variant mirrors one [`Type`] constructor; aliases and
/// event tuples have no variant of their own — an alias carries its inner
/// type's value and an event tuple decodes to a reordered [`Value::Tuple`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A 20-byte address.
    Address(Address),
    /// A dynamic byte string.
    Bytes(Vec<u8>),
    /// A bounded signed integer.
    Int(Int),
    /// A bounded unsigned integer.
    Uint(Uint),
    /// A boolean.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A fixed-length byte string; the vector length is the type's `N`.
    FixedBytes(Vec<u8>),
    /// A dynamically sized array together with its element type (needed to
    /// reconstruct the type of an empty array).
    Array(Vec<Value>, Type),
    /// A fixed-length array together with its element type.
    FixedArray(Vec<Value>, Type),
    /// Named tuple elements in declaration order.
    Tuple(Vec<(String, Value)>),
}

impl Value {
    /// Convenience constructor for a bounded unsigned integer value.
    pub fn uint(size: usize, value: impl Into<U256>) -> Result<Self, AbiError> {
        Ok(Value::Uint(Uint::new(size, value.into())?))
    }

    /// Convenience constructor for a bounded signed integer value.
    pub fn int(size: usize, value: impl Into<I256>) -> Result<Self, AbiError> {
        Ok(Value::Int(Int::new(size, value.into())?))
    }

    /// The type this value inhabits.
    pub fn kind(&self) -> Type {
        match self {
            Value::Address(_) => Type::Address,
            Value::Bytes(_) => Type::Bytes,
            Value::Int(int) => Type::Int(int.size()),
            Value::Uint(uint) => Type::Uint(uint.size()),
            Value::Bool(_) => Type::Bool,
            Value::String(_) => Type::String,
            Value::FixedBytes(bytes) => Type::FixedBytes(bytes.len()),
            Value::Array(_, elem) => Type::array(elem.clone()),
            Value::FixedArray(values, elem) => Type::fixed_array(elem.clone(), values.len()),
            Value::Tuple(elems) => Type::Tuple(
                elems.iter().map(|(name, value)| TupleParam::new(name.clone(), value.kind())).collect(),
            ),
        }
    }

    /// Whether this value encodes behind an offset slot in an enclosing tuple.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Value::Bytes(_) | Value::String(_) | Value::Array(..) => true,
            Value::FixedArray(_, elem) => elem.is_dynamic(),
            Value::Tuple(elems) => elems.iter().any(|(_, v)| v.is_dynamic()),
            _ => false,
        }
    }

    /// A short name of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Address(_) => "address",
            Value::Bytes(_) => "bytes",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Array(..) => "array",
            Value::FixedArray(..) => "fixed array",
            Value::Tuple(_) => "tuple",
        }
    }

    /// Consumes the value, returning the inner address if it is one.
    pub fn into_address(self) -> Option<Address> {
        match self {
            Value::Address(address) => Some(address),
            _ => None,
        }
    }

    /// Consumes the value, returning the inner bytes if it is `Bytes`.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Consumes the value, returning the inner bytes if it is `FixedBytes`.
    pub fn into_fixed_bytes(self) -> Option<Vec<u8>> {
        match self {
            Value::FixedBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Consumes the value, returning the bounded signed integer.
    pub fn into_int(self) -> Option<Int> {
        match self {
            Value::Int(int) => Some(int),
            _ => None,
        }
    }

    /// Consumes the value, returning the bounded unsigned integer.
    pub fn into_uint(self) -> Option<Uint> {
        match self {
            Value::Uint(uint) => Some(uint),
            _ => None,
        }
    }

    /// Consumes the value, returning the inner bool.
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Consumes the value, returning the inner string.
    pub fn into_string(self) -> Option<String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the value, returning the elements of an array of either
    /// flavor.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self {
            Value::Array(values, _) | Value::FixedArray(values, _) => Some(values),
            _ => None,
        }
    }

    /// Consumes the value, returning the named tuple elements.
    pub fn into_tuple(self) -> Option<Vec<(String, Value)>> {
        match self {
            Value::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    /// Borrows the named tuple elements.
    pub fn as_tuple(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    /// The unnamed element values of a tuple, in declaration order.
    pub fn into_tuple_values(self) -> Option<Vec<Value>> {
        self.into_tuple().map(|elems| elems.into_iter().map(|(_, v)| v).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_zero() {
        let types = [
            Type::Address,
            Type::Bool,
            Type::Bytes,
            Type::String,
            Type::FixedBytes(8),
            Type::Uint(32),
            Type::Int(128),
            Type::array(Type::Bool),
            Type::fixed_array(Type::Uint(256), 4),
            Type::tuple([("a", Type::Address), ("b", Type::Bytes)]),
        ];
        for ty in types {
            assert_eq!(ty.zero().kind(), ty);
        }
    }

    #[test]
    fn empty_array_keeps_element_type() {
        let value = Value::Array(Vec::new(), Type::Uint(64));
        assert_eq!(value.kind(), Type::array(Type::Uint(64)));
    }

    #[test]
    fn dynamic_tracks_type() {
        assert!(Value::Bytes(vec![1]).is_dynamic());
        assert!(!Value::Bool(true).is_dynamic());
        assert!(Value::FixedArray(vec![Value::Bytes(vec![])], Type::Bytes).is_dynamic());
        assert!(!Value::FixedArray(vec![Value::Bool(true)], Type::Bool).is_dynamic());
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::Bool(true).into_bool(), Some(true));
        assert_eq!(Value::Bool(true).into_string(), None);
        assert_eq!(
            Value::Tuple(vec![("x".into(), Value::Bool(false))]).into_tuple_values(),
            Some(vec![Value::Bool(false)])
        );
    }
}
