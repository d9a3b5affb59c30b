//! Conversions between host values and core [`Value`]s.
// Adapted from: [rust-web3](https://github.com/tomusdrw/rust-web3/blob/master/src/contract/tokens.rs)

use crate::abi::number::{Int, Uint};
use crate::abi::ty::{event_value_params, Type};
use crate::abi::value::Value;
use crate::types::{Address, Bytes, H256, I256, U256};
use arrayvec::ArrayVec;
use thiserror::Error;

/// The error type returned when a host value cannot be converted to or from a
/// core value.
#[derive(Clone, Debug, Error)]
#[error("{0}")]
pub struct MappingError(pub String);

/// Types with a statically known ABI type.
pub trait AbiType {
    /// The ABI type this host type maps to.
    fn abi_kind() -> Type;
}

/// Conversion of a host value into a core value.
pub trait IntoValue {
    /// Convert into a core value.
    fn into_value(self) -> Value;
}

/// Conversion of a core value into a host value.
pub trait FromValue: Sized {
    /// Convert a core value into this type.
    fn from_value(value: Value) -> Result<Self, MappingError>;
}

/// Output type possible to extract from a decoded value tuple.
pub trait FromValues: Sized {
    /// Creates an instance from decoded values.
    fn from_values(values: Vec<Value>) -> Result<Self, MappingError>;
}

impl FromValues for () {
    fn from_values(_: Vec<Value>) -> Result<Self, MappingError> {
        Ok(())
    }
}

impl<T: FromValue> FromValues for T {
    fn from_values(mut values: Vec<Value>) -> Result<Self, MappingError> {
        let value = match values.len() {
            0 => Value::Tuple(vec![]),
            1 => values.remove(0),
            _ => Value::Tuple(values.into_iter().map(|v| (String::new(), v)).collect()),
        };
        Self::from_value(value)
    }
}

/// Conversion of a host value into an argument list.
pub trait IntoValues {
    /// Convert into a list of argument values.
    fn into_values(self) -> Vec<Value>;
}

impl IntoValues for () {
    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

impl<T: IntoValue> IntoValues for T {
    fn into_values(self) -> Vec<Value> {
        // a single tuple flattens into its elements
        match self.into_value() {
            Value::Tuple(elems) => elems.into_iter().map(|(_, v)| v).collect(),
            other => vec![other],
        }
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        Ok(value)
    }
}

impl AbiType for bool {
    fn abi_kind() -> Type {
        Type::Bool
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(MappingError(format!("expected `bool`, got {}", other.type_name()))),
        }
    }
}

impl AbiType for String {
    fn abi_kind() -> Type {
        Type::String
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(MappingError(format!("expected `string`, got {}", other.type_name()))),
        }
    }
}

impl<'a> AbiType for &'a str {
    fn abi_kind() -> Type {
        Type::String
    }
}

impl<'a> IntoValue for &'a str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl AbiType for Address {
    fn abi_kind() -> Type {
        Type::Address
    }
}

impl IntoValue for Address {
    fn into_value(self) -> Value {
        Value::Address(self)
    }
}

impl FromValue for Address {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Address(address) => Ok(address),
            other => Err(MappingError(format!("expected `address`, got {}", other.type_name()))),
        }
    }
}

impl AbiType for H256 {
    fn abi_kind() -> Type {
        Type::FixedBytes(32)
    }
}

impl IntoValue for H256 {
    fn into_value(self) -> Value {
        Value::FixedBytes(self.as_bytes().to_vec())
    }
}

impl FromValue for H256 {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::FixedBytes(bytes) if bytes.len() == 32 => Ok(H256::from_slice(&bytes)),
            other => Err(MappingError(format!("expected `bytes32`, got {}", other.type_name()))),
        }
    }
}

impl AbiType for Bytes {
    fn abi_kind() -> Type {
        Type::Bytes
    }
}

impl IntoValue for Bytes {
    fn into_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl FromValue for Bytes {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Bytes(bytes) | Value::FixedBytes(bytes) => Ok(bytes.into()),
            other => Err(MappingError(format!("expected `bytes`, got {}", other.type_name()))),
        }
    }
}

impl AbiType for bytes::Bytes {
    fn abi_kind() -> Type {
        Type::Bytes
    }
}

impl IntoValue for bytes::Bytes {
    fn into_value(self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl FromValue for bytes::Bytes {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        Bytes::from_value(value).map(|b| b.0)
    }
}

impl AbiType for Vec<u8> {
    fn abi_kind() -> Type {
        Type::Bytes
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Bytes(self)
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Bytes(bytes) | Value::FixedBytes(bytes) => Ok(bytes),
            other => Err(MappingError(format!("expected `bytes`, got {}", other.type_name()))),
        }
    }
}

impl AbiType for U256 {
    fn abi_kind() -> Type {
        Type::Uint(256)
    }
}

impl IntoValue for U256 {
    fn into_value(self) -> Value {
        Value::Uint(Uint::new(256, self).expect("every U256 fits uint256; qed"))
    }
}

impl FromValue for U256 {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Uint(uint) => Ok(uint.value()),
            Value::Int(int) => U256::try_from(int.value())
                .map_err(|_| MappingError(format!("negative value {} for uint", int.value()))),
            other => Err(MappingError(format!("expected `uint`, got {}", other.type_name()))),
        }
    }
}

impl AbiType for I256 {
    fn abi_kind() -> Type {
        Type::Int(256)
    }
}

impl IntoValue for I256 {
    fn into_value(self) -> Value {
        Value::Int(Int::new(256, self).expect("every I256 fits int256; qed"))
    }
}

impl FromValue for I256 {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Int(int) => Ok(int.value()),
            Value::Uint(uint) => I256::try_from(uint.value())
                .map_err(|_| MappingError(format!("{} overflows int256", uint.value()))),
            other => Err(MappingError(format!("expected `int`, got {}", other.type_name()))),
        }
    }
}

macro_rules! impl_unsigned {
    ($($ty:ty => $bits:expr),*) => {
        $(
            impl AbiType for $ty {
                fn abi_kind() -> Type {
                    Type::Uint($bits)
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Uint(
                        Uint::new($bits, U256::from(self))
                            .expect("value fits its natural width; qed"),
                    )
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, MappingError> {
                    let value = U256::from_value(value)?;
                    if value > U256::from(<$ty>::MAX) {
                        return Err(MappingError(format!(
                            "{value} does not fit in {}", stringify!($ty),
                        )))
                    }
                    Ok(value.low_u128() as $ty)
                }
            }
        )*
    };
}

impl_unsigned!(u8 => 8, u16 => 16, u32 => 32, u64 => 64, u128 => 128);

macro_rules! impl_signed {
    ($($ty:ty => $bits:expr),*) => {
        $(
            impl AbiType for $ty {
                fn abi_kind() -> Type {
                    Type::Int($bits)
                }
            }

            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Int(
                        Int::new($bits, I256::from(self))
                            .expect("value fits its natural width; qed"),
                    )
                }
            }

            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, MappingError> {
                    let value = I256::from_value(value)?;
                    let min = I256::from(<$ty>::MIN);
                    let max = I256::from(<$ty>::MAX);
                    if value < min || value > max {
                        return Err(MappingError(format!(
                            "{value} does not fit in {}", stringify!($ty),
                        )))
                    }
                    // the low two words always hold the value after the range
                    // check, sign handled by the cast
                    Ok(value.low_u64() as $ty)
                }
            }
        )*
    };
}

impl_signed!(i8 => 8, i16 => 16, i32 => 32, i64 => 64);

impl AbiType for i128 {
    fn abi_kind() -> Type {
        Type::Int(128)
    }
}

impl IntoValue for i128 {
    fn into_value(self) -> Value {
        Value::Int(Int::new(128, I256::from(self)).expect("value fits its natural width; qed"))
    }
}

impl FromValue for i128 {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        let value = I256::from_value(value)?;
        if value < I256::from(i128::MIN) || value > I256::from(i128::MAX) {
            return Err(MappingError(format!("{value} does not fit in i128")))
        }
        let raw = value.into_raw();
        Ok(((raw.0[1] as u128) << 64 | raw.0[0] as u128) as i128)
    }
}

/// Marker trait for types that can appear as array elements.
///
/// `u8` is deliberately not an item so that `Vec<u8>` maps to `bytes`.
pub trait ValueItem: IntoValue + FromValue {}

macro_rules! value_item {
    ($($ty:ty,)*) => {
        $(
            impl ValueItem for $ty {}
        )*
    };
}

value_item! {
    Value, String, Address, H256, U256, I256, bool, Vec<u8>,
    i8, i16, i32, i64, i128, u16, u32, u64, u128, Bytes, bytes::Bytes,
}

impl<T: ValueItem + AbiType> AbiType for Vec<T> {
    fn abi_kind() -> Type {
        Type::array(T::abi_kind())
    }
}

impl<T: ValueItem + AbiType> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(IntoValue::into_value).collect(), T::abi_kind())
    }
}

impl<T: ValueItem> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Array(values, _) | Value::FixedArray(values, _) => {
                values.into_iter().map(FromValue::from_value).collect()
            }
            other => Err(MappingError(format!("expected array, got {}", other.type_name()))),
        }
    }
}

impl<T: ValueItem + AbiType> ValueItem for Vec<T> {}

impl<const N: usize> AbiType for [u8; N] {
    fn abi_kind() -> Type {
        Type::FixedBytes(N)
    }
}

impl<const N: usize> IntoValue for [u8; N] {
    fn into_value(self) -> Value {
        Value::FixedBytes(self.to_vec())
    }
}

impl<const N: usize> FromValue for [u8; N] {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::FixedBytes(bytes) => bytes.try_into().map_err(|bytes: Vec<u8>| {
                MappingError(format!("expected `bytes{N}`, got bytes{}", bytes.len()))
            }),
            other => Err(MappingError(format!("expected `bytes{N}`, got {}", other.type_name()))),
        }
    }
}

impl<const N: usize> ValueItem for [u8; N] {}

impl<T: ValueItem + AbiType + Clone, const N: usize> AbiType for [T; N] {
    fn abi_kind() -> Type {
        Type::fixed_array(T::abi_kind(), N)
    }
}

impl<T: ValueItem + AbiType + Clone, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::FixedArray(
            ArrayVec::from(self).into_iter().map(IntoValue::into_value).collect(),
            T::abi_kind(),
        )
    }
}

impl<T: ValueItem + Clone, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::FixedArray(values, _) | Value::Array(values, _) => {
                if values.len() != N {
                    return Err(MappingError(format!(
                        "expected {N} array elements, got {}",
                        values.len()
                    )))
                }
                let mut arr = ArrayVec::<T, N>::new();
                for value in values {
                    arr.push(T::from_value(value)?);
                }
                match arr.into_inner() {
                    Ok(arr) => Ok(arr),
                    Err(_) => panic!("all elements inserted so the array is full; qed"),
                }
            }
            other => Err(MappingError(format!("expected array, got {}", other.type_name()))),
        }
    }
}

impl<T: ValueItem + AbiType + Clone, const N: usize> ValueItem for [T; N] {}

macro_rules! impl_tuples {
    ($num:expr, $( $ty:ident : $no:tt, )+) => {
        impl<$($ty, )+> AbiType for ($($ty,)+)
        where
            $( $ty: AbiType, )+
        {
            fn abi_kind() -> Type {
                Type::unnamed_tuple([ $( $ty::abi_kind(), )+ ])
            }
        }

        impl<$($ty, )+> IntoValue for ($($ty,)+)
        where
            $( $ty: IntoValue, )+
        {
            fn into_value(self) -> Value {
                Value::Tuple(vec![
                    $( (String::new(), self.$no.into_value()), )+
                ])
            }
        }

        impl<$($ty, )+> FromValue for ($($ty,)+)
        where
            $( $ty: FromValue, )+
        {
            fn from_value(value: Value) -> Result<Self, MappingError> {
                match value {
                    Value::Tuple(elems) => {
                        if elems.len() != $num {
                            return Err(MappingError(format!(
                                "expected a tuple of {} elements, got {}", $num, elems.len(),
                            )))
                        }
                        let mut it = elems.into_iter();
                        Ok(($(
                            $ty::from_value(it.next().expect("length checked; qed").1)?,
                        )+))
                    }
                    other => Err(MappingError(format!(
                        "expected tuple, got {}", other.type_name(),
                    ))),
                }
            }
        }

        impl<$($ty, )+> ValueItem for ($($ty,)+)
        where
            $( $ty: IntoValue + FromValue, )+
        {
        }
    };
}

impl_tuples!(1, A:0, );
impl_tuples!(2, A:0, B:1, );
impl_tuples!(3, A:0, B:1, C:2, );
impl_tuples!(4, A:0, B:1, C:2, D:3, );
impl_tuples!(5, A:0, B:1, C:2, D:3, E:4, );
impl_tuples!(6, A:0, B:1, C:2, D:3, E:4, F:5, );
impl_tuples!(7, A:0, B:1, C:2, D:3, E:4, F:5, G:6, );
impl_tuples!(8, A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, );
impl_tuples!(9, A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, );
impl_tuples!(10, A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, );
impl_tuples!(11, A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10, );
impl_tuples!(12, A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7, I:8, J:9, K:10, L:11, );

/// The universal, type-directed conversion rules between loosely shaped
/// values and a declared [`Type`]. Encoding paths run every argument through
/// [`Mapper::map_to_type`]; this is where width adjustment, hex-string
/// parsing and field-name matching live.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mapper;

static DEFAULT_MAPPER: Mapper = Mapper;

/// The process-wide default mapper.
pub fn default_mapper() -> &'static Mapper {
    &DEFAULT_MAPPER
}

impl Mapper {
    /// Coerces `value` to the declared type, applying the universal mapping
    /// rules. Lossless; out-of-range conversions fail.
    pub fn map_to_type(&self, value: Value, ty: &Type) -> Result<Value, MappingError> {
        match ty.resolve() {
            Type::Bool => match value {
                Value::Bool(_) => Ok(value),
                other => Err(expected("bool", &other)),
            },
            Type::Uint(size) => self.map_uint(value, *size),
            Type::Int(size) => self.map_int(value, *size),
            Type::Address => self.map_address(value),
            Type::Bytes => self.map_bytes(value),
            Type::String => match value {
                Value::String(_) => Ok(value),
                Value::Bytes(bytes) => String::from_utf8(bytes)
                    .map(Value::String)
                    .map_err(|e| MappingError(format!("invalid utf-8 string: {e}"))),
                other => Err(expected("string", &other)),
            },
            Type::FixedBytes(len) => self.map_fixed_bytes(value, *len),
            Type::Array(elem) => {
                let values = value
                    .into_array()
                    .ok_or_else(|| MappingError("expected a sequence".to_string()))?;
                let mapped = values
                    .into_iter()
                    .map(|v| self.map_to_type(v, elem))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Array(mapped, (**elem).clone()))
            }
            Type::FixedArray(elem, len) => {
                let values = value
                    .into_array()
                    .ok_or_else(|| MappingError("expected a sequence".to_string()))?;
                if values.len() != *len {
                    return Err(MappingError(format!(
                        "expected {len} elements, got {}",
                        values.len()
                    )))
                }
                let mapped = values
                    .into_iter()
                    .map(|v| self.map_to_type(v, elem))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::FixedArray(mapped, (**elem).clone()))
            }
            Type::Tuple(params) => {
                let elems = value
                    .into_tuple()
                    .ok_or_else(|| MappingError("expected a tuple or struct".to_string()))?;
                if elems.len() != params.len() {
                    return Err(MappingError(format!(
                        "expected a tuple of {} elements, got {}",
                        params.len(),
                        elems.len()
                    )))
                }
                let by_name = params.iter().any(|p| !p.name.is_empty()) &&
                    elems.iter().any(|(name, _)| !name.is_empty());
                let mut out = Vec::with_capacity(params.len());
                if by_name {
                    let mut elems: Vec<Option<(String, Value)>> =
                        elems.into_iter().map(Some).collect();
                    for param in params {
                        let found = elems
                            .iter_mut()
                            .find(|slot| {
                                slot.as_ref().map_or(false, |(name, _)| {
                                    name == &param.name ||
                                        fold_field_name(name) == param.name
                                })
                            })
                            .and_then(Option::take)
                            .ok_or_else(|| {
                                MappingError(format!("missing tuple field `{}`", param.name))
                            })?;
                        out.push((
                            param.name.clone(),
                            self.map_to_type(found.1, &param.kind)?,
                        ));
                    }
                } else {
                    for (param, (_, value)) in params.iter().zip(elems) {
                        out.push((param.name.clone(), self.map_to_type(value, &param.kind)?));
                    }
                }
                Ok(Value::Tuple(out))
            }
            Type::EventTuple(params) => {
                self.map_to_type(value, &Type::Tuple(event_value_params(params)))
            }
            Type::Alias(..) => unreachable!("aliases are resolved above"),
        }
    }

    fn map_uint(&self, value: Value, size: usize) -> Result<Value, MappingError> {
        let value = match value {
            Value::Uint(uint) => uint.value(),
            Value::Int(int) => U256::try_from(int.value())
                .map_err(|_| MappingError(format!("negative value {} for uint", int.value())))?,
            Value::String(s) => parse_hex_uint(&s)?,
            other => return Err(expected("uint", &other)),
        };
        Uint::new(size, value)
            .map(Value::Uint)
            .map_err(|_| MappingError(format!("{value} does not fit in uint{size}")))
    }

    fn map_int(&self, value: Value, size: usize) -> Result<Value, MappingError> {
        let value = match value {
            Value::Int(int) => int.value(),
            Value::Uint(uint) => I256::try_from(uint.value())
                .map_err(|_| MappingError(format!("{} overflows int256", uint.value())))?,
            Value::String(s) => I256::from_hex_str(&s)
                .map_err(|e| MappingError(format!("invalid hex integer `{s}`: {e}")))?,
            other => return Err(expected("int", &other)),
        };
        Int::new(size, value)
            .map(Value::Int)
            .map_err(|_| MappingError(format!("{value} does not fit in int{size}")))
    }

    fn map_address(&self, value: Value) -> Result<Value, MappingError> {
        let bytes = match value {
            Value::Address(_) => return Ok(value),
            Value::Bytes(bytes) | Value::FixedBytes(bytes) => bytes,
            Value::String(s) => decode_hex(&s)?,
            other => return Err(expected("address", &other)),
        };
        if bytes.len() != 20 {
            return Err(MappingError(format!("address must be 20 bytes, got {}", bytes.len())))
        }
        Ok(Value::Address(Address::from_slice(&bytes)))
    }

    fn map_bytes(&self, value: Value) -> Result<Value, MappingError> {
        match value {
            Value::Bytes(_) => Ok(value),
            Value::FixedBytes(bytes) => Ok(Value::Bytes(bytes)),
            Value::String(s) => Ok(Value::Bytes(decode_hex(&s)?)),
            other => Err(expected("bytes", &other)),
        }
    }

    fn map_fixed_bytes(&self, value: Value, len: usize) -> Result<Value, MappingError> {
        let bytes = match value {
            Value::FixedBytes(bytes) | Value::Bytes(bytes) => bytes,
            Value::String(s) => decode_hex(&s)?,
            // integers map to bytes32 only, right-aligned
            Value::Uint(uint) if len == 32 => uint.value().into_value_bytes(),
            Value::Int(int) if len == 32 => int.value().into_raw().into_value_bytes(),
            other => return Err(expected("fixed bytes", &other)),
        };
        if bytes.len() != len {
            return Err(MappingError(format!(
                "expected {len} bytes, got {}",
                bytes.len()
            )))
        }
        Ok(Value::FixedBytes(bytes))
    }
}

trait IntoValueBytes {
    fn into_value_bytes(self) -> Vec<u8>;
}

impl IntoValueBytes for U256 {
    fn into_value_bytes(self) -> Vec<u8> {
        let mut out = vec![0u8; 32];
        self.to_big_endian(&mut out);
        out
    }
}

fn expected(what: &str, got: &Value) -> MappingError {
    MappingError(format!("expected `{what}`, got {}", got.type_name()))
}

fn decode_hex(s: &str) -> Result<Vec<u8>, MappingError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(stripped).map_err(|e| MappingError(format!("invalid hex string `{s}`: {e}")))
}

fn parse_hex_uint(s: &str) -> Result<U256, MappingError> {
    let stripped = s.strip_prefix("0x").unwrap_or(s);
    if stripped.is_empty() || stripped.len() > 64 {
        return Err(MappingError(format!("invalid hex integer `{s}`")))
    }
    let mut padded = String::with_capacity(64);
    if stripped.len() % 2 != 0 {
        padded.push('0');
    }
    padded.push_str(stripped);
    let bytes =
        hex::decode(&padded).map_err(|e| MappingError(format!("invalid hex integer `{s}`: {e}")))?;
    Ok(U256::from_big_endian(&bytes))
}

/// Maps a host field name onto a tuple element name: the leading run of
/// uppercase letters (digits may continue the run) is lowercased, preserving
/// the run's last character when it is followed by a lowercase letter.
///
/// `User→user`, `ID→id`, `UserID→userID`, `DAPPName→dappName`,
/// `I18NCode→i18nCode`. Adjacent acronyms stay ambiguous: `DAPPID→dappid`.
pub fn fold_field_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut run = 0;
    while run < chars.len() &&
        (chars[run].is_ascii_uppercase() || (run > 0 && chars[run].is_ascii_digit()))
    {
        run += 1;
    }
    if run == 0 {
        return name.to_string()
    }
    let followed_by_lower = chars.get(run).map_or(false, |c| c.is_ascii_lowercase());
    let boundary = if followed_by_lower && run > 1 { run - 1 } else { run };
    chars[..boundary]
        .iter()
        .map(|c| c.to_ascii_lowercase())
        .chain(chars[boundary..].iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_field_names() {
        assert_eq!(fold_field_name("User"), "user");
        assert_eq!(fold_field_name("ID"), "id");
        assert_eq!(fold_field_name("UserID"), "userID");
        assert_eq!(fold_field_name("DAPPName"), "dappName");
        assert_eq!(fold_field_name("I18NCode"), "i18nCode");
        assert_eq!(fold_field_name("DAPPID"), "dappid");
        assert_eq!(fold_field_name("already"), "already");
        assert_eq!(fold_field_name(""), "");
    }

    #[test]
    fn machine_ints_round_trip() {
        assert_eq!(u64::from_value(42u64.into_value()).unwrap(), 42);
        assert_eq!(i64::from_value((-42i64).into_value()).unwrap(), -42);
        assert_eq!(i8::from_value((-128i8).into_value()).unwrap(), -128);
        assert_eq!(u128::from_value(u128::MAX.into_value()).unwrap(), u128::MAX);
        assert_eq!(i128::from_value(i128::MIN.into_value()).unwrap(), i128::MIN);
        assert_eq!(U256::from_value(U256::MAX.into_value()).unwrap(), U256::MAX);
        assert_eq!(I256::from_value(I256::MIN.into_value()).unwrap(), I256::MIN);
    }

    #[test]
    fn narrowing_is_range_checked() {
        assert!(u8::from_value(300u64.into_value()).is_err());
        assert!(i8::from_value(200u64.into_value()).is_err());
        assert!(u64::from_value((-1i64).into_value()).is_err());
    }

    #[test]
    fn vec_u8_is_bytes() {
        assert_eq!(vec![1u8, 2, 3].into_value(), Value::Bytes(vec![1, 2, 3]));
        assert_eq!(
            vec![1u16, 2].into_value(),
            Value::Array(
                vec![1u16.into_value(), 2u16.into_value()],
                Type::Uint(16),
            )
        );
    }

    #[test]
    fn fixed_arrays_and_bytes() {
        assert_eq!([1u8, 2].into_value(), Value::FixedBytes(vec![1, 2]));
        let arr: [u64; 2] = [7, 8];
        assert_eq!(
            arr.into_value().kind(),
            Type::fixed_array(Type::Uint(64), 2)
        );
        let back: [u64; 2] = FromValue::from_value(arr.into_value()).unwrap();
        assert_eq!(back, [7, 8]);
    }

    #[test]
    fn tuples_flatten_into_argument_lists() {
        let values = (1u64, true).into_values();
        assert_eq!(values, vec![1u64.into_value(), Value::Bool(true)]);

        let single = 1u64.into_values();
        assert_eq!(single, vec![1u64.into_value()]);

        let nested = (1u64, (2u64, 3u64)).into_values();
        assert_eq!(nested.len(), 2);
        assert!(matches!(nested[1], Value::Tuple(_)));
    }

    #[test]
    fn extracts_output_tuples() {
        let values = vec![Value::Bool(true), 9u64.into_value()];
        let out: (bool, u64) = FromValues::from_values(values).unwrap();
        assert_eq!(out, (true, 9));

        let empty: Result<U256, _> = FromValues::from_values(vec![]);
        assert!(empty.is_err());
    }

    #[test]
    fn mapper_widens_and_narrows_integers() {
        let mapper = default_mapper();
        let widened =
            mapper.map_to_type(8u64.into_value(), &Type::Uint(256)).unwrap();
        assert_eq!(widened, Value::uint(256, 8u64).unwrap());

        assert!(mapper.map_to_type(300u64.into_value(), &Type::Uint(8)).is_err());

        let signed = mapper.map_to_type((-4i32).into_value(), &Type::Int(256)).unwrap();
        assert_eq!(signed, Value::int(256, -4).unwrap());
    }

    #[test]
    fn mapper_parses_hex_strings() {
        let mapper = default_mapper();
        assert_eq!(
            mapper.map_to_type("0xff".into_value(), &Type::Uint(16)).unwrap(),
            Value::uint(16, 255u64).unwrap()
        );
        assert_eq!(
            mapper.map_to_type("-0x2a".into_value(), &Type::Int(8)).unwrap(),
            Value::int(8, -42).unwrap()
        );
        let address = mapper
            .map_to_type(
                format!("0x{}", "11".repeat(20)).into_value(),
                &Type::Address,
            )
            .unwrap();
        assert_eq!(address, Value::Address(Address::from_slice(&[0x11; 20])));

        assert_eq!(
            mapper.map_to_type("0x0102".into_value(), &Type::Bytes).unwrap(),
            Value::Bytes(vec![1, 2])
        );
    }

    #[test]
    fn mapper_converts_integers_to_bytes32_only() {
        let mapper = default_mapper();
        let mapped =
            mapper.map_to_type(1u64.into_value(), &Type::FixedBytes(32)).unwrap();
        let bytes = mapped.into_fixed_bytes().unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 1);

        assert!(mapper.map_to_type(1u64.into_value(), &Type::FixedBytes(4)).is_err());
    }

    #[test]
    fn mapper_matches_tuple_fields_by_folded_name() {
        let mapper = default_mapper();
        let ty = Type::tuple([("userID", Type::Uint(64)), ("name", Type::String)]);
        let src = Value::Tuple(vec![
            ("Name".into(), "alice".into_value()),
            ("UserID".into(), 7u64.into_value()),
        ]);
        let mapped = mapper.map_to_type(src, &ty).unwrap();
        let elems = mapped.into_tuple().unwrap();
        assert_eq!(elems[0].0, "userID");
        assert_eq!(elems[0].1, Value::uint(64, 7u64).unwrap());
        assert_eq!(elems[1].0, "name");
    }

    #[test]
    fn mapper_maps_unnamed_tuples_positionally() {
        let mapper = default_mapper();
        let ty = Type::unnamed_tuple([Type::Uint(8), Type::Bool]);
        let src = (1u64, true).into_value();
        let mapped = mapper.map_to_type(src, &ty).unwrap();
        assert_eq!(
            mapped.into_tuple_values().unwrap(),
            vec![Value::uint(8, 1u64).unwrap(), Value::Bool(true)]
        );
    }

    #[test]
    fn mapper_resolves_aliases() {
        let mapper = default_mapper();
        let ty = Type::alias("Amount", Type::Uint(128));
        assert_eq!(
            mapper.map_to_type(5u64.into_value(), &ty).unwrap(),
            Value::uint(128, 5u64).unwrap()
        );
    }

    #[test]
    fn mapper_checks_fixed_array_lengths() {
        let mapper = default_mapper();
        let ty = Type::fixed_array(Type::Bool, 2);
        let src = Value::Array(vec![Value::Bool(true)], Type::Bool);
        assert!(mapper.map_to_type(src, &ty).is_err());
    }
}
