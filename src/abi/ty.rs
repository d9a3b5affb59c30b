//! The closed set of ABI type constructors.

use crate::abi::number::{Int, Uint};
use crate::abi::value::Value;
use crate::abi::word::WORD_LEN;
use crate::types::Address;
use std::fmt;

/// A named element of a tuple type. The name is metadata only and never
/// participates in canonical renderings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleParam {
    /// Element name, empty when unnamed.
    pub name: String,
    /// Element type.
    pub kind: Type,
}

impl TupleParam {
    /// Creates a named tuple element.
    pub fn new(name: impl Into<String>, kind: Type) -> Self {
        Self { name: name.into(), kind }
    }

    /// Creates an unnamed tuple element.
    pub fn unnamed(kind: Type) -> Self {
        Self { name: String::new(), kind }
    }
}

/// A named element of an event tuple, carrying the `indexed` flag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EventParam {
    /// Element name, empty when unnamed.
    pub name: String,
    /// Element type.
    pub kind: Type,
    /// Whether the element is stored in the log topics instead of the data.
    pub indexed: bool,
}

impl EventParam {
    /// Creates an event tuple element.
    pub fn new(name: impl Into<String>, kind: Type, indexed: bool) -> Self {
        Self { name: name.into(), kind, indexed }
    }
}

/// An ABI type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    /// A 20-byte account address.
    Address,
    /// A dynamic byte string.
    Bytes,
    /// A signed integer of the given bit width.
    Int(usize),
    /// An unsigned integer of the given bit width.
    Uint(usize),
    /// A boolean.
    Bool,
    /// A dynamic UTF-8 string.
    String,
    /// A byte string of fixed length 1..=32.
    FixedBytes(usize),
    /// A dynamically sized array of one element type.
    Array(Box<Type>),
    /// An array of fixed length.
    FixedArray(Box<Type>, usize),
    /// An ordered sequence of named elements.
    Tuple(Vec<TupleParam>),
    /// A tuple whose elements carry `indexed` flags; the inputs of an event.
    EventTuple(Vec<EventParam>),
    /// A display-only rename of another type. Canonically transparent.
    Alias(String, Box<Type>),
}

impl Type {
    /// Shorthand for `Type::Array`.
    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    /// Shorthand for `Type::FixedArray`.
    pub fn fixed_array(elem: Type, len: usize) -> Self {
        Type::FixedArray(Box::new(elem), len)
    }

    /// Builds a tuple from `(name, type)` pairs.
    pub fn tuple<I, S>(elems: I) -> Self
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        Type::Tuple(elems.into_iter().map(|(name, kind)| TupleParam::new(name, kind)).collect())
    }

    /// Builds a tuple of unnamed elements.
    pub fn unnamed_tuple<I: IntoIterator<Item = Type>>(elems: I) -> Self {
        Type::Tuple(elems.into_iter().map(TupleParam::unnamed).collect())
    }

    /// Shorthand for `Type::Alias`.
    pub fn alias(name: impl Into<String>, inner: Type) -> Self {
        Type::Alias(name.into(), Box::new(inner))
    }

    /// Strips any alias wrappers.
    pub fn resolve(&self) -> &Type {
        match self {
            Type::Alias(_, inner) => inner.resolve(),
            other => other,
        }
    }

    /// Whether the encoded length of this type depends on its value. Dynamic
    /// types occupy a 32-byte offset slot in their enclosing tuple's head.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Type::Bytes | Type::String | Type::Array(_) => true,
            Type::FixedArray(elem, _) => elem.is_dynamic(),
            Type::Tuple(elems) => elems.iter().any(|e| e.kind.is_dynamic()),
            Type::EventTuple(elems) => elems.iter().any(|e| e.kind.is_dynamic()),
            Type::Alias(_, inner) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// The number of bytes this type occupies in the head of an enclosing
    /// tuple. For a static type this is the full encoded size.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return WORD_LEN
        }
        match self {
            Type::FixedArray(elem, len) => len * elem.head_size(),
            Type::Tuple(elems) => elems.iter().map(|e| e.kind.head_size()).sum(),
            Type::EventTuple(elems) => elems.iter().map(|e| e.kind.head_size()).sum(),
            Type::Alias(_, inner) => inner.head_size(),
            _ => WORD_LEN,
        }
    }

    /// The unique whitespace-free name-free form used for selector hashing.
    /// Aliases render as their inner type.
    pub fn canonical(&self) -> String {
        match self {
            Type::Address => "address".into(),
            Type::Bytes => "bytes".into(),
            Type::Int(size) => format!("int{size}"),
            Type::Uint(size) => format!("uint{size}"),
            Type::Bool => "bool".into(),
            Type::String => "string".into(),
            Type::FixedBytes(len) => format!("bytes{len}"),
            Type::Array(elem) => format!("{}[]", elem.canonical()),
            Type::FixedArray(elem, len) => format!("{}[{len}]", elem.canonical()),
            Type::Tuple(elems) => {
                let inner =
                    elems.iter().map(|e| e.kind.canonical()).collect::<Vec<_>>().join(",");
                format!("({inner})")
            }
            Type::EventTuple(elems) => {
                let inner =
                    elems.iter().map(|e| e.kind.canonical()).collect::<Vec<_>>().join(",");
                format!("({inner})")
            }
            Type::Alias(_, inner) => inner.canonical(),
        }
    }

    /// Produces a fresh zero value of this type. Aliases produce the inner
    /// type's value; event tuples produce their reordered value tuple.
    pub fn zero(&self) -> Value {
        match self {
            Type::Address => Value::Address(Address::zero()),
            Type::Bytes => Value::Bytes(Vec::new()),
            Type::Int(size) => Value::Int(Int::zero(*size)),
            Type::Uint(size) => Value::Uint(Uint::zero(*size)),
            Type::Bool => Value::Bool(false),
            Type::String => Value::String(String::new()),
            Type::FixedBytes(len) => Value::FixedBytes(vec![0u8; *len]),
            Type::Array(elem) => Value::Array(Vec::new(), (**elem).clone()),
            Type::FixedArray(elem, len) => {
                Value::FixedArray(vec![elem.zero(); *len], (**elem).clone())
            }
            Type::Tuple(elems) => Value::Tuple(
                elems.iter().map(|e| (e.name.clone(), e.kind.zero())).collect(),
            ),
            Type::EventTuple(elems) => Value::Tuple(
                event_value_params(elems)
                    .into_iter()
                    .map(|p| (p.name, p.kind.zero()))
                    .collect(),
            ),
            Type::Alias(_, inner) => inner.zero(),
        }
    }
}

/// Wraps a type in array constructors for a run of `[n?]` suffixes. The
/// leftmost suffix binds tightest: `uint256[2][3]` is three arrays of two.
pub(crate) fn wrap_array_suffixes(ty: Type, suffixes: &[Option<usize>]) -> Type {
    suffixes.iter().fold(ty, |inner, suffix| match suffix {
        Some(len) => Type::fixed_array(inner, *len),
        None => Type::array(inner),
    })
}

/// The value-tuple elements of an event: indexed elements first in their
/// declaration order, then the non-indexed ones in theirs. Unnamed elements
/// get synthetic names — `topic{i}` (1-based, `topics[0]` being the event
/// selector) for indexed elements and `data{i}` (0-based) for the rest.
pub fn event_value_params(elems: &[EventParam]) -> Vec<TupleParam> {
    let mut params = Vec::with_capacity(elems.len());
    let mut topic = 0usize;
    for e in elems.iter().filter(|e| e.indexed) {
        topic += 1;
        let name =
            if e.name.is_empty() { format!("topic{topic}") } else { e.name.clone() };
        params.push(TupleParam::new(name, e.kind.clone()));
    }
    for (i, e) in elems.iter().filter(|e| !e.indexed).enumerate() {
        let name = if e.name.is_empty() { format!("data{i}") } else { e.name.clone() };
        params.push(TupleParam::new(name, e.kind.clone()));
    }
    params
}

impl fmt::Display for Type {
    /// The human rendering: tuple element names, `indexed` markers and alias
    /// names are shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::FixedArray(elem, len) => write!(f, "{elem}[{len}]"),
            Type::Tuple(elems) => {
                f.write_str("(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", e.kind)?;
                    if !e.name.is_empty() {
                        write!(f, " {}", e.name)?;
                    }
                }
                f.write_str(")")
            }
            Type::EventTuple(elems) => {
                f.write_str("(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", e.kind)?;
                    if e.indexed {
                        f.write_str(" indexed")?;
                    }
                    if !e.name.is_empty() {
                        write!(f, " {}", e.name)?;
                    }
                }
                f.write_str(")")
            }
            Type::Alias(name, _) => f.write_str(name),
            other => f.write_str(&other.canonical()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_leaves() {
        assert_eq!(Type::Address.canonical(), "address");
        assert_eq!(Type::Uint(256).canonical(), "uint256");
        assert_eq!(Type::Int(8).canonical(), "int8");
        assert_eq!(Type::FixedBytes(32).canonical(), "bytes32");
        assert_eq!(Type::Bytes.canonical(), "bytes");
        assert_eq!(Type::unnamed_tuple([]).canonical(), "()");
    }

    #[test]
    fn canonical_ignores_names_and_aliases() {
        let named = Type::tuple([("a", Type::Uint(256)), ("b", Type::FixedBytes(32))]);
        let unnamed = Type::unnamed_tuple([Type::Uint(256), Type::FixedBytes(32)]);
        assert_eq!(named.canonical(), unnamed.canonical());
        assert_eq!(named.canonical(), "(uint256,bytes32)");

        let aliased = Type::alias("Point", named.clone());
        assert_eq!(aliased.canonical(), named.canonical());
        assert_eq!(Type::array(aliased).canonical(), "(uint256,bytes32)[]");
    }

    #[test]
    fn display_keeps_names_and_aliases() {
        let named = Type::tuple([("a", Type::Uint(256)), ("b", Type::FixedBytes(32))]);
        assert_eq!(named.to_string(), "(uint256 a, bytes32 b)");
        assert_eq!(Type::alias("Point", named).to_string(), "Point");

        let event = Type::EventTuple(vec![
            EventParam::new("from", Type::Address, true),
            EventParam::new("value", Type::Uint(256), false),
        ]);
        assert_eq!(event.to_string(), "(address indexed from, uint256 value)");
    }

    #[test]
    fn dynamic_classification() {
        assert!(Type::Bytes.is_dynamic());
        assert!(Type::String.is_dynamic());
        assert!(Type::array(Type::Uint(8)).is_dynamic());
        assert!(!Type::fixed_array(Type::Uint(8), 3).is_dynamic());
        assert!(Type::fixed_array(Type::Bytes, 3).is_dynamic());
        assert!(!Type::unnamed_tuple([Type::Bool, Type::Address]).is_dynamic());
        assert!(Type::unnamed_tuple([Type::Bool, Type::Bytes]).is_dynamic());
        assert!(Type::alias("B", Type::Bytes).is_dynamic());
        assert!(!Type::alias("A", Type::Address).is_dynamic());
    }

    #[test]
    fn head_sizes() {
        assert_eq!(Type::Uint(8).head_size(), 32);
        assert_eq!(Type::Bytes.head_size(), 32);
        assert_eq!(Type::fixed_array(Type::Uint(256), 3).head_size(), 96);
        assert_eq!(
            Type::unnamed_tuple([Type::Bool, Type::fixed_array(Type::Address, 2)]).head_size(),
            96
        );
        // dynamic types occupy one offset slot
        assert_eq!(Type::unnamed_tuple([Type::Bool, Type::Bytes]).head_size(), 32);
    }

    #[test]
    fn nested_fixed_array_reads_inside_out() {
        // uint256[2][3]: array of 3 arrays of 2
        let ty = Type::fixed_array(Type::fixed_array(Type::Uint(256), 2), 3);
        assert_eq!(ty.canonical(), "uint256[2][3]");
        assert_eq!(ty.head_size(), 6 * 32);
    }

    #[test]
    fn event_value_param_reordering() {
        let elems = vec![
            EventParam::new("", Type::Uint(256), false),
            EventParam::new("from", Type::Address, true),
            EventParam::new("", Type::Address, true),
        ];
        let params = event_value_params(&elems);
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["from", "topic2", "data0"]);
        assert_eq!(params[0].kind, Type::Address);
        assert_eq!(params[2].kind, Type::Uint(256));
    }

    #[test]
    fn zero_values_match_types() {
        let ty = Type::tuple([
            ("ok", Type::Bool),
            ("payload", Type::Bytes),
            ("balances", Type::fixed_array(Type::Uint(256), 2)),
        ]);
        let zero = ty.zero();
        assert_eq!(zero.kind(), ty);
        assert!(!zero.is_dynamic() || ty.is_dynamic());
    }
}
