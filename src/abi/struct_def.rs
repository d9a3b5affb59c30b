//! Solidity struct declarations.
//!
//! Struct bodies are tokenized by the same lexer that handles signatures;
//! this module only carries the parsed declaration model. Fields whose type
//! is another user-defined struct stay unresolved here — [`AbiParser`]
//! substitutes them once the whole document has been read.
//!
//! [`AbiParser`]: crate::abi::AbiParser

use crate::abi::error::Result;
use crate::abi::human_readable::lexer::HumanReadableParser;
use crate::abi::ty::{wrap_array_suffixes, Type};

/// A parsed solidity struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct SolStruct {
    name: String,
    fields: Vec<FieldDeclaration>,
}

impl SolStruct {
    /// Parse a solidity struct definition.
    ///
    /// # Example
    ///
    /// ```
    /// # use evmabi::abi::SolStruct;
    /// let s = SolStruct::parse("struct MyStruct { uint x; uint y; }").unwrap();
    /// assert_eq!(s.name(), "MyStruct");
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        Ok(HumanReadableParser::parse_struct(s)?)
    }

    pub(crate) fn new(name: String, fields: Vec<FieldDeclaration>) -> Self {
        Self { name, fields }
    }

    /// Name of this struct.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All the fields of this struct.
    pub fn fields(&self) -> &[FieldDeclaration] {
        &self.fields
    }
}

/// A field declaration inside a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    name: String,
    kind: FieldType,
}

impl FieldDeclaration {
    pub(crate) fn new(name: String, kind: FieldType) -> Self {
        Self { name, kind }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's type as declared.
    pub fn kind(&self) -> &FieldType {
        &self.kind
    }
}

/// How a struct field's type is spelled.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// A type that resolved without knowledge of sibling structs.
    Elementary(Type),
    /// A reference to another user-defined struct, possibly behind array
    /// suffixes.
    Struct(StructFieldType),
    /// A mapping; never legal in ABI parameter position.
    Mapping(Box<MappingType>),
}

impl FieldType {
    /// Whether this field is a mapping.
    pub fn is_mapping(&self) -> bool {
        matches!(self, FieldType::Mapping(_))
    }
}

/// An unresolved reference to a user-defined struct, together with the array
/// suffixes that followed it in the declaration. Qualified references such as
/// `Geometry.Point` are stored by their last segment.
#[derive(Debug, Clone, PartialEq)]
pub struct StructFieldType {
    name: String,
    suffixes: Vec<Option<usize>>,
}

impl StructFieldType {
    pub(crate) fn new(name: String, suffixes: Vec<Option<usize>>) -> Self {
        Self { name, suffixes }
    }

    /// The referenced struct's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rebuilds the field's full type once the referenced struct has been
    /// resolved to `inner`.
    pub fn wrap(&self, inner: Type) -> Type {
        wrap_array_suffixes(inner, &self.suffixes)
    }
}

/// A `mapping(key => value)` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingType {
    key_type: Type,
    value_type: FieldType,
}

impl MappingType {
    pub(crate) fn new(key_type: Type, value_type: FieldType) -> Self {
        Self { key_type, value_type }
    }

    /// The key type; always a value type, `bytes` or `string`.
    pub fn key_type(&self) -> &Type {
        &self.key_type
    }

    /// The value type, possibly a nested mapping or a struct reference.
    pub fn value_type(&self) -> &FieldType {
        &self.value_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(parsed: &SolStruct) -> Vec<&str> {
        parsed.fields().iter().map(|f| f.name()).collect()
    }

    #[test]
    fn parses_elementary_fields() {
        let parsed = SolStruct::parse(
            "struct Order { uint256 amount; address payable maker; bytes sig; string[4] notes; }",
        )
        .unwrap();
        assert_eq!(parsed.name(), "Order");
        assert_eq!(field_names(&parsed), vec!["amount", "maker", "sig", "notes"]);
        assert_eq!(parsed.fields()[0].kind(), &FieldType::Elementary(Type::Uint(256)));
        assert_eq!(parsed.fields()[1].kind(), &FieldType::Elementary(Type::Address));
        assert_eq!(
            parsed.fields()[3].kind(),
            &FieldType::Elementary(Type::fixed_array(Type::String, 4))
        );
    }

    #[test]
    fn final_semicolon_may_be_elided() {
        let parsed = SolStruct::parse("struct Pair {uint a; uint b}").unwrap();
        assert_eq!(field_names(&parsed), vec!["a", "b"]);
    }

    #[test]
    fn parses_empty_struct() {
        assert!(SolStruct::parse("struct Nothing {}").unwrap().fields().is_empty());
    }

    #[test]
    fn struct_references_stay_unresolved() {
        let parsed = SolStruct::parse(
            "struct Wrap { Voter chair; Voter[] board; Voter[8] seats; Geometry.Point p; }",
        )
        .unwrap();
        for (i, expected_suffixes) in
            [vec![], vec![None], vec![Some(8)], vec![]].into_iter().enumerate()
        {
            match parsed.fields()[i].kind() {
                FieldType::Struct(ty) => {
                    let name = if i == 3 { "Point" } else { "Voter" };
                    assert_eq!(ty.name(), name);
                    assert_eq!(ty.wrap(Type::Bool), wrap_array_suffixes(Type::Bool, &expected_suffixes));
                }
                other => panic!("expected struct reference, got {other:?}"),
            }
        }
    }

    #[test]
    fn wrap_applies_leftmost_suffix_first() {
        let ty = StructFieldType::new("X".to_string(), vec![Some(2), None]);
        assert_eq!(
            ty.wrap(Type::Uint(8)),
            Type::array(Type::fixed_array(Type::Uint(8), 2))
        );
    }

    #[test]
    fn parses_mappings() {
        let parsed = SolStruct::parse(
            "struct Ledger { mapping(address => uint256) balances; mapping(bytes32 => mapping(address => bool)) approvals; }",
        )
        .unwrap();
        assert!(parsed.fields()[0].kind().is_mapping());

        match parsed.fields()[1].kind() {
            FieldType::Mapping(outer) => {
                assert_eq!(outer.key_type(), &Type::FixedBytes(32));
                match outer.value_type() {
                    FieldType::Mapping(inner) => {
                        assert_eq!(inner.key_type(), &Type::Address)
                    }
                    other => panic!("expected nested mapping, got {other:?}"),
                }
            }
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn mapping_keys_must_be_value_types() {
        for bad in [
            "struct S { mapping(uint256[10] => bool) m; }",
            "struct S { mapping(string[] => bool) m; }",
            "struct S { mapping(Item => bool) m; }",
        ] {
            assert!(SolStruct::parse(bad).is_err(), "`{bad}` should be rejected");
        }
        // `bytes` and `string` keys are fine
        assert!(SolStruct::parse("struct S { mapping(string => bytes) m; }").is_ok());
    }

    #[test]
    fn mapping_values_may_reference_structs() {
        let parsed =
            SolStruct::parse("struct S { mapping(uint256 => Voter[]) voters; }").unwrap();
        match parsed.fields()[0].kind() {
            FieldType::Mapping(mapping) => match mapping.value_type() {
                FieldType::Struct(ty) => {
                    assert_eq!(ty.name(), "Voter");
                    assert_eq!(ty.wrap(Type::Bool), Type::array(Type::Bool));
                }
                other => panic!("expected struct reference, got {other:?}"),
            },
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_declarations() {
        for bad in [
            "Point { uint x; }",            // missing keyword
            "struct { uint x; }",           // missing name
            "struct Point { uint x; ",      // unterminated body
            "struct Point { uint x y; }",   // two names
            "struct Point { uint; }",       // no name
            "struct Point { uint x; } junk",
        ] {
            assert!(SolStruct::parse(bad).is_err(), "`{bad}` should be rejected");
        }
    }
}
