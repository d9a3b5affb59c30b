//! Parsing of "human readable abi" documents: multi-line collections of
//! struct, function, event, error and constructor declarations.

use crate::abi::constructor::Constructor;
use crate::abi::contract::{Contract, InternalKind, InternalType};
use crate::abi::error::{bail, Result};
use crate::abi::event::Event;
use crate::abi::function::Function;
use crate::abi::registry::{default_registry, TypeEnv, TypeRegistry};
use crate::abi::sol_error::SolError;
use crate::abi::struct_def::{FieldType, SolStruct};
use crate::abi::ty::{TupleParam, Type};
use std::collections::{HashMap, VecDeque};

pub mod lexer;
pub use lexer::HumanReadableParser;

/// A parser that turns a "human readable abi" document into a [`Contract`].
///
/// Struct declarations found in the document become contract-local types the
/// remaining declarations can reference by name; identifiers not found there
/// fall back to the root registry.
pub struct AbiParser {
    /// Parsed solidity struct declarations by name.
    pub structs: HashMap<String, SolStruct>,
    /// Resolved contract-local types.
    pub types: HashMap<String, Type>,
    /// The root registry identifiers fall back to.
    pub registry: TypeRegistry,
}

impl AbiParser {
    /// A parser over the default root registry.
    pub fn new() -> Self {
        Self::with_registry(default_registry().clone())
    }

    /// A parser over a custom root registry.
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self { structs: HashMap::new(), types: HashMap::new(), registry }
    }

    /// Parses a "human readable abi" string:
    ///
    /// ```
    /// # use evmabi::abi::AbiParser;
    /// let contract = AbiParser::new().parse_str(r#"[
    ///         function setValue(string)
    ///         function getValue() external view returns (string)
    ///         event ValueChanged(address indexed author, string oldValue, string newValue)
    ///     ]"#).unwrap();
    /// ```
    pub fn parse_str(&mut self, s: &str) -> Result<Contract> {
        self.parse(
            &s.trim().trim_start_matches('[').trim_end_matches(']').lines().collect::<Vec<_>>(),
        )
    }

    /// Parses a "human readable abi" string vector:
    ///
    /// ```
    /// # use evmabi::abi::AbiParser;
    /// let contract = AbiParser::new().parse(&[
    ///     "function x() external view returns (uint256)",
    /// ]).unwrap();
    /// ```
    pub fn parse(&mut self, input: &[&str]) -> Result<Contract> {
        // structs first, other declarations may reference them
        let (structs, declarations): (Vec<_>, Vec<_>) = input
            .iter()
            .map(|s| escape_quotes(s))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .partition(|s| has_keyword(s, "struct"));

        for sol in structs {
            let s = SolStruct::parse(sol)?;
            if self.structs.contains_key(s.name()) {
                bail!("Duplicate struct declaration for struct `{}`", s.name())
            }
            self.structs.insert(s.name().to_string(), s);
        }
        self.substitute_structs()?;

        let mut contract = Contract::default();
        for declaration in declarations {
            if has_keyword(declaration, "event") {
                contract.insert_event(self.parse_event(declaration)?);
            } else if has_keyword(declaration, "error") {
                contract.insert_error(self.parse_error(declaration)?);
            } else if has_keyword(declaration, "constructor") {
                contract.constructor = Some(self.parse_constructor(declaration)?);
            } else if has_keyword(declaration, "receive") {
                contract.receive = true;
            } else if has_keyword(declaration, "fallback") {
                contract.fallback = true;
            } else {
                // functions may use the shorthand form without the keyword
                let function = match self.parse_function(declaration) {
                    Ok(function) => function,
                    Err(_) => bail!("Illegal abi `{}`, expected function", declaration),
                };
                contract.insert_method(function);
            }
        }

        for (name, ty) in &self.types {
            contract.types.insert(
                name.clone(),
                InternalType { kind: InternalKind::Struct, ty: ty.clone() },
            );
        }

        Ok(contract)
    }

    /// Substitutes struct references within structs until every struct is
    /// resolved to a named tuple type.
    fn substitute_structs(&mut self) -> Result<()> {
        let mut unresolved = self.structs.keys().cloned().collect::<VecDeque<_>>();
        let mut sequential_retries = 0;
        while let Some(name) = unresolved.pop_front() {
            let mut resolved = true;
            let sol = &self.structs[&name];
            let mut params = Vec::with_capacity(sol.fields().len());
            for field in sol.fields() {
                match field.kind() {
                    FieldType::Elementary(ty) => {
                        params.push(TupleParam::new(field.name(), ty.clone()))
                    }
                    FieldType::Struct(ty) => {
                        // contract-local structs first, then the registry
                        let inner = self
                            .types
                            .get(ty.name())
                            .or_else(|| self.registry.get(ty.name()))
                            .cloned();
                        if let Some(inner) = inner {
                            params.push(TupleParam::new(field.name(), ty.wrap(inner)));
                        } else {
                            resolved = false;
                            break
                        }
                    }
                    FieldType::Mapping(_) => {
                        bail!(
                            "mappings are not allowed as params in public functions of struct `{}`",
                            sol.name()
                        )
                    }
                }
            }
            if resolved {
                sequential_retries = 0;
                self.types.insert(name.clone(), Type::alias(name, Type::Tuple(params)));
            } else {
                sequential_retries += 1;
                if sequential_retries > unresolved.len() {
                    bail!("No struct definition found for struct `{}`", name)
                }
                unresolved.push_back(name);
            }
        }
        Ok(())
    }

    fn env(&self) -> TypeEnv<'_> {
        TypeEnv::new(&self.registry).with_locals(&self.types)
    }

    /// Registers a contract-local type for subsequent declarations.
    pub fn register_type(&mut self, name: impl Into<String>, ty: Type) {
        self.types.insert(name.into(), ty);
    }

    /// Parses a solidity function declaration.
    pub fn parse_function(&self, s: &str) -> Result<Function> {
        Ok(HumanReadableParser::parse_function_with(s, self.env())?)
    }

    /// Parses a solidity event declaration.
    pub fn parse_event(&self, s: &str) -> Result<Event> {
        Ok(HumanReadableParser::parse_event_with(s, self.env())?)
    }

    /// Parses a solidity error declaration.
    pub fn parse_error(&self, s: &str) -> Result<SolError> {
        Ok(HumanReadableParser::parse_error_with(s, self.env())?)
    }

    /// Parses a solidity constructor declaration.
    pub fn parse_constructor(&self, s: &str) -> Result<Constructor> {
        Ok(HumanReadableParser::parse_constructor_with(s, self.env())?)
    }

    /// Parses a type string.
    pub fn parse_type(&self, s: &str) -> Result<Type> {
        Ok(HumanReadableParser::parse_type_with(s, self.env())?)
    }
}

impl Default for AbiParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a "human readable abi" string vector.
///
/// ```
/// use evmabi::abi::parse_abi;
///
/// let contract = parse_abi(&[
///     "function x() external view returns (uint256)",
/// ]).unwrap();
/// ```
pub fn parse(input: &[&str]) -> Result<Contract> {
    AbiParser::new().parse(input)
}

/// Parses a "human readable abi" string.
///
/// See also [`AbiParser::parse_str`].
pub fn parse_str(input: &str) -> Result<Contract> {
    AbiParser::new().parse_str(input)
}

/// Whether the declaration starts with the given keyword (followed by
/// whitespace or an opening parenthesis, so that identifiers merely sharing
/// the prefix do not match).
fn has_keyword(line: &str, keyword: &str) -> bool {
    line.strip_prefix(keyword)
        .map_or(false, |rest| rest.is_empty() || rest.starts_with(|c: char| c.is_whitespace() || c == '('))
}

fn escape_quotes(input: &str) -> &str {
    input.trim_matches(|c: char| matches!(c, ' ' | '\t')).trim_matches('\"')
}
