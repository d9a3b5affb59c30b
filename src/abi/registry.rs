//! The root type environment signature parsing resolves identifiers against.

use crate::abi::ty::Type;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A name → type table. The default registry is pre-populated with every
/// elementary type name plus the `uint`/`int`/`byte` aliases; user-defined
/// types (structs, enums, value types) are added by callers or by
/// [`Contract::register_types`](crate::abi::Contract::register_types).
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    types: HashMap<String, Type>,
}

impl TypeRegistry {
    /// A registry pre-populated with the elementary types.
    pub fn new() -> Self {
        let mut types = HashMap::new();
        types.insert("bool".to_string(), Type::Bool);
        types.insert("address".to_string(), Type::Address);
        types.insert("bytes".to_string(), Type::Bytes);
        types.insert("string".to_string(), Type::String);
        // prior to solidity 0.8.0 `byte` was an alias for `bytes1`
        types.insert("byte".to_string(), Type::FixedBytes(1));
        for n in 1..=32 {
            types.insert(format!("bytes{n}"), Type::FixedBytes(n));
        }
        for bits in (8..=256).step_by(8) {
            types.insert(format!("uint{bits}"), Type::Uint(bits));
            types.insert(format!("int{bits}"), Type::Int(bits));
        }
        types.insert("uint".to_string(), Type::Uint(256));
        types.insert("int".to_string(), Type::Int(256));
        Self { types }
    }

    /// An empty registry.
    pub fn empty() -> Self {
        Self { types: HashMap::new() }
    }

    /// Registers a type under a name, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, ty: Type) {
        self.types.insert(name.into(), ty);
    }

    /// Looks up a type by name.
    pub fn get(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_REGISTRY: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);

/// The process-wide default registry.
///
/// Safe for concurrent reads; callers that need additional entries should
/// clone it into their own environment.
pub fn default_registry() -> &'static TypeRegistry {
    &DEFAULT_REGISTRY
}

/// The environment identifier resolution consults: a transient table of
/// contract-local types first, then a root registry.
#[derive(Clone, Copy)]
pub struct TypeEnv<'a> {
    locals: Option<&'a HashMap<String, Type>>,
    registry: &'a TypeRegistry,
}

impl<'a> TypeEnv<'a> {
    /// An environment over the default registry with no local types.
    pub fn root() -> TypeEnv<'static> {
        TypeEnv { locals: None, registry: default_registry() }
    }

    /// An environment over a custom registry.
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { locals: None, registry }
    }

    /// Adds a table of contract-local types consulted before the registry.
    pub fn with_locals(self, locals: &'a HashMap<String, Type>) -> Self {
        Self { locals: Some(locals), ..self }
    }

    /// Resolves a type identifier.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        if let Some(locals) = self.locals {
            if let Some(ty) = locals.get(name) {
                return Some(ty.clone())
            }
        }
        self.registry.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_knows_elementary_types() {
        let reg = default_registry();
        assert_eq!(reg.get("bool"), Some(&Type::Bool));
        assert_eq!(reg.get("uint"), Some(&Type::Uint(256)));
        assert_eq!(reg.get("int"), Some(&Type::Int(256)));
        assert_eq!(reg.get("byte"), Some(&Type::FixedBytes(1)));
        assert_eq!(reg.get("bytes32"), Some(&Type::FixedBytes(32)));
        assert_eq!(reg.get("uint96"), Some(&Type::Uint(96)));
        assert!(reg.get("uint7").is_none());
        assert!(reg.get("bytes33").is_none());
    }

    #[test]
    fn locals_shadow_registry() {
        let mut locals = HashMap::new();
        locals.insert("bool".to_string(), Type::Uint(8));
        let env = TypeEnv::root().with_locals(&locals);
        assert_eq!(env.lookup("bool"), Some(Type::Uint(8)));
        assert_eq!(env.lookup("address"), Some(Type::Address));
        assert_eq!(env.lookup("Missing"), None);
    }

    #[test]
    fn cloned_registry_is_independent() {
        let mut own = default_registry().clone();
        own.insert("Point", Type::unnamed_tuple([Type::Uint(256), Type::Uint(256)]));
        assert!(own.contains("Point"));
        assert!(!default_registry().contains("Point"));
    }
}
