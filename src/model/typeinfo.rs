//! Structural model of the types a proxy is generated for.
//!
//! This crate never synthesizes runtime types; it only needs enough structure to
//! reason about a type's intercepted surface: whether it is an interface, which
//! interfaces it transitively extends, and whether its generic parameters are bound.
//! [`TypeInfo`] carries exactly that, shared as [`TypeInfoRc`] so the same
//! description can appear in many proxy definitions without copying.

use std::collections::HashSet;
use std::sync::Arc;

use crate::model::token::Token;

/// Reference-counted handle to a [`TypeInfo`]
pub type TypeInfoRc = Arc<TypeInfo>;

/// The fundamental classification of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A concrete or abstract class
    Class,
    /// An interface
    Interface,
}

/// Description of a type participating in proxy generation.
///
/// Instances are immutable once constructed; builder-style `with_*` methods configure
/// interfaces and generic arity before the description is shared via [`TypeInfoRc`].
#[derive(Debug)]
pub struct TypeInfo {
    /// Identity token of this type
    pub token: Token,
    /// Namespace of this type
    pub namespace: String,
    /// Simple name of this type
    pub name: String,
    /// Classification of this type
    pub kind: TypeKind,
    /// Interfaces directly implemented (for classes) or extended (for interfaces)
    pub interfaces: Vec<TypeInfoRc>,
    /// Number of generic parameters this type declares
    pub generic_params: u32,
    /// Concrete generic arguments, empty for non-generic types and unbound definitions
    pub generic_args: Vec<TypeInfoRc>,
}

impl TypeInfo {
    /// Creates a class description with no interfaces and no generic parameters
    #[must_use]
    pub fn class(token: Token, namespace: &str, name: &str) -> Self {
        TypeInfo {
            token,
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind: TypeKind::Class,
            interfaces: Vec::new(),
            generic_params: 0,
            generic_args: Vec::new(),
        }
    }

    /// Creates an interface description with no extended interfaces and no generic parameters
    #[must_use]
    pub fn interface(token: Token, namespace: &str, name: &str) -> Self {
        TypeInfo {
            kind: TypeKind::Interface,
            ..TypeInfo::class(token, namespace, name)
        }
    }

    /// Sets the directly implemented/extended interfaces
    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<TypeInfoRc>) -> Self {
        self.interfaces = interfaces;
        self
    }

    /// Declares the number of generic parameters
    #[must_use]
    pub fn with_generic_params(mut self, count: u32) -> Self {
        self.generic_params = count;
        self
    }

    /// Binds concrete generic arguments
    #[must_use]
    pub fn with_generic_args(mut self, args: Vec<TypeInfoRc>) -> Self {
        self.generic_args = args;
        self
    }

    /// Finishes construction and wraps the description for sharing
    #[must_use]
    pub fn build(self) -> TypeInfoRc {
        Arc::new(self)
    }

    /// Returns true if this type is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Returns true if this type declares generic parameters but binds no arguments.
    ///
    /// An unbound generic interface definition cannot be added to a proxy definition;
    /// it must be closed via [`crate::model::generics::instantiate`] first.
    #[must_use]
    pub fn is_unbound_generic(&self) -> bool {
        self.generic_params > 0 && self.generic_args.is_empty()
    }

    /// Returns the namespace-qualified name of this type
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Collects the tokens of every interface transitively reachable from this type.
    ///
    /// For an interface this includes the type's own token; for a class it covers the
    /// implemented interfaces and everything they extend. The walk deduplicates by
    /// token, so diamond-shaped interface hierarchies are visited once.
    #[must_use]
    pub fn interface_closure(&self) -> HashSet<Token> {
        let mut closure = HashSet::new();
        if self.is_interface() {
            closure.insert(self.token);
        }

        let mut pending: Vec<TypeInfoRc> = self.interfaces.clone();
        while let Some(iface) = pending.pop() {
            if closure.insert(iface.token) {
                pending.extend(iface.interfaces.iter().cloned());
            }
        }

        closure
    }
}
