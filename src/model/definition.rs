//! The entity describing a to-be-proxied type.
//!
//! A [`ProxyTypeDefinition`] records what the generated proxy must look like: the
//! declaring type being proxied, the parent type used for instance activation (which
//! differs from the declaring type for interface-only proxies), extra interfaces the
//! proxy implements, and custom attributes copied onto the generated type.
//!
//! Definitions are mutated only during a build phase, before any dispatch occurs, and
//! are structurally comparable and hashable so they can key the single-flight cache
//! that deduplicates chain construction per proxy configuration.

use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use crate::model::attributes::CustomAttribute;
use crate::model::token::Token;
use crate::model::typeinfo::TypeInfoRc;
use crate::Result;

/// Describes the declaring type, activation parent, additional interfaces, and custom
/// attributes of a proxy type to be generated.
#[derive(Debug, Clone)]
pub struct ProxyTypeDefinition {
    declaring_type: TypeInfoRc,
    parent_type: TypeInfoRc,
    additional_interfaces: Vec<TypeInfoRc>,
    custom_attributes: Vec<CustomAttribute>,
    declared_closure: OnceLock<HashSet<Token>>,
}

impl ProxyTypeDefinition {
    /// Creates a definition for `declaring_type`, activated through `parent_type`.
    ///
    /// For class proxies the two typically coincide; for interface-only proxies the
    /// parent is the base class the generated type derives from.
    #[must_use]
    pub fn new(declaring_type: TypeInfoRc, parent_type: TypeInfoRc) -> Self {
        ProxyTypeDefinition {
            declaring_type,
            parent_type,
            additional_interfaces: Vec::new(),
            custom_attributes: Vec::new(),
            declared_closure: OnceLock::new(),
        }
    }

    /// The interface or class being proxied
    #[must_use]
    pub fn declaring_type(&self) -> &TypeInfoRc {
        &self.declaring_type
    }

    /// The base type used for instance activation
    #[must_use]
    pub fn parent_type(&self) -> &TypeInfoRc {
        &self.parent_type
    }

    /// Interfaces the proxy implements beyond those reachable from the declaring type
    #[must_use]
    pub fn additional_interfaces(&self) -> &[TypeInfoRc] {
        &self.additional_interfaces
    }

    /// Custom attributes copied onto the generated type, in registration order
    #[must_use]
    pub fn custom_attributes(&self) -> &[CustomAttribute] {
        &self.custom_attributes
    }

    /// Adds `interface_type` and every interface it transitively extends to the
    /// additional-interface set, skipping anything already reachable from the
    /// declaring type or already added. Calling this again with a reachable
    /// interface is a no-op.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidArgument`] if `interface_type` is not an
    /// interface, or is an unbound generic interface definition.
    pub fn add_interface(&mut self, interface_type: &TypeInfoRc) -> Result<()> {
        if !interface_type.is_interface() {
            return Err(invalid_argument!(
                "`{}` is not an interface type",
                interface_type.full_name()
            ));
        }

        if interface_type.is_unbound_generic() {
            return Err(invalid_argument!(
                "`{}` is an unbound generic interface definition",
                interface_type.full_name()
            ));
        }

        let mut pending: Vec<TypeInfoRc> = vec![Arc::clone(interface_type)];
        while let Some(iface) = pending.pop() {
            if self.declared_closure().contains(&iface.token)
                || self
                    .additional_interfaces
                    .iter()
                    .any(|existing| existing.token == iface.token)
            {
                continue;
            }

            pending.extend(iface.interfaces.iter().cloned());
            self.additional_interfaces.push(iface);
        }

        Ok(())
    }

    /// Appends a custom attribute descriptor. Attributes are never deduplicated;
    /// the sequence is preserved exactly as registered.
    pub fn add_custom_attribute(&mut self, attribute: CustomAttribute) {
        self.custom_attributes.push(attribute);
    }

    /// The transitive interface closure of the declaring type, computed once on first
    /// access. Registering many additional interfaces incrementally re-reads this set
    /// rather than re-walking the hierarchy.
    fn declared_closure(&self) -> &HashSet<Token> {
        self.declared_closure
            .get_or_init(|| self.declaring_type.interface_closure())
    }

    fn interface_token_set(&self) -> HashSet<Token> {
        self.additional_interfaces
            .iter()
            .map(|iface| iface.token)
            .collect()
    }
}

impl PartialEq for ProxyTypeDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type.token == other.declaring_type.token
            && self.parent_type.token == other.parent_type.token
            && self.interface_token_set() == other.interface_token_set()
            && self.custom_attributes == other.custom_attributes
    }
}

impl Eq for ProxyTypeDefinition {}

impl Hash for ProxyTypeDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type.token.hash(state);
        self.parent_type.token.hash(state);

        // Additional interfaces are a set: hash in token order so insertion order
        // never changes the hash
        let mut tokens: Vec<Token> = self
            .additional_interfaces
            .iter()
            .map(|iface| iface.token)
            .collect();
        tokens.sort_unstable();
        tokens.hash(state);

        self.custom_attributes.hash(state);
    }
}
