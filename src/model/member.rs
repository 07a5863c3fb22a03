//! Member descriptors and the per-member dispatch capability.
//!
//! A [`MemberDescriptor`] is the unit the chain builder and the dispatcher operate on.
//! Instead of a late-bound reflection handle, the real call is a [`TargetFn`]
//! capability resolved once when the member is described and invoked through an
//! ordinary indirect call thereafter.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use strum::Display;

use crate::model::token::Token;
use crate::Result;

/// A dynamically typed argument or return value flowing through a call
pub type CallValue = Box<dyn Any + Send>;

/// The dispatch capability bound to a member: given the live target and the (possibly
/// interceptor-transformed) argument vector, performs the real call.
pub type TargetFn =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &mut [CallValue]) -> Result<CallValue> + Send + Sync>;

/// Reference-counted handle to a [`MemberDescriptor`]
pub type MemberRc = Arc<MemberDescriptor>;

/// A list of members, append-only and shareable across threads
pub type MemberList = Arc<boxcar::Vec<MemberRc>>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Attribute mask describing traits of a declared member
    pub struct MemberAttributes: u32 {
        /// Compiler-generated accessor method (property getter/setter, event add/remove/raise)
        const SPECIAL_NAME = 0x0001;
        /// Member is virtual and overridable
        const VIRTUAL = 0x0002;
        /// Member has no implementation of its own
        const ABSTRACT = 0x0004;
        /// Member is excluded from interception by the traversal rules
        const NON_INTERCEPTABLE = 0x0008;
    }
}

/// The kind of declared member a descriptor refers to.
///
/// `Type` covers the type-scope itself: type-level behaviors are validated and applied
/// against a type-scope descriptor before any individual member is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MemberKind {
    /// The declaring type itself, used as the subject of type-level behaviors
    Type,
    /// An ordinary method
    Method,
    /// A property with optional getter/setter accessors
    Property,
    /// An event with add/remove and optional raise accessors
    Event,
}

/// Description of one declared member of a proxied type.
pub struct MemberDescriptor {
    /// Identity token of this member
    pub token: Token,
    /// Declared name of this member
    pub name: String,
    /// The kind of member this descriptor refers to
    pub kind: MemberKind,
    /// Attribute mask of this member
    pub attributes: MemberAttributes,
    /// Token of the type declaring this member
    pub declaring_type: Token,
    target_call: Option<TargetFn>,
}

impl MemberDescriptor {
    /// Creates a method descriptor with empty attributes and no bound target
    #[must_use]
    pub fn method(token: Token, name: &str, declaring_type: Token) -> Self {
        MemberDescriptor {
            token,
            name: name.to_string(),
            kind: MemberKind::Method,
            attributes: MemberAttributes::empty(),
            declaring_type,
            target_call: None,
        }
    }

    /// Creates a property descriptor
    #[must_use]
    pub fn property(token: Token, name: &str, declaring_type: Token) -> Self {
        MemberDescriptor {
            kind: MemberKind::Property,
            ..MemberDescriptor::method(token, name, declaring_type)
        }
    }

    /// Creates an event descriptor
    #[must_use]
    pub fn event(token: Token, name: &str, declaring_type: Token) -> Self {
        MemberDescriptor {
            kind: MemberKind::Event,
            ..MemberDescriptor::method(token, name, declaring_type)
        }
    }

    /// Creates the type-scope descriptor used as the subject of type-level behaviors
    #[must_use]
    pub fn type_scope(token: Token, name: &str) -> Self {
        MemberDescriptor {
            kind: MemberKind::Type,
            ..MemberDescriptor::method(token, name, token)
        }
    }

    /// Sets the attribute mask
    #[must_use]
    pub fn with_attributes(mut self, attributes: MemberAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Binds the dispatch capability performing the real call for this member
    #[must_use]
    pub fn with_target(mut self, target_call: TargetFn) -> Self {
        self.target_call = Some(target_call);
        self
    }

    /// Finishes construction and wraps the descriptor for sharing
    #[must_use]
    pub fn build(self) -> MemberRc {
        Arc::new(self)
    }

    /// Returns the bound dispatch capability, if any
    #[must_use]
    pub fn target_call(&self) -> Option<&TargetFn> {
        self.target_call.as_ref()
    }

    /// Returns true if this member is a compiler-generated accessor
    #[must_use]
    pub fn is_accessor(&self) -> bool {
        self.attributes.contains(MemberAttributes::SPECIAL_NAME)
    }

    /// Returns true if the traversal rules exclude this member from interception
    #[must_use]
    pub fn is_interceptable(&self) -> bool {
        !self.attributes.contains(MemberAttributes::NON_INTERCEPTABLE)
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("attributes", &self.attributes)
            .field("declaring_type", &self.declaring_type)
            .field("has_target", &self.target_call.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_kind_display() {
        assert_eq!(MemberKind::Method.to_string(), "Method");
        assert_eq!(MemberKind::Event.to_string(), "Event");
    }

    #[test]
    fn test_accessor_detection() {
        let getter = MemberDescriptor::method(Token::method(1), "get_Name", Token::type_def(1))
            .with_attributes(MemberAttributes::SPECIAL_NAME | MemberAttributes::VIRTUAL);
        assert!(getter.is_accessor());
        assert!(getter.is_interceptable());

        let plain = MemberDescriptor::method(Token::method(2), "Run", Token::type_def(1));
        assert!(!plain.is_accessor());
    }

    #[test]
    fn test_non_interceptable() {
        let member = MemberDescriptor::method(Token::method(1), "Finalize", Token::type_def(1))
            .with_attributes(MemberAttributes::NON_INTERCEPTABLE);
        assert!(!member.is_interceptable());
    }

    #[test]
    fn test_target_binding() {
        let member = MemberDescriptor::method(Token::method(1), "Answer", Token::type_def(1))
            .with_target(Arc::new(|_, _| Ok(Box::new(42i32))));
        assert!(member.target_call().is_some());

        let unbound = MemberDescriptor::method(Token::method(2), "Unbound", Token::type_def(1));
        assert!(unbound.target_call().is_none());
    }

    #[test]
    fn test_type_scope_descriptor() {
        let scope = MemberDescriptor::type_scope(Token::type_def(5), "Test.IService");
        assert_eq!(scope.kind, MemberKind::Type);
        assert_eq!(scope.declaring_type, scope.token);
    }

    #[test]
    fn test_debug_omits_capability_body() {
        let member = MemberDescriptor::method(Token::method(1), "Run", Token::type_def(1))
            .with_target(Arc::new(|_, _| Ok(Box::new(()))));
        let rendered = format!("{:?}", member);
        assert!(rendered.contains("has_target: true"));
        assert!(rendered.contains("Run"));
    }
}
