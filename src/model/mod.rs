//! Structural model of proxied types and their members.
//!
//! Everything the interception pipeline knows about the outside world lives here:
//! stable member identity ([`token::Token`]), the type model
//! ([`typeinfo::TypeInfo`]), member descriptors with their dispatch capabilities
//! ([`member::MemberDescriptor`]), the intercepted surface produced by the
//! [`surface::MemberVisitor`] collaborator, the proxy definition entity
//! ([`definition::ProxyTypeDefinition`]), generic substitution
//! ([`generics::instantiate`]), and the [`activation::TypeActivator`] collaborator.

/// Instance activation collaborator contract
pub mod activation;
/// Custom attribute descriptors
pub mod attributes;
/// The proxy type definition entity
pub mod definition;
/// Generic type expressions and substitution
pub mod generics;
/// Member descriptors, attributes, and dispatch capabilities
pub mod member;
/// Intercepted surfaces and the member visitor collaborator
pub mod surface;
/// Member and type identity tokens
pub mod token;
/// The structural type model
pub mod typeinfo;
