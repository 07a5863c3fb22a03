//! # interlace Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and
//! traits from the interlace library. Import this module to get quick access to the
//! essential pieces of the interception pipeline.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all interlace operations
pub use crate::Error;

/// The result type used throughout interlace
pub use crate::Result;

// ================================================================================================
// Structural Model
// ================================================================================================

/// Member and type identity tokens
pub use crate::model::token::Token;

/// The structural type model
pub use crate::model::typeinfo::{TypeInfo, TypeInfoRc, TypeKind};

/// Member descriptors, attribute masks, and call values
pub use crate::model::member::{
    CallValue, MemberAttributes, MemberDescriptor, MemberKind, MemberList, MemberRc, TargetFn,
};

/// Intercepted surfaces and the member visitor collaborator
pub use crate::model::surface::{
    DeclaredSurface, EventMember, MemberVisitor, PropertyMember, TypeSurface,
};

/// The proxy type definition entity
pub use crate::model::definition::ProxyTypeDefinition;

/// Custom attribute descriptors
pub use crate::model::attributes::CustomAttribute;

/// Generic type expressions and substitution
pub use crate::model::generics::{instantiate, TypeExpr};

/// The instance activation collaborator
pub use crate::model::activation::TypeActivator;

// ================================================================================================
// Interception Pipeline
// ================================================================================================

/// Interceptor and behavior contracts plus the registration table
pub use crate::interception::behavior::{
    BehaviorRef, BehaviorRegistry, InterceptionBehavior, Interceptor, InterceptorRef,
};

/// Chain resolution and call dispatch
pub use crate::interception::builder::{InterceptorChainMap, InvocationHandler};

/// The per-call dispatcher and proceed protocol
pub use crate::interception::invocation::{Invocation, UpcallFn};

// ================================================================================================
// Caching
// ================================================================================================

/// The single-flight memoizing store
pub use crate::cache::SingleFlight;
