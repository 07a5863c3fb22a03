//! Interceptors, interception behaviors, and the behavior registration table.
//!
//! An [`Interceptor`] is a unit of behavior invoked around a proxied member call. An
//! [`InterceptionBehavior`] is the declarative rule deciding which interceptors apply
//! to a member and in what order: it validates its applicability and then mutates the
//! member's live interceptor list.
//!
//! Behaviors are registered explicitly on a [`BehaviorRegistry`] — at type scope or
//! per member token — and resolved in registration order, which keeps chain
//! resolution stable and deterministic.

use std::collections::HashMap;
use std::sync::Arc;

use crate::interception::invocation::Invocation;
use crate::model::member::{CallValue, MemberDescriptor};
use crate::model::token::Token;
use crate::Result;

/// A unit of behavior invoked around a proxied member call.
///
/// Implementations receive the live [`Invocation`] and decide whether to delegate
/// onward via [`Invocation::proceed`], transform arguments or results, or
/// short-circuit by returning without proceeding.
pub trait Interceptor: Send + Sync {
    /// Stable interceptor name, used in diagnostics
    fn name(&self) -> &str {
        "interceptor"
    }

    /// Handles one step of the call.
    ///
    /// # Errors
    /// Any error returned here propagates unchanged to the original caller.
    fn intercept(&self, invocation: &mut Invocation<'_>) -> Result<CallValue>;
}

/// Reference-counted handle to an [`Interceptor`]
pub type InterceptorRef = Arc<dyn Interceptor>;

/// A declarative rule deciding which interceptors apply to a member.
pub trait InterceptionBehavior: Send + Sync {
    /// Stable behavior name, carried in validation errors
    fn name(&self) -> &str {
        "behavior"
    }

    /// Checks whether this behavior may be applied to `member`.
    ///
    /// # Errors
    /// A failure here aborts the entire chain-building pass for the type; the error
    /// is surfaced as [`crate::Error::BehaviorValidation`] carrying this behavior's
    /// name and the offending member token.
    fn validate(&self, member: &MemberDescriptor) -> Result<()>;

    /// Mutates the member's interceptor list: insert, reorder, or remove entries.
    ///
    /// The list is the live list accumulated so far (seed plus earlier behaviors'
    /// edits), not a copy.
    fn apply(&self, member: &MemberDescriptor, interceptors: &mut Vec<InterceptorRef>);
}

/// Reference-counted handle to an [`InterceptionBehavior`]
pub type BehaviorRef = Arc<dyn InterceptionBehavior>;

/// Explicit, ordered registration table mapping scopes to behaviors.
///
/// Type-level behaviors apply to the whole intercepted surface and run first, in
/// registration order; member-level behaviors follow, also in registration order.
#[derive(Default)]
pub struct BehaviorRegistry {
    type_behaviors: Vec<BehaviorRef>,
    member_behaviors: HashMap<Token, Vec<BehaviorRef>>,
}

impl BehaviorRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        BehaviorRegistry::default()
    }

    /// Registers a behavior at type scope
    pub fn register_type_behavior(&mut self, behavior: BehaviorRef) {
        self.type_behaviors.push(behavior);
    }

    /// Registers a behavior for one member token
    pub fn register_member_behavior(
        &mut self,
        member: Token,
        behavior: BehaviorRef,
    ) {
        self.member_behaviors.entry(member).or_default().push(behavior);
    }

    /// Behaviors registered at type scope, in registration order
    #[must_use]
    pub fn type_behaviors(&self) -> &[BehaviorRef] {
        &self.type_behaviors
    }

    /// Behaviors registered for `member`, in registration order
    #[must_use]
    pub fn member_behaviors(&self, member: &Token) -> &[BehaviorRef] {
        self.member_behaviors
            .get(member)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
