//! The runtime dispatcher for a single proxied call.
//!
//! One [`Invocation`] is created per call and discarded when the call returns or
//! fails; no state survives across calls, so concurrent calls to the same proxy need
//! no coordination in this component.
//!
//! # The proceed protocol
//!
//! The invocation owns a cursor into an immutable, ordered interceptor list. While
//! the cursor has not reached the end of the list, [`Invocation::proceed`] advances
//! the cursor and invokes the interceptor at the previous position, handing it the
//! invocation so it may observe or transform the call and recursively proceed. An
//! interceptor that never proceeds short-circuits the remainder of the chain and the
//! underlying call entirely — caching and mocking interceptors rely on this.
//!
//! Once the cursor reaches the end, `proceed` performs the real call: through the
//! member's bound target capability if present, otherwise through the proxy's upcall
//! to its base implementation. Proceeding again after that point repeats the real
//! call, which retry interceptors use deliberately.

use std::any::Any;

use crate::interception::behavior::InterceptorRef;
use crate::model::member::{CallValue, MemberDescriptor};
use crate::{Error, Result};

/// The proxy's upcall to its base (non-overridden) implementation of a member.
pub type UpcallFn =
    dyn Fn(&(dyn Any + Send + Sync), &mut [CallValue]) -> Result<CallValue> + Send + Sync;

/// Ephemeral state of one proxied call travelling down an interceptor chain.
pub struct Invocation<'a> {
    target: &'a (dyn Any + Send + Sync),
    member: &'a MemberDescriptor,
    args: Vec<CallValue>,
    chain: &'a [InterceptorRef],
    cursor: usize,
    upcall: Option<&'a UpcallFn>,
}

impl<'a> Invocation<'a> {
    /// Creates the invocation for one call at cursor position zero
    #[must_use]
    pub fn new(
        target: &'a (dyn Any + Send + Sync),
        member: &'a MemberDescriptor,
        args: Vec<CallValue>,
        chain: &'a [InterceptorRef],
    ) -> Self {
        Invocation {
            target,
            member,
            args,
            chain,
            cursor: 0,
            upcall: None,
        }
    }

    /// Supplies the upcall used when the member carries no target capability
    #[must_use]
    pub fn with_upcall(mut self, upcall: &'a UpcallFn) -> Self {
        self.upcall = Some(upcall);
        self
    }

    /// The live target object of this call
    #[must_use]
    pub fn target(&self) -> &'a (dyn Any + Send + Sync) {
        self.target
    }

    /// The member being invoked
    #[must_use]
    pub fn member(&self) -> &MemberDescriptor {
        self.member
    }

    /// The argument vector, as transformed by interceptors so far
    #[must_use]
    pub fn args(&self) -> &[CallValue] {
        &self.args
    }

    /// Mutable access to the argument vector for transforming interceptors
    pub fn args_mut(&mut self) -> &mut Vec<CallValue> {
        &mut self.args
    }

    /// Current cursor position within the interceptor chain
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns true once the cursor has passed every interceptor, i.e. the next
    /// proceed dispatches the real call
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.cursor >= self.chain.len()
    }

    /// Advances the call by one step: the next interceptor while any remain, the
    /// real target dispatch once the chain is exhausted.
    ///
    /// The cursor is incremented *before* the current interceptor runs, so an
    /// interceptor that returns without proceeding leaves the rest of the chain and
    /// the real call unexecuted.
    ///
    /// # Errors
    /// Whatever the interceptor or the real call raises, propagated unchanged.
    /// [`Error::MemberResolution`] if dispatch reaches a member with neither a bound
    /// target capability nor an upcall.
    pub fn proceed(&mut self) -> Result<CallValue> {
        if self.cursor < self.chain.len() {
            let interceptor = self.chain[self.cursor].clone();
            self.cursor += 1;
            interceptor.intercept(self)
        } else {
            self.dispatch()
        }
    }

    /// Performs the real call against the target
    fn dispatch(&mut self) -> Result<CallValue> {
        if let Some(target_call) = self.member.target_call() {
            let target_call = target_call.clone();
            target_call(self.target, &mut self.args)
        } else if let Some(upcall) = self.upcall {
            upcall(self.target, &mut self.args)
        } else {
            Err(Error::MemberResolution(format!(
                "no dispatch target bound for member '{}' ({})",
                self.member.name, self.member.token
            )))
        }
    }
}
