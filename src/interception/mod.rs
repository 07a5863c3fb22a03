//! Interceptor composition and the call dispatch pipeline.
//!
//! The three pieces, in the order a call meets them:
//!
//! - [`behavior`] — the [`behavior::Interceptor`] and
//!   [`behavior::InterceptionBehavior`] contracts plus the explicit
//!   [`behavior::BehaviorRegistry`] mapping scopes to behaviors.
//! - [`builder`] — [`builder::InvocationHandler`], which resolves behaviors into
//!   per-member interceptor chains at build time and dispatches calls afterwards.
//! - [`invocation`] — [`invocation::Invocation`], the per-call cursor state machine
//!   driving the proceed protocol.

/// Interceptor and behavior contracts, behavior registration
pub mod behavior;
/// Chain resolution and the call entry point
pub mod builder;
/// The per-call dispatcher and proceed protocol
pub mod invocation;

pub use behavior::{BehaviorRegistry, InterceptionBehavior, Interceptor, InterceptorRef};
pub use builder::{InterceptorChainMap, InvocationHandler};
pub use invocation::{Invocation, UpcallFn};
