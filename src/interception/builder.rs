//! Per-member interceptor chain resolution and the call entry point.
//!
//! [`InvocationHandler`] walks a type's intercepted surface top-down — type scope,
//! then events, properties, and ordinary methods — resolving the applicable behaviors
//! for each member into an ordered interceptor array. The resulting member → chain
//! map is built once, then read lock-free for the lifetime of the handler: building
//! is the only phase requiring exclusion, and callers scope that exclusion per proxy
//! configuration through [`crate::cache::SingleFlight`].
//!
//! Members that resolve to an empty interceptor list get no map entry at all and fall
//! back to the shared default chain, saving both memory and a lookup indirection.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crossbeam_skiplist::SkipMap;

use crate::interception::behavior::{BehaviorRef, BehaviorRegistry, InterceptorRef};
use crate::interception::invocation::{Invocation, UpcallFn};
use crate::model::definition::ProxyTypeDefinition;
use crate::model::member::{CallValue, MemberDescriptor};
use crate::model::surface::MemberVisitor;
use crate::model::token::Token;
use crate::{Error, Result};

/// A map that holds the mapping of member [`Token`] to its resolved interceptor chain
pub type InterceptorChainMap = SkipMap<Token, Arc<[InterceptorRef]>>;

/// Resolves and owns the per-member interceptor chains of one proxy configuration and
/// dispatches calls through them.
pub struct InvocationHandler {
    chains: InterceptorChainMap,
    default_chain: Arc<[InterceptorRef]>,
}

impl InvocationHandler {
    /// Builds the member → chain map for `definition`.
    ///
    /// Resolution order per member: type-level behaviors first (resolved once against
    /// `seed`, producing the per-member starting list), then the member's own
    /// behaviors in registration order. Each behavior is validated before it may edit
    /// the live list. A member whose resolved list ends up empty keeps no map entry
    /// and uses `defaults` verbatim; a member with at least one resolved interceptor
    /// gets its list with `defaults` appended last, never skipped.
    ///
    /// Event and property behaviors are resolved once per event/property and the
    /// result is applied to each of their accessor methods. Accessor methods never
    /// appear in the top-level method pass, and members marked non-interceptable by
    /// the traversal rules are skipped entirely.
    ///
    /// # Errors
    /// [`Error::BehaviorValidation`] if any behavior rejects its member — the whole
    /// pass is aborted and no partial map is published. [`Error::MemberResolution`]
    /// if the visitor cannot produce a surface for the declaring type.
    pub fn apply_interceptors(
        definition: &ProxyTypeDefinition,
        defaults: &[InterceptorRef],
        seed: &[InterceptorRef],
        visitor: &dyn MemberVisitor,
        registry: &BehaviorRegistry,
    ) -> Result<Self> {
        let declaring = definition.declaring_type();
        let surface = visitor.visit(declaring)?;

        let type_scope = MemberDescriptor::type_scope(declaring.token, &declaring.full_name());
        let type_interceptors =
            resolve_behaviors(&type_scope, registry.type_behaviors(), seed.to_vec())?;

        let handler = InvocationHandler {
            chains: SkipMap::new(),
            default_chain: defaults.into(),
        };

        for (_, event) in surface.events.iter() {
            let resolved = resolve_behaviors(
                &event.descriptor,
                registry.member_behaviors(&event.descriptor.token),
                type_interceptors.clone(),
            )?;
            for accessor in event.accessors() {
                handler.record_chain(accessor.token, &resolved, defaults);
            }
        }

        for (_, property) in surface.properties.iter() {
            let resolved = resolve_behaviors(
                &property.descriptor,
                registry.member_behaviors(&property.descriptor.token),
                type_interceptors.clone(),
            )?;
            for accessor in property.accessors() {
                handler.record_chain(accessor.token, &resolved, defaults);
            }
        }

        for (_, method) in surface.methods.iter() {
            // Accessor methods are only reachable through their owning event or
            // property; a stray one in the method list is skipped, as is anything the
            // traversal rules marked non-interceptable
            if method.is_accessor() || !method.is_interceptable() {
                continue;
            }

            let resolved = resolve_behaviors(
                method,
                registry.member_behaviors(&method.token),
                type_interceptors.clone(),
            )?;
            handler.record_chain(method.token, &resolved, defaults);
        }

        Ok(handler)
    }

    /// Creates a handler with no per-member chains; every call uses `defaults`
    #[must_use]
    pub fn with_defaults(defaults: &[InterceptorRef]) -> Self {
        InvocationHandler {
            chains: SkipMap::new(),
            default_chain: defaults.into(),
        }
    }

    fn record_chain(&self, token: Token, resolved: &[InterceptorRef], defaults: &[InterceptorRef]) {
        // Empty resolution means the member behaves exactly as if never visited:
        // no entry, default chain on lookup
        if resolved.is_empty() {
            return;
        }

        let mut chain = Vec::with_capacity(resolved.len() + defaults.len());
        chain.extend_from_slice(resolved);
        chain.extend_from_slice(defaults);
        self.chains.insert(token, chain.into());
    }

    /// The interceptor chain a call on `token` travels through: the member's resolved
    /// chain, or the default chain if the member resolved to no interceptors
    #[must_use]
    pub fn chain_for(&self, token: &Token) -> Arc<[InterceptorRef]> {
        self.chains
            .get(token)
            .map(|entry| entry.value().clone())
            .unwrap_or_else(|| self.default_chain.clone())
    }

    /// The behavior-independent chain used by members without resolved interceptors
    #[must_use]
    pub fn default_chain(&self) -> &Arc<[InterceptorRef]> {
        &self.default_chain
    }

    /// Number of members holding a resolved (non-default) chain
    #[must_use]
    pub fn resolved_member_count(&self) -> usize {
        self.chains.len()
    }

    /// Dispatches a call on `member` through its resolved chain.
    ///
    /// A fresh [`Invocation`] is created for every call; the result of the real call
    /// (or of a short-circuiting interceptor) is returned, and any error raised by an
    /// interceptor or the target propagates unchanged.
    ///
    /// # Errors
    /// Whatever the chain or the real call raises.
    pub fn invoke(
        &self,
        target: &(dyn Any + Send + Sync),
        member: &MemberDescriptor,
        args: Vec<CallValue>,
    ) -> Result<CallValue> {
        let chain = self.chain_for(&member.token);
        let mut invocation = Invocation::new(target, member, args, &chain);
        invocation.proceed()
    }

    /// Like [`InvocationHandler::invoke`], but supplies the proxy's upcall for
    /// members without a bound target capability.
    ///
    /// # Errors
    /// Whatever the chain or the real call raises.
    pub fn invoke_with_upcall(
        &self,
        target: &(dyn Any + Send + Sync),
        member: &MemberDescriptor,
        args: Vec<CallValue>,
        upcall: &UpcallFn,
    ) -> Result<CallValue> {
        let chain = self.chain_for(&member.token);
        let mut invocation = Invocation::new(target, member, args, &chain).with_upcall(upcall);
        invocation.proceed()
    }
}

impl fmt::Debug for InvocationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationHandler")
            .field("resolved_members", &self.chains.len())
            .field("default_chain_len", &self.default_chain.len())
            .finish()
    }
}

/// Runs `behaviors` against `member` over the live `interceptors` list: validate
/// first, then apply, in the given order.
fn resolve_behaviors(
    member: &MemberDescriptor,
    behaviors: &[BehaviorRef],
    mut interceptors: Vec<InterceptorRef>,
) -> Result<Vec<InterceptorRef>> {
    for behavior in behaviors {
        behavior.validate(member).map_err(|err| Error::BehaviorValidation {
            member: member.token,
            behavior: behavior.name().to_string(),
            message: err.to_string(),
        })?;
        behavior.apply(member, &mut interceptors);
    }
    Ok(interceptors)
}
