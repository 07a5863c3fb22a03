//! The intercepted surface of a type and the visitor collaborator producing it.
//!
//! Proxy generation needs to know which events, properties, and methods of a declaring
//! type are eligible for interception. That traversal is a collaborator concern: the
//! chain builder consumes a [`TypeSurface`] through the [`MemberVisitor`] trait and
//! never walks type hierarchies itself. Accessor methods appear only nested under
//! their owning event or property, never in the top-level method list.
//!
//! [`DeclaredSurface`] is the in-process implementation: surfaces are registered
//! explicitly per type, which keeps the member → applicable-members mapping an
//! explicit table rather than a reflection pass.

use std::sync::Arc;

use dashmap::DashMap;

use crate::model::member::{MemberList, MemberRc};
use crate::model::token::Token;
use crate::model::typeinfo::TypeInfoRc;
use crate::{Error, Result};

/// A list of events, append-only and shareable across threads
pub type EventMemberList = Arc<boxcar::Vec<Arc<EventMember>>>;
/// A list of properties, append-only and shareable across threads
pub type PropertyMemberList = Arc<boxcar::Vec<Arc<PropertyMember>>>;

/// An intercepted event together with its accessor methods.
#[derive(Debug)]
pub struct EventMember {
    /// Descriptor of the event itself
    pub descriptor: MemberRc,
    /// The method that subscribes a handler
    pub on_add: Option<MemberRc>,
    /// The method that unsubscribes a handler
    pub on_remove: Option<MemberRc>,
    /// The method that raises the event, if declared
    pub on_raise: Option<MemberRc>,
}

impl EventMember {
    /// Creates an event surface entry with add/remove accessors
    #[must_use]
    pub fn new(descriptor: MemberRc, on_add: Option<MemberRc>, on_remove: Option<MemberRc>) -> Self {
        EventMember {
            descriptor,
            on_add,
            on_remove,
            on_raise: None,
        }
    }

    /// Sets the raise accessor
    #[must_use]
    pub fn with_raise(mut self, on_raise: MemberRc) -> Self {
        self.on_raise = Some(on_raise);
        self
    }

    /// Iterates over the accessor methods that are present
    pub fn accessors(&self) -> impl Iterator<Item = &MemberRc> {
        self.on_add
            .iter()
            .chain(self.on_remove.iter())
            .chain(self.on_raise.iter())
    }
}

/// An intercepted property together with its accessor methods.
#[derive(Debug)]
pub struct PropertyMember {
    /// Descriptor of the property itself
    pub descriptor: MemberRc,
    /// The method that retrieves this property
    pub getter: Option<MemberRc>,
    /// The method that sets this property
    pub setter: Option<MemberRc>,
}

impl PropertyMember {
    /// Creates a property surface entry
    #[must_use]
    pub fn new(descriptor: MemberRc, getter: Option<MemberRc>, setter: Option<MemberRc>) -> Self {
        PropertyMember {
            descriptor,
            getter,
            setter,
        }
    }

    /// Iterates over the accessor methods that are present
    pub fn accessors(&self) -> impl Iterator<Item = &MemberRc> {
        self.getter.iter().chain(self.setter.iter())
    }
}

/// The intercept-eligible surface of one declaring type.
///
/// The top-level `methods` list excludes accessor methods; those are reachable only
/// through their owning event or property entry.
#[derive(Debug, Clone)]
pub struct TypeSurface {
    /// Token of the type this surface was produced for
    pub declaring_type: Token,
    /// Intercepted events, with accessors nested
    pub events: EventMemberList,
    /// Intercepted properties, with accessors nested
    pub properties: PropertyMemberList,
    /// Intercepted ordinary methods
    pub methods: MemberList,
}

impl TypeSurface {
    /// Creates an empty surface for the given declaring type
    #[must_use]
    pub fn new(declaring_type: Token) -> Self {
        TypeSurface {
            declaring_type,
            events: Arc::new(boxcar::Vec::new()),
            properties: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Adds an event entry
    pub fn push_event(&self, event: EventMember) {
        self.events.push(Arc::new(event));
    }

    /// Adds a property entry
    pub fn push_property(&self, property: PropertyMember) {
        self.properties.push(Arc::new(property));
    }

    /// Adds an ordinary method entry
    pub fn push_method(&self, method: MemberRc) {
        self.methods.push(method);
    }
}

/// Collaborator yielding the intercepted surface of a declaring type.
pub trait MemberVisitor: Send + Sync {
    /// Produces the intercept-eligible surface of `declaring_type`.
    ///
    /// # Errors
    /// Returns [`Error::MemberResolution`] if no surface can be produced for the type.
    fn visit(&self, declaring_type: &TypeInfoRc) -> Result<TypeSurface>;
}

/// Registration-table implementation of [`MemberVisitor`].
///
/// Surfaces are declared up front, keyed by the declaring type's token. Lookup is
/// lock-free concurrent; declaration may happen from any thread before proxies for
/// the type are built.
#[derive(Debug, Default)]
pub struct DeclaredSurface {
    surfaces: DashMap<Token, TypeSurface>,
}

impl DeclaredSurface {
    /// Creates an empty registration table
    #[must_use]
    pub fn new() -> Self {
        DeclaredSurface {
            surfaces: DashMap::new(),
        }
    }

    /// Registers (or replaces) the surface of a type
    pub fn declare(&self, surface: TypeSurface) {
        self.surfaces.insert(surface.declaring_type, surface);
    }

    /// Number of declared surfaces
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Returns true if no surfaces are declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl MemberVisitor for DeclaredSurface {
    fn visit(&self, declaring_type: &TypeInfoRc) -> Result<TypeSurface> {
        self.surfaces
            .get(&declaring_type.token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                Error::MemberResolution(format!(
                    "no declared surface for type {}",
                    declaring_type.full_name()
                ))
            })
    }
}
