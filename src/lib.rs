// Copyright 2026 Interlace Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]

//! # interlace
//!
//! A thread-safe interceptor composition and invocation pipeline for dynamic proxy
//! infrastructure. `interlace` builds ordered interceptor chains for the members of a
//! proxied type from declaratively registered behaviors, dispatches calls through
//! those chains with a chain-of-responsibility proceed protocol, and memoizes chain
//! construction with at-most-once-per-key guarantees under concurrent first access.
//!
//! Proxy *generation* — synthesizing the runtime type itself — is a collaborator
//! concern and deliberately out of scope: the crate models members as descriptors
//! with bound dispatch capabilities and leaves type emission, hierarchy traversal,
//! and instance activation to external collaborators
//! ([`model::surface::MemberVisitor`], [`model::activation::TypeActivator`]).
//!
//! ## Features
//!
//! - **Declarative chain resolution** - behaviors validate and edit per-member
//!   interceptor lists in a stable, registration-defined order
//! - **Proceed protocol** - each interceptor may observe, transform, short-circuit,
//!   or retry the underlying call through an explicit cursor state machine
//! - **Single-flight construction** - one chain build per proxy configuration, no
//!   matter how many threads race on first access
//! - **Build-then-freeze maps** - member → chain maps are mutable only while being
//!   built and read lock-free forever after
//! - **Memory safe** - pure Rust with comprehensive error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use interlace::prelude::*;
//! use std::sync::Arc;
//!
//! // Describe the member being proxied and bind its real-call capability
//! let declaring = TypeInfo::interface(Token::type_def(1), "Sample", "IGreeter").build();
//! let run = MemberDescriptor::method(Token::method(1), "Greet", declaring.token)
//!     .with_target(Arc::new(|_, _| Ok(Box::new("hello".to_string()))))
//!     .build();
//!
//! let surface = TypeSurface::new(declaring.token);
//! surface.push_method(run.clone());
//! let visitor = DeclaredSurface::new();
//! visitor.declare(surface);
//!
//! // Build the chains and dispatch a call
//! let parent = TypeInfo::class(Token::type_def(2), "Sample", "ProxyBase").build();
//! let definition = ProxyTypeDefinition::new(declaring, parent);
//! let handler = InvocationHandler::apply_interceptors(
//!     &definition,
//!     &[],
//!     &[],
//!     &visitor,
//!     &BehaviorRegistry::new(),
//! )?;
//!
//! let target = ();
//! let result = handler.invoke(&target, &run, Vec::new())?;
//! assert_eq!(*result.downcast::<String>().unwrap(), "hello");
//! # Ok::<(), interlace::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `interlace` is organized into three modules:
//!
//! - [`model`] - the structural world: tokens, type descriptions, member
//!   descriptors, intercepted surfaces, proxy definitions, generic substitution
//! - [`interception`] - behaviors, chain resolution, and the per-call dispatcher
//! - [`cache`] - the generic single-flight memoizing store
//!
//! Data flows from a [`model::definition::ProxyTypeDefinition`] through
//! [`interception::InvocationHandler::apply_interceptors`] (typically memoized via
//! [`cache::SingleFlight`] keyed by definition identity) into per-call
//! [`interception::Invocation`] dispatch.
//!
//! ## Concurrency
//!
//! Chain building is the only mutating phase and is scoped per cache key; a
//! published handler is immutable and safe for unsynchronized concurrent reads.
//! Every call gets a fresh invocation, so concurrent calls to one proxy need no
//! coordination. The single-flight cache guarantees one factory execution per key,
//! with callers for different keys never blocking each other.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Build-time failures
//! (argument validation, behavior validation, member resolution) abort their pass
//! without publishing partial state; call-time errors raised by interceptors or the
//! real target propagate to the original caller unchanged.

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use interlace::prelude::*;
///
/// let token = Token::method(1);
/// assert_eq!(token.row(), 1);
/// ```
pub mod prelude;

/// Single-flight memoizing cache with at-most-once-per-key construction.
///
/// [`cache::SingleFlight`] deduplicates expensive chain construction across
/// concurrently racing threads: one caller runs the factory, everyone else for the
/// same key receives the produced value, and callers for different keys never block
/// each other.
pub mod cache;

/// Interceptor composition and call dispatch.
///
/// Behaviors ([`interception::InterceptionBehavior`]) resolve into per-member
/// interceptor chains ([`interception::InvocationHandler`]), and calls travel
/// through them via the proceed protocol ([`interception::Invocation`]).
pub mod interception;

/// Structural model of proxied types and members.
///
/// Tokens, type descriptions, member descriptors with dispatch capabilities,
/// intercepted surfaces, proxy type definitions, custom attributes, and generic
/// type substitution.
pub mod model;

/// `interlace` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always
/// [`Error`]. Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `interlace` Error type
///
/// The main error type for all operations in this crate, covering build-time
/// validation and dispatch failures.
pub use error::Error;

/// Chain resolution and call dispatch entry point.
///
/// See [`interception::InvocationHandler`] for building member → chain maps and
/// dispatching calls through them.
pub use interception::InvocationHandler;

/// The single-flight memoizing store.
pub use cache::SingleFlight;
