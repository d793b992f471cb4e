// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Constructor injection with a type-keyed registry and per-type instance cache.
//!
//! A [`Container`] maps *requested types* (usually trait objects) to *implementation types*
//! and resolves requests into shared values. Each implementation declares its constructors
//! through [`Injectable`]; the container picks the constructor with the most parameters whose
//! types are all bound, resolves those parameters recursively and caches the result, so every
//! later request for the same type returns the same value.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use autowire::{Constructors, Container, Injectable};
//!
//! trait Storage: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! struct MemoryStorage;
//!
//! impl Storage for MemoryStorage {
//!     fn name(&self) -> &'static str {
//!         "memory"
//!     }
//! }
//!
//! impl Injectable for MemoryStorage {
//!     fn constructors(constructors: &mut Constructors<Self>) {
//!         constructors.add(|| Self);
//!     }
//! }
//!
//! autowire::implements!(MemoryStorage => dyn Storage);
//!
//! struct Service {
//!     storage: Arc<dyn Storage>,
//! }
//!
//! impl Injectable for Service {
//!     fn constructors(constructors: &mut Constructors<Self>) {
//!         constructors.add(|storage: Arc<dyn Storage>| Self { storage });
//!     }
//! }
//!
//! let mut container = Container::new();
//! container.bind::<dyn Storage, MemoryStorage>();
//!
//! // `Service` is not bound, `get` binds concrete types to themselves on first use.
//! let service = container.get::<Service>()?;
//! assert_eq!(service.storage.name(), "memory");
//! assert!(Arc::ptr_eq(&service, &container.get::<Service>()?));
//! # Ok::<(), autowire::ResolveError>(())
//! ```
//!
//! # Resolution Order
//!
//! Resolving a requested type consults, in order:
//!
//! 1. the instance cache, skipping values the [`LivenessOracle`] reports dead;
//! 2. the [`Overrides`] passed to the current call, matched by exact type;
//! 3. the [`LivenessOracle`], for objects owned by a host runtime;
//! 4. the binding, constructing a new value and caching it.
//!
//! Overrides apply to the whole dependency graph built by one call and are never cached.
//!
//! # Failure Handling
//!
//! Every failure is a [`ResolveError`] carrying a [`ResolveFailure`]. What happens when a
//! constructor argument cannot be resolved depends on the [`ResolutionMode`]:
//! [`Strict`](ResolutionMode::Strict) fails the whole call, while
//! [`Permissive`](ResolutionMode::Permissive) passes `None` to parameters declared as
//! `Option<Arc<D>>` and logs a warning. Binding cycles end with
//! [`ResolveFailure::DepthExceeded`] in both modes.
//!
//! # Logging
//!
//! Resolution emits `tracing` events named `autowire.resolve`, `autowire.construct` and
//! `autowire.missing_dependency`, with fields under the `resolve.` prefix. They can be switched
//! off with [`ContainerBuilder::logs_enabled`].
//!
//! # Features
//!
//! - **`test-util`** - Enables the [`testing`] module with [`FakeHost`](testing::FakeHost), a
//!   liveness oracle whose objects can be spawned and destroyed from tests.

mod cache;
mod constructor;
mod container;
mod error;
mod instance;
mod key;
mod liveness;
mod options;
mod overrides;
mod registry;
mod selector;
mod telemetry;

#[cfg(any(feature = "test-util", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-util")))]
pub mod testing;

pub use constructor::{Arguments, Constructor, Constructors, Injectable, Parameter};
pub use container::Container;
pub use error::{ResolveError, ResolveFailure, Result};
pub use instance::{Instance, Upcast};
pub use key::TypeKey;
pub use liveness::{LivenessOracle, NoHost};
pub use options::{ContainerBuilder, DEFAULT_MAX_DEPTH, ResolutionMode};
pub use overrides::Overrides;
