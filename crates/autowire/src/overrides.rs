// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use crate::{Instance, TypeKey};

/// Values supplied for a single resolution call.
///
/// An override takes precedence over bindings for its exact type anywhere in the dependency
/// graph built by that call, but never over a live cached instance. Overrides are never cached.
/// When two overrides have the same type, the one added first is used.
///
/// The type of an override is the concrete type it was added as, so an override never
/// satisfies a request for a trait object.
///
/// # Example
///
/// ```
/// use autowire::Overrides;
///
/// struct RequestId(u64);
///
/// let overrides = Overrides::new().with(RequestId(7)).with("tenant-a".to_string());
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    values: Vec<Instance>,
}

impl Overrides {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Adds an owned value.
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.with_shared(Arc::new(value))
    }

    /// Adds a shared value. Resolutions that use it receive this same `Arc`.
    #[must_use]
    pub fn with_shared<T: Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.values.push(Instance::from_arc(value));
        self
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn find(&self, requested: TypeKey) -> Option<&Instance> {
        self.values.iter().find(|value| value.key() == requested)
    }
}
