// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;

use foldhash::HashMap;

use crate::constructor::{Constructors, ErasedConstructor};
use crate::{Injectable, TypeKey, Upcast};

/// What a requested type is bound to: an implementation type and its constructors, already
/// converted to produce values of the requested type.
#[derive(Clone, Debug)]
pub(crate) struct Binding {
    implementation: TypeKey,
    constructors: Arc<[ErasedConstructor]>,
}

impl Binding {
    pub(crate) fn new<I, Impl>() -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Injectable + Upcast<I>,
    {
        Self {
            implementation: TypeKey::of::<Impl>(),
            constructors: Constructors::<Impl>::of().erase::<I>().into(),
        }
    }

    /// A binding of `T` to itself that can never construct; values only come from the cache.
    pub(crate) fn seeded<T: ?Sized + 'static>() -> Self {
        Self {
            implementation: TypeKey::of::<T>(),
            constructors: Arc::new([]),
        }
    }

    pub(crate) fn implementation(&self) -> TypeKey {
        self.implementation
    }

    pub(crate) fn constructors(&self) -> &[ErasedConstructor] {
        &self.constructors
    }
}

/// Maps requested types to their bindings. Binding a type again replaces the previous binding.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    bindings: HashMap<TypeKey, Binding>,
}

impl Registry {
    pub(crate) fn bind(&mut self, requested: TypeKey, binding: Binding) -> Option<Binding> {
        self.bindings.insert(requested, binding)
    }

    pub(crate) fn unbind(&mut self, requested: TypeKey) -> Option<Binding> {
        self.bindings.remove(&requested)
    }

    pub(crate) fn is_bound(&self, requested: TypeKey) -> bool {
        self.bindings.contains_key(&requested)
    }

    pub(crate) fn binding(&self, requested: TypeKey) -> Option<&Binding> {
        self.bindings.get(&requested)
    }

    pub(crate) fn requested_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.bindings.keys().copied()
    }

    pub(crate) fn clear(&mut self) {
        self.bindings.clear();
    }
}
