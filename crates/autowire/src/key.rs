// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a type the container can bind, cache or resolve.
///
/// Two keys are equal when they describe the same type. The type name is carried along for
/// diagnostics only and never takes part in comparisons.
///
/// # Example
///
/// ```
/// use autowire::TypeKey;
///
/// trait Logger: Send + Sync {}
///
/// assert_eq!(TypeKey::of::<dyn Logger>(), TypeKey::of::<dyn Logger>());
/// assert_ne!(TypeKey::of::<dyn Logger>(), TypeKey::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Returns the key of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the [`TypeId`] of the type.
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Returns the fully qualified name of the type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    #[cfg_attr(test, mutants::skip)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeKey").field(&self.name).finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
