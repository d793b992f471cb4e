// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::TypeKey;

/// A shared value with its static type erased.
///
/// An `Instance` wraps an `Arc<T>` together with the [`TypeKey`] of `T`. `T` may be unsized,
/// so a `dyn Trait` value keeps its interface type and can be recovered with
/// [`Instance::downcast`]. Cloning an instance shares the underlying value.
#[derive(Clone)]
pub struct Instance {
    key: TypeKey,
    // Always holds an `Arc<T>` where `TypeKey::of::<T>() == key`.
    value: Arc<dyn Any + Send + Sync>,
    address: usize,
}

impl Instance {
    /// Wraps an owned value.
    #[must_use]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value. The instance is keyed by `T`, not by the concrete type
    /// behind a trait object.
    #[must_use]
    pub fn from_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            key: TypeKey::of::<T>(),
            address: address_of(&value),
            value: Arc::new(value),
        }
    }

    /// Returns the key of the type this instance was created as.
    #[must_use]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Returns the shared value if this instance was created as a `T`.
    #[must_use]
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().map(Arc::clone)
    }

    /// Returns `true` if both instances share the same underlying value.
    ///
    /// Identity survives upcasting: an `Arc<Impl>` and the `Arc<dyn Trait>` made from it are
    /// the same value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.address == other.address
    }

    /// Returns the address of the underlying value.
    ///
    /// Liveness oracles can use it to recognise values they handed out earlier.
    #[must_use]
    pub fn address(&self) -> usize {
        self.address
    }
}

impl fmt::Debug for Instance {
    #[cfg_attr(test, mutants::skip)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.key.name())
            .field("address", &format_args!("{:#x}", self.address))
            .finish()
    }
}

/// Returns the data address behind `value`, ignoring any trait object metadata.
#[must_use]
pub(crate) fn address_of<T: ?Sized>(value: &Arc<T>) -> usize {
    Arc::as_ptr(value).cast::<()>().addr()
}

/// Converts a shared implementation into a shared requested type.
///
/// Every type converts into itself. Binding an interface to an implementation requires the
/// implementation to convert into the interface's trait object, which is a plain unsizing
/// coercion. The [`implements!`](crate::implements) macro writes those impls:
///
/// ```
/// use std::sync::Arc;
///
/// use autowire::Upcast;
///
/// trait Clock: Send + Sync {}
/// struct SystemClock;
/// impl Clock for SystemClock {}
///
/// autowire::implements!(SystemClock => dyn Clock);
///
/// let clock: Arc<dyn Clock> = <SystemClock as Upcast<dyn Clock>>::upcast(Arc::new(SystemClock));
/// ```
pub trait Upcast<I: ?Sized> {
    /// Performs the conversion.
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T: ?Sized> Upcast<T> for T {
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

/// Implements [`Upcast`] from an implementation type to one or more trait objects.
///
/// ```
/// trait Reader: Send + Sync {}
/// trait Writer: Send + Sync {}
///
/// struct File;
/// impl Reader for File {}
/// impl Writer for File {}
///
/// autowire::implements!(File => dyn Reader, dyn Writer);
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($interface:ty),+ $(,)?) => {
        $(
            impl $crate::Upcast<$interface> for $implementation {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$interface> {
                    self
                }
            }
        )+
    };
}
