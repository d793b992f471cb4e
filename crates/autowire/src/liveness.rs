// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{Instance, TypeKey};

/// Connects the container to a host runtime that owns some objects itself.
///
/// Host-managed objects can be destroyed by the host at any time while the container still
/// holds them in its cache. The container asks the oracle before returning a cached value, and
/// asks it for an existing host object before constructing a new one.
///
/// For types the host does not manage, [`find_live`](Self::find_live) returns `None` and
/// [`is_alive`](Self::is_alive) returns `true`.
///
/// # Example
///
/// ```
/// use autowire::{Container, Instance, LivenessOracle, TypeKey};
///
/// #[derive(Debug)]
/// struct Scene {
///     camera: Instance,
/// }
///
/// impl LivenessOracle for Scene {
///     fn find_live(&self, requested: TypeKey) -> Option<Instance> {
///         (requested == self.camera.key()).then(|| self.camera.clone())
///     }
///
///     fn is_alive(&self, _instance: &Instance) -> bool {
///         true
///     }
/// }
///
/// struct Camera;
///
/// let mut container = Container::builder()
///     .liveness(Scene { camera: Instance::new(Camera) })
///     .build();
///
/// assert!(container.resolve::<Camera>().is_ok());
/// ```
pub trait LivenessOracle: fmt::Debug + Send + Sync + 'static {
    /// Returns an existing live host object of the requested type.
    fn find_live(&self, requested: TypeKey) -> Option<Instance>;

    /// Returns `false` if `instance` is a host object the host has destroyed.
    fn is_alive(&self, instance: &Instance) -> bool;
}

/// The oracle used when there is no host runtime: nothing is host-managed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHost;

impl LivenessOracle for NoHost {
    fn find_live(&self, _requested: TypeKey) -> Option<Instance> {
        None
    }

    fn is_alive(&self, _instance: &Instance) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_host_manages_nothing() {
        let instance = Instance::new(5_u8);
        assert!(NoHost.find_live(TypeKey::of::<u8>()).is_none());
        assert!(NoHost.is_alive(&instance));
    }
}
