// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Test doubles for host runtimes.

use std::sync::Arc;

use foldhash::HashMap;
use parking_lot::Mutex;

use crate::instance::address_of;
use crate::{Instance, LivenessOracle, TypeKey};

/// A scriptable host runtime.
///
/// Objects spawned or adopted by the host are found by [`LivenessOracle::find_live`] until they
/// are destroyed. A destroyed object is reported dead wherever it is still referenced, including
/// the container's cache. Clones share the same host state, so a test can keep one clone and
/// hand another to [`ContainerBuilder::liveness`](crate::ContainerBuilder::liveness).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use autowire::Container;
/// use autowire::testing::FakeHost;
///
/// struct Player {
///     name: &'static str,
/// }
///
/// let host = FakeHost::new();
/// let player = host.spawn(Player { name: "ada" });
///
/// let mut container = Container::builder().liveness(host.clone()).build();
/// let found = container.resolve::<Player>()?;
/// assert!(Arc::ptr_eq(&found, &player));
///
/// host.destroy(&player);
/// assert!(container.resolve::<Player>().is_err());
/// # Ok::<(), autowire::ResolveError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct FakeHost {
    state: Arc<Mutex<HostState>>,
}

#[derive(Debug, Default)]
struct HostState {
    live: Vec<Instance>,
    // Holding the destroyed values keeps their addresses from being reused by new allocations.
    destroyed: HashMap<usize, Instance>,
}

impl FakeHost {
    /// Creates a host with no objects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host object and returns a handle to it.
    pub fn spawn<T: Send + Sync + 'static>(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.adopt(&value);
        value
    }

    /// Makes an existing value a live host object.
    pub fn adopt<T: ?Sized + Send + Sync + 'static>(&self, value: &Arc<T>) {
        let instance = Instance::from_arc(Arc::clone(value));
        let mut state = self.state.lock();
        state.destroyed.remove(&instance.address());
        state.live.push(instance);
    }

    /// Destroys a host object. It is no longer found and is reported dead from now on.
    ///
    /// The host keeps a reference to the destroyed value until it is adopted again.
    pub fn destroy<T: ?Sized + Send + Sync + 'static>(&self, value: &Arc<T>) {
        let instance = Instance::from_arc(Arc::clone(value));
        let address = instance.address();
        let mut state = self.state.lock();
        state.live.retain(|live| live.address() != address);
        state.destroyed.insert(address, instance);
    }

    /// Returns `true` if the value was destroyed by this host.
    #[must_use]
    pub fn is_destroyed<T: ?Sized>(&self, value: &Arc<T>) -> bool {
        self.state.lock().destroyed.contains_key(&address_of(value))
    }

    /// Returns the number of live host objects.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state.lock().live.len()
    }
}

impl LivenessOracle for FakeHost {
    fn find_live(&self, requested: TypeKey) -> Option<Instance> {
        self.state.lock().live.iter().find(|instance| instance.key() == requested).cloned()
    }

    fn is_alive(&self, instance: &Instance) -> bool {
        !self.state.lock().destroyed.contains_key(&instance.address())
    }
}
