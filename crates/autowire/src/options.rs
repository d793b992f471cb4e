// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::container::Container;
use crate::liveness::{LivenessOracle, NoHost};

/// Default limit on how deeply resolution may nest before it gives up.
///
/// Real dependency graphs are rarely more than a dozen levels deep; anything near this limit is
/// almost certainly a binding cycle.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// How the container treats a constructor argument that cannot be resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolutionMode {
    /// The constructor is not called and resolution fails with
    /// [`ResolveFailure::MissingDependency`](crate::ResolveFailure::MissingDependency).
    #[default]
    Strict,

    /// The argument is passed as absent. Parameters declared as `Option<Arc<D>>` receive
    /// `None`; a parameter declared as `Arc<D>` cannot be absent, so resolution still fails with
    /// [`ResolveFailure::MissingDependency`](crate::ResolveFailure::MissingDependency).
    ///
    /// A depth limit failure is never passed as absent.
    Permissive,
}

/// Builder for configuring a [`Container`].
///
/// Created with [`Container::builder`].
///
/// # Example
///
/// ```
/// use autowire::{Container, ResolutionMode};
///
/// let container = Container::builder()
///     .mode(ResolutionMode::Permissive)
///     .max_depth(16)
///     .logs_enabled(false)
///     .build();
///
/// assert_eq!(container.mode(), ResolutionMode::Permissive);
/// ```
#[derive(Debug)]
pub struct ContainerBuilder {
    pub(crate) mode: ResolutionMode,
    pub(crate) max_depth: usize,
    pub(crate) liveness: Box<dyn LivenessOracle>,
    pub(crate) logs_enabled: bool,
}

impl ContainerBuilder {
    pub(crate) fn new() -> Self {
        Self {
            mode: ResolutionMode::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            liveness: Box::new(NoHost),
            logs_enabled: true,
        }
    }

    /// Sets how unresolvable constructor arguments are handled.
    ///
    /// **Default**: [`ResolutionMode::Strict`]
    #[must_use]
    pub fn mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets how many levels of nested dependencies a single call may resolve.
    ///
    /// A binding cycle fails with
    /// [`ResolveFailure::DepthExceeded`](crate::ResolveFailure::DepthExceeded) once this limit
    /// is passed.
    ///
    /// **Default**: [`DEFAULT_MAX_DEPTH`]
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the oracle that reports on host-managed objects.
    ///
    /// **Default**: [`NoHost`]
    #[must_use]
    pub fn liveness(mut self, liveness: impl LivenessOracle) -> Self {
        self.liveness = Box::new(liveness);
        self
    }

    /// Enables or disables the `tracing` events emitted during resolution.
    ///
    /// **Default**: true
    #[must_use]
    pub fn logs_enabled(mut self, enabled: bool) -> Self {
        self.logs_enabled = enabled;
        self
    }

    /// Builds the container.
    #[must_use]
    pub fn build(self) -> Container {
        Container::from_builder(self)
    }
}
