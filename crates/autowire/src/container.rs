// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::sync::Arc;

use crate::constructor::{Arguments, ErasedConstructor};
use crate::options::ContainerBuilder;
use crate::registry::{Binding, Registry};
use crate::telemetry::{Source, Telemetry};
use crate::cache::InstanceCache;
use crate::{
    Injectable, Instance, LivenessOracle, Overrides, ResolutionMode, ResolveError, ResolveFailure, Result, TypeKey, Upcast,
    selector,
};

/// Binds requested types to implementations and resolves them into shared values.
///
/// Resolving a type returns, in order of precedence:
///
/// 1. the cached value for that type, if the [`LivenessOracle`] reports it alive;
/// 2. the first [override](Overrides) of exactly that type passed to the current call;
/// 3. an existing host object located by the [`LivenessOracle`];
/// 4. a new value built by the bound implementation's best constructor, which is then cached.
///
/// The best constructor is the one with the most parameters whose types are all bound, the
/// first declared winning ties. Its parameters are resolved the same way, depth first and left
/// to right, sharing the overrides of the outer call.
///
/// The cache holds one value per *requested* type. Two interfaces bound to the same
/// implementation each get their own value.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use autowire::{Constructors, Container, Injectable};
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct Polite;
///
/// impl Greeter for Polite {
///     fn greet(&self) -> String {
///         "good day".to_string()
///     }
/// }
///
/// impl Injectable for Polite {
///     fn constructors(constructors: &mut Constructors<Self>) {
///         constructors.add(|| Self);
///     }
/// }
///
/// autowire::implements!(Polite => dyn Greeter);
///
/// let mut container = Container::new();
/// container.bind::<dyn Greeter, Polite>();
///
/// let first = container.resolve::<dyn Greeter>()?;
/// let second = container.resolve::<dyn Greeter>()?;
///
/// assert_eq!(first.greet(), "good day");
/// assert!(Arc::ptr_eq(&first, &second));
/// # Ok::<(), autowire::ResolveError>(())
/// ```
pub struct Container {
    registry: Registry,
    cache: InstanceCache,
    liveness: Box<dyn LivenessOracle>,
    mode: ResolutionMode,
    max_depth: usize,
    telemetry: Telemetry,
}

impl Container {
    /// Creates a container with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Returns a builder for configuring a container.
    #[must_use]
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_builder(builder: ContainerBuilder) -> Self {
        Self {
            registry: Registry::default(),
            cache: InstanceCache::default(),
            liveness: builder.liveness,
            mode: builder.mode,
            max_depth: builder.max_depth,
            telemetry: Telemetry::new(builder.logs_enabled),
        }
    }

    /// Returns how unresolvable constructor arguments are handled.
    #[must_use]
    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Returns the nesting limit of a single resolution call.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Binds the requested type `I` to the implementation `Impl`, replacing any previous binding
    /// of `I`. A value already cached for `I` is kept.
    pub fn bind<I, Impl>(&mut self)
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Injectable + Upcast<I>,
    {
        self.registry.bind(TypeKey::of::<I>(), Binding::new::<I, Impl>());
    }

    /// Binds `T` to itself.
    pub fn bind_self<T: Injectable>(&mut self) {
        self.bind::<T, T>();
    }

    /// Binds `T` to itself and caches `value` as its instance.
    ///
    /// `T` keeps its constructors: [`create`](Self::create) builds a new value, and so does
    /// [`get`](Self::get) once `value` is evicted or reported dead.
    pub fn bind_instance<T: Injectable>(&mut self, value: T) {
        let key = TypeKey::of::<T>();
        self.registry.bind(key, Binding::new::<T, T>());
        self.cache.put(key, Instance::new(value));
    }

    /// Binds `T` to itself and caches the shared `value` as its instance.
    ///
    /// `T` may be a trait object or any type without constructors. Nothing can rebuild it, so
    /// once `value` is evicted or reported dead, resolving `T` fails with
    /// [`ResolveFailure::NoEligibleConstructor`] until `T` is bound again.
    pub fn bind_shared<T: ?Sized + Send + Sync + 'static>(&mut self, value: Arc<T>) {
        let key = TypeKey::of::<T>();
        self.registry.bind(key, Binding::seeded::<T>());
        self.cache.put(key, Instance::from_arc(value));
    }

    /// Removes the binding and the cached value of `T`.
    ///
    /// Returns `true` if there was either.
    pub fn unbind<T: ?Sized + 'static>(&mut self) -> bool {
        let key = TypeKey::of::<T>();
        let unbound = self.registry.unbind(key).is_some();
        let evicted = self.cache.evict(key).is_some();
        unbound || evicted
    }

    /// Removes the cached value of `T` but keeps its binding, so the next resolution constructs
    /// a new value.
    ///
    /// Returns `true` if a value was cached.
    pub fn evict<T: ?Sized + 'static>(&mut self) -> bool {
        self.cache.evict(TypeKey::of::<T>()).is_some()
    }

    /// Removes every binding and cached value.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.cache.clear();
    }

    /// Returns `true` if `T` is bound.
    #[must_use]
    pub fn is_bound<T: ?Sized + 'static>(&self) -> bool {
        self.registry.is_bound(TypeKey::of::<T>())
    }

    /// Returns `true` if a value is cached for `T`, whether or not the host still considers it
    /// alive.
    #[must_use]
    pub fn is_cached<T: ?Sized + 'static>(&self) -> bool {
        self.cache.contains(TypeKey::of::<T>())
    }

    /// Resolves `T`, constructing and caching it if needed.
    ///
    /// Fails with [`ResolveFailure::Unbound`] if `T` is not bound and nothing else supplies it.
    /// For concrete types, [`get`](Self::get) binds `T` to itself first.
    pub fn resolve<T: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<T>> {
        self.resolve_with(&Overrides::new())
    }

    /// Resolves `T` with values supplied for this call only.
    pub fn resolve_with<T: ?Sized + Send + Sync + 'static>(&mut self, overrides: &Overrides) -> Result<Arc<T>> {
        let requested = TypeKey::of::<T>();
        let instance = self.resolve_key(requested, overrides, 0)?;
        downcast(requested, &instance)
    }

    /// Resolves the concrete type `T`, binding it to itself first if it is unbound.
    pub fn get<T: Injectable>(&mut self) -> Result<Arc<T>> {
        self.get_with(&Overrides::new())
    }

    /// Resolves the concrete type `T` with values supplied for this call only, binding it to
    /// itself first if it is unbound.
    pub fn get_with<T: Injectable>(&mut self, overrides: &Overrides) -> Result<Arc<T>> {
        self.ensure_bound::<T>();
        self.resolve_with(overrides)
    }

    /// Constructs a new `T` without consulting or filling its cache slot.
    ///
    /// Overrides, cached values and host objects are still used for the constructor's
    /// parameters. Fails with [`ResolveFailure::Unbound`] if `T` is not bound; for concrete
    /// types, [`create`](Self::create) binds `T` to itself first.
    pub fn create_fresh<T: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<T>> {
        self.create_fresh_with(&Overrides::new())
    }

    /// Constructs a new `T` with values supplied for this call only.
    pub fn create_fresh_with<T: ?Sized + Send + Sync + 'static>(&mut self, overrides: &Overrides) -> Result<Arc<T>> {
        let requested = TypeKey::of::<T>();
        let instance = self.construct_fresh(requested, overrides)?;
        downcast(requested, &instance)
    }

    /// Constructs a new concrete `T`, binding it to itself first if it is unbound.
    pub fn create<T: Injectable>(&mut self) -> Result<Arc<T>> {
        self.create_with(&Overrides::new())
    }

    /// Constructs a new concrete `T` with values supplied for this call only, binding it to
    /// itself first if it is unbound.
    pub fn create_with<T: Injectable>(&mut self, overrides: &Overrides) -> Result<Arc<T>> {
        self.ensure_bound::<T>();
        self.create_fresh_with(overrides)
    }

    fn ensure_bound<T: Injectable>(&mut self) {
        if !self.is_bound::<T>() {
            self.bind_self::<T>();
        }
    }

    fn resolve_key(&mut self, requested: TypeKey, overrides: &Overrides, depth: usize) -> Result<Instance> {
        if depth > self.max_depth {
            return Err(self.fail(requested, ResolveFailure::DepthExceeded { limit: self.max_depth }, depth));
        }

        if let Some(cached) = self.cache.get(requested) {
            if self.liveness.is_alive(cached) {
                self.telemetry.resolved(requested, Source::Cache, depth);
                return Ok(cached.clone());
            }

            // The dead value keeps its slot until something replaces or evicts it.
            self.telemetry.resolved(requested, Source::StaleCache, depth);
        }

        if let Some(value) = overrides.find(requested) {
            self.telemetry.resolved(requested, Source::Override, depth);
            return Ok(value.clone());
        }

        if let Some(host) = self.liveness.find_live(requested) {
            if host.key() != requested {
                let actual = host.key().name();
                return Err(self.fail(requested, ResolveFailure::TypeMismatch { actual }, depth));
            }

            self.telemetry.resolved(requested, Source::Host, depth);
            return Ok(host);
        }

        let Some(binding) = self.registry.binding(requested).cloned() else {
            return Err(self.fail(requested, ResolveFailure::Unbound, depth));
        };

        let instance = self.construct(requested, &binding, overrides, depth)?;
        self.cache.put(requested, instance.clone());
        Ok(instance)
    }

    fn construct_fresh(&mut self, requested: TypeKey, overrides: &Overrides) -> Result<Instance> {
        let Some(binding) = self.registry.binding(requested).cloned() else {
            return Err(self.fail(requested, ResolveFailure::Unbound, 0));
        };

        self.construct(requested, &binding, overrides, 0)
    }

    fn construct(&mut self, requested: TypeKey, binding: &Binding, overrides: &Overrides, depth: usize) -> Result<Instance> {
        let Some(constructor) = selector::select(binding.constructors(), &self.registry) else {
            return Err(self.fail(requested, ResolveFailure::NoEligibleConstructor, depth));
        };

        let mut arguments = self.resolve_arguments(requested, constructor, overrides, depth)?;

        let Some(instance) = constructor.build(&mut arguments) else {
            let parameter = arguments.rejected().map_or("<unknown>", |key| key.name());
            return Err(self.fail(requested, ResolveFailure::MissingDependency { parameter }, depth));
        };

        self.telemetry
            .constructed(requested, binding.implementation(), constructor.arity(), depth);
        self.telemetry.resolved(requested, Source::Constructed, depth);
        Ok(instance)
    }

    fn resolve_arguments(
        &mut self,
        requested: TypeKey,
        constructor: &ErasedConstructor,
        overrides: &Overrides,
        depth: usize,
    ) -> Result<Arguments> {
        let mut values = Vec::with_capacity(constructor.arity());

        for &parameter in constructor.parameters() {
            match self.resolve_key(parameter, overrides, depth + 1) {
                Ok(instance) => values.push(Some(instance)),
                Err(error) if matches!(error.failure(), ResolveFailure::DepthExceeded { .. }) => return Err(error),
                Err(error) => match self.mode {
                    ResolutionMode::Permissive => {
                        self.telemetry.missing_dependency(requested, parameter, error.failure(), depth);
                        values.push(None);
                    }
                    ResolutionMode::Strict => {
                        let failure = ResolveFailure::MissingDependency {
                            parameter: parameter.name(),
                        };
                        self.telemetry.failed(requested, &failure, depth);
                        return Err(ResolveError::caused_by(requested.name(), failure, error));
                    }
                },
            }
        }

        Ok(Arguments::new(values))
    }

    fn fail(&self, requested: TypeKey, failure: ResolveFailure, depth: usize) -> ResolveError {
        self.telemetry.failed(requested, &failure, depth);
        ResolveError::new(requested.name(), failure)
    }
}

fn downcast<T: ?Sized + Send + Sync + 'static>(requested: TypeKey, instance: &Instance) -> Result<Arc<T>> {
    instance.downcast::<T>().ok_or_else(|| {
        ResolveError::new(
            requested.name(),
            ResolveFailure::TypeMismatch {
                actual: instance.key().name(),
            },
        )
    })
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    #[cfg_attr(test, mutants::skip)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bound: Vec<_> = self.registry.requested_types().map(|key| key.name()).collect();
        let mut cached: Vec<_> = self.cache.cached_types().map(|key| key.name()).collect();
        bound.sort_unstable();
        cached.sort_unstable();

        f.debug_struct("Container")
            .field("bound", &bound)
            .field("cached", &cached)
            .field("liveness", &self.liveness)
            .field("mode", &self.mode)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::Constructors;
    use crate::telemetry::testing::LogCapture;
    use crate::testing::FakeHost;

    assert_impl_all!(Container: Send, Sync, Default);
    assert_impl_all!(Overrides: Send, Sync, Clone);
    assert_impl_all!(Instance: Send, Sync, Clone);
    assert_impl_all!(ResolveError: Send, Sync, std::error::Error);

    static BUILT: AtomicUsize = AtomicUsize::new(0);

    #[derive(Debug)]
    struct Counter;

    impl Injectable for Counter {
        fn constructors(constructors: &mut Constructors<Self>) {
            constructors.add(|| {
                BUILT.fetch_add(1, Ordering::Relaxed);
                Self
            });
        }
    }

    #[derive(Debug)]
    struct Window {
        title: String,
    }

    impl Injectable for Window {
        fn constructors(constructors: &mut Constructors<Self>) {
            constructors.add(|| Self {
                title: "constructed".to_string(),
            });
        }
    }

    #[test]
    fn cached_value_skips_construction() {
        let mut container = Container::new();
        container.bind_self::<Counter>();

        let before = BUILT.load(Ordering::Relaxed);
        let first = container.resolve::<Counter>().expect("counter resolves");
        let second = container.resolve::<Counter>().expect("counter resolves");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(BUILT.load(Ordering::Relaxed) > before);
        assert!(container.is_cached::<Counter>());
    }

    #[test]
    fn dead_cache_entry_is_skipped_but_kept() {
        let host = FakeHost::new();
        let mut container = Container::builder().liveness(host.clone()).build();

        let seeded = Arc::new(Window {
            title: "seeded".to_string(),
        });
        container.bind_shared(Arc::clone(&seeded));
        host.adopt(&seeded);
        host.destroy(&seeded);

        let error = container.resolve::<Window>().expect_err("dead value must not be returned");
        assert_eq!(error.failure(), &ResolveFailure::NoEligibleConstructor);
        assert!(container.is_cached::<Window>(), "stale slot must persist");
    }

    #[test]
    fn dead_cache_entry_is_replaced_by_construction() {
        let host = FakeHost::new();
        let mut container = Container::builder().liveness(host.clone()).build();

        container.bind_instance(Window {
            title: "seeded".to_string(),
        });
        let seeded = container.resolve::<Window>().expect("seeded window is cached");
        host.adopt(&seeded);
        host.destroy(&seeded);

        let rebuilt = container.resolve::<Window>().expect("window is rebuilt");
        assert_eq!(rebuilt.title, "constructed");
        assert!(!Arc::ptr_eq(&rebuilt, &seeded));

        let again = container.resolve::<Window>().expect("window is cached");
        assert!(Arc::ptr_eq(&rebuilt, &again));
    }

    #[test]
    fn host_object_is_found_and_not_cached() {
        let host = FakeHost::new();
        let spawned = host.spawn(Window {
            title: "in scene".to_string(),
        });
        let mut container = Container::builder().liveness(host.clone()).build();

        let found = container.resolve::<Window>().expect("host object is found");
        assert!(Arc::ptr_eq(&found, &spawned));
        assert!(!container.is_cached::<Window>());
        assert!(!container.is_bound::<Window>());
    }

    #[test]
    fn live_cache_entry_beats_host_lookup() {
        let host = FakeHost::new();
        let mut container = Container::builder().liveness(host.clone()).build();
        container.bind_self::<Window>();

        let constructed = container.resolve::<Window>().expect("window constructs");
        let _spawned = host.spawn(Window {
            title: "in scene".to_string(),
        });

        let again = container.resolve::<Window>().expect("window is cached");
        assert!(Arc::ptr_eq(&constructed, &again));
    }

    #[test]
    fn override_beats_host_lookup() {
        let host = FakeHost::new();
        let _spawned = host.spawn(Window {
            title: "in scene".to_string(),
        });
        let mut container = Container::builder().liveness(host).build();

        let overrides = Overrides::new().with(Window {
            title: "override".to_string(),
        });
        let window = container.resolve_with::<Window>(&overrides).expect("override is used");
        assert_eq!(window.title, "override");
    }

    #[test]
    fn host_type_mismatch_is_reported() {
        #[derive(Debug)]
        struct Liar;

        impl LivenessOracle for Liar {
            fn find_live(&self, _requested: TypeKey) -> Option<Instance> {
                Some(Instance::new(0_u8))
            }

            fn is_alive(&self, _instance: &Instance) -> bool {
                true
            }
        }

        let mut container = Container::builder().liveness(Liar).build();
        let error = container.resolve::<Window>().expect_err("wrong type must be rejected");
        assert_eq!(error.failure(), &ResolveFailure::TypeMismatch { actual: "u8" });
    }

    #[test]
    fn create_fresh_ignores_cache_and_host() {
        let host = FakeHost::new();
        let _spawned = host.spawn(Window {
            title: "in scene".to_string(),
        });
        let mut container = Container::builder().liveness(host).build();
        container.bind_instance(Window {
            title: "seeded".to_string(),
        });

        let fresh = container.create_fresh::<Window>().expect("window constructs");
        assert_eq!(fresh.title, "constructed");

        let cached = container.resolve::<Window>().expect("seeded window is cached");
        assert_eq!(cached.title, "seeded");
    }

    #[test]
    fn unbind_reports_removal() {
        let mut container = Container::new();
        assert!(!container.unbind::<Window>());

        container.bind_instance(Window { title: String::new() });
        assert!(container.unbind::<Window>());
        assert!(!container.is_bound::<Window>());
        assert!(!container.is_cached::<Window>());
    }

    #[test]
    fn evict_keeps_binding() {
        let mut container = Container::new();
        let first = container.get::<Window>().expect("window constructs");

        assert!(container.evict::<Window>());
        assert!(!container.evict::<Window>());
        assert!(container.is_bound::<Window>());

        let second = container.get::<Window>().expect("window constructs again");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut container = Container::new();
        container.bind_shared(Arc::new(1_u32));
        container.bind_self::<Window>();

        container.clear();
        assert!(!container.is_bound::<u32>());
        assert!(!container.is_cached::<u32>());
        assert!(!container.is_bound::<Window>());
    }

    #[test]
    fn resolution_is_logged() {
        let capture = LogCapture::default();

        tracing::subscriber::with_default(capture.subscriber(), || {
            let mut container = Container::new();
            container.bind_self::<Window>();
            let _ = container.resolve::<Window>();
            let _ = container.resolve::<Window>();
            let _ = container.resolve::<u32>();
        });

        let output = capture.output();
        assert!(output.contains("resolve.source=\"constructed\""), "got: {output}");
        assert!(output.contains("resolve.source=\"cache\""), "got: {output}");
        assert!(output.contains("resolve.implementation"), "got: {output}");
        assert!(output.contains("type is not bound"), "got: {output}");
    }

    #[test]
    fn disabled_logs_stay_quiet() {
        let capture = LogCapture::default();

        tracing::subscriber::with_default(capture.subscriber(), || {
            let mut container = Container::builder().logs_enabled(false).build();
            let _ = container.get::<Window>();
            let _ = container.resolve::<u32>();
        });

        assert!(capture.output().is_empty());
    }

    #[test]
    fn debug_lists_types() {
        let mut container = Container::new();
        container.bind_shared(Arc::new(7_u16));

        let debug = format!("{container:?}");
        assert!(debug.contains("u16"), "got: {debug}");
        assert!(debug.contains("Strict"), "got: {debug}");
    }

    #[test]
    fn options_are_exposed() {
        let container = Container::builder().mode(ResolutionMode::Permissive).max_depth(5).build();
        assert_eq!(container.mode(), ResolutionMode::Permissive);
        assert_eq!(container.max_depth(), 5);
    }
}
