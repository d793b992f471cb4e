// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Constructor descriptors.
//!
//! An implementation type lists its constructors once, in declaration order, through
//! [`Injectable::constructors`]. Each constructor is an ordinary function or closure; its
//! parameter types are read from its signature, so the container knows which dependencies a
//! constructor needs without calling it.

use std::fmt;
use std::sync::Arc;

use crate::{Instance, TypeKey, Upcast};

/// A type the container can construct.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use autowire::{Constructors, Injectable};
///
/// struct Settings;
///
/// struct Database {
///     settings: Option<Arc<Settings>>,
/// }
///
/// impl Injectable for Database {
///     fn constructors(constructors: &mut Constructors<Self>) {
///         constructors
///             .add(|| Self { settings: None })
///             .add(|settings: Arc<Settings>| Self { settings: Some(settings) });
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Declares the constructors of `Self`, in order.
    ///
    /// When several constructors are eligible and have the same number of parameters, the one
    /// added first wins.
    fn constructors(constructors: &mut Constructors<Self>);
}

/// A value a constructor can receive for one of its parameters.
///
/// Implemented for `Arc<D>`, a required dependency, and `Option<Arc<D>>`, a dependency that
/// may be absent when the container runs in
/// [`ResolutionMode::Permissive`](crate::ResolutionMode::Permissive).
pub trait Parameter: Sized {
    /// The requested type resolved for this parameter.
    type Target: ?Sized + Send + Sync + 'static;

    /// Converts the resolution outcome into the parameter value.
    ///
    /// Returns `None` when the parameter cannot represent an absent dependency.
    fn from_resolved(resolved: Option<Arc<Self::Target>>) -> Option<Self>;
}

impl<T: ?Sized + Send + Sync + 'static> Parameter for Arc<T> {
    type Target = T;

    fn from_resolved(resolved: Option<Arc<T>>) -> Option<Self> {
        resolved
    }
}

impl<T: ?Sized + Send + Sync + 'static> Parameter for Option<Arc<T>> {
    type Target = T;

    fn from_resolved(resolved: Option<Arc<T>>) -> Option<Self> {
        Some(resolved)
    }
}

/// The resolved arguments of one constructor call, consumed left to right.
#[derive(Debug)]
pub struct Arguments {
    values: std::vec::IntoIter<Option<Instance>>,
    rejected: Option<TypeKey>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Option<Instance>>) -> Self {
        Self {
            values: values.into_iter(),
            rejected: None,
        }
    }

    /// Takes the next argument as a `P`.
    ///
    /// Returns `None` and remembers the parameter type if the argument is absent and `P` does
    /// not accept absence.
    pub fn next<P: Parameter>(&mut self) -> Option<P> {
        let resolved = self.values.next().flatten().and_then(|instance| instance.downcast::<P::Target>());
        let parameter = P::from_resolved(resolved);
        if parameter.is_none() && self.rejected.is_none() {
            self.rejected = Some(TypeKey::of::<P::Target>());
        }
        parameter
    }

    /// Returns the first parameter type that rejected an absent argument.
    #[must_use]
    pub fn rejected(&self) -> Option<TypeKey> {
        self.rejected
    }
}

/// A function that builds a `T` from parameters of types `P`.
///
/// Implemented for every `Fn(P1, .., Pn) -> T` with up to five [`Parameter`]s; the type
/// parameter `P` is the tuple of parameter types and only serves to tell the impls apart.
pub trait Constructor<T, P>: Send + Sync + 'static {
    /// Returns the requested types of the parameters, in order.
    fn parameters(&self) -> Vec<TypeKey>;

    /// Calls the constructor, or returns `None` if an argument is unusable.
    fn construct(&self, arguments: &mut Arguments) -> Option<T>;
}

impl<F, T> Constructor<T, ()> for F
where
    F: Fn() -> T + Send + Sync + 'static,
{
    fn parameters(&self) -> Vec<TypeKey> {
        Vec::new()
    }

    fn construct(&self, _arguments: &mut Arguments) -> Option<T> {
        Some(self())
    }
}

impl<F, T, P1> Constructor<T, (P1,)> for F
where
    F: Fn(P1) -> T + Send + Sync + 'static,
    P1: Parameter,
{
    fn parameters(&self) -> Vec<TypeKey> {
        vec![TypeKey::of::<P1::Target>()]
    }

    fn construct(&self, arguments: &mut Arguments) -> Option<T> {
        let p1 = arguments.next::<P1>()?;
        Some(self(p1))
    }
}

impl<F, T, P1, P2> Constructor<T, (P1, P2)> for F
where
    F: Fn(P1, P2) -> T + Send + Sync + 'static,
    P1: Parameter,
    P2: Parameter,
{
    fn parameters(&self) -> Vec<TypeKey> {
        vec![TypeKey::of::<P1::Target>(), TypeKey::of::<P2::Target>()]
    }

    fn construct(&self, arguments: &mut Arguments) -> Option<T> {
        let p1 = arguments.next::<P1>()?;
        let p2 = arguments.next::<P2>()?;
        Some(self(p1, p2))
    }
}

impl<F, T, P1, P2, P3> Constructor<T, (P1, P2, P3)> for F
where
    F: Fn(P1, P2, P3) -> T + Send + Sync + 'static,
    P1: Parameter,
    P2: Parameter,
    P3: Parameter,
{
    fn parameters(&self) -> Vec<TypeKey> {
        vec![
            TypeKey::of::<P1::Target>(),
            TypeKey::of::<P2::Target>(),
            TypeKey::of::<P3::Target>(),
        ]
    }

    fn construct(&self, arguments: &mut Arguments) -> Option<T> {
        let p1 = arguments.next::<P1>()?;
        let p2 = arguments.next::<P2>()?;
        let p3 = arguments.next::<P3>()?;
        Some(self(p1, p2, p3))
    }
}

impl<F, T, P1, P2, P3, P4> Constructor<T, (P1, P2, P3, P4)> for F
where
    F: Fn(P1, P2, P3, P4) -> T + Send + Sync + 'static,
    P1: Parameter,
    P2: Parameter,
    P3: Parameter,
    P4: Parameter,
{
    fn parameters(&self) -> Vec<TypeKey> {
        vec![
            TypeKey::of::<P1::Target>(),
            TypeKey::of::<P2::Target>(),
            TypeKey::of::<P3::Target>(),
            TypeKey::of::<P4::Target>(),
        ]
    }

    fn construct(&self, arguments: &mut Arguments) -> Option<T> {
        let p1 = arguments.next::<P1>()?;
        let p2 = arguments.next::<P2>()?;
        let p3 = arguments.next::<P3>()?;
        let p4 = arguments.next::<P4>()?;
        Some(self(p1, p2, p3, p4))
    }
}

impl<F, T, P1, P2, P3, P4, P5> Constructor<T, (P1, P2, P3, P4, P5)> for F
where
    F: Fn(P1, P2, P3, P4, P5) -> T + Send + Sync + 'static,
    P1: Parameter,
    P2: Parameter,
    P3: Parameter,
    P4: Parameter,
    P5: Parameter,
{
    fn parameters(&self) -> Vec<TypeKey> {
        vec![
            TypeKey::of::<P1::Target>(),
            TypeKey::of::<P2::Target>(),
            TypeKey::of::<P3::Target>(),
            TypeKey::of::<P4::Target>(),
            TypeKey::of::<P5::Target>(),
        ]
    }

    fn construct(&self, arguments: &mut Arguments) -> Option<T> {
        let p1 = arguments.next::<P1>()?;
        let p2 = arguments.next::<P2>()?;
        let p3 = arguments.next::<P3>()?;
        let p4 = arguments.next::<P4>()?;
        let p5 = arguments.next::<P5>()?;
        Some(self(p1, p2, p3, p4, p5))
    }
}

type Build<T> = Arc<dyn Fn(&mut Arguments) -> Option<T> + Send + Sync>;

/// The ordered constructor list of an [`Injectable`] type.
pub struct Constructors<T> {
    descriptors: Vec<Descriptor<T>>,
}

struct Descriptor<T> {
    parameters: Vec<TypeKey>,
    build: Build<T>,
}

impl<T: Send + Sync + 'static> Constructors<T> {
    pub(crate) fn of() -> Self
    where
        T: Injectable,
    {
        let mut constructors = Self { descriptors: Vec::new() };
        T::constructors(&mut constructors);
        constructors
    }

    /// Appends a constructor.
    pub fn add<P, C>(&mut self, constructor: C) -> &mut Self
    where
        C: Constructor<T, P>,
    {
        self.descriptors.push(Descriptor {
            parameters: constructor.parameters(),
            build: Arc::new(move |arguments: &mut Arguments| constructor.construct(arguments)),
        });
        self
    }

    /// Returns the number of declared constructors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if no constructor was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Erases the constructed type, converting every built value into an `I`.
    pub(crate) fn erase<I>(self) -> Vec<ErasedConstructor>
    where
        I: ?Sized + Send + Sync + 'static,
        T: Upcast<I>,
    {
        self.descriptors
            .into_iter()
            .map(|descriptor| {
                let build = descriptor.build;
                ErasedConstructor {
                    parameters: descriptor.parameters.into(),
                    build: Arc::new(move |arguments: &mut Arguments| {
                        build(arguments).map(|value| Instance::from_arc(<T as Upcast<I>>::upcast(Arc::new(value))))
                    }),
                }
            })
            .collect()
    }
}

impl<T> fmt::Debug for Constructors<T> {
    #[cfg_attr(test, mutants::skip)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptors.iter().map(|d| &d.parameters)).finish()
    }
}

/// A constructor whose output is an [`Instance`] of the requested type.
#[derive(Clone)]
pub(crate) struct ErasedConstructor {
    parameters: Arc<[TypeKey]>,
    build: Build<Instance>,
}

impl ErasedConstructor {
    pub(crate) fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    pub(crate) fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub(crate) fn build(&self, arguments: &mut Arguments) -> Option<Instance> {
        (self.build)(arguments)
    }
}

impl fmt::Debug for ErasedConstructor {
    #[cfg_attr(test, mutants::skip)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedConstructor").field("parameters", &self.parameters).finish_non_exhaustive()
    }
}
