// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Error types for resolution.

use std::fmt;

/// Why a requested type could not be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveFailure {
    /// The requested type has no binding, no cached value, no override and no host object.
    Unbound,

    /// Every constructor of the bound implementation has a parameter whose type is not bound.
    NoEligibleConstructor,

    /// A constructor was selected but one of its arguments could not be resolved.
    MissingDependency {
        /// Name of the parameter type that could not be supplied.
        parameter: &'static str,
    },

    /// Resolution nested deeper than the configured limit, which is how binding cycles end.
    DepthExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The liveness oracle returned a value of another type than the one requested.
    TypeMismatch {
        /// Name of the type of the returned value.
        actual: &'static str,
    },
}

impl fmt::Display for ResolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => f.write_str("type is not bound"),
            Self::NoEligibleConstructor => f.write_str("no constructor has all parameter types bound"),
            Self::MissingDependency { parameter } => write!(f, "dependency {parameter} could not be resolved"),
            Self::DepthExceeded { limit } => write!(f, "resolution nested deeper than {limit} levels"),
            Self::TypeMismatch { actual } => write!(f, "host returned a value of type {actual}"),
        }
    }
}

/// An error from a resolution call.
///
/// Carries the name of the requested type and the [`ResolveFailure`] reason. When the failure
/// is a dependency that could not be resolved, the dependency's own error is the
/// [`source`](std::error::Error::source).
///
/// # Example
///
/// ```
/// use autowire::{Container, ResolveFailure};
///
/// trait Mailer: Send + Sync {}
///
/// let mut container = Container::new();
/// let error = container.resolve::<dyn Mailer>().err().expect("nothing is bound");
///
/// assert_eq!(error.failure(), &ResolveFailure::Unbound);
/// assert!(error.requested().contains("Mailer"));
/// ```
#[ohno::error]
#[display("cannot resolve {requested}: {failure}")]
pub struct ResolveError {
    requested: &'static str,
    failure: ResolveFailure,
}

impl ResolveError {
    /// Returns the name of the type that was requested.
    #[must_use]
    pub fn requested(&self) -> &'static str {
        self.requested
    }

    /// Returns why resolution failed.
    #[must_use]
    pub fn failure(&self) -> &ResolveFailure {
        &self.failure
    }
}

/// A specialized [`Result`] type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
