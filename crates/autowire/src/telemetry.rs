// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structured log events emitted by the resolver.

use tracing::Level;

use crate::{ResolveFailure, TypeKey};

pub(crate) const RESOLVE_EVENT: &str = "autowire.resolve";
pub(crate) const CONSTRUCT_EVENT: &str = "autowire.construct";
pub(crate) const MISSING_DEPENDENCY_EVENT: &str = "autowire.missing_dependency";

/// Where a resolved value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Source {
    Cache,
    StaleCache,
    Override,
    Host,
    Constructed,
    Failed,
}

impl Source {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::StaleCache => "stale_cache",
            Self::Override => "override",
            Self::Host => "host",
            Self::Constructed => "constructed",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Telemetry {
    enabled: bool,
}

impl Telemetry {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub(crate) fn resolved(self, requested: TypeKey, source: Source, depth: usize) {
        if self.enabled {
            tracing::event!(
                name: RESOLVE_EVENT,
                Level::DEBUG,
                resolve.requested = requested.name(),
                resolve.source = source.as_str(),
                resolve.depth = depth,
            );
        }
    }

    pub(crate) fn constructed(self, requested: TypeKey, implementation: TypeKey, arity: usize, depth: usize) {
        if self.enabled {
            tracing::event!(
                name: CONSTRUCT_EVENT,
                Level::DEBUG,
                resolve.requested = requested.name(),
                resolve.implementation = implementation.name(),
                resolve.arity = arity,
                resolve.depth = depth,
            );
        }
    }

    pub(crate) fn missing_dependency(self, requested: TypeKey, parameter: TypeKey, failure: &ResolveFailure, depth: usize) {
        if self.enabled {
            tracing::event!(
                name: MISSING_DEPENDENCY_EVENT,
                Level::WARN,
                resolve.requested = requested.name(),
                resolve.parameter = parameter.name(),
                resolve.reason = %failure,
                resolve.depth = depth,
            );
        }
    }

    pub(crate) fn failed(self, requested: TypeKey, failure: &ResolveFailure, depth: usize) {
        if self.enabled {
            tracing::event!(
                name: RESOLVE_EVENT,
                Level::DEBUG,
                resolve.requested = requested.name(),
                resolve.source = Source::Failed.as_str(),
                resolve.reason = %failure,
                resolve.depth = depth,
            );
        }
    }
}
