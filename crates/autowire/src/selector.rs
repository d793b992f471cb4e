// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::constructor::ErasedConstructor;
use crate::registry::Registry;

/// Picks the constructor with the most parameters among those whose parameter types are all
/// bound. Ties go to the constructor declared first.
///
/// Only bindings are checked; whether a bound parameter will actually resolve is not.
pub(crate) fn select<'a>(constructors: &'a [ErasedConstructor], registry: &Registry) -> Option<&'a ErasedConstructor> {
    let mut best: Option<&ErasedConstructor> = None;

    for candidate in constructors {
        if !candidate.parameters().iter().all(|parameter| registry.is_bound(*parameter)) {
            continue;
        }

        if best.is_none_or(|current| candidate.arity() > current.arity()) {
            best = Some(candidate);
        }
    }

    best
}
