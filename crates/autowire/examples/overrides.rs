// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Passes per-request values deep into a dependency graph with overrides.
//!
//! Each request builds a fresh handler whose nested dependencies see the request's own
//! `RequestContext`, while shared services keep coming from the cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use autowire::{Constructors, Container, Injectable, Overrides};
use ohno::AppError;

#[derive(Debug)]
struct RequestContext {
    id: u64,
    user: &'static str,
}

impl Injectable for RequestContext {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self { id: 0, user: "anonymous" });
    }
}

struct Metrics {
    handled: AtomicU64,
}

impl Injectable for Metrics {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self {
            handled: AtomicU64::new(0),
        });
    }
}

struct Audit {
    context: Arc<RequestContext>,
}

impl Injectable for Audit {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|context: Arc<RequestContext>| Self { context });
    }
}

struct Handler {
    audit: Arc<Audit>,
    metrics: Arc<Metrics>,
}

impl Injectable for Handler {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|audit: Arc<Audit>, metrics: Arc<Metrics>| Self { audit, metrics });
    }
}

impl Handler {
    fn handle(&self) -> String {
        let count = self.metrics.handled.fetch_add(1, Ordering::Relaxed) + 1;
        format!(
            "request {} by {} (handled so far: {count})",
            self.audit.context.id, self.audit.context.user
        )
    }
}

fn main() -> Result<(), AppError> {
    let mut container = Container::new();
    container.bind_self::<RequestContext>();
    container.bind_self::<Metrics>();
    container.bind_self::<Audit>();

    for (id, user) in [(1, "ada"), (2, "grace")] {
        // Intermediate values are rebuilt for every request so they pick up the new context.
        container.evict::<Audit>();

        let overrides = Overrides::new().with(RequestContext { id, user });
        let handler = container.create_with::<Handler>(&overrides)?;
        println!("{}", handler.handle());
    }

    // Without overrides the bound default is used.
    container.evict::<Audit>();
    let handler = container.create::<Handler>()?;
    println!("{}", handler.handle());

    Ok(())
}
