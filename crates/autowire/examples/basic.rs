// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Binds a small service graph and resolves it, logging each resolution step.
//!
//! Run with `cargo run --example basic` and watch the `autowire.*` events: the first request
//! constructs every value, the second is served from the cache.

use std::sync::Arc;

use autowire::{Constructors, Container, Injectable};
use ohno::AppError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

trait Repository: Send + Sync {
    fn find(&self, id: u32) -> Option<String>;
}

struct InMemoryRepository;

impl Repository for InMemoryRepository {
    fn find(&self, id: u32) -> Option<String> {
        (id == 1).then(|| "ada".to_string())
    }
}

impl Injectable for InMemoryRepository {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self);
    }
}

autowire::implements!(InMemoryRepository => dyn Repository);

struct Config {
    greeting: &'static str,
}

struct Greeter {
    repository: Arc<dyn Repository>,
    greeting: &'static str,
}

impl Injectable for Greeter {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors
            .add(|repository: Arc<dyn Repository>| Self {
                repository,
                greeting: "hello",
            })
            .add(|repository: Arc<dyn Repository>, config: Arc<Config>| Self {
                repository,
                greeting: config.greeting,
            });
    }
}

impl Greeter {
    fn greet(&self, id: u32) -> String {
        match self.repository.find(id) {
            Some(name) => format!("{}, {name}!", self.greeting),
            None => format!("{}, stranger!", self.greeting),
        }
    }
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::registry().with(tracing_subscriber::fmt::layer()).init();

    let mut container = Container::new();
    container.bind::<dyn Repository, InMemoryRepository>();

    // `Config` is not bound yet, so the one-parameter constructor is chosen.
    let greeter = container.get::<Greeter>()?;
    println!("{}", greeter.greet(1));

    // Served from the cache.
    let again = container.get::<Greeter>()?;
    assert!(Arc::ptr_eq(&greeter, &again));

    // Once `Config` is bound, a rebuilt greeter uses the larger constructor.
    container.bind_shared(Arc::new(Config { greeting: "good evening" }));
    let formal = container.create::<Greeter>()?;
    println!("{}", formal.greet(2));

    Ok(())
}
