// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for call-scoped overrides.

use std::sync::Arc;

use autowire::{Constructors, Container, Injectable, Overrides};

#[derive(Debug)]
struct RequestId(u64);

impl Injectable for RequestId {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self(0));
    }
}

#[derive(Debug)]
struct Session {
    request: Arc<RequestId>,
}

impl Injectable for Session {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|request: Arc<RequestId>| Self { request });
    }
}

#[derive(Debug)]
struct Handler {
    session: Arc<Session>,
}

impl Injectable for Handler {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|session: Arc<Session>| Self { session });
    }
}

trait Sink: Send + Sync {
    fn label(&self) -> &'static str;
}

#[derive(Debug)]
struct Console;

impl Sink for Console {
    fn label(&self) -> &'static str {
        "console"
    }
}

impl Injectable for Console {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self);
    }
}

autowire::implements!(Console => dyn Sink);

#[derive(Debug)]
struct Silent;

impl Sink for Silent {
    fn label(&self) -> &'static str {
        "silent"
    }
}

fn bound_container() -> Container {
    let mut container = Container::new();
    container.bind_self::<RequestId>();
    container.bind_self::<Session>();
    container
}

#[test]
fn override_replaces_bound_parameter() {
    let mut container = bound_container();
    let request = Arc::new(RequestId(42));

    let session = container
        .get_with::<Session>(&Overrides::new().with_shared(Arc::clone(&request)))
        .expect("session constructs");

    assert!(Arc::ptr_eq(&session.request, &request));
}

#[test]
fn override_reaches_nested_dependencies() {
    let mut container = bound_container();

    let handler = container
        .get_with::<Handler>(&Overrides::new().with(RequestId(7)))
        .expect("handler constructs");

    assert_eq!(handler.session.request.0, 7);
}

#[test]
fn override_is_not_cached() {
    let mut container = bound_container();

    let session = container
        .get_with::<Session>(&Overrides::new().with(RequestId(7)))
        .expect("session constructs");
    assert_eq!(session.request.0, 7);
    assert!(!container.is_cached::<RequestId>());

    let request = container.get::<RequestId>().expect("request id constructs");
    assert_eq!(request.0, 0);
}

#[test]
fn override_applies_to_one_call_only() {
    let mut container = bound_container();

    let overridden = container
        .create_with::<Session>(&Overrides::new().with(RequestId(7)))
        .expect("session constructs");
    let plain = container.create::<Session>().expect("session constructs");

    assert_eq!(overridden.request.0, 7);
    assert_eq!(plain.request.0, 0);
}

#[test]
fn live_cached_value_beats_override() {
    let mut container = bound_container();
    let cached = container.get::<RequestId>().expect("request id constructs");

    let session = container
        .get_with::<Session>(&Overrides::new().with(RequestId(7)))
        .expect("session constructs");

    assert!(Arc::ptr_eq(&session.request, &cached));
}

#[test]
fn first_matching_override_wins() {
    let mut container = bound_container();

    let session = container
        .create_with::<Session>(&Overrides::new().with(RequestId(1)).with(RequestId(2)))
        .expect("session constructs");

    assert_eq!(session.request.0, 1);
}

#[test]
fn override_satisfies_top_level_request() {
    let mut container = Container::new();

    let request = container
        .resolve_with::<RequestId>(&Overrides::new().with(RequestId(3)))
        .expect("override supplies the value");

    assert_eq!(request.0, 3);
    assert!(!container.is_cached::<RequestId>());
}

#[test]
fn override_does_not_match_interfaces() {
    let mut container = Container::new();
    container.bind::<dyn Sink, Console>();

    let sink = container
        .resolve_with::<dyn Sink>(&Overrides::new().with(Silent))
        .expect("sink constructs");

    assert_eq!(sink.label(), "console");
}

#[test]
fn override_does_not_make_constructors_eligible() {
    #[derive(Debug)]
    struct Tagged {
        tag: Option<Arc<String>>,
    }

    impl Injectable for Tagged {
        fn constructors(constructors: &mut Constructors<Self>) {
            constructors
                .add(|| Self { tag: None })
                .add(|tag: Arc<String>| Self { tag: Some(tag) });
        }
    }

    let mut container = Container::new();
    let tagged = container
        .create_with::<Tagged>(&Overrides::new().with("blue".to_string()))
        .expect("tagged constructs");

    assert!(tagged.tag.is_none());
}
