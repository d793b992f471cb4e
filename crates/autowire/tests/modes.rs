// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for strict and permissive handling of unresolvable arguments.

use std::any::type_name;
use std::error::Error as _;
use std::sync::Arc;

use autowire::{Constructors, Container, Injectable, ResolutionMode, ResolveFailure};
use rstest::rstest;

trait Database: Send + Sync {}

// Bound, but its only constructor needs a type nobody binds.
#[derive(Debug)]
struct Unreachable;

impl Database for Unreachable {}

impl Injectable for Unreachable {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|_: Arc<Credentials>| Self);
    }
}

autowire::implements!(Unreachable => dyn Database);

#[derive(Debug)]
struct Credentials;

#[derive(Debug)]
struct Clock;

impl Injectable for Clock {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self);
    }
}

#[derive(Debug)]
struct Reporter {
    has_database: bool,
}

impl Injectable for Reporter {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|database: Option<Arc<dyn Database>>, _clock: Arc<Clock>| Self {
            has_database: database.is_some(),
        });
    }
}

#[derive(Debug)]
struct Exporter;

impl Injectable for Exporter {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|_: Arc<dyn Database>| Self);
    }
}

fn container(mode: ResolutionMode) -> Container {
    let mut container = Container::builder().mode(mode).build();
    container.bind::<dyn Database, Unreachable>();
    container.bind_self::<Clock>();
    container
}

#[test]
fn strict_is_the_default() {
    assert_eq!(Container::new().mode(), ResolutionMode::Strict);
}

#[test]
fn strict_fails_on_missing_argument() {
    let mut container = container(ResolutionMode::Strict);

    let error = container.get::<Reporter>().expect_err("database cannot be built");
    assert_eq!(
        error.failure(),
        &ResolveFailure::MissingDependency {
            parameter: type_name::<dyn Database>()
        }
    );
    assert_eq!(error.requested(), type_name::<Reporter>());

    let cause = error.source().expect("the dependency's error is kept");
    assert!(cause.to_string().contains("Database"), "got: {cause}");
    assert!(!container.is_cached::<Reporter>());
}

#[test]
fn permissive_passes_absent_optional_argument() {
    let mut container = container(ResolutionMode::Permissive);

    let reporter = container.get::<Reporter>().expect("reporter is built without a database");
    assert!(!reporter.has_database);
    assert!(container.is_cached::<Reporter>());
}

#[rstest]
#[case(ResolutionMode::Strict)]
#[case(ResolutionMode::Permissive)]
fn required_argument_fails_in_every_mode(#[case] mode: ResolutionMode) {
    let mut container = container(mode);

    let error = container.get::<Exporter>().expect_err("database cannot be built");
    assert_eq!(
        error.failure(),
        &ResolveFailure::MissingDependency {
            parameter: type_name::<dyn Database>()
        }
    );
}

#[rstest]
#[case(ResolutionMode::Strict)]
#[case(ResolutionMode::Permissive)]
fn optional_argument_is_passed_when_resolvable(#[case] mode: ResolutionMode) {
    let mut container = container(mode);
    container.bind_shared(Arc::new(Credentials));

    let reporter = container.get::<Reporter>().expect("database is built");
    assert!(reporter.has_database);
}

#[rstest]
#[case(ResolutionMode::Strict)]
#[case(ResolutionMode::Permissive)]
fn top_level_failures_are_reported_in_every_mode(#[case] mode: ResolutionMode) {
    let mut container = container(mode);

    let error = container.resolve::<dyn Database>().err().expect("credentials are not bound");
    assert_eq!(error.failure(), &ResolveFailure::NoEligibleConstructor);
}
