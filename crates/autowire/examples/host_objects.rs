// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Resolves objects owned by a host runtime and recovers when the host destroys them.
//!
//! `FakeHost` stands in for a runtime such as a game engine scene: it owns some objects, can
//! destroy them at any time, and tells the container which of its cached values are still alive.

use std::sync::Arc;

use autowire::testing::FakeHost;
use autowire::{Constructors, Container, Injectable};
use ohno::AppError;

struct Player {
    name: &'static str,
}

impl Injectable for Player {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|| Self { name: "placeholder" });
    }
}

struct Scoreboard {
    player: Arc<Player>,
}

impl Injectable for Scoreboard {
    fn constructors(constructors: &mut Constructors<Self>) {
        constructors.add(|player: Arc<Player>| Self { player });
    }
}

fn main() -> Result<(), AppError> {
    let host = FakeHost::new();
    let hero = host.spawn(Player { name: "hero" });

    let mut container = Container::builder().liveness(host.clone()).build();
    container.bind_self::<Player>();

    // The player already lives in the host, so it is found rather than constructed.
    let scoreboard = container.get::<Scoreboard>()?;
    println!("tracking {}", scoreboard.player.name);

    // Once the host destroys it, the next request falls back to construction.
    host.destroy(&hero);
    let player = container.get::<Player>()?;
    println!("now tracking {}", player.name);

    Ok(())
}
