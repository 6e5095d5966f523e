//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `touch_pong::game::configure_headless` to install gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use touch_pong::common::tunables::Tunables;

pub fn app_headless() -> App {
    app_with(Tunables::default())
}

/// Headless app with explicit tunables (the config file is not consulted).
///
/// The fixed timestep is made very long so no physics step runs during a test:
/// assertions then see exactly what the Update systems wrote.
pub fn app_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(tunables);
    app.insert_resource(Time::<Fixed>::from_seconds(1000.0));

    touch_pong::game::configure_headless(&mut app);
    app
}

pub fn touch(app: &mut App, phase: TouchPhase, id: u64, position: Vec2) {
    app.world_mut().write_message(TouchInput {
        phase,
        position,
        window: Entity::PLACEHOLDER,
        force: None,
        id,
    });
}
