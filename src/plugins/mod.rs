//! Feature plugins.

use bevy::prelude::*;

pub mod ai;
pub mod ball;
pub mod control;
pub mod core;
pub mod deflector;
pub mod gestures;
pub mod goals;
pub mod paddle;
pub mod physics;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: later plugins read `Tunables` while building.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    ball::plugin(app);
    deflector::plugin(app);
    paddle::plugin(app);
    gestures::plugin(app);
    control::plugin(app);
    ai::plugin(app);
    goals::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}
