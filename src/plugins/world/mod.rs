//! World plugin: spawns the side walls and the centre line.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};

const DASH_LENGTH: f32 = 0.3;
const DASH_GAP: f32 = 0.2;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_walls);
    app.add_systems(OnEnter(GameState::InGame), spawn_centre_line);
}

fn spawn_walls(mut commands: Commands, tunables: Res<Tunables>) {
    let arena = &tunables.arena;
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let thickness = arena.wall_thickness;
    let size = Vec2::new(thickness, arena.half_height * 2.0 + thickness * 2.0);

    let wall_layers = CollisionLayers::new(Layer::World, [Layer::Ball, Layer::Paddle]);

    for (name, x) in [
        ("WallLeft", -arena.half_width - thickness * 0.5),
        ("WallRight", arena.half_width + thickness * 0.5),
    ] {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(x, 0.0, 0.0),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            Restitution::new(1.0).with_combine_rule(CoefficientCombine::Max),
            Friction::ZERO,
            wall_layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Dashed line across the middle of the arena, built from plain sprites.
fn spawn_centre_line(mut commands: Commands, tunables: Res<Tunables>) {
    let half_width = tunables.arena.half_width;
    let stride = DASH_LENGTH + DASH_GAP;
    let dashes = ((half_width * 2.0) / stride).floor() as i32;
    let start = -half_width + DASH_LENGTH * 0.5 + DASH_GAP * 0.5;

    (0..dashes)
        .map(|i| start + i as f32 * stride)
        .for_each(|x| {
            commands.spawn((
                Sprite::from_color(Color::srgb(0.18, 0.18, 0.22), Vec2::new(DASH_LENGTH, 0.05)),
                Transform::from_xyz(x, 0.0, -1.0),
                DespawnOnExit(GameState::InGame),
            ));
        });
}

#[cfg(test)]
mod tests;
