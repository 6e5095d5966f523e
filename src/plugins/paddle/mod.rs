//! Paddle plugin: spawns both paddles and keeps the player's inside its rail.
//!
//! Pipeline:
//! - OnEnter(InGame): spawn player paddle (bottom) and opponent paddle (top, rotated 180°)
//! - FixedUpdate: clamp the player paddle to `[-horizontal_limit, horizontal_limit]`
//!
//! Both paddles are ball deflectors. The player paddle's body type depends on the control
//! mode: position-driven modes use a kinematic body, force-driven modes a dynamic one.

use std::f32::consts::PI;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::ai::{AiOffset, AiPaddle};
use crate::plugins::control::{ControlState, PlayerControl};
use crate::plugins::deflector::BallDeflector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub width: f32,
    pub side: Side,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerPaddle {
    pub horizontal_limit: f32,
}

impl PlayerPaddle {
    #[inline]
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(-self.horizontal_limit, self.horizontal_limit)
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_paddles)
        .add_systems(FixedUpdate, clamp_player_paddle.run_if(in_state(GameState::InGame)));
}

fn spawn_paddles(mut commands: Commands, tunables: Res<Tunables>) {
    let t = &*tunables;
    let size = Vec2::new(t.paddle.width, t.paddle.height);
    let layers = CollisionLayers::new(Layer::Paddle, [Layer::Ball, Layer::World]);
    let deflector = BallDeflector::from_tunables(&t.deflector);
    let mode = t.player.control_mode;

    commands.spawn((
        Name::new("PlayerPaddle"),
        Paddle { width: size.x, side: Side::Player },
        PlayerPaddle { horizontal_limit: t.player.horizontal_limit },
        PlayerControl::from_tunables(&t.player),
        ControlState::default(),
        deflector,
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_xyz(0.0, -t.paddle.offset, 1.0),
        mode.initial_body(),
        Collider::rectangle(size.x, size.y),
        layers,
        (
            LockedAxes::ROTATION_LOCKED.lock_translation_y(),
            LinearDamping(t.player.linear_damping),
            ConstantLocalForce(Vec2::ZERO),
            LinearVelocity::ZERO,
        ),
        DespawnOnExit(GameState::InGame),
    ));

    commands.spawn((
        Name::new("OpponentPaddle"),
        Paddle { width: size.x, side: Side::Opponent },
        AiPaddle::from_tunables(&t.ai),
        AiOffset::default(),
        deflector,
        Sprite {
            color: Color::srgb(0.9, 0.35, 0.3),
            custom_size: Some(size),
            ..default()
        },
        // Facing down: its local up axis points at the player.
        Transform::from_xyz(0.0, t.paddle.offset, 1.0).with_rotation(Quat::from_rotation_z(PI)),
        RigidBody::Kinematic,
        Collider::rectangle(size.x, size.y),
        layers,
        DespawnOnExit(GameState::InGame),
    ));
}

/// Keep the player paddle on its rail. A paddle pushing past the limit loses that push.
pub fn clamp_player_paddle(
    mut q: Query<(&PlayerPaddle, &mut Transform, Option<&mut LinearVelocity>)>,
) {
    for (paddle, mut tf, vel) in &mut q {
        let x = tf.translation.x;
        let clamped = paddle.clamp_x(x);
        if clamped == x {
            continue;
        }
        tf.translation.x = clamped;
        if let Some(mut vel) = vel {
            if vel.0.x * (x - clamped) > 0.0 {
                vel.0.x = 0.0;
            }
        }
    }
}
