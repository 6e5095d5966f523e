//! Ball plugin: spawn, random launch, relaunch after a goal, and the speed governor.
//!
//! ```text
//! OnEnter(InGame): spawn ball at the centre, launched with a random force
//! FixedUpdate:     relaunch balls whose respawn delay elapsed
//!                  clamp every moving ball's speed to [min_speed, max_speed]
//! ```

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use rand::Rng;

use crate::common::{
    layers::Layer, rng::GameRng, state::GameState, tunables::{BallTunables, Tunables},
};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Ball {
    pub fn from_tunables(t: &BallTunables) -> Self {
        Self { min_speed: t.min_speed, max_speed: t.max_speed.max(t.min_speed) }
    }

    /// Rescale `velocity` so its speed lies in `[min_speed, max_speed]`.
    ///
    /// A ball at rest stays at rest: it is waiting on the respawn point.
    pub fn govern(&self, velocity: Vec2) -> Vec2 {
        let speed = velocity.length();
        if speed <= f32::EPSILON {
            return velocity;
        }
        velocity * (speed.clamp(self.min_speed, self.max_speed) / speed)
    }

    #[inline]
    pub fn speed(velocity: &LinearVelocity) -> f32 {
        velocity.0.length()
    }
}

/// Ball resting on the respawn point until the timer runs out.
#[derive(Component, Debug, Deref, DerefMut)]
pub struct PendingRelaunch(pub Timer);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_ball)
        .add_systems(
            FixedUpdate,
            (relaunch_balls, govern_ball_speed.after(relaunch_balls))
                .run_if(in_state(GameState::InGame)),
        );
}

/// Uniform over `(-limit, -dead_zone] ∪ [dead_zone, limit)`.
///
/// Equivalent to resampling `(-limit, limit)` until the magnitude reaches `dead_zone`.
fn sample_outside_dead_zone(rng: &mut impl Rng, limit: f32, dead_zone: f32) -> f32 {
    let limit = limit.abs();
    let dead_zone = dead_zone.abs();
    let magnitude = if dead_zone < limit { rng.random_range(dead_zone..limit) } else { limit };
    if rng.random_bool(0.5) { magnitude } else { -magnitude }
}

pub fn random_launch_force(rng: &mut impl Rng, t: &BallTunables) -> Vec2 {
    Vec2::new(
        sample_outside_dead_zone(rng, t.launch_force_x, t.launch_dead_zone_x),
        sample_outside_dead_zone(rng, t.launch_force_y, t.launch_dead_zone_y),
    )
}

/// Velocity of a freshly launched ball.
pub fn launch_velocity(rng: &mut impl Rng, t: &BallTunables) -> Vec2 {
    random_launch_force(rng, t) * t.launch_scale
}

fn spawn_ball(mut commands: Commands, tunables: Res<Tunables>, mut rng: ResMut<GameRng>) {
    let t = &tunables.ball;
    let velocity = launch_velocity(&mut rng.0, t);
    debug!("Ball launched with velocity {velocity}");

    commands.spawn((
        Name::new("Ball"),
        Ball::from_tunables(t),
        Sprite {
            color: Color::srgb(0.95, 0.95, 0.9),
            custom_size: Some(Vec2::splat(t.radius * 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        RigidBody::Dynamic,
        Collider::circle(t.radius),
        CollisionLayers::new(Layer::Ball, [Layer::World, Layer::Paddle, Layer::Goal]),
        Restitution::new(1.0).with_combine_rule(CoefficientCombine::Max),
        Friction::ZERO.with_combine_rule(CoefficientCombine::Min),
        LockedAxes::ROTATION_LOCKED,
        LinearVelocity(velocity),
        // Deflectors and goals react to this ball's collision messages.
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
}

pub fn relaunch_balls(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut rng: ResMut<GameRng>,
    mut q: Query<(Entity, &mut PendingRelaunch, &mut LinearVelocity), With<Ball>>,
) {
    for (e, mut pending, mut vel) in &mut q {
        pending.tick(time.delta());
        if !pending.is_finished() {
            continue;
        }
        vel.0 = launch_velocity(&mut rng.0, &tunables.ball);
        commands.entity(e).remove::<PendingRelaunch>();
        info!("Ball relaunched with velocity {}", vel.0);
    }
}

pub fn govern_ball_speed(mut q: Query<(&Ball, &mut LinearVelocity)>) {
    for (ball, mut vel) in &mut q {
        let governed = ball.govern(vel.0);
        if governed != vel.0 {
            vel.0 = governed;
        }
    }
}
