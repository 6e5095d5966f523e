//! Ball deflector: surfaces that steer the ball by where it hit them.
//!
//! When a ball separates from a deflector, its new direction is the deflector's local up
//! axis rotated towards the side it hit, by up to `max_deflection_angle` at the very edge.
//! The speed grows by `speed_increment` per bounce, capped by the ball's governor.
//!
//! Offsets are measured along the deflector's local x axis, so a paddle rotated by 180°
//! (the opponent's) behaves exactly like the player's from its own point of view.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;

use crate::common::{state::GameState, tunables::DeflectorTunables};
use crate::plugins::ball::Ball;
use crate::plugins::paddle::Paddle;

pub const MAX_DEFLECTION_ANGLE_LIMIT: f32 = 89.9;

/// How the hit offset maps to a fraction of the maximum deflection angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DeflectionCurve {
    #[default]
    Linear,
    /// Quadratic: hits near the centre stay almost straight.
    Exponential,
}

impl DeflectionCurve {
    pub fn fraction(self, width: f32, offset: f32) -> f32 {
        match self {
            Self::Linear => linear_fraction(width, offset),
            Self::Exponential => exponential_fraction(width, offset),
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BallDeflector {
    /// Degrees.
    pub max_deflection_angle: f32,
    pub speed_increment: f32,
    pub curve: DeflectionCurve,
}

impl BallDeflector {
    pub fn new(max_deflection_angle: f32, speed_increment: f32, curve: DeflectionCurve) -> Self {
        Self {
            max_deflection_angle: max_deflection_angle.clamp(0.0, MAX_DEFLECTION_ANGLE_LIMIT),
            speed_increment: speed_increment.clamp(0.0, 1.0),
            curve,
        }
    }

    pub fn from_tunables(t: &DeflectorTunables) -> Self {
        Self::new(t.max_deflection_angle, t.speed_increment, t.curve)
    }

    /// Velocity leaving a deflector with orientation `rotation`.
    pub fn deflected_velocity(&self, rotation: Quat, current_speed: f32, fraction: f32) -> Vec2 {
        let angle = (self.max_deflection_angle * fraction).to_radians();
        // Clockwise: a positive fraction (hit right of centre) sends the ball right.
        let local = Vec2::from_angle(-angle).rotate(Vec2::Y);
        let world = (rotation * local.extend(0.0)).truncate().normalize_or_zero();
        world * (current_speed + self.speed_increment)
    }
}

/// A ball left a deflector with a new velocity.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct BallDeflected {
    pub ball: Entity,
    pub deflector: Entity,
    pub speed: f32,
}

pub fn plugin(app: &mut App) {
    app.add_message::<BallDeflected>().add_systems(
        FixedPostUpdate,
        deflect_balls
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );
}

/// `offset / half_width`, clamped to `[-1, 1]`.
pub fn linear_fraction(width: f32, offset: f32) -> f32 {
    if width <= 0.0 {
        return 0.0;
    }
    (offset / (width / 2.0)).clamp(-1.0, 1.0)
}

/// `sign(offset) * (offset / half_width)²`, clamped to `[-1, 1]`.
pub fn exponential_fraction(width: f32, offset: f32) -> f32 {
    if width <= 0.0 || offset == 0.0 {
        return 0.0;
    }
    offset.signum() * (offset.powi(2) / (width / 2.0).powi(2)).clamp(0.0, 1.0)
}

/// Offset of `point` from the deflector centre along the deflector's local x axis.
#[inline]
pub fn local_offset(deflector: &Transform, point: Vec2) -> f32 {
    let relative = (point - deflector.translation.truncate()).extend(0.0);
    (deflector.rotation.inverse() * relative).x
}

/// React to a ball leaving a deflector's collider.
pub fn deflect_balls(
    mut ended: MessageReader<CollisionEnd>,
    q_deflectors: Query<(&BallDeflector, &Paddle, &Transform), Without<Ball>>,
    mut q_balls: Query<(&Ball, &Transform, &mut LinearVelocity), Without<BallDeflector>>,
    mut deflected: MessageWriter<BallDeflected>,
) {
    for ev in ended.read() {
        let a = ev.body1.unwrap_or(ev.collider1);
        let b = ev.body2.unwrap_or(ev.collider2);

        let (ball_e, deflector_e) = if q_balls.contains(a) && q_deflectors.contains(b) {
            (a, b)
        } else if q_balls.contains(b) && q_deflectors.contains(a) {
            (b, a)
        } else {
            continue;
        };

        let Ok((deflector, paddle, deflector_tf)) = q_deflectors.get(deflector_e) else {
            continue;
        };
        let Ok((ball, ball_tf, mut vel)) = q_balls.get_mut(ball_e) else {
            continue;
        };

        let offset = local_offset(deflector_tf, ball_tf.translation.truncate());
        let fraction = deflector.curve.fraction(paddle.width, offset);
        let new_velocity = ball.govern(deflector.deflected_velocity(
            deflector_tf.rotation,
            Ball::speed(&vel),
            fraction,
        ));

        debug!("Deflected ball at offset {offset:.3} (fraction {fraction:.3}) -> {new_velocity}");
        vel.0 = new_velocity;
        deflected.write(BallDeflected {
            ball: ball_e,
            deflector: deflector_e,
            speed: new_velocity.length(),
        });
    }
}
