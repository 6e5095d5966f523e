//! Opponent AI: the top paddle shadows the ball along its rail.
//!
//! - `Follow`: stay directly under the ball.
//! - `RandomOffset`: after every bounce, drift to a random spot along the paddle so the
//!   ball comes off at a different angle. The drift speed scales with the ball speed.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::common::{rng::GameRng, state::GameState, tunables::AiTunables};
use crate::plugins::ball::Ball;
use crate::plugins::deflector::BallDeflected;
use crate::plugins::paddle::Paddle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AiKind {
    #[default]
    Follow,
    RandomOffset,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AiPaddle {
    pub kind: AiKind,
    pub horizontal_limit: f32,
    /// Fraction of the paddle width used for random hit spots, in `[0, 1]`.
    pub safety_margin: f32,
}

impl AiPaddle {
    pub fn from_tunables(t: &AiTunables) -> Self {
        Self {
            kind: t.kind,
            horizontal_limit: t.horizontal_limit,
            safety_margin: t.safety_margin.clamp(0.0, 1.0),
        }
    }

    /// Target x for a ball at `ball_x`.
    pub fn target_x(&self, ball_x: f32, offset: f32) -> f32 {
        let offset = match self.kind {
            AiKind::Follow => 0.0,
            AiKind::RandomOffset => offset,
        };
        (ball_x + offset).clamp(-self.horizontal_limit, self.horizontal_limit)
    }
}

/// Hit-spot offset, moving towards `target` by a fixed `step` per frame.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AiOffset {
    pub current: f32,
    pub target: f32,
    pub step: f32,
}

impl AiOffset {
    /// Start drifting to `target`. The step is fixed now, from the ball speed and frame time.
    pub fn retarget(&mut self, target: f32, ball_speed: f32, dt: f32) {
        self.target = target;
        self.step = (target - self.current) * ball_speed / 2.0 * dt;
    }

    pub fn advance(&mut self) {
        let remaining = self.target - self.current;
        if remaining == 0.0 {
            return;
        }
        if self.step != 0.0 && remaining.abs() > self.step.abs() {
            self.current += self.step;
        } else {
            self.current = self.target;
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (retarget_on_deflection, advance_offsets, follow_ball)
            .chain()
            .run_if(in_state(GameState::InGame)),
    );
}

pub fn retarget_on_deflection(
    time: Res<Time>,
    mut rng: ResMut<GameRng>,
    mut deflected: MessageReader<BallDeflected>,
    mut q_ai: Query<(&AiPaddle, &Paddle, &mut AiOffset)>,
) {
    let Some(speed) = deflected.read().last().map(|ev| ev.speed) else {
        return;
    };
    let dt = time.delta_secs();

    for (ai, paddle, mut offset) in &mut q_ai {
        if ai.kind != AiKind::RandomOffset {
            continue;
        }
        let reach = paddle.width / 2.0 * ai.safety_margin;
        let target = rng.0.random_range(-reach..=reach);
        offset.retarget(target, speed, dt);
        debug!("AI aiming {target:.3} off centre");
    }
}

pub fn advance_offsets(mut q: Query<&mut AiOffset>) {
    for mut offset in &mut q {
        if offset.current != offset.target {
            offset.advance();
        }
    }
}

pub fn follow_ball(
    q_ball: Query<&Transform, (With<Ball>, Without<AiPaddle>)>,
    mut q_ai: Query<(&AiPaddle, &AiOffset, &mut Transform), Without<Ball>>,
) {
    let Ok(ball_tf) = q_ball.single() else {
        return;
    };
    let ball_x = ball_tf.translation.x;

    for (ai, offset, mut tf) in &mut q_ai {
        tf.translation.x = ai.target_x(ball_x, offset.current);
    }
}
