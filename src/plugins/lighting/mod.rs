//! Lighting plugin (Firefly) (render-only): a glow that travels with the ball.
//!
//! The glow dims while the ball waits on the respawn point after a goal.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::ball::{Ball, PendingRelaunch};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BallLight {
    pub live_intensity: f32,
    pub resting_intensity: f32,
}

impl Default for BallLight {
    fn default() -> Self {
        Self { live_intensity: 1.0, resting_intensity: 0.25 }
    }
}

impl BallLight {
    pub fn intensity(&self, resting: bool) -> f32 {
        if resting { self.resting_intensity } else { self.live_intensity }
    }
}

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), spawn_ball_light)
        .add_systems(Update, follow_ball.run_if(in_state(GameState::InGame)));
}

fn spawn_ball_light(mut commands: Commands) {
    let light = BallLight::default();
    commands.spawn((
        Name::new("BallLight"),
        light,
        PointLight2d {
            color: Color::srgb(1.0, 0.95, 0.85),
            intensity: light.live_intensity,
            radius: 4.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

pub fn follow_ball(
    q_ball: Query<(&Transform, Has<PendingRelaunch>), (With<Ball>, Without<BallLight>)>,
    mut q_light: Query<(&BallLight, &mut PointLight2d, &mut Transform), Without<Ball>>,
) {
    let Ok((tf_ball, resting)) = q_ball.single() else {
        return;
    };
    let Ok((glow, mut light, mut tf_light)) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_ball.translation.x;
    tf_light.translation.y = tf_ball.translation.y;

    let intensity = glow.intensity(resting);
    if light.intensity != intensity {
        light.intensity = intensity;
    }
}

#[cfg(test)]
mod tests;
