//! Camera plugin: a fixed orthographic camera that always shows the same width.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera
//! Update:          viewport height = desired_width * window_height / window_width
//! ```
//!
//! The game is laid out for portrait screens, so width is the dimension to preserve.
//! `screen_to_world` is shared with gameplay code; without a camera (headless apps) it
//! treats window coordinates as world coordinates.

use bevy::camera::ScalingMode;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::window::PrimaryWindow;
use bevy_firefly::prelude::*;

use crate::common::{state::GameState, tunables::Tunables};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MainCamera {
    /// Width of the visible area, in world units.
    pub desired_width: f32,
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(Update, fit_camera_to_width.run_if(in_state(GameState::InGame)));
}

/// Visible height that keeps `desired_width` across a window of `window_size`.
pub fn viewport_height(desired_width: f32, window_size: Vec2) -> Option<f32> {
    if window_size.x <= 0.0 || window_size.y <= 0.0 {
        return None;
    }
    Some(desired_width * window_size.y / window_size.x)
}

/// Window position → world position through the main camera, if there is one.
pub fn screen_to_world(camera: Option<&(&Camera, &GlobalTransform)>, screen: Vec2) -> Vec2 {
    let Some((camera, camera_tf)) = camera else {
        return screen;
    };
    match camera.viewport_to_world_2d(camera_tf, screen) {
        Ok(world) => world,
        Err(e) => {
            debug!("viewport_to_world_2d failed: {e:?}");
            screen
        }
    }
}

fn spawn_camera(mut commands: Commands, tunables: Res<Tunables>) {
    let desired_width = tunables.camera.desired_width;
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera { desired_width },
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedHorizontal { viewport_width: desired_width },
            ..OrthographicProjection::default_2d()
        }),
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

pub fn fit_camera_to_width(
    window: Option<Single<&Window, With<PrimaryWindow>>>,
    mut q_cam: Query<(&MainCamera, &mut Projection)>,
) {
    let Some(window) = window else { return; };
    let size = window.size();

    for (main_cam, mut projection) in &mut q_cam {
        let Some(height) = viewport_height(main_cam.desired_width, size) else {
            continue;
        };
        // Read first so an unchanged projection is not flagged as changed.
        let Projection::Orthographic(ortho) = &*projection else {
            continue;
        };
        if let ScalingMode::FixedVertical { viewport_height } = ortho.scaling_mode {
            if (viewport_height - height).abs() <= f32::EPSILON {
                continue;
            }
        }
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scaling_mode = ScalingMode::FixedVertical { viewport_height: height };
        }
    }
}
