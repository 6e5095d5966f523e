//! Player control plugin: turns long-press gestures into paddle movement.
//!
//! Pipeline (Update, after the recognizer):
//! - `drive_player_paddle`: gesture focus → world → [`ControlState`] → body/position/force
//! - `slider::drag_slider_knob` → `SliderMoved` → `slider::follow_slider` (Drag mode only)
//!
//! Modes:
//! - `Drag`: drag a slider knob beneath the paddle; the paddle copies the knob's x.
//! - `Joystick`: the first touch is the joystick centre; leaning past the threshold pushes
//!   the paddle with a constant force.
//! - `JoystickDrag`: long-press anywhere and drag; the paddle moves by the same offset.
//! - `LeftRight`: the screen is split into two zones; pressing one pushes the paddle
//!   towards it. Two touches are tracked and the newest one wins.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use serde::Deserialize;

use crate::common::{state::GameState, tunables::{PlayerTunables, Tunables}};
use crate::plugins::camera::{MainCamera, screen_to_world};
use crate::plugins::gestures::{GestureState, GestureUpdated, LongPressGesture, recognize_long_press};
use crate::plugins::paddle::PlayerPaddle;

mod machine;
pub mod slider;

pub use machine::{ControlState, PaddleDrive, ZoneLayout, ZoneSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ControlMode {
    Drag,
    Joystick,
    #[default]
    JoystickDrag,
    LeftRight,
}

impl ControlMode {
    pub fn max_tracked_touches(self) -> usize {
        match self {
            Self::LeftRight => 2,
            _ => 1,
        }
    }

    /// Position-driven modes move a kinematic body; force-driven ones a dynamic body.
    pub fn initial_body(self) -> RigidBody {
        match self {
            Self::Drag | Self::JoystickDrag => RigidBody::Kinematic,
            Self::Joystick | Self::LeftRight => RigidBody::Dynamic,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PlayerControl {
    pub mode: ControlMode,
    pub horizontal_limit: f32,
    pub speed_force: f32,
    pub joystick_threshold: f32,
}

impl PlayerControl {
    pub fn from_tunables(t: &PlayerTunables) -> Self {
        Self {
            mode: t.control_mode,
            horizontal_limit: t.horizontal_limit,
            speed_force: t.speed_force,
            joystick_threshold: t.joystick_threshold,
        }
    }

    #[inline]
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(-self.horizontal_limit, self.horizontal_limit)
    }

    pub fn zone_force(&self, zone: Option<ZoneSide>) -> f32 {
        match zone {
            Some(ZoneSide::Left) => -self.speed_force,
            Some(ZoneSide::Right) => self.speed_force,
            None => 0.0,
        }
    }

    pub fn joystick_force(&self, offset: f32) -> f32 {
        if offset.abs() > self.joystick_threshold {
            offset.signum() * self.speed_force
        } else {
            0.0
        }
    }
}

/// Screen region that pushes the paddle towards `side` while pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ControlZone {
    pub side: ZoneSide,
    pub half_size: Vec2,
}

pub fn plugin(app: &mut App) {
    app.add_message::<slider::SliderMoved>()
        .add_systems(OnEnter(GameState::InGame), spawn_control_surfaces)
        .add_systems(
            Update,
            (
                drive_player_paddle,
                slider::drag_slider_knob,
                slider::follow_slider.after(slider::drag_slider_knob),
            )
                .after(recognize_long_press)
                .run_if(in_state(GameState::InGame)),
        );
}

/// Zones for LeftRight, the slider for Drag; other modes need nothing on screen.
fn spawn_control_surfaces(mut commands: Commands, tunables: Res<Tunables>) {
    let mode = tunables.player.control_mode;
    info!("Player control mode: {mode:?}");

    match mode {
        ControlMode::LeftRight => {
            let arena = &tunables.arena;
            let half_size = Vec2::new(arena.half_width / 2.0, arena.half_height / 2.0);
            for (side, name, x, color) in [
                (ZoneSide::Left, "LeftControlZone", -half_size.x, Color::srgba(0.2, 0.75, 0.9, 0.06)),
                (ZoneSide::Right, "RightControlZone", half_size.x, Color::srgba(0.9, 0.75, 0.2, 0.06)),
            ] {
                commands.spawn((
                    Name::new(name),
                    ControlZone { side, half_size },
                    Sprite::from_color(color, half_size * 2.0),
                    Transform::from_xyz(x, -half_size.y, -2.0),
                    DespawnOnExit(GameState::InGame),
                ));
            }
        }
        ControlMode::Drag => slider::spawn_slider(&mut commands, &tunables),
        ControlMode::Joystick | ControlMode::JoystickDrag => {}
    }
}

pub fn drive_player_paddle(
    mut updates: MessageReader<GestureUpdated>,
    mut gesture: ResMut<LongPressGesture>,
    camera: Option<Single<(&Camera, &GlobalTransform), With<MainCamera>>>,
    q_zones: Query<(&ControlZone, &Transform), Without<PlayerPaddle>>,
    paddle: Option<
        Single<
            (&PlayerControl, &mut ControlState, &mut Transform, &mut RigidBody, &mut ConstantLocalForce),
            With<PlayerPaddle>,
        >,
    >,
) {
    let Some(paddle) = paddle else {
        updates.clear();
        return;
    };
    let (control, mut state, mut tf, mut body, mut force) = paddle.into_inner();

    let zones = ZoneLayout::collect(q_zones.iter().map(|(zone, zone_tf)| {
        (zone.side, Rect::from_center_half_size(zone_tf.translation.truncate(), zone.half_size))
    }));

    for update in updates.read() {
        if let Some(stale) = state.track_active_touch(control.mode, update) {
            gesture.invalidate(stale);
        }

        let touch = screen_to_world(camera.as_deref(), state.focus(control.mode, update));
        let drive = match update.state {
            GestureState::Began => state.begin(control, tf.translation.x, touch, &zones),
            GestureState::Executing => state.drag_to(control, touch, &zones),
            GestureState::Ended => state.end(),
            GestureState::Possible => continue,
        };
        drive.apply(&mut tf, &mut body, &mut force);
    }
}

#[cfg(test)]
mod tests;
