//! Drag-mode slider: a knob on a track beneath the player paddle.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{state::GameState, tunables::Tunables};
use crate::plugins::camera::{MainCamera, screen_to_world};
use crate::plugins::gestures::{GestureState, GestureUpdated};
use crate::plugins::paddle::PlayerPaddle;

const KNOB_HALF_SIZE: Vec2 = Vec2::new(0.4, 0.3);
const TRACK_GAP: f32 = 1.0;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SliderKnob {
    pub half_size: Vec2,
    /// Furthest the knob centre can travel from the track centre.
    pub limit: f32,
    pub grabbed: bool,
}

impl SliderKnob {
    /// Knob that stays fully inside a track of half width `track_half_width`.
    pub fn new(track_half_width: f32, half_size: Vec2) -> Self {
        Self { half_size, limit: (track_half_width - half_size.x).max(0.0), grabbed: false }
    }

    pub fn hit(&self, centre: Vec2, point: Vec2) -> bool {
        Rect::from_center_half_size(centre, self.half_size).contains(point)
    }
}

#[derive(Component, Debug)]
pub struct SliderTrack;

/// The knob moved to a new x.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct SliderMoved(pub f32);

pub(super) fn spawn_slider(commands: &mut Commands, tunables: &Tunables) {
    // Knob travel matches the paddle's rail.
    let track_half_width = tunables.player.horizontal_limit + KNOB_HALF_SIZE.x;
    let y = -(tunables.paddle.offset + TRACK_GAP);

    commands.spawn((
        Name::new("SliderTrack"),
        SliderTrack,
        Sprite::from_color(Color::srgb(0.16, 0.17, 0.2), Vec2::new(track_half_width * 2.0, 0.15)),
        Transform::from_xyz(0.0, y, -1.0),
        DespawnOnExit(GameState::InGame),
    ));
    commands.spawn((
        Name::new("SliderKnob"),
        SliderKnob::new(track_half_width, KNOB_HALF_SIZE),
        Sprite::from_color(Color::srgb(0.2, 0.75, 0.9), KNOB_HALF_SIZE * 2.0),
        Transform::from_xyz(0.0, y, 0.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// The knob only follows drags that started on it, and only when the touch moved sideways.
pub fn drag_slider_knob(
    mut updates: MessageReader<GestureUpdated>,
    camera: Option<Single<(&Camera, &GlobalTransform), With<MainCamera>>>,
    knob: Option<Single<(&mut SliderKnob, &mut Transform)>>,
    mut moved: MessageWriter<SliderMoved>,
) {
    let Some(knob) = knob else {
        updates.clear();
        return;
    };
    let (mut knob, mut tf) = knob.into_inner();

    for update in updates.read() {
        let touch = screen_to_world(camera.as_deref(), update.focus);
        match update.state {
            GestureState::Began => knob.grabbed = knob.hit(tf.translation.truncate(), touch),
            GestureState::Executing if knob.grabbed => {
                let delta_x = update.touches.first().map_or(0.0, |t| t.delta().x);
                if delta_x.abs() > 0.0 {
                    let x = touch.x.clamp(-knob.limit, knob.limit);
                    tf.translation.x = x;
                    moved.write(SliderMoved(x));
                }
            }
            GestureState::Ended => knob.grabbed = false,
            _ => {}
        }
    }
}

/// The paddle copies the knob's position.
pub fn follow_slider(
    mut moved: MessageReader<SliderMoved>,
    paddle: Option<Single<&mut Transform, (With<PlayerPaddle>, Without<SliderKnob>)>>,
) {
    let Some(SliderMoved(x)) = moved.read().last().copied() else {
        return;
    };
    let Some(mut tf) = paddle else {
        debug!("Slider moved but there is no player paddle");
        return;
    };
    tf.translation.x = x;
}
