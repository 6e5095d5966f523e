//! Long-press gesture recognizer.
//!
//! A zero-duration, unbounded-distance long press: any touch down begins the gesture, any
//! movement keeps it executing, and the gesture ends when the last tracked touch lifts.
//!
//! ```text
//!            first touch down        touch moved / added / lifted (others remain)
//! Possible ─────────────────► Began ─────────────────► Executing ─┐
//!    ▲                          │                          ▲  └────┘
//!    │                          └──── last touch lifted ───┴──────► Ended
//!    └──────────────────────────── next event ─────────────────────────┘
//! ```
//!
//! Raw `TouchInput` messages go in, `GestureUpdated` messages come out. On desktop the left
//! mouse button is replayed as a touch so the game stays playable without a touch screen.

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::common::{state::GameState, tunables::Tunables};

/// Touch id used for the emulated mouse touch.
pub const MOUSE_TOUCH_ID: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Possible,
    Began,
    Executing,
    Ended,
}

/// A touch the recognizer is following. Positions are in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedTouch {
    pub id: u64,
    pub position: Vec2,
    pub previous: Vec2,
}

impl TrackedTouch {
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.position - self.previous
    }
}

#[derive(Message, Debug, Clone, PartialEq)]
pub struct GestureUpdated {
    pub state: GestureState,
    /// Mean position of the tracked touches (window coordinates).
    pub focus: Vec2,
    pub touches: Vec<TrackedTouch>,
    /// A new touch joined the gesture with this update (including the first one).
    pub received_additional_touches: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct LongPressGesture {
    pub max_touches: usize,
    tracked: Vec<TrackedTouch>,
    ignored: Vec<u64>,
    state: GestureState,
    focus: Vec2,
    received_additional_touches: bool,
}

impl LongPressGesture {
    pub fn new(max_touches: usize) -> Self {
        Self {
            max_touches: max_touches.max(1),
            tracked: Vec::new(),
            ignored: Vec::new(),
            state: GestureState::Possible,
            focus: Vec2::ZERO,
            received_additional_touches: false,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn focus(&self) -> Vec2 {
        self.focus
    }

    pub fn tracked(&self) -> &[TrackedTouch] {
        &self.tracked
    }

    /// Stop following a touch. Its remaining events are dropped until it lifts.
    pub fn invalidate(&mut self, id: u64) {
        if let Some(idx) = self.tracked.iter().position(|t| t.id == id) {
            self.tracked.remove(idx);
            self.ignored.push(id);
            if !self.tracked.is_empty() {
                self.focus = self.mean_position();
            }
        }
    }

    /// Feed one raw touch event. Returns the resulting update, or `None` when the event
    /// does not concern this gesture.
    pub fn handle(&mut self, phase: TouchPhase, id: u64, position: Vec2) -> Option<GestureUpdated> {
        if self.state == GestureState::Ended {
            self.state = GestureState::Possible;
        }
        self.received_additional_touches = false;

        match phase {
            TouchPhase::Started => {
                if self.ignored.contains(&id)
                    || self.tracked.len() >= self.max_touches
                    || self.tracked.iter().any(|t| t.id == id)
                {
                    return None;
                }
                self.tracked.push(TrackedTouch { id, position, previous: position });
                self.received_additional_touches = true;
                self.focus = self.mean_position();
                self.state = if self.tracked.len() == 1 && self.state == GestureState::Possible {
                    GestureState::Began
                } else {
                    GestureState::Executing
                };
            }
            TouchPhase::Moved => {
                let touch = self.tracked.iter_mut().find(|t| t.id == id)?;
                touch.previous = touch.position;
                touch.position = position;
                self.focus = self.mean_position();
                self.state = GestureState::Executing;
            }
            TouchPhase::Ended | TouchPhase::Canceled => {
                if let Some(idx) = self.ignored.iter().position(|&i| i == id) {
                    self.ignored.swap_remove(idx);
                    // Every touch was invalidated: nothing is left to end the gesture.
                    let in_progress =
                        matches!(self.state, GestureState::Began | GestureState::Executing);
                    if !self.tracked.is_empty() || !in_progress {
                        return None;
                    }
                    self.focus = position;
                    self.state = GestureState::Ended;
                    return Some(self.snapshot());
                }
                let idx = self.tracked.iter().position(|t| t.id == id)?;
                self.tracked.remove(idx);
                if self.tracked.is_empty() {
                    self.focus = position;
                    self.state = GestureState::Ended;
                } else {
                    self.focus = self.mean_position();
                    self.state = GestureState::Executing;
                }
            }
        }

        Some(self.snapshot())
    }

    fn snapshot(&self) -> GestureUpdated {
        GestureUpdated {
            state: self.state,
            focus: self.focus,
            touches: self.tracked.clone(),
            received_additional_touches: self.received_additional_touches,
        }
    }

    fn mean_position(&self) -> Vec2 {
        if self.tracked.is_empty() {
            return self.focus;
        }
        self.tracked.iter().map(|t| t.position).sum::<Vec2>() / self.tracked.len() as f32
    }
}

pub fn plugin(app: &mut App) {
    let max_touches = app.world().resource::<Tunables>().player.control_mode.max_tracked_touches();
    app.insert_resource(LongPressGesture::new(max_touches))
        .add_message::<TouchInput>()
        .add_message::<GestureUpdated>()
        .add_systems(
            Update,
            (mouse_as_touch, recognize_long_press.after(mouse_as_touch))
                .run_if(in_state(GameState::InGame)),
        );
}

pub fn recognize_long_press(
    mut input: MessageReader<TouchInput>,
    mut gesture: ResMut<LongPressGesture>,
    mut updates: MessageWriter<GestureUpdated>,
) {
    for touch in input.read() {
        if let Some(update) = gesture.handle(touch.phase, touch.id, touch.position) {
            updates.write(update);
        }
    }
}

/// Replay the left mouse button as a touch with id [`MOUSE_TOUCH_ID`].
pub fn mouse_as_touch(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    window: Option<Single<(Entity, &Window), With<PrimaryWindow>>>,
    mut last: Local<Option<Vec2>>,
    mut writer: MessageWriter<TouchInput>,
) {
    let Some(buttons) = buttons else { return; };
    let Some(window) = window else { return; };
    let (window_e, window) = *window;

    let phase = if buttons.just_pressed(MouseButton::Left) {
        TouchPhase::Started
    } else if buttons.just_released(MouseButton::Left) {
        TouchPhase::Ended
    } else if buttons.pressed(MouseButton::Left) {
        TouchPhase::Moved
    } else {
        return;
    };

    let position = match (window.cursor_position(), *last) {
        (Some(p), _) => p,
        // Cursor left the window: finish where we last saw it.
        (None, Some(p)) => p,
        (None, None) => return,
    };
    if phase == TouchPhase::Moved && *last == Some(position) {
        return;
    }
    *last = if phase == TouchPhase::Ended { None } else { Some(position) };

    writer.write(TouchInput {
        phase,
        position,
        window: window_e,
        force: None,
        id: MOUSE_TOUCH_ID,
    });
}
