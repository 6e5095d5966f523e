//! Touch-to-paddle state machine.
//!
//! Pure logic: gesture phases in, a [`PaddleDrive`] out. All positions are world units.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::plugins::gestures::{GestureUpdated, TrackedTouch};

use super::{ControlMode, PlayerControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneSide {
    Left,
    Right,
}

/// World rectangles of the left/right control zones, when present.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ZoneLayout {
    pub left: Option<Rect>,
    pub right: Option<Rect>,
}

impl ZoneLayout {
    pub fn collect(zones: impl IntoIterator<Item = (ZoneSide, Rect)>) -> Self {
        zones.into_iter().fold(Self::default(), |mut layout, (side, rect)| {
            match side {
                ZoneSide::Left => layout.left = Some(rect),
                ZoneSide::Right => layout.right = Some(rect),
            }
            layout
        })
    }

    /// Left wins where the zones overlap.
    pub fn select(&self, point: Vec2) -> Option<ZoneSide> {
        if self.left.is_some_and(|r| r.contains(point)) {
            Some(ZoneSide::Left)
        } else if self.right.is_some_and(|r| r.contains(point)) {
            Some(ZoneSide::Right)
        } else {
            None
        }
    }
}

/// What to do to the paddle body. `None` fields are left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaddleDrive {
    pub body: Option<RigidBody>,
    pub position_x: Option<f32>,
    pub force_x: Option<f32>,
}

impl PaddleDrive {
    pub fn apply(&self, tf: &mut Transform, body: &mut RigidBody, force: &mut ConstantLocalForce) {
        if let Some(kind) = self.body {
            *body = kind;
        }
        if let Some(x) = self.position_x {
            tf.translation.x = x;
        }
        if let Some(f) = self.force_x {
            force.0 = Vec2::new(f, 0.0);
        }
    }
}

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Paddle x when the drag began (JoystickDrag).
    pub paddle_reference: Option<f32>,
    /// Touch x when the drag began (JoystickDrag) or joystick centre (Joystick).
    pub joystick_reference: Option<f32>,
    /// The touch steering the paddle (LeftRight).
    pub active_touch: Option<TrackedTouch>,
}

impl ControlState {
    /// Follow the newest touch in LeftRight mode.
    ///
    /// Returns the id of a touch that was superseded and should be invalidated.
    pub fn track_active_touch(&mut self, mode: ControlMode, update: &GestureUpdated) -> Option<u64> {
        if mode != ControlMode::LeftRight {
            return None;
        }

        self.active_touch = self
            .active_touch
            .and_then(|active| update.touches.iter().find(|t| t.id == active.id).copied());

        if !update.received_additional_touches {
            return None;
        }

        match (update.touches.as_slice(), self.active_touch) {
            ([only], _) => {
                self.active_touch = Some(*only);
                None
            }
            (touches, Some(active)) => {
                let newcomer = touches.iter().find(|t| t.id != active.id).copied()?;
                self.active_touch = Some(newcomer);
                Some(active.id)
            }
            (_, None) => {
                warn!("Additional touch without an active touch; ignoring the hand-over");
                None
            }
        }
    }

    /// Window position steering the paddle for this update.
    pub fn focus(&self, mode: ControlMode, update: &GestureUpdated) -> Vec2 {
        match (mode, self.active_touch) {
            (ControlMode::LeftRight, Some(active)) => active.position,
            _ => update.focus,
        }
    }

    pub fn begin(
        &mut self,
        control: &PlayerControl,
        paddle_x: f32,
        touch: Vec2,
        zones: &ZoneLayout,
    ) -> PaddleDrive {
        match control.mode {
            ControlMode::JoystickDrag => {
                self.paddle_reference = Some(paddle_x);
                self.joystick_reference = Some(touch.x);
                PaddleDrive { body: Some(RigidBody::Kinematic), ..default() }
            }
            ControlMode::Joystick => {
                self.paddle_reference = None;
                self.joystick_reference = Some(touch.x);
                PaddleDrive { body: Some(RigidBody::Dynamic), force_x: Some(0.0), ..default() }
            }
            ControlMode::LeftRight => {
                self.paddle_reference = None;
                self.joystick_reference = None;
                PaddleDrive {
                    body: Some(RigidBody::Dynamic),
                    force_x: Some(control.zone_force(zones.select(touch))),
                    ..default()
                }
            }
            // The slider knob drives the paddle.
            ControlMode::Drag => PaddleDrive::default(),
        }
    }

    pub fn drag_to(&mut self, control: &PlayerControl, touch: Vec2, zones: &ZoneLayout) -> PaddleDrive {
        match control.mode {
            ControlMode::JoystickDrag => match (self.paddle_reference, self.joystick_reference) {
                (Some(paddle), Some(start)) => PaddleDrive {
                    position_x: Some(control.clamp_x(paddle + (touch.x - start))),
                    ..default()
                },
                _ => PaddleDrive::default(),
            },
            ControlMode::Joystick => match self.joystick_reference {
                Some(centre) => PaddleDrive {
                    force_x: Some(control.joystick_force(touch.x - centre)),
                    ..default()
                },
                None => PaddleDrive::default(),
            },
            ControlMode::LeftRight => PaddleDrive {
                force_x: Some(control.zone_force(zones.select(touch))),
                ..default()
            },
            ControlMode::Drag => PaddleDrive::default(),
        }
    }

    pub fn end(&mut self) -> PaddleDrive {
        self.paddle_reference = None;
        self.joystick_reference = None;
        PaddleDrive { force_x: Some(0.0), ..default() }
    }
}
