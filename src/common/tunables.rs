//! Tunable gameplay constants.
//!
//! Everything is in world units (the camera shows `camera.desired_width` units across).
//! Values can be overridden from a RON file; missing fields keep their defaults.

use std::{fs, path::Path};

use bevy::prelude::*;
use serde::Deserialize;

use crate::plugins::ai::AiKind;
use crate::plugins::control::ControlMode;
use crate::plugins::deflector::DeflectionCurve;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/pong.ron";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_ENV: &str = "PONG_CONFIG";

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tunables {
    /// Avian length unit (world units per meter).
    pub length_unit: f32,
    pub arena: ArenaTunables,
    pub camera: CameraTunables,
    pub ball: BallTunables,
    pub deflector: DeflectorTunables,
    pub paddle: PaddleTunables,
    pub player: PlayerTunables,
    pub ai: AiTunables,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            length_unit: 1.0,
            arena: ArenaTunables::default(),
            camera: CameraTunables::default(),
            ball: BallTunables::default(),
            deflector: DeflectorTunables::default(),
            paddle: PaddleTunables::default(),
            player: PlayerTunables::default(),
            ai: AiTunables::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaTunables {
    pub half_width: f32,
    pub half_height: f32,
    pub wall_thickness: f32,
}

impl Default for ArenaTunables {
    fn default() -> Self {
        Self { half_width: 5.0, half_height: 8.0, wall_thickness: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraTunables {
    /// Width of the visible area; the height follows the window aspect ratio.
    pub desired_width: f32,
}

impl Default for CameraTunables {
    fn default() -> Self {
        Self { desired_width: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BallTunables {
    pub radius: f32,
    /// Launch force is sampled from `(-launch_force_x, launch_force_x)`, rejecting
    /// magnitudes below `launch_dead_zone_x`. Same for y.
    pub launch_force_x: f32,
    pub launch_dead_zone_x: f32,
    pub launch_force_y: f32,
    pub launch_dead_zone_y: f32,
    /// Velocity gained per unit of launch force (one fixed step on a unit mass).
    pub launch_scale: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Seconds the ball rests on the respawn point after a goal.
    pub respawn_delay: f32,
}

impl Default for BallTunables {
    fn default() -> Self {
        Self {
            radius: 0.15,
            launch_force_x: 200.0,
            launch_dead_zone_x: 50.0,
            launch_force_y: 300.0,
            launch_dead_zone_y: 80.0,
            launch_scale: 0.02,
            min_speed: 2.0,
            max_speed: 15.0,
            respawn_delay: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeflectorTunables {
    /// Degrees, clamped to `[0, 89.9]`.
    pub max_deflection_angle: f32,
    /// Clamped to `[0, 1]`.
    pub speed_increment: f32,
    pub curve: DeflectionCurve,
}

impl Default for DeflectorTunables {
    fn default() -> Self {
        Self { max_deflection_angle: 70.0, speed_increment: 0.05, curve: DeflectionCurve::Linear }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaddleTunables {
    pub width: f32,
    pub height: f32,
    /// Distance of both paddles from the arena centre line.
    pub offset: f32,
}

impl Default for PaddleTunables {
    fn default() -> Self {
        Self { width: 1.5, height: 0.25, offset: 6.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerTunables {
    pub control_mode: ControlMode,
    /// How far to the left/right the paddle can move.
    pub horizontal_limit: f32,
    /// Horizontal force in `Joystick` and `LeftRight` modes.
    pub speed_force: f32,
    pub linear_damping: f32,
    /// Minimum distance between the touch and the joystick centre before the joystick reacts.
    pub joystick_threshold: f32,
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::JoystickDrag,
            horizontal_limit: 4.0,
            speed_force: 60.0,
            linear_damping: 8.0,
            joystick_threshold: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiTunables {
    pub kind: AiKind,
    pub horizontal_limit: f32,
    /// Fraction of the paddle width used when picking a random hit spot.
    pub safety_margin: f32,
}

impl Default for AiTunables {
    fn default() -> Self {
        Self { kind: AiKind::Follow, horizontal_limit: 3.75, safety_margin: 0.9 }
    }
}

impl Tunables {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    /// Load the file, or fall back to defaults. The second value describes why the file
    /// was not used, if it wasn't.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(tunables) => (tunables, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load the file and reject values the game cannot run with.
    ///
    /// Falls back to defaults on any problem; the returned list says what was wrong.
    pub fn load_checked(path: impl AsRef<Path>) -> (Self, Vec<String>) {
        let (tunables, problem) = Self::load_or_default(path);
        if let Some(e) = problem {
            return (tunables, vec![e]);
        }
        let problems = tunables.validate();
        if problems.is_empty() {
            (tunables, problems)
        } else {
            (Self::default(), problems)
        }
    }

    /// Values that would break the game (empty ranges, inverted limits, zero sizes).
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        // Written as `!(v > 0.0)` so NaN is rejected too.
        fn positive(w: &mut Vec<String>, label: &str, v: f32) {
            if !(v > 0.0) {
                w.push(format!("{label} must be > 0 (got {v})"));
            }
        }
        fn non_negative(w: &mut Vec<String>, label: &str, v: f32) {
            if !(v >= 0.0) {
                w.push(format!("{label} must be >= 0 (got {v})"));
            }
        }

        positive(&mut w, "length_unit", self.length_unit);
        positive(&mut w, "arena.half_width", self.arena.half_width);
        positive(&mut w, "arena.half_height", self.arena.half_height);
        non_negative(&mut w, "arena.wall_thickness", self.arena.wall_thickness);
        positive(&mut w, "camera.desired_width", self.camera.desired_width);

        let ball = &self.ball;
        positive(&mut w, "ball.radius", ball.radius);
        non_negative(&mut w, "ball.min_speed", ball.min_speed);
        if !(ball.max_speed >= ball.min_speed) {
            w.push(format!(
                "ball.max_speed ({}) less than ball.min_speed ({})",
                ball.max_speed, ball.min_speed
            ));
        }
        for (label, v) in [
            ("ball.launch_force_x", ball.launch_force_x),
            ("ball.launch_dead_zone_x", ball.launch_dead_zone_x),
            ("ball.launch_force_y", ball.launch_force_y),
            ("ball.launch_dead_zone_y", ball.launch_dead_zone_y),
            ("ball.launch_scale", ball.launch_scale),
        ] {
            if !v.is_finite() {
                w.push(format!("{label} must be finite (got {v})"));
            }
        }

        positive(&mut w, "paddle.width", self.paddle.width);
        positive(&mut w, "paddle.height", self.paddle.height);

        let player = &self.player;
        non_negative(&mut w, "player.horizontal_limit", player.horizontal_limit);
        non_negative(&mut w, "player.speed_force", player.speed_force);
        non_negative(&mut w, "player.linear_damping", player.linear_damping);
        non_negative(&mut w, "player.joystick_threshold", player.joystick_threshold);

        non_negative(&mut w, "ai.horizontal_limit", self.ai.horizontal_limit);
        if !(0.0..=1.0).contains(&self.ai.safety_margin) {
            w.push(format!("ai.safety_margin {} outside 0..1", self.ai.safety_margin));
        }
        w
    }

    /// Config path honouring [`CONFIG_PATH_ENV`].
    pub fn config_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned())
    }
}
