use avian2d::prelude::*;
use bevy::{ecs::message::Messages, prelude::*};

use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::gestures::{GestureState, GestureUpdated, LongPressGesture, TrackedTouch};
use crate::plugins::paddle::PlayerPaddle;

use super::slider::{SliderKnob, SliderMoved};
use super::*;

fn control(mode: ControlMode) -> PlayerControl {
    PlayerControl { mode, horizontal_limit: 4.0, speed_force: 60.0, joystick_threshold: 0.05 }
}

fn zones() -> ZoneLayout {
    ZoneLayout::collect([
        (ZoneSide::Left, Rect::from_center_half_size(Vec2::new(-2.5, -4.0), Vec2::new(2.5, 4.0))),
        (ZoneSide::Right, Rect::from_center_half_size(Vec2::new(2.5, -4.0), Vec2::new(2.5, 4.0))),
    ])
}

fn touch(id: u64, x: f32, y: f32) -> TrackedTouch {
    TrackedTouch { id, position: Vec2::new(x, y), previous: Vec2::new(x, y) }
}

fn update(state: GestureState, touches: Vec<TrackedTouch>, additional: bool) -> GestureUpdated {
    let focus = touches.iter().map(|t| t.position).sum::<Vec2>() / touches.len().max(1) as f32;
    GestureUpdated { state, focus, touches, received_additional_touches: additional }
}

// --------------------------------------------------------------------------------------
// Pure state machine
// --------------------------------------------------------------------------------------

#[test]
fn zone_selection_prefers_left_and_misses_outside() {
    let z = zones();
    assert_eq!(z.select(Vec2::new(-1.0, -2.0)), Some(ZoneSide::Left));
    assert_eq!(z.select(Vec2::new(1.0, -2.0)), Some(ZoneSide::Right));
    assert_eq!(z.select(Vec2::new(0.0, -2.0)), Some(ZoneSide::Left));
    assert_eq!(z.select(Vec2::new(1.0, 3.0)), None);
    assert_eq!(ZoneLayout::default().select(Vec2::ZERO), None);
}

#[test]
fn joystick_drag_moves_paddle_by_touch_offset() {
    let c = control(ControlMode::JoystickDrag);
    let mut s = ControlState::default();

    let began = s.begin(&c, 1.0, Vec2::new(-2.0, 3.0), &zones());
    assert!(matches!(began.body, Some(RigidBody::Kinematic)));
    assert_eq!(began.position_x, None);

    let moved = s.drag_to(&c, Vec2::new(-0.5, 0.0), &zones());
    assert_eq!(moved.position_x, Some(2.5));

    let clamped = s.drag_to(&c, Vec2::new(10.0, 0.0), &zones());
    assert_eq!(clamped.position_x, Some(4.0));

    let ended = s.end();
    assert_eq!(ended.force_x, Some(0.0));
    assert_eq!(s, ControlState::default());

    // Without a begin there is nothing to drag relative to.
    assert_eq!(s.drag_to(&c, Vec2::ZERO, &zones()).position_x, None);
}

#[test]
fn joystick_pushes_past_threshold_only() {
    let c = control(ControlMode::Joystick);
    let mut s = ControlState::default();

    let began = s.begin(&c, 0.0, Vec2::new(1.0, 0.0), &zones());
    assert!(matches!(began.body, Some(RigidBody::Dynamic)));
    assert_eq!(began.force_x, Some(0.0));

    assert_eq!(s.drag_to(&c, Vec2::new(1.04, 0.0), &zones()).force_x, Some(0.0));
    assert_eq!(s.drag_to(&c, Vec2::new(1.5, 0.0), &zones()).force_x, Some(60.0));
    assert_eq!(s.drag_to(&c, Vec2::new(0.0, 0.0), &zones()).force_x, Some(-60.0));
    assert_eq!(s.end().force_x, Some(0.0));
}

#[test]
fn left_right_force_follows_zone() {
    let c = control(ControlMode::LeftRight);
    let mut s = ControlState::default();

    let began = s.begin(&c, 0.0, Vec2::new(-1.0, -3.0), &zones());
    assert!(matches!(began.body, Some(RigidBody::Dynamic)));
    assert_eq!(began.force_x, Some(-60.0));

    assert_eq!(s.drag_to(&c, Vec2::new(2.0, -3.0), &zones()).force_x, Some(60.0));
    assert_eq!(s.drag_to(&c, Vec2::new(2.0, 5.0), &zones()).force_x, Some(0.0));
}

#[test]
fn drag_mode_leaves_paddle_to_slider() {
    let c = control(ControlMode::Drag);
    let mut s = ControlState::default();
    let began = s.begin(&c, 0.0, Vec2::ZERO, &zones());
    assert!(began.body.is_none() && began.position_x.is_none() && began.force_x.is_none());
    let moved = s.drag_to(&c, Vec2::ONE, &zones());
    assert!(moved.position_x.is_none() && moved.force_x.is_none());
}

#[test]
fn newest_touch_takes_over_in_left_right() {
    let mut s = ControlState::default();
    let a = touch(1, -1.0, -3.0);
    let b = touch(2, 1.0, -3.0);

    let first = update(GestureState::Began, vec![a], true);
    assert_eq!(s.track_active_touch(ControlMode::LeftRight, &first), None);
    assert_eq!(s.active_touch.map(|t| t.id), Some(1));
    assert_eq!(s.focus(ControlMode::LeftRight, &first), a.position);

    let second = update(GestureState::Executing, vec![a, b], true);
    assert_eq!(s.track_active_touch(ControlMode::LeftRight, &second), Some(1));
    assert_eq!(s.active_touch.map(|t| t.id), Some(2));
    // The mean focus would be the centre line; the active touch is on the right.
    assert_eq!(s.focus(ControlMode::LeftRight, &second), b.position);

    let moved_b = touch(2, 2.0, -3.0);
    let third = update(GestureState::Executing, vec![moved_b], false);
    assert_eq!(s.track_active_touch(ControlMode::LeftRight, &third), None);
    assert_eq!(s.focus(ControlMode::LeftRight, &third), moved_b.position);
}

#[test]
fn hand_over_without_active_touch_changes_nothing() {
    let mut s = ControlState::default();
    let a = touch(1, -1.0, -3.0);
    let c = touch(3, 3.0, -3.0);

    let u = update(GestureState::Executing, vec![a, c], true);
    assert_eq!(s.track_active_touch(ControlMode::LeftRight, &u), None);
    assert_eq!(s, ControlState::default());
    assert_eq!(s.focus(ControlMode::LeftRight, &u), Vec2::new(1.0, -3.0));
}

#[test]
fn other_modes_use_gesture_focus() {
    let mut s = ControlState::default();
    let u = update(GestureState::Began, vec![touch(1, 3.0, 4.0)], true);
    assert_eq!(s.track_active_touch(ControlMode::JoystickDrag, &u), None);
    assert_eq!(s.active_touch, None);
    assert_eq!(s.focus(ControlMode::JoystickDrag, &u), Vec2::new(3.0, 4.0));
}

#[test]
fn control_helpers() {
    let c = control(ControlMode::Joystick);
    assert_eq!(c.zone_force(Some(ZoneSide::Left)), -60.0);
    assert_eq!(c.zone_force(Some(ZoneSide::Right)), 60.0);
    assert_eq!(c.zone_force(None), 0.0);
    assert_eq!(c.joystick_force(0.05), 0.0);
    assert_eq!(c.joystick_force(-0.06), -60.0);
    assert_eq!(ControlMode::LeftRight.max_tracked_touches(), 2);
    assert_eq!(ControlMode::Drag.max_tracked_touches(), 1);
}

// --------------------------------------------------------------------------------------
// Systems
// --------------------------------------------------------------------------------------

fn paddle_world(mode: ControlMode) -> (World, Entity) {
    let mut world = World::new();
    world.init_resource::<Messages<GestureUpdated>>();
    world.init_resource::<Messages<SliderMoved>>();
    world.insert_resource(LongPressGesture::new(mode.max_tracked_touches()));

    let paddle = world
        .spawn((
            PlayerPaddle { horizontal_limit: 4.0 },
            control(mode),
            ControlState::default(),
            Transform::from_xyz(0.0, -6.5, 1.0),
            mode.initial_body(),
            ConstantLocalForce(Vec2::ZERO),
        ))
        .id();
    (world, paddle)
}

#[test]
fn drive_system_applies_joystick_drag() {
    let (mut world, paddle) = paddle_world(ControlMode::JoystickDrag);
    world.write_message(update(GestureState::Began, vec![touch(1, 0.0, 0.0)], true));
    world.write_message(update(GestureState::Executing, vec![touch(1, 1.25, 0.0)], false));

    run_system_once(&mut world, drive_player_paddle);

    assert_eq!(world.get::<Transform>(paddle).unwrap().translation.x, 1.25);
    assert!(world.get::<ControlState>(paddle).unwrap().paddle_reference.is_some());
}

#[test]
fn drive_system_sets_zone_force_and_clears_it() {
    let (mut world, paddle) = paddle_world(ControlMode::LeftRight);
    world.spawn((
        ControlZone { side: ZoneSide::Right, half_size: Vec2::new(2.5, 4.0) },
        Transform::from_xyz(2.5, -4.0, -2.0),
    ));

    world.write_message(update(GestureState::Began, vec![touch(1, 1.0, -3.0)], true));
    run_system_once(&mut world, drive_player_paddle);
    assert_eq!(world.get::<ConstantLocalForce>(paddle).unwrap().0, Vec2::new(60.0, 0.0));

    world.resource_mut::<Messages<GestureUpdated>>().update();
    world.resource_mut::<Messages<GestureUpdated>>().update();
    world.write_message(update(GestureState::Ended, vec![], false));
    run_system_once(&mut world, drive_player_paddle);
    assert_eq!(world.get::<ConstantLocalForce>(paddle).unwrap().0, Vec2::ZERO);
}

#[test]
fn slider_drag_moves_knob_and_paddle() {
    let (mut world, paddle) = paddle_world(ControlMode::Drag);
    let knob = world
        .spawn((SliderKnob::new(4.4, Vec2::new(0.4, 0.3)), Transform::from_xyz(0.0, -7.5, 0.0)))
        .id();

    world.write_message(update(GestureState::Began, vec![touch(1, 0.1, -7.5)], true));
    let mut moving = touch(1, 2.0, -7.4);
    moving.previous = Vec2::new(0.1, -7.5);
    world.write_message(update(GestureState::Executing, vec![moving], false));
    let mut far = touch(1, 9.0, -7.4);
    far.previous = Vec2::new(2.0, -7.4);
    world.write_message(update(GestureState::Executing, vec![far], false));

    run_system_once(&mut world, super::slider::drag_slider_knob);
    run_system_once(&mut world, super::slider::follow_slider);

    let limit = world.get::<SliderKnob>(knob).unwrap().limit;
    assert!((limit - 4.0).abs() < 1e-5);
    assert_eq!(world.get::<Transform>(knob).unwrap().translation.x, limit);
    assert_eq!(world.get::<Transform>(paddle).unwrap().translation.x, limit);
}

#[test]
fn slider_ignores_drags_that_miss_the_knob() {
    let (mut world, paddle) = paddle_world(ControlMode::Drag);
    let knob = world
        .spawn((SliderKnob::new(4.4, Vec2::new(0.4, 0.3)), Transform::from_xyz(0.0, -7.5, 0.0)))
        .id();

    world.write_message(update(GestureState::Began, vec![touch(1, 3.0, 2.0)], true));
    let mut moving = touch(1, 2.0, 2.0);
    moving.previous = Vec2::new(3.0, 2.0);
    world.write_message(update(GestureState::Executing, vec![moving], false));

    run_system_once(&mut world, super::slider::drag_slider_knob);
    run_system_once(&mut world, super::slider::follow_slider);

    assert_eq!(world.get::<Transform>(knob).unwrap().translation.x, 0.0);
    assert_eq!(world.get::<Transform>(paddle).unwrap().translation.x, 0.0);
}

#[test]
fn surfaces_match_mode() {
    for (mode, zones, knobs) in [
        (ControlMode::LeftRight, 2, 0),
        (ControlMode::Drag, 0, 1),
        (ControlMode::JoystickDrag, 0, 0),
    ] {
        let mut world = World::new();
        let mut t = Tunables::default();
        t.player.control_mode = mode;
        world.insert_resource(t);
        run_system_once(&mut world, super::spawn_control_surfaces);

        assert_eq!(world.query::<&ControlZone>().iter(&world).count(), zones, "{mode:?}");
        assert_eq!(world.query::<&SliderKnob>().iter(&world).count(), knobs, "{mode:?}");
    }
}
