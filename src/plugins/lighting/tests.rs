use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::common::test_utils::run_system_once;
use crate::plugins::ball::{Ball, PendingRelaunch};

use super::*;

fn scene() -> (World, Entity, Entity) {
    let mut world = World::new();
    let ball = world
        .spawn((Ball { min_speed: 2.0, max_speed: 15.0 }, Transform::from_xyz(1.5, -2.0, 1.0)))
        .id();
    let light = world
        .spawn((
            BallLight::default(),
            PointLight2d::default(),
            Transform::from_xyz(0.0, 0.0, 10.0),
        ))
        .id();
    (world, ball, light)
}

#[test]
fn light_follows_ball_and_keeps_its_depth() {
    let (mut world, _, light) = scene();
    run_system_once(&mut world, follow_ball);

    assert_eq!(world.get::<Transform>(light).unwrap().translation, Vec3::new(1.5, -2.0, 10.0));
    assert_eq!(world.get::<PointLight2d>(light).unwrap().intensity, 1.0);
}

#[test]
fn light_dims_while_ball_waits_for_relaunch() {
    let (mut world, ball, light) = scene();
    world
        .entity_mut(ball)
        .insert(PendingRelaunch(Timer::from_seconds(1.0, TimerMode::Once)));
    run_system_once(&mut world, follow_ball);
    assert_eq!(world.get::<PointLight2d>(light).unwrap().intensity, 0.25);

    world.entity_mut(ball).remove::<PendingRelaunch>();
    run_system_once(&mut world, follow_ball);
    assert_eq!(world.get::<PointLight2d>(light).unwrap().intensity, 1.0);
}
