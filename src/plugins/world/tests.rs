use bevy::prelude::*;
use avian2d::prelude::*;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;

#[test]
fn spawns_walls_on_enter() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn_walls);

    let walls: Vec<f32> = world
        .query::<(&Name, &RigidBody, &Transform)>()
        .iter(&world)
        .filter(|(n, rb, _)| n.as_str().starts_with("Wall") && matches!(**rb, RigidBody::Static))
        .map(|(_, _, tf)| tf.translation.x)
        .collect();
    assert_eq!(walls.len(), 2);

    // Inner faces sit exactly on the arena edge.
    let half = Tunables::default().arena.half_width;
    assert!(walls.iter().all(|x| x.abs() == half + 0.5));
}

#[test]
fn centre_line_stays_inside_arena() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn_centre_line);

    let half = Tunables::default().arena.half_width;
    let xs: Vec<f32> = world.query::<(&Sprite, &Transform)>().iter(&world).map(|(_, tf)| tf.translation.x).collect();
    assert!(!xs.is_empty());
    assert!(xs.iter().all(|x| x.abs() < half));
}
