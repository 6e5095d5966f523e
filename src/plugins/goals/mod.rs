//! Goals: sensors behind each paddle that take the ball out of play.
//!
//! A ball entering a goal stops, is moved to the respawn point, and the goal's scorer
//! gets a point. After `respawn_delay` the ball plugin launches it again.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::ball::{Ball, PendingRelaunch};
use crate::plugins::paddle::Side;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    /// Who is credited when the ball ends up here.
    pub scorer: Side,
}

#[derive(Component, Debug)]
pub struct RespawnPoint;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub player: u32,
    pub opponent: u32,
}

impl Score {
    pub fn credit(&mut self, side: Side) {
        match side {
            Side::Player => self.player += 1,
            Side::Opponent => self.opponent += 1,
        }
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct GoalScored {
    pub scorer: Side,
    pub ball: Entity,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Score>()
        .add_message::<GoalScored>()
        .add_systems(OnEnter(GameState::InGame), spawn_goals)
        .add_systems(
            FixedPostUpdate,
            shred_balls
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_goals(mut commands: Commands, tunables: Res<Tunables>) {
    let arena = &tunables.arena;
    let depth = arena.wall_thickness;
    let size = Vec2::new(arena.half_width * 2.0, depth);
    let layers = CollisionLayers::new(Layer::Goal, [Layer::Ball]);

    // The goal behind the player's paddle scores for the opponent, and vice versa.
    for (name, y, scorer) in [
        ("GoalBottom", -arena.half_height - depth * 0.5, Side::Opponent),
        ("GoalTop", arena.half_height + depth * 0.5, Side::Player),
    ] {
        commands.spawn((
            Name::new(name),
            Goal { scorer },
            Transform::from_xyz(0.0, y, 0.0),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            Sensor,
            layers,
            DespawnOnExit(GameState::InGame),
        ));
    }

    commands.spawn((
        Name::new("RespawnPoint"),
        RespawnPoint,
        Transform::from_xyz(0.0, 0.0, 1.0),
        DespawnOnExit(GameState::InGame),
    ));
}

pub fn shred_balls(
    mut commands: Commands,
    mut started: MessageReader<CollisionStart>,
    tunables: Res<Tunables>,
    mut score: ResMut<Score>,
    mut scored: MessageWriter<GoalScored>,
    q_goals: Query<&Goal>,
    q_respawn: Query<&Transform, (With<RespawnPoint>, Without<Ball>)>,
    mut q_balls: Query<(&mut Transform, &mut LinearVelocity, Has<PendingRelaunch>), With<Ball>>,
    // Relaunch markers are deferred, so dedupe within the frame.
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();
    let respawn = q_respawn.single().map_or(Vec2::ZERO, |tf| tf.translation.truncate());

    for ev in started.read() {
        let a = ev.body1.unwrap_or(ev.collider1);
        let b = ev.body2.unwrap_or(ev.collider2);

        let (ball_e, goal) = match (q_goals.get(a), q_goals.get(b)) {
            (Ok(goal), _) => (b, goal),
            (_, Ok(goal)) => (a, goal),
            _ => continue,
        };
        let Ok((mut tf, mut vel, pending)) = q_balls.get_mut(ball_e) else {
            continue;
        };
        if pending || !seen.insert(ball_e) {
            continue;
        }

        vel.0 = Vec2::ZERO;
        tf.translation.x = respawn.x;
        tf.translation.y = respawn.y;
        commands.entity(ball_e).insert(PendingRelaunch(Timer::from_seconds(
            tunables.ball.respawn_delay.max(0.0),
            TimerMode::Once,
        )));

        score.credit(goal.scorer);
        scored.write(GoalScored { scorer: goal.scorer, ball: ball_e });
        info!("Goal for {:?}: {} - {}", goal.scorer, score.player, score.opponent);
    }
}
