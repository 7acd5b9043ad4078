//! Punches and the knockback they cause.

use bevy::{
    math::{
        bounding::{Aabb2d, IntersectsVolume},
        curve::EaseFunction,
    },
    prelude::*,
};

use crate::{
    AppSystems, PausableSystems,
    game::{
        camera::ShakeCamera,
        movement::{Facing, MovementController},
        physics::ArcadeBody,
        player::Player,
        tuning::FightTuning,
        tween::{Tween, TweenAxis, TweenCompleted, TweenLock, TweenPurpose},
    },
};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<PunchLanded>();
    app.add_systems(
        Update,
        (finish_knockbacks, detect_punches, apply_knockback)
            .chain()
            .in_set(AppSystems::Update)
            .in_set(PausableSystems),
    );
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PunchLanded {
    pub attacker: Entity,
    pub victim: Entity,
}

/// The box a punch checks, `range` in front of a fighter at chest height.
pub fn punch_hitbox(center: Vec2, facing: Facing, range: f32, size: f32) -> Aabb2d {
    let reach = Vec2::new(center.x + facing.sign() * range, center.y);
    Aabb2d::new(reach, Vec2::splat(size / 2.0))
}

/// Victims fly away from the midpoint between the two fighters.
pub fn knockback_direction(victim_x: f32, fighters_x: [f32; 2]) -> f32 {
    let midpoint = (fighters_x[0] + fighters_x[1]) / 2.0;
    if victim_x > midpoint { 1.0 } else { -1.0 }
}

fn detect_punches(
    tuning: Res<FightTuning>,
    fighter_query: Query<
        (Entity, &MovementController, &Facing, &Transform, &ArcadeBody),
        With<Player>,
    >,
    mut landed: MessageWriter<PunchLanded>,
) {
    for (attacker, controller, facing, transform, _) in &fighter_query {
        if !controller.punch {
            continue;
        }
        let hitbox = punch_hitbox(
            transform.translation.xy(),
            *facing,
            tuning.punch_range,
            tuning.punch_size,
        );
        for (victim, _, _, victim_transform, victim_body) in &fighter_query {
            if victim == attacker {
                continue;
            }
            if hitbox.intersects(&victim_body.bounds(victim_transform.translation.xy())) {
                landed.write(PunchLanded { attacker, victim });
            }
        }
    }
}

fn apply_knockback(
    mut commands: Commands,
    tuning: Res<FightTuning>,
    mut landed: MessageReader<PunchLanded>,
    mut fighter_query: Query<(&Transform, &mut ArcadeBody, &mut TweenLock), With<Player>>,
    mut shake: MessageWriter<ShakeCamera>,
) {
    for punch in landed.read() {
        let Ok([(attacker_transform, _, _), (victim_transform, mut body, mut lock)]) =
            fighter_query.get_many_mut([punch.attacker, punch.victim])
        else {
            continue;
        };
        let victim_pos = victim_transform.translation.xy();
        info!("Punch hit player at {}!", victim_pos.x);

        let direction = knockback_direction(
            victim_pos.x,
            [attacker_transform.translation.x, victim_pos.x],
        );
        body.velocity.x = 0.0;
        shake.write(ShakeCamera {
            duration: tuning.shake_duration(),
            intensity: tuning.shake_intensity,
        });

        let slide = commands
            .spawn((
                Name::new("Knockback Tween"),
                Tween::new(
                    punch.victim,
                    TweenAxis::X,
                    victim_pos.x,
                    victim_pos.x + direction * tuning.knockback_distance,
                    tuning.knockback_duration(),
                    EaseFunction::QuadraticOut,
                    TweenPurpose::Knockback,
                ),
            ))
            .id();
        // A fresh hit restarts the slide from where the victim is now.
        if let Some(previous) = lock.take_over(slide) {
            commands.entity(previous).try_despawn();
        }
        commands.spawn((
            Name::new("Hop Tween"),
            Tween::new(
                punch.victim,
                TweenAxis::Y,
                victim_pos.y,
                victim_pos.y + tuning.hop_height,
                tuning.hop_duration(),
                EaseFunction::QuadraticOut,
                TweenPurpose::Hop,
            )
            .yoyo(),
        ));
    }
}

fn finish_knockbacks(
    mut completed: MessageReader<TweenCompleted>,
    mut fighter_query: Query<(&mut ArcadeBody, &mut TweenLock)>,
) {
    for event in completed.read() {
        if event.purpose != TweenPurpose::Knockback {
            continue;
        }
        let Ok((mut body, mut lock)) = fighter_query.get_mut(event.target) else {
            continue;
        };
        // An older slide finishing late doesn't unlock a newer one.
        if lock.release(event.tween) {
            body.velocity.x = 0.0;
        }
    }
}
