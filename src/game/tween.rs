//! Time-based interpolation of a single transform axis.
//!
//! A [`Tween`] lives on its own entity and drives its target's
//! [`Transform`]. Several tweens may drive the same target at once, one per
//! axis. When a tween finishes it despawns and sends [`TweenCompleted`], which
//! the gameplay modules use to chain follow-up tweens or clear their guards.

use std::time::Duration;

use bevy::{
    math::curve::{Curve, EaseFunction},
    prelude::*,
};

use crate::{AppSystems, PausableSystems};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<TweenCompleted>();
    app.add_systems(
        Update,
        advance_tweens
            .in_set(AppSystems::Tweens)
            .in_set(PausableSystems),
    );
}

#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenAxis {
    X,
    Y,
}

/// Why a tween was started, so completion handlers know which guard to release.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub enum TweenPurpose {
    /// The main dash stroke; `direction` is -1 or 1.
    Dash { direction: f32 },
    /// The short slide back after a dash overshoots.
    DashRecoil,
    Knockback,
    Hop,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct TweenCompleted {
    /// The finished tween's own entity, already despawned.
    pub tween: Entity,
    pub target: Entity,
    pub purpose: TweenPurpose,
}

/// Held by the knockback slide that currently owns the fighter's position.
#[derive(Component, Reflect, Debug, Default, Clone, Copy)]
#[reflect(Component)]
pub struct TweenLock {
    pub slide: Option<Entity>,
}

impl TweenLock {
    pub fn is_active(&self) -> bool {
        self.slide.is_some()
    }

    /// Hand the lock to `slide`, returning the slide it replaces.
    pub fn take_over(&mut self, slide: Entity) -> Option<Entity> {
        self.slide.replace(slide)
    }

    /// Release the lock if `slide` still holds it.
    pub fn release(&mut self, slide: Entity) -> bool {
        if self.slide == Some(slide) {
            self.slide = None;
            true
        } else {
            false
        }
    }
}

#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Tween {
    target: Entity,
    axis: TweenAxis,
    from: f32,
    to: f32,
    ease: EaseFunction,
    /// Covers the whole run, so a yoyo timer is twice the one-way duration.
    timer: Timer,
    yoyo: bool,
    purpose: TweenPurpose,
}

impl Tween {
    pub fn new(
        target: Entity,
        axis: TweenAxis,
        from: f32,
        to: f32,
        duration: Duration,
        ease: EaseFunction,
        purpose: TweenPurpose,
    ) -> Self {
        Self {
            target,
            axis,
            from,
            to,
            ease,
            timer: Timer::new(duration, TimerMode::Once),
            yoyo: false,
            purpose,
        }
    }

    /// Play forward, then back to the start with the same easing.
    pub fn yoyo(mut self) -> Self {
        self.yoyo = true;
        self.timer = Timer::new(self.timer.duration() * 2, TimerMode::Once);
        self
    }

    /// The tweened value at `progress` through the whole run, `0..=1`.
    pub fn value_at(&self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        let t = if self.yoyo {
            let forward = progress * 2.0;
            if forward <= 1.0 { forward } else { 2.0 - forward }
        } else {
            progress
        };
        self.from + (self.to - self.from) * self.ease.sample_clamped(t)
    }

    fn is_finished(&self) -> bool {
        self.timer.is_finished()
    }

    fn progress(&self) -> f32 {
        if self.timer.duration().is_zero() {
            1.0
        } else {
            self.timer.fraction()
        }
    }
}

pub fn advance_tweens(
    mut commands: Commands,
    time: Res<Time>,
    mut tween_query: Query<(Entity, &mut Tween)>,
    mut target_query: Query<&mut Transform, Without<Tween>>,
    mut completed: MessageWriter<TweenCompleted>,
) {
    for (entity, mut tween) in &mut tween_query {
        let Ok(mut transform) = target_query.get_mut(tween.target) else {
            commands.entity(entity).despawn();
            continue;
        };

        tween.timer.tick(time.delta());
        let value = tween.value_at(tween.progress());
        match tween.axis {
            TweenAxis::X => transform.translation.x = value,
            TweenAxis::Y => transform.translation.y = value,
        }

        if tween.is_finished() {
            commands.entity(entity).despawn();
            completed.write(TweenCompleted {
                tween: entity,
                target: tween.target,
                purpose: tween.purpose,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{message::Messages, system::RunSystemOnce};

    use super::*;

    fn tween(target: Entity, ease: EaseFunction) -> Tween {
        Tween::new(
            target,
            TweenAxis::X,
            0.0,
            100.0,
            Duration::from_millis(200),
            ease,
            TweenPurpose::Knockback,
        )
    }

    #[test]
    fn linear_tween_is_proportional() {
        let tween = tween(Entity::PLACEHOLDER, EaseFunction::Linear);
        assert_eq!(tween.value_at(0.0), 0.0);
        assert!((tween.value_at(0.25) - 25.0).abs() < 1e-4);
        assert_eq!(tween.value_at(1.0), 100.0);
    }

    #[test]
    fn sine_in_out_matches_half_cosine() {
        let tween = tween(Entity::PLACEHOLDER, EaseFunction::SineInOut);
        for t in [0.1_f32, 0.3, 0.5, 0.8] {
            let expected = 100.0 * 0.5 * (1.0 - (std::f32::consts::PI * t).cos());
            assert!((tween.value_at(t) - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn yoyo_peaks_halfway_and_returns() {
        let tween = tween(Entity::PLACEHOLDER, EaseFunction::QuadraticOut).yoyo();
        assert_eq!(tween.timer.duration(), Duration::from_millis(400));
        assert!((tween.value_at(0.5) - 100.0).abs() < 1e-4);
        assert!(tween.value_at(1.0).abs() < 1e-4);
    }

    #[test]
    fn tweens_drive_the_target_and_report_completion() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.init_resource::<Messages<TweenCompleted>>();
        let target = world.spawn(Transform::default()).id();
        let tween_entity = world.spawn(tween(target, EaseFunction::Linear)).id();

        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(100));
        world.run_system_once(advance_tweens).unwrap();
        let x = world.get::<Transform>(target).unwrap().translation.x;
        assert!((x - 50.0).abs() < 1e-3);
        assert!(world.resource::<Messages<TweenCompleted>>().is_empty());

        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(150));
        world.run_system_once(advance_tweens).unwrap();
        assert_eq!(world.get::<Transform>(target).unwrap().translation.x, 100.0);
        let completed: Vec<_> = world
            .resource_mut::<Messages<TweenCompleted>>()
            .drain()
            .collect();
        assert_eq!(
            completed,
            vec![TweenCompleted {
                tween: tween_entity,
                target,
                purpose: TweenPurpose::Knockback,
            }]
        );
    }

    #[test]
    fn lock_belongs_to_the_latest_slide() {
        let mut world = World::new();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();

        let mut lock = TweenLock::default();
        assert_eq!(lock.take_over(first), None);
        assert_eq!(lock.take_over(second), Some(first));

        assert!(!lock.release(first));
        assert!(lock.is_active());
        assert!(lock.release(second));
        assert!(!lock.is_active());
    }

    #[test]
    fn tweens_without_a_target_are_dropped() {
        let mut world = World::new();
        world.insert_resource(Time::<()>::default());
        world.init_resource::<Messages<TweenCompleted>>();
        let target = world.spawn(Transform::default()).id();
        let tween_entity = world.spawn(tween(target, EaseFunction::Linear)).id();
        world.despawn(target);

        world.run_system_once(advance_tweens).unwrap();

        assert!(world.get_entity(tween_entity).is_err());
        assert!(world.resource::<Messages<TweenCompleted>>().is_empty());
    }
}
