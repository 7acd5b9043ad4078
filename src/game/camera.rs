//! Camera shake.

use std::time::Duration;

use bevy::{prelude::*, window::PrimaryWindow};
use rand::Rng;

use crate::{AppSystems, PausableSystems};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<ShakeCamera>();
    app.add_systems(
        Update,
        (start_camera_shake, apply_camera_shake)
            .chain()
            .in_set(AppSystems::Present)
            .in_set(PausableSystems),
    );
}

/// Ask the main camera to shake.
#[derive(Message, Debug, Clone, Copy)]
pub struct ShakeCamera {
    pub duration: Duration,
    /// Fraction of the viewport size.
    pub intensity: f32,
}

#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct CameraShake {
    timer: Timer,
    intensity: f32,
}

impl Default for CameraShake {
    fn default() -> Self {
        let mut timer = Timer::new(Duration::ZERO, TimerMode::Once);
        timer.tick(Duration::ZERO);
        Self {
            timer,
            intensity: 0.0,
        }
    }
}

impl CameraShake {
    pub fn is_shaking(&self) -> bool {
        !self.timer.is_finished()
    }

    /// Start a shake. Ignored while another one is running.
    pub fn start(&mut self, duration: Duration, intensity: f32) -> bool {
        if self.is_shaking() {
            return false;
        }
        self.timer = Timer::new(duration, TimerMode::Once);
        self.intensity = intensity;
        true
    }

    /// Advance the shake and return the offset for this frame.
    fn offset(&mut self, delta: Duration, viewport: Vec2, rng: &mut impl Rng) -> Vec2 {
        self.timer.tick(delta);
        if !self.is_shaking() {
            return Vec2::ZERO;
        }
        let amplitude = viewport * self.intensity;
        Vec2::new(
            rng.random_range(-1.0..=1.0) * amplitude.x,
            rng.random_range(-1.0..=1.0) * amplitude.y,
        )
    }
}

fn start_camera_shake(
    mut requests: MessageReader<ShakeCamera>,
    mut shake_query: Query<&mut CameraShake>,
) {
    for request in requests.read() {
        for mut shake in &mut shake_query {
            shake.start(request.duration, request.intensity);
        }
    }
}

fn apply_camera_shake(
    time: Res<Time>,
    window: Single<&Window, With<PrimaryWindow>>,
    mut camera_query: Query<(&mut CameraShake, &mut Transform), With<Camera2d>>,
) {
    let rng = &mut rand::rng();
    for (mut shake, mut transform) in &mut camera_query {
        let offset = shake.offset(time.delta(), window.size(), rng);
        transform.translation.x = offset.x;
        transform.translation.y = offset.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_camera_has_no_offset() {
        let mut shake = CameraShake::default();
        let offset = shake.offset(Duration::from_millis(16), Vec2::new(800.0, 600.0), &mut rand::rng());

        assert!(!shake.is_shaking());
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn shake_stays_within_intensity_and_ends() {
        let mut shake = CameraShake::default();
        assert!(shake.start(Duration::from_millis(100), 0.01));

        let viewport = Vec2::new(800.0, 600.0);
        let offset = shake.offset(Duration::from_millis(50), viewport, &mut rand::rng());
        assert!(offset.x.abs() <= 8.0);
        assert!(offset.y.abs() <= 6.0);

        let offset = shake.offset(Duration::from_millis(60), viewport, &mut rand::rng());
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn overlapping_shakes_are_ignored() {
        let mut shake = CameraShake::default();
        assert!(shake.start(Duration::from_millis(100), 0.01));
        assert!(!shake.start(Duration::from_millis(500), 0.5));
        assert_eq!(shake.intensity, 0.01);
    }
}
