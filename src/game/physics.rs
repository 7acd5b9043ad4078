//! Arcade physics: axis-aligned bodies under gravity that land on static
//! ground and stay inside the world bounds.
//!
//! This is deliberately small. Bodies never collide with each other; punches
//! are resolved by [`crate::game::combat`] with an explicit overlap test.

use bevy::{math::bounding::Aabb2d, prelude::*};

use crate::{AppSystems, PausableSystems, game::tuning::FightTuning};

/// Vertical rebound speeds below this are treated as resting on the ground.
const REST_SPEED: f32 = 15.0;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<WorldBounds>();
    app.add_systems(
        Update,
        integrate_bodies
            .in_set(AppSystems::Physics)
            .in_set(PausableSystems),
    );
}

/// A dynamic body centred on its entity's translation.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ArcadeBody {
    pub velocity: Vec2,
    pub half_size: Vec2,
    /// Fraction of speed kept after hitting the ground or the world edge.
    pub bounce: f32,
    /// Whether the body ended the last physics step resting on a [`Ground`].
    pub touching_down: bool,
}

impl ArcadeBody {
    pub fn new(size: Vec2, bounce: f32) -> Self {
        Self {
            velocity: Vec2::ZERO,
            half_size: size / 2.0,
            bounce,
            touching_down: false,
        }
    }

    pub fn bounds(&self, center: Vec2) -> Aabb2d {
        Aabb2d::new(center, self.half_size)
    }
}

/// A static platform centred on its entity's translation.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Ground {
    pub half_size: Vec2,
}

impl Ground {
    pub fn bounds(&self, center: Vec2) -> Aabb2d {
        Aabb2d::new(center, self.half_size)
    }
}

/// The area bodies are kept inside; follows the window.
#[derive(Resource, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Resource)]
pub struct WorldBounds(pub Rect);

impl Default for WorldBounds {
    fn default() -> Self {
        Self(Rect::from_center_size(Vec2::ZERO, Vec2::new(1280.0, 720.0)))
    }
}

fn integrate_bodies(
    time: Res<Time>,
    tuning: Res<FightTuning>,
    bounds: Res<WorldBounds>,
    ground_query: Query<(&Ground, &Transform), Without<ArcadeBody>>,
    mut body_query: Query<(&mut ArcadeBody, &mut Transform)>,
) {
    let dt = time.delta_secs();
    if dt == 0.0 {
        return;
    }
    let grounds: Vec<Aabb2d> = ground_query
        .iter()
        .map(|(ground, transform)| ground.bounds(transform.translation.xy()))
        .collect();

    for (mut body, mut transform) in &mut body_query {
        let previous = transform.translation.xy();
        let center = step_body(&mut body, previous, dt, tuning.gravity, &grounds, bounds.0);
        transform.translation = center.extend(transform.translation.z);
    }
}

/// Advance one body by `dt` and return its new centre.
pub fn step_body(
    body: &mut ArcadeBody,
    previous: Vec2,
    dt: f32,
    gravity: f32,
    grounds: &[Aabb2d],
    bounds: Rect,
) -> Vec2 {
    body.velocity.y -= gravity * dt;
    let mut center = previous + body.velocity * dt;
    body.touching_down = false;

    if body.velocity.y <= 0.0 {
        let previous_bottom = previous.y - body.half_size.y;
        for ground in grounds {
            if let Some(y) = landing_height(previous_bottom, body.bounds(center), ground) {
                center.y = y;
                body.velocity.y = rebound(body.velocity.y, body.bounce);
                body.touching_down = true;
                break;
            }
        }
    }

    keep_inside(body, &mut center, bounds);
    center
}

/// If a falling body crossed the top of `ground` this step, the centre height
/// that puts it back on top.
pub fn landing_height(previous_bottom: f32, body: Aabb2d, ground: &Aabb2d) -> Option<f32> {
    let overlaps_x = body.min.x < ground.max.x && body.max.x > ground.min.x;
    let crossed_top = body.min.y < ground.max.y && previous_bottom >= ground.max.y - 0.01;
    if !overlaps_x || !crossed_top {
        return None;
    }
    let half_height = (body.max.y - body.min.y) / 2.0;
    Some(ground.max.y + half_height)
}

fn rebound(speed: f32, bounce: f32) -> f32 {
    let rebound = -speed * bounce;
    if rebound.abs() < REST_SPEED {
        0.0
    } else {
        rebound
    }
}

fn keep_inside(body: &mut ArcadeBody, center: &mut Vec2, bounds: Rect) {
    let min = bounds.min + body.half_size;
    let max = bounds.max - body.half_size;

    if center.x < min.x {
        center.x = min.x;
        body.velocity.x = body.velocity.x.abs() * body.bounce;
    } else if center.x > max.x {
        center.x = max.x;
        body.velocity.x = -body.velocity.x.abs() * body.bounce;
    }

    if center.y < min.y {
        center.y = min.y;
        body.velocity.y = rebound(body.velocity.y, body.bounce);
    } else if center.y > max.y {
        center.y = max.y;
        body.velocity.y = -body.velocity.y.abs() * body.bounce;
    }
}
