//! Handle player input and translate it into movement through a character
//! controller. A character controller is the collection of systems that govern
//! the movement of characters.
//!
//! In our case, the character controller has the following logic:
//! - Set [`MovementController`] intents from keyboard input. This is done in
//!   the `player` module, as the bindings are specific to each player.
//! - Walk left or right unless a dash or knockback owns the position.
//! - Jump when standing on the ground.
//!
//! Dashing and punching read the same controller in their own modules.

use bevy::prelude::*;

use crate::{
    AppSystems, PausableSystems,
    game::{
        animation::{FighterAnimation, FighterClip},
        dash::DashState,
        physics::ArcadeBody,
        tuning::FightTuning,
        tween::TweenLock,
    },
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        apply_movement
            .in_set(AppSystems::Update)
            .in_set(PausableSystems),
    );
}

/// What the character wants to do this frame.
#[derive(Component, Reflect, Debug, Default, Clone, Copy)]
#[reflect(Component)]
pub struct MovementController {
    /// -1 for left, 1 for right, 0 for neither or both.
    pub intent_x: f32,
    pub jump: bool,
    /// Held, not just pressed; the dash cooldown does the rate limiting.
    pub dash: bool,
    /// Also held, so each frame in reach lands another hit.
    pub punch: bool,
}

/// The side a fighter last walked towards. Dashes and punches go this way.
#[derive(Component, Reflect, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Horizontal outcome of one frame of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stride {
    Walk(Facing),
    Stand,
}

/// Right wins over left, and nothing walks while a dash or tween owns the fighter.
pub fn stride(intent_x: f32, locked: bool) -> Stride {
    if locked {
        Stride::Stand
    } else if intent_x > 0.0 {
        Stride::Walk(Facing::Right)
    } else if intent_x < 0.0 {
        Stride::Walk(Facing::Left)
    } else {
        Stride::Stand
    }
}

fn apply_movement(
    tuning: Res<FightTuning>,
    mut movement_query: Query<(
        &MovementController,
        &DashState,
        &TweenLock,
        &mut Facing,
        &mut ArcadeBody,
        &mut FighterAnimation,
    )>,
) {
    for (controller, dash, lock, mut facing, mut body, mut animation) in &mut movement_query {
        match stride(controller.intent_x, dash.in_progress || lock.is_active()) {
            Stride::Walk(direction) => {
                body.velocity.x = direction.sign() * tuning.walk_speed;
                animation.play(FighterClip::Walk);
                *facing = direction;
            }
            Stride::Stand => {
                body.velocity.x = 0.0;
                if !animation.is_playing(FighterClip::Jump) {
                    animation.stop();
                }
            }
        }

        if controller.jump && body.touching_down {
            body.velocity.y = tuning.jump_speed;
            animation.play(FighterClip::Jump);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;

    #[test]
    fn right_takes_priority_and_locks_stop_walking() {
        assert_eq!(stride(1.0, false), Stride::Walk(Facing::Right));
        assert_eq!(stride(-1.0, false), Stride::Walk(Facing::Left));
        assert_eq!(stride(0.0, false), Stride::Stand);
        assert_eq!(stride(1.0, true), Stride::Stand);
        assert_eq!(stride(-1.0, true), Stride::Stand);
    }

    fn spawn_fighter(world: &mut World, controller: MovementController, grounded: bool) -> Entity {
        let mut body = ArcadeBody::new(Vec2::splat(64.0), 0.2);
        body.touching_down = grounded;
        world
            .spawn((
                controller,
                DashState::default(),
                TweenLock::default(),
                Facing::default(),
                body,
                FighterAnimation::default(),
            ))
            .id()
    }

    #[test]
    fn walking_left_sets_velocity_and_facing() {
        let mut world = World::new();
        world.init_resource::<FightTuning>();
        let fighter = spawn_fighter(
            &mut world,
            MovementController {
                intent_x: -1.0,
                ..default()
            },
            true,
        );

        world.run_system_once(apply_movement).unwrap();

        assert_eq!(world.get::<ArcadeBody>(fighter).unwrap().velocity.x, -160.0);
        assert_eq!(*world.get::<Facing>(fighter).unwrap(), Facing::Left);
        assert!(world.get::<FighterAnimation>(fighter).unwrap().is_playing(FighterClip::Walk));
    }

    #[test]
    fn dashing_fighters_do_not_walk() {
        let mut world = World::new();
        world.init_resource::<FightTuning>();
        let fighter = spawn_fighter(
            &mut world,
            MovementController {
                intent_x: -1.0,
                ..default()
            },
            true,
        );
        world.get_mut::<DashState>(fighter).unwrap().in_progress = true;
        world.get_mut::<ArcadeBody>(fighter).unwrap().velocity.x = 50.0;

        world.run_system_once(apply_movement).unwrap();

        assert_eq!(world.get::<ArcadeBody>(fighter).unwrap().velocity.x, 0.0);
        assert_eq!(*world.get::<Facing>(fighter).unwrap(), Facing::Right);
    }

    #[test]
    fn jumping_needs_ground() {
        let mut world = World::new();
        world.init_resource::<FightTuning>();
        let jump = MovementController {
            jump: true,
            ..default()
        };
        let airborne = spawn_fighter(&mut world, jump, false);
        let grounded = spawn_fighter(&mut world, jump, true);

        world.run_system_once(apply_movement).unwrap();

        assert_eq!(world.get::<ArcadeBody>(airborne).unwrap().velocity.y, 0.0);
        assert_eq!(world.get::<ArcadeBody>(grounded).unwrap().velocity.y, 330.0);
        assert!(world.get::<FighterAnimation>(grounded).unwrap().is_playing(FighterClip::Jump));
    }
}
