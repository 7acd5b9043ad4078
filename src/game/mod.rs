//! The fight: two players on one platform, walking, jumping, dashing and
//! punching each other around.

use bevy::prelude::*;

mod animation;
pub mod camera;
pub mod combat;
mod dash;
pub mod level;
pub mod movement;
pub mod physics;
pub mod player;
pub mod tuning;
pub mod tween;

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        tuning::plugin,
        animation::plugin,
        camera::plugin,
        combat::plugin,
        dash::plugin,
        level::plugin,
        movement::plugin,
        physics::plugin,
        player::plugin,
        tween::plugin,
    ));
}
