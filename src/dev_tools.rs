//! Development tools for the game. This plugin is only enabled in dev builds.

use bevy::{
    color::palettes::css::{DODGER_BLUE, LIME, RED},
    dev_tools::states::log_transitions,
    input::common_conditions::input_just_pressed,
    math::bounding::BoundingVolume,
    prelude::*,
};

use crate::{
    game::{
        combat::punch_hitbox,
        movement::Facing,
        physics::{ArcadeBody, Ground},
        player::{Player, PlayerSlot},
        tuning::FightTuning,
    },
    screens::Screen,
};

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

pub(super) fn plugin(app: &mut App) {
    // Log `Screen` state transitions.
    app.add_systems(Update, log_transitions::<Screen>);

    app.init_resource::<HitboxOverlay>();
    app.add_systems(
        Update,
        toggle_hitbox_overlay.run_if(input_just_pressed(TOGGLE_KEY)),
    );
    app.add_systems(
        Update,
        draw_hitboxes.run_if(|overlay: Res<HitboxOverlay>| overlay.0),
    );
}

/// Draw bodies, ground and punch reach.
#[derive(Resource, Default)]
struct HitboxOverlay(bool);

fn toggle_hitbox_overlay(mut overlay: ResMut<HitboxOverlay>) {
    overlay.0 = !overlay.0;
}

fn draw_hitboxes(
    mut gizmos: Gizmos,
    tuning: Res<FightTuning>,
    ground_query: Query<(&Ground, &Transform)>,
    fighter_query: Query<(&Player, &Facing, &ArcadeBody, &Transform)>,
) {
    for (ground, transform) in &ground_query {
        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.xy()),
            ground.half_size * 2.0,
            LIME,
        );
    }

    for (player, facing, body, transform) in &fighter_query {
        let center = transform.translation.xy();
        let color = match player.0 {
            PlayerSlot::One => DODGER_BLUE,
            PlayerSlot::Two => RED,
        };
        gizmos.rect_2d(Isometry2d::from_translation(center), body.half_size * 2.0, color);
        gizmos.line_2d(center, center + body.velocity * 0.1, color);

        let reach = punch_hitbox(center, *facing, tuning.punch_range, tuning.punch_size);
        gizmos.rect_2d(
            Isometry2d::from_translation(reach.center()),
            reach.half_size() * 2.0,
            color.with_alpha(0.4),
        );
    }
}
