//! Spawn the arena: a ground strip along the bottom of the window and the two
//! fighters standing above it.

use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};

use crate::{
    AppSystems,
    asset_tracking::LoadResource,
    game::{
        physics::{Ground, WorldBounds},
        player::{PlayerAssets, PlayerSlot, player},
        tuning::FightTuning,
    },
    screens::Screen,
};

/// Where the fighters start, in screen pixels from the top-left corner.
const SPAWN_POINTS: [(PlayerSlot, Vec2); 2] = [
    (PlayerSlot::One, Vec2::new(400.0, 300.0)),
    (PlayerSlot::Two, Vec2::new(200.0, 300.0)),
];

pub(super) fn plugin(app: &mut App) {
    app.load_resource::<LevelAssets>();

    app.add_systems(
        Update,
        fit_level_to_window
            .in_set(AppSystems::Update)
            .run_if(in_state(Screen::Gameplay)),
    );
}

#[derive(Resource, Asset, Clone, Reflect)]
#[reflect(Resource)]
pub struct LevelAssets {
    #[dependency]
    ground: Handle<Image>,
}

impl FromWorld for LevelAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        Self {
            ground: assets.load("images/ground.png"),
        }
    }
}

/// A system that spawns the arena.
pub fn spawn_level(
    mut commands: Commands,
    window: Single<&Window, With<PrimaryWindow>>,
    tuning: Res<FightTuning>,
    level_assets: Res<LevelAssets>,
    player_assets: Res<PlayerAssets>,
    mut texture_atlas_layouts: ResMut<Assets<TextureAtlasLayout>>,
    mut bounds: ResMut<WorldBounds>,
) {
    let viewport = window.size();
    *bounds = world_bounds(viewport);

    let [(first_slot, first_at), (second_slot, second_at)] = SPAWN_POINTS;
    let first = player(
        first_slot,
        screen_to_world(first_at, viewport).extend(2.0),
        &tuning,
        &player_assets,
        &mut texture_atlas_layouts,
    );
    let second = player(
        second_slot,
        screen_to_world(second_at, viewport).extend(1.0),
        &tuning,
        &player_assets,
        &mut texture_atlas_layouts,
    );
    commands.spawn((
        Name::new("Level"),
        Transform::default(),
        Visibility::default(),
        DespawnOnExit(Screen::Gameplay),
        children![
            ground(&level_assets, viewport, tuning.ground_height),
            first,
            second,
        ],
    ));
    info!("Spawned level for a {}x{} window", viewport.x, viewport.y);
}

fn ground(level_assets: &LevelAssets, viewport: Vec2, height: f32) -> impl Bundle + use<> {
    let (center, size) = ground_placement(viewport, height);
    (
        Name::new("Ground"),
        Ground {
            half_size: size / 2.0,
        },
        Sprite {
            image: level_assets.ground.clone(),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(center.extend(0.0)),
    )
}

/// Keep the ground spanning the window and the bounds matching it.
fn fit_level_to_window(
    mut resized: MessageReader<WindowResized>,
    tuning: Res<FightTuning>,
    mut bounds: ResMut<WorldBounds>,
    mut ground_query: Query<(&mut Ground, &mut Sprite, &mut Transform)>,
) {
    let Some(resize) = resized.read().last() else {
        return;
    };
    let viewport = Vec2::new(resize.width, resize.height);
    *bounds = world_bounds(viewport);

    let (center, size) = ground_placement(viewport, tuning.ground_height);
    for (mut ground, mut sprite, mut transform) in &mut ground_query {
        ground.half_size = size / 2.0;
        sprite.custom_size = Some(size);
        transform.translation = center.extend(transform.translation.z);
    }
}

pub fn world_bounds(viewport: Vec2) -> WorldBounds {
    WorldBounds(Rect::from_center_size(Vec2::ZERO, viewport))
}

/// Centre and size of a full-width ground strip flush with the bottom edge.
pub fn ground_placement(viewport: Vec2, height: f32) -> (Vec2, Vec2) {
    let center = Vec2::new(0.0, -viewport.y / 2.0 + height / 2.0);
    (center, Vec2::new(viewport.x, height))
}

/// Convert a top-left, y-down screen position to the camera's centred, y-up space.
pub fn screen_to_world(screen: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(screen.x - viewport.x / 2.0, viewport.y / 2.0 - screen.y)
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{message::Messages, system::RunSystemOnce};

    use super::*;

    #[test]
    fn resize_refits_ground_and_bounds() {
        let mut world = World::new();
        world.init_resource::<FightTuning>();
        world.init_resource::<WorldBounds>();
        world.init_resource::<Messages<WindowResized>>();
        let ground = world
            .spawn((
                Ground {
                    half_size: Vec2::new(640.0, 50.0),
                },
                Sprite::default(),
                Transform::from_xyz(0.0, -310.0, 0.0),
            ))
            .id();
        world
            .resource_mut::<Messages<WindowResized>>()
            .write(WindowResized {
                window: Entity::PLACEHOLDER,
                width: 800.0,
                height: 600.0,
            });

        world.run_system_once(fit_level_to_window).unwrap();

        assert_eq!(
            world.get::<Ground>(ground).unwrap().half_size,
            Vec2::new(400.0, 50.0)
        );
        assert_eq!(
            world.get::<Sprite>(ground).unwrap().custom_size,
            Some(Vec2::new(800.0, 100.0))
        );
        assert_eq!(
            world.get::<Transform>(ground).unwrap().translation,
            Vec3::new(0.0, -250.0, 0.0)
        );
        let bounds = world.resource::<WorldBounds>();
        assert_eq!(bounds.0.min, Vec2::new(-400.0, -300.0));
        assert_eq!(bounds.0.max, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn screen_origin_is_the_top_left_corner() {
        let viewport = Vec2::new(1280.0, 720.0);
        assert_eq!(screen_to_world(Vec2::ZERO, viewport), Vec2::new(-640.0, 360.0));
        assert_eq!(
            screen_to_world(Vec2::new(400.0, 300.0), viewport),
            Vec2::new(-240.0, 60.0)
        );
    }

    #[test]
    fn ground_spans_the_bottom_of_the_window() {
        let (center, size) = ground_placement(Vec2::new(800.0, 600.0), 100.0);
        assert_eq!(size, Vec2::new(800.0, 100.0));
        assert_eq!(center, Vec2::new(0.0, -250.0));
    }

    #[test]
    fn bounds_follow_the_window() {
        let bounds = world_bounds(Vec2::new(800.0, 600.0));
        assert_eq!(bounds.0.min, Vec2::new(-400.0, -300.0));
        assert_eq!(bounds.0.max, Vec2::new(400.0, 300.0));
    }
}
