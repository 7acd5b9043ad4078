//! Player-specific behavior.

use bevy::{
    image::{ImageLoaderSettings, ImageSampler},
    prelude::*,
};

use crate::{
    AppSystems, PausableSystems,
    asset_tracking::LoadResource,
    game::{
        animation::FighterAnimation,
        dash::DashState,
        movement::{Facing, MovementController},
        physics::ArcadeBody,
        tuning::FightTuning,
        tween::TweenLock,
    },
};

pub(super) fn plugin(app: &mut App) {
    app.load_resource::<PlayerAssets>();

    // Record each player's keys as movement controls.
    app.add_systems(
        Update,
        record_player_input
            .in_set(AppSystems::RecordInput)
            .in_set(PausableSystems),
    );
}

/// A fighter, spawned at `translation`.
pub fn player(
    slot: PlayerSlot,
    translation: Vec3,
    tuning: &FightTuning,
    player_assets: &PlayerAssets,
    texture_atlas_layouts: &mut Assets<TextureAtlasLayout>,
) -> impl Bundle + use<> {
    let layout = TextureAtlasLayout::from_grid(
        UVec2::splat(FighterAnimation::CELL_SIZE),
        FighterAnimation::COLUMNS,
        FighterAnimation::ROWS,
        None,
        None,
    );
    let texture_atlas_layout = texture_atlas_layouts.add(layout);
    let animation = FighterAnimation::default();
    let size = Vec2::splat(tuning.fighter_size);

    (
        Name::new(slot.name()),
        Player(slot),
        slot.controls(),
        Sprite {
            custom_size: Some(size),
            ..Sprite::from_atlas_image(
                player_assets.spritesheet.clone(),
                TextureAtlas {
                    layout: texture_atlas_layout,
                    index: animation.get_atlas_index(),
                },
            )
        },
        Transform::from_translation(translation),
        MovementController::default(),
        Facing::default(),
        DashState::default(),
        TweenLock::default(),
        ArcadeBody::new(size, tuning.bounce),
        animation,
    )
}

#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    fn name(self) -> &'static str {
        match self {
            PlayerSlot::One => "Player One",
            PlayerSlot::Two => "Player Two",
        }
    }

    /// Fixed key bindings, one side of the keyboard each.
    pub fn controls(self) -> PlayerControls {
        match self {
            PlayerSlot::One => PlayerControls {
                left: KeyCode::KeyA,
                right: KeyCode::KeyD,
                jump: KeyCode::KeyW,
                dash: KeyCode::KeyQ,
                punch: KeyCode::KeyZ,
            },
            PlayerSlot::Two => PlayerControls {
                left: KeyCode::ArrowLeft,
                right: KeyCode::ArrowRight,
                jump: KeyCode::ArrowUp,
                dash: KeyCode::ArrowDown,
                punch: KeyCode::Minus,
            },
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Player(pub PlayerSlot);

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct PlayerControls {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub dash: KeyCode,
    pub punch: KeyCode,
}

impl PlayerControls {
    pub fn read(&self, input: &ButtonInput<KeyCode>) -> MovementController {
        let mut intent_x = 0.0;
        // Right wins when both are held.
        if input.pressed(self.right) {
            intent_x = 1.0;
        } else if input.pressed(self.left) {
            intent_x = -1.0;
        }
        MovementController {
            intent_x,
            jump: input.pressed(self.jump),
            dash: input.pressed(self.dash),
            punch: input.pressed(self.punch),
        }
    }
}

fn record_player_input(
    input: Res<ButtonInput<KeyCode>>,
    mut controller_query: Query<(&PlayerControls, &mut MovementController), With<Player>>,
) {
    for (controls, mut controller) in &mut controller_query {
        *controller = controls.read(&input);
    }
}

#[derive(Resource, Asset, Clone, Reflect)]
#[reflect(Resource)]
pub struct PlayerAssets {
    #[dependency]
    pub spritesheet: Handle<Image>,
}

impl FromWorld for PlayerAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        Self {
            spritesheet: assets.load_with_settings(
                "images/player_test.png",
                |settings: &mut ImageLoaderSettings| {
                    // Use `nearest` image sampling to preserve pixel art style.
                    settings.sampler = ImageSampler::nearest();
                },
            ),
        }
    }
}
