//! Gameplay constants.
//!
//! [`FightTuning`] starts from built-in defaults. If `tuning.fight.toml` is
//! present in the assets folder it overrides them, and is re-applied every
//! time the file changes on disk.

use std::time::Duration;

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::Deserialize;
use thiserror::Error;

const TUNING_PATH: &str = "tuning.fight.toml";

pub(super) fn plugin(app: &mut App) {
    app.init_asset::<TuningAsset>();
    app.register_asset_loader(TuningLoader);
    app.init_resource::<FightTuning>();
    app.add_systems(Startup, load_tuning);
    app.add_systems(PreUpdate, apply_loaded_tuning);
}

/// Every number the fight feel depends on. Durations are in milliseconds.
#[derive(Resource, Reflect, Deserialize, Debug, Clone, PartialEq)]
#[reflect(Resource)]
#[serde(default, deny_unknown_fields)]
pub struct FightTuning {
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Fraction of vertical speed kept when bouncing off the ground.
    pub bounce: f32,
    pub walk_speed: f32,
    pub jump_speed: f32,
    pub fighter_size: f32,
    pub ground_height: f32,

    pub dash_cooldown_ms: u64,
    pub dash_distance: f32,
    pub dash_duration_ms: u64,
    /// How far the fighter slides back after the dash overshoots.
    pub dash_recoil_distance: f32,
    pub dash_recoil_duration_ms: u64,

    /// Distance from the fighter's centre to the centre of the punch box.
    pub punch_range: f32,
    pub punch_size: f32,
    pub knockback_distance: f32,
    pub knockback_duration_ms: u64,
    pub hop_height: f32,
    pub hop_duration_ms: u64,

    pub shake_duration_ms: u64,
    /// Shake amplitude as a fraction of the viewport size.
    pub shake_intensity: f32,
}

impl Default for FightTuning {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            bounce: 0.2,
            walk_speed: 160.0,
            jump_speed: 330.0,
            fighter_size: 64.0,
            ground_height: 100.0,

            dash_cooldown_ms: 2000,
            dash_distance: 200.0,
            dash_duration_ms: 300,
            dash_recoil_distance: 20.0,
            dash_recoil_duration_ms: 200,

            punch_range: 50.0,
            punch_size: 20.0,
            knockback_distance: 100.0,
            knockback_duration_ms: 500,
            hop_height: 10.0,
            hop_duration_ms: 100,

            shake_duration_ms: 100,
            shake_intensity: 0.01,
        }
    }
}

impl FightTuning {
    pub fn dash_cooldown(&self) -> Duration {
        Duration::from_millis(self.dash_cooldown_ms)
    }

    pub fn dash_duration(&self) -> Duration {
        Duration::from_millis(self.dash_duration_ms)
    }

    pub fn dash_recoil_duration(&self) -> Duration {
        Duration::from_millis(self.dash_recoil_duration_ms)
    }

    pub fn knockback_duration(&self) -> Duration {
        Duration::from_millis(self.knockback_duration_ms)
    }

    pub fn hop_duration(&self) -> Duration {
        Duration::from_millis(self.hop_duration_ms)
    }

    pub fn shake_duration(&self) -> Duration {
        Duration::from_millis(self.shake_duration_ms)
    }

    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

#[derive(Asset, TypePath, Debug)]
pub struct TuningAsset(pub FightTuning);

/// Keeps the tuning file loaded so hot reloads keep arriving.
#[derive(Resource)]
struct TuningHandle(Handle<TuningAsset>);

#[derive(Debug, Error)]
pub enum TuningLoaderError {
    #[error("Could not read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tuning file is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Could not parse tuning file: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Default)]
pub struct TuningLoader;

impl AssetLoader for TuningLoader {
    type Asset = TuningAsset;
    type Settings = ();
    type Error = TuningLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let tuning = FightTuning::parse(std::str::from_utf8(&bytes)?)?;
        Ok(TuningAsset(tuning))
    }

    fn extensions(&self) -> &[&str] {
        &["fight.toml"]
    }
}

fn load_tuning(mut commands: Commands, assets: Res<AssetServer>) {
    commands.insert_resource(TuningHandle(assets.load(TUNING_PATH)));
}

fn apply_loaded_tuning(
    mut events: MessageReader<AssetEvent<TuningAsset>>,
    handle: Option<Res<TuningHandle>>,
    loaded: Res<Assets<TuningAsset>>,
    mut tuning: ResMut<FightTuning>,
) {
    let Some(handle) = handle else {
        return;
    };
    for event in events.read() {
        let (AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id }) = event
        else {
            continue;
        };
        if *id != handle.0.id() {
            continue;
        }
        if let Some(asset) = loaded.get(*id) {
            *tuning = asset.0.clone();
            info!("Applied fight tuning from {TUNING_PATH}");
        }
    }
}
