// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]
// Disable console on Windows for non-dev builds.
#![cfg_attr(not(feature = "dev"), windows_subsystem = "windows")]

mod asset_tracking;
#[cfg(feature = "dev")]
mod dev_tools;
mod game;
mod screens;

use bevy::{asset::AssetMetaCheck, prelude::*};

use crate::game::camera::CameraShake;

fn main() -> AppExit {
    App::new().add_plugins(AppPlugin).run()
}

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    // Web builds would otherwise request `.meta` files that are never deployed.
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Sticksmash".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                    .into(),
                    ..default()
                }),
        );
        app.insert_resource(ClearColor(Color::WHITE));

        app.add_plugins((
            asset_tracking::plugin,
            #[cfg(feature = "dev")]
            dev_tools::plugin,
            game::plugin,
            screens::plugin,
        ));

        configure_app_systems(app);

        app.add_systems(Startup, spawn_camera);
    }
}

/// Order the `AppSystems` sets and gate `PausableSystems` on the `Pause` state.
fn configure_app_systems(app: &mut App) {
    // Order new `AppSystems` variants by adding them here:
    app.configure_sets(
        Update,
        (
            AppSystems::TickTimers,
            AppSystems::RecordInput,
            AppSystems::Update,
            AppSystems::Physics,
            AppSystems::Tweens,
            AppSystems::Present,
        )
            .chain(),
    );

    app.init_state::<Pause>();
    app.configure_sets(Update, PausableSystems.run_if(in_state(Pause(false))));
}

/// High-level groupings of systems for the app in the `Update` schedule.
/// When adding a new variant, make sure to order it in
/// `configure_app_systems`.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
enum AppSystems {
    /// Tick timers.
    TickTimers,
    /// Record player input.
    RecordInput,
    /// Turn intents into velocities, dashes and punches.
    Update,
    /// Integrate arcade bodies.
    Physics,
    /// Advance tweens. Runs after physics so tweened positions win the frame.
    Tweens,
    /// Sprite and camera presentation.
    Present,
}

/// Whether or not the game is paused.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
struct Pause(pub bool);

/// A system set for systems that shouldn't run while the game is paused.
#[derive(SystemSet, Copy, Clone, Eq, PartialEq, Hash, Debug)]
struct PausableSystems;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d, CameraShake::default()));
}
