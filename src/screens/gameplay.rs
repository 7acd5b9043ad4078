//! The screen state for the main gameplay.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{Pause, game::level::spawn_level, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_level);

    app.add_systems(
        Update,
        toggle_pause.run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::Escape))),
    );
    app.add_systems(OnExit(Screen::Gameplay), unpause);

    // Freeze virtual time with the game so dash cooldowns don't run out while paused.
    app.add_systems(OnEnter(Pause(true)), (pause_time, spawn_pause_overlay));
    app.add_systems(OnExit(Pause(true)), resume_time);
}

fn toggle_pause(pause: Res<State<Pause>>, mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(!pause.0));
}

fn unpause(mut next_pause: ResMut<NextState<Pause>>) {
    next_pause.set(Pause(false));
}

fn pause_time(mut time: ResMut<Time<Virtual>>) {
    time.pause();
}

fn resume_time(mut time: ResMut<Time<Virtual>>) {
    time.unpause();
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands.spawn((
        Name::new("Pause Overlay"),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        GlobalZIndex(1),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.4)),
        DespawnOnExit(Pause(true)),
        children![(
            Text::new("Paused"),
            TextFont::from_font_size(48.0),
            TextColor(Color::WHITE),
        )],
    ));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::{
        math::curve::EaseFunction, state::app::StatesPlugin, time::TimeUpdateStrategy,
    };

    use super::*;
    use crate::{
        AppSystems, PausableSystems, configure_app_systems,
        game::tween::{Tween, TweenAxis, TweenCompleted, TweenPurpose, advance_tweens},
    };

    fn app_with_a_tween() -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            100,
        )));
        app.init_resource::<ButtonInput<KeyCode>>();
        configure_app_systems(&mut app);
        app.add_plugins(plugin);

        app.add_message::<TweenCompleted>();
        app.add_systems(
            Update,
            advance_tweens
                .in_set(AppSystems::Tweens)
                .in_set(PausableSystems),
        );
        let target = app.world_mut().spawn(Transform::default()).id();
        app.world_mut().spawn(Tween::new(
            target,
            TweenAxis::X,
            0.0,
            100.0,
            Duration::from_secs(10),
            EaseFunction::Linear,
            TweenPurpose::Knockback,
        ));
        (app, target)
    }

    fn x_of(app: &App, target: Entity) -> f32 {
        app.world().get::<Transform>(target).unwrap().translation.x
    }

    fn set_pause(app: &mut App, paused: bool) {
        app.world_mut()
            .resource_mut::<NextState<Pause>>()
            .set(Pause(paused));
    }

    #[test]
    fn pause_freezes_virtual_time_and_tweens() {
        let (mut app, target) = app_with_a_tween();
        for _ in 0..3 {
            app.update();
        }
        let before = x_of(&app, target);
        assert!(before > 0.0);

        set_pause(&mut app, true);
        app.update();
        assert!(app.world().resource::<Time<Virtual>>().is_paused());
        app.update();
        assert_eq!(x_of(&app, target), before);

        set_pause(&mut app, false);
        app.update();
        assert!(!app.world().resource::<Time<Virtual>>().is_paused());
        app.update();
        assert!(x_of(&app, target) > before);
    }
}
