//! Dashing: a quick eased slide in the facing direction that overshoots and
//! settles back a little, limited by a cooldown.

use std::time::Duration;

use bevy::{math::curve::EaseFunction, prelude::*};

use crate::{
    AppSystems, PausableSystems,
    game::{
        camera::ShakeCamera,
        movement::{Facing, MovementController},
        tuning::FightTuning,
        tween::{Tween, TweenAxis, TweenCompleted, TweenPurpose},
    },
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (finish_dash_strokes, start_dashes)
            .chain()
            .in_set(AppSystems::Update)
            .in_set(PausableSystems),
    );
}

#[derive(Component, Reflect, Debug, Default, Clone, Copy)]
#[reflect(Component)]
pub struct DashState {
    /// Set from the start of the stroke until the recoil finishes.
    pub in_progress: bool,
    /// When the last dash started, in virtual time. Zero before the first one,
    /// so the first dash is only available once a full cooldown has passed.
    pub last_dash: Duration,
}

impl DashState {
    pub fn ready(&self, now: Duration, cooldown: Duration) -> bool {
        !self.in_progress && now.saturating_sub(self.last_dash) >= cooldown
    }
}

fn start_dashes(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<FightTuning>,
    mut dash_query: Query<(Entity, &MovementController, &Facing, &Transform, &mut DashState)>,
    mut shake: MessageWriter<ShakeCamera>,
) {
    let now = time.elapsed();
    for (entity, controller, facing, transform, mut dash) in &mut dash_query {
        if !controller.dash || !dash.ready(now, tuning.dash_cooldown()) {
            continue;
        }
        dash.in_progress = true;
        dash.last_dash = now;

        let direction = facing.sign();
        let x = transform.translation.x;
        commands.spawn((
            Name::new("Dash Tween"),
            Tween::new(
                entity,
                TweenAxis::X,
                x,
                x + tuning.dash_distance * direction,
                tuning.dash_duration(),
                EaseFunction::SineInOut,
                TweenPurpose::Dash { direction },
            ),
        ));
        shake.write(ShakeCamera {
            duration: tuning.shake_duration(),
            intensity: tuning.shake_intensity,
        });
    }
}

/// Chain the recoil after the stroke, and release the guard after the recoil.
fn finish_dash_strokes(
    mut commands: Commands,
    tuning: Res<FightTuning>,
    mut completed: MessageReader<TweenCompleted>,
    mut dash_query: Query<(&Transform, &mut DashState)>,
) {
    for event in completed.read() {
        let Ok((transform, mut dash)) = dash_query.get_mut(event.target) else {
            continue;
        };
        match event.purpose {
            TweenPurpose::Dash { direction } => {
                let x = transform.translation.x;
                commands.spawn((
                    Name::new("Dash Recoil Tween"),
                    Tween::new(
                        event.target,
                        TweenAxis::X,
                        x,
                        x - tuning.dash_recoil_distance * direction,
                        tuning.dash_recoil_duration(),
                        EaseFunction::Linear,
                        TweenPurpose::DashRecoil,
                    ),
                ));
            }
            TweenPurpose::DashRecoil => dash.in_progress = false,
            TweenPurpose::Knockback | TweenPurpose::Hop => {}
        }
    }
}
