//! Fighter sprite animation.
//! This is based on multiple examples and may be very different for your game.
//! - [Sprite flipping](https://github.com/bevyengine/bevy/blob/latest/examples/2d/sprite_flipping.rs)
//! - [Sprite animation](https://github.com/bevyengine/bevy/blob/latest/examples/2d/sprite_animation.rs)
//! - [Timers](https://github.com/bevyengine/bevy/blob/latest/examples/time/timers.rs)

use bevy::prelude::*;
use std::{ops::RangeInclusive, time::Duration};

use crate::{AppSystems, PausableSystems, game::movement::Facing};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            update_animation_timer.in_set(AppSystems::TickTimers),
            update_animation_atlas.in_set(AppSystems::Present),
        )
            .in_set(PausableSystems),
    );
}

/// Update the animation timer.
fn update_animation_timer(time: Res<Time>, mut query: Query<&mut FighterAnimation>) {
    for mut animation in &mut query {
        animation.update_timer(time.delta());
    }
}

/// Update the texture atlas and flip the sprite towards the facing side.
fn update_animation_atlas(mut query: Query<(&FighterAnimation, &Facing, &mut Sprite)>) {
    for (animation, facing, mut sprite) in &mut query {
        if let Some(atlas) = sprite.texture_atlas.as_mut() {
            atlas.index = animation.get_atlas_index();
        }
        sprite.flip_x = *facing == Facing::Left;
    }
}

#[derive(Reflect, PartialEq, Eq, Copy, Clone, Debug)]
pub enum FighterClip {
    Walk,
    Jump,
}

impl FighterClip {
    /// Frames of the clip in the sprite sheet.
    fn frames(self) -> RangeInclusive<usize> {
        match self {
            FighterClip::Walk => 9..=15,
            FighterClip::Jump => 27..=33,
        }
    }

    fn repeats(self) -> bool {
        match self {
            FighterClip::Walk => true,
            FighterClip::Jump => false,
        }
    }
}

/// Component that tracks a fighter's animation clip.
/// It is tightly bound to the texture atlas we use.
#[derive(Component, Reflect, Debug)]
#[reflect(Component)]
pub struct FighterAnimation {
    timer: Timer,
    frame: usize,
    /// `None` once stopped; the sprite keeps showing `frame`.
    clip: Option<FighterClip>,
}

impl Default for FighterAnimation {
    fn default() -> Self {
        Self {
            timer: Timer::new(Self::FRAME_INTERVAL, TimerMode::Repeating),
            frame: Self::REST_FRAME,
            clip: None,
        }
    }
}

impl FighterAnimation {
    /// The sheet is 64x64 cells, nine to a row.
    pub const COLUMNS: u32 = 9;
    pub const ROWS: u32 = 4;
    pub const CELL_SIZE: u32 = 64;
    /// Shown before any clip has played.
    const REST_FRAME: usize = 9;
    /// Both clips run at 10 frames per second.
    const FRAME_INTERVAL: Duration = Duration::from_millis(100);

    /// Start `clip` from its first frame, unless it is already playing.
    pub fn play(&mut self, clip: FighterClip) {
        if self.clip == Some(clip) {
            return;
        }
        self.clip = Some(clip);
        self.frame = *clip.frames().start();
        self.timer.reset();
    }

    /// Freeze on the current frame.
    pub fn stop(&mut self) {
        self.clip = None;
    }

    pub fn is_playing(&self, clip: FighterClip) -> bool {
        self.clip == Some(clip)
    }

    /// Update animation timers.
    pub fn update_timer(&mut self, delta: Duration) {
        let Some(clip) = self.clip else {
            return;
        };
        self.timer.tick(delta);
        for _ in 0..self.timer.times_finished_this_tick() {
            if self.frame < *clip.frames().end() {
                self.frame += 1;
            } else if clip.repeats() {
                self.frame = *clip.frames().start();
            } else {
                self.clip = None;
                return;
            }
        }
    }

    /// Return sprite index in the atlas.
    pub fn get_atlas_index(&self) -> usize {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(100);

    #[test]
    fn walk_loops_back_to_its_first_frame() {
        let mut animation = FighterAnimation::default();
        animation.play(FighterClip::Walk);
        assert_eq!(animation.get_atlas_index(), 9);

        for _ in 0..6 {
            animation.update_timer(FRAME);
        }
        assert_eq!(animation.get_atlas_index(), 15);

        animation.update_timer(FRAME);
        assert_eq!(animation.get_atlas_index(), 9);
        assert!(animation.is_playing(FighterClip::Walk));
    }

    #[test]
    fn jump_plays_once_and_holds_its_last_frame() {
        let mut animation = FighterAnimation::default();
        animation.play(FighterClip::Jump);
        animation.update_timer(FRAME * 10);

        assert_eq!(animation.get_atlas_index(), 33);
        assert!(!animation.is_playing(FighterClip::Jump));
    }

    #[test]
    fn replaying_the_current_clip_does_not_restart_it() {
        let mut animation = FighterAnimation::default();
        animation.play(FighterClip::Walk);
        animation.update_timer(FRAME * 2);
        animation.play(FighterClip::Walk);

        assert_eq!(animation.get_atlas_index(), 11);
    }

    #[test]
    fn stopping_freezes_the_frame() {
        let mut animation = FighterAnimation::default();
        animation.play(FighterClip::Walk);
        animation.update_timer(FRAME);
        animation.stop();
        animation.update_timer(FRAME * 3);

        assert_eq!(animation.get_atlas_index(), 10);
    }
}
