//! The blocking "next day" transition.
//!
//! Once the sky reaches its evening colour the screen fades to black, the
//! world is rebuilt while it is dark, a caption holds for a couple of
//! seconds of wall-clock time, and the screen fades back in.

use std::time::Duration;

use bevy::prelude::*;

use crate::shared::*;
use crate::world::{LevelReset, ResettableWorld};

pub const MAX_BRIGHTNESS: f32 = 255.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    /// Darkening toward black.
    FadeIn,
    /// Fully dark, caption shown.
    Message,
    /// Brightening back to normal.
    FadeOut,
}

/// What one call to `advance` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionStep {
    pub from: TransitionPhase,
    pub to: TransitionPhase,
    pub reset_fired: bool,
}

impl TransitionStep {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMachine {
    pub phase: TransitionPhase,
    /// 255 = untouched, 0 = black.
    pub brightness: f32,
    /// Brightness units per second.
    pub speed: f32,
    pub message_duration: Duration,
    /// Wall-clock time the message phase began.
    pub message_started: Duration,
}

impl TransitionMachine {
    pub fn new(speed: f32, message_duration: Duration) -> Self {
        Self {
            phase: TransitionPhase::Idle,
            brightness: MAX_BRIGHTNESS,
            speed,
            message_duration,
            message_started: Duration::ZERO,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.transition_speed,
            Duration::from_millis(config.transition_message_ms),
        )
    }

    /// Step the machine once.
    ///
    /// `dt` drives the fades, `now` (wall-clock) drives the message hold.
    /// Entering the fade from `Idle` applies the first fade step in the same
    /// call. `world.reset()` runs exactly once per cycle, at the moment the
    /// screen reaches black.
    pub fn advance(
        &mut self,
        dt: f32,
        now: Duration,
        sky_reached: bool,
        world: &mut impl ResettableWorld,
    ) -> TransitionStep {
        let from = self.phase;
        let mut reset_fired = false;

        if self.phase == TransitionPhase::Idle && sky_reached {
            self.phase = TransitionPhase::FadeIn;
        }

        match self.phase {
            TransitionPhase::Idle => {}
            TransitionPhase::FadeIn => {
                self.brightness = (self.brightness - self.speed * dt).max(0.0);
                if self.brightness <= 0.0 {
                    self.phase = TransitionPhase::Message;
                    self.message_started = now;
                    world.reset();
                    reset_fired = true;
                }
            }
            TransitionPhase::Message => {
                if now.saturating_sub(self.message_started) > self.message_duration {
                    self.phase = TransitionPhase::FadeOut;
                }
            }
            TransitionPhase::FadeOut => {
                self.brightness = (self.brightness + self.speed * dt).min(MAX_BRIGHTNESS);
                if self.brightness >= MAX_BRIGHTNESS {
                    self.phase = TransitionPhase::Idle;
                }
            }
        }

        TransitionStep {
            from,
            to: self.phase,
            reset_fired,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == TransitionPhase::Idle
    }

    pub fn shows_caption(&self) -> bool {
        self.phase == TransitionPhase::Message
    }

    /// Brightness as a 0..=1 multiplier.
    pub fn brightness_factor(&self) -> f32 {
        (self.brightness / MAX_BRIGHTNESS).clamp(0.0, 1.0)
    }
}

#[derive(Resource, Debug, Clone, Deref, DerefMut)]
pub struct DayTransition(pub TransitionMachine);

impl FromWorld for DayTransition {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
        Self(TransitionMachine::from_config(&config))
    }
}

/// Runs every tick after the sky, modal or not.
pub fn advance_transition(
    time: Res<Time>,
    real_time: Res<Time<Real>>,
    mut transition: ResMut<DayTransition>,
    mut world: LevelReset,
) {
    let sky_reached = world.sky_reached_end_color();
    let step = transition.advance(
        time.delta_secs(),
        real_time.elapsed(),
        sky_reached,
        &mut world,
    );
    if step.changed() {
        info!("[DayCycle] Transition {:?} -> {:?}", step.from, step.to);
    }
    if step.reset_fired {
        info!("[DayCycle] Rebuilt the world behind the black screen");
    }
}
