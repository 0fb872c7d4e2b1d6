//! Sky colour drift. The world is tinted by this colour; once it has fully
//! reached its evening target the day transition is armed.

use bevy::prelude::*;

use crate::shared::*;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Sky {
    /// Current colour, 0..=255 per channel.
    pub color: [f32; 3],
    pub start_color: [f32; 3],
    pub end_color: [f32; 3],
    /// Colour units per second, per channel.
    pub speed: f32,
    /// True only if no channel had to move on the last step.
    pub reached_end_color: bool,
}

impl FromWorld for Sky {
    fn from_world(world: &mut World) -> Self {
        Self::from_config(&world.get_resource::<GameConfig>().cloned().unwrap_or_default())
    }
}

impl Sky {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            color: config.sky_start_color,
            start_color: config.sky_start_color,
            end_color: config.sky_end_color,
            speed: config.sky_speed,
            reached_end_color: false,
        }
    }

    /// Move each channel toward its target by `speed * dt` without
    /// overshooting, then recompute `reached_end_color`.
    pub fn step(&mut self, dt: f32) {
        let delta = self.speed * dt;
        let mut moved = false;
        for (value, &target) in self.color.iter_mut().zip(self.end_color.iter()) {
            if *value > target {
                *value = (*value - delta).max(target);
                moved = true;
            } else if *value < target {
                *value = (*value + delta).min(target);
                moved = true;
            }
        }
        self.reached_end_color = !moved;
    }

    pub fn reset(&mut self) {
        self.color = self.start_color;
        self.reached_end_color = false;
    }

    /// The multiplicative tint this sky applies to the world.
    pub fn tint(&self) -> Color {
        let [r, g, b] = self.color.map(|c| (c / 255.0).clamp(0.0, 1.0));
        Color::srgb(r, g, b)
    }
}

/// Runs every tick, modal or not.
pub fn advance_sky(time: Res<Time>, mut sky: ResMut<Sky>) {
    let was_reached = sky.reached_end_color;
    sky.step(time.delta_secs());
    if sky.reached_end_color && !was_reached {
        info!("[DayCycle] Sky reached its evening colour");
    }
}
