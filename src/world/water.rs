use bevy::prelude::*;
use crate::shared::*;

pub const WATER_COLOR: Color = Color::srgb(0.22, 0.4, 0.7);

pub fn frame_path(frame: usize) -> String {
    format!("graphics/water/{}.png", frame)
}

/// Cycles water tiles through their frames. Skipped while a modal is open.
pub fn animate_water(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut query: Query<(&mut AnimatedWater, &mut Drawable)>,
) {
    let dt = time.delta_secs();
    for (mut water, mut drawable) in &mut query {
        let before = water.frame_index as usize;
        water.frame_index = advance_frame(
            water.frame_index,
            config.water_animation_fps,
            dt,
            config.water_frames,
        );
        let after = water.frame_index as usize;
        if after != before {
            drawable.visual.image = Some(frame_path(after));
        }
    }
}
