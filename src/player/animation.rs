use bevy::prelude::*;

use crate::shared::*;

/// Flat colour used until the character frames load.
pub const PLAYER_COLOR: Color = Color::srgb(0.2, 0.5, 0.8);

/// e.g. `graphics/character/left_idle/2.png`
pub fn frame_path(status: ActorStatus, frame: usize) -> String {
    format!("graphics/character/{}/{}.png", status.animation_name(), frame)
}

/// Steps the walk/idle cycle and points the sprite at the current frame.
pub fn animate_player(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut players: Query<(&mut Actor, &mut Drawable), With<Player>>,
) {
    for (mut actor, mut drawable) in &mut players {
        actor.frame_index = advance_frame(
            actor.frame_index,
            config.player_animation_fps,
            time.delta_secs(),
            config.player_frames,
        );
        let path = frame_path(actor.status, actor.frame_index as usize);
        if drawable.visual.image.as_deref() != Some(path.as_str()) {
            drawable.visual.image = Some(path);
        }
    }
}
