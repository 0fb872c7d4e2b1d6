use bevy::prelude::*;

use crate::shared::*;

use super::animation::{frame_path, PLAYER_COLOR};

/// Everything the player entity is made of. The world spawns it on the
/// first map generation and only moves it afterwards.
pub fn player_bundle(start: Vec2, packages: u32, config: &GameConfig) -> impl Bundle {
    let mut actor = Actor::new(start, config);
    actor.teleport(start);
    actor.packages = packages;
    let drawable = Drawable::new(
        actor.sprite_rect(),
        Layer::Main,
        SpriteKind::Player,
        Visual::image(frame_path(actor.status, 0), PLAYER_COLOR),
    );

    info!(
        "[Player] Spawned at ({:.0}, {:.0}) carrying {} packages",
        start.x, start.y, packages
    );

    (
        Player,
        actor,
        drawable,
        Transform::default(),
        Visibility::default(),
    )
}
