use bevy::prelude::*;

use crate::shared::*;

/// Scroll offset that centres the viewport on `actor_center`, clamped per
/// axis so the view never leaves the map. Maps smaller than the viewport
/// pin the offset at 0.
pub fn camera_offset(actor_center: Vec2, map_size: Vec2, viewport: Vec2) -> Vec2 {
    let raw = actor_center - viewport / 2.0;
    let max = (map_size - viewport).max(Vec2::ZERO);
    raw.clamp(Vec2::ZERO, max)
}

/// The one camera. It never moves: scrolling is applied by the compositor
/// to every drawable instead.
pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Msaa::Off));
}

pub fn update_camera_offset(
    config: Res<GameConfig>,
    bounds: Res<LevelBounds>,
    players: Query<&Actor, With<Player>>,
    mut offset: ResMut<CameraOffset>,
) {
    let Ok(actor) = players.get_single() else {
        return;
    };
    let next = camera_offset(actor.hitbox.center(), bounds.size, config.viewport());
    if offset.0 != next {
        offset.0 = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_small_map_pins_offset_to_zero() {
        let offset = camera_offset(Vec2::new(500.0, 300.0), Vec2::new(800.0, 600.0), VIEW);
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn test_offset_centres_on_actor_inside_large_map() {
        let offset = camera_offset(Vec2::new(1500.0, 900.0), Vec2::new(2560.0, 1920.0), VIEW);
        assert_eq!(offset, Vec2::new(860.0, 540.0));
    }

    #[test]
    fn test_offset_clamped_at_far_edges() {
        let map = Vec2::new(2560.0, 1920.0);
        let offset = camera_offset(Vec2::new(2550.0, 1910.0), map, VIEW);
        assert_eq!(offset, map - VIEW);
        let offset = camera_offset(Vec2::new(10.0, 10.0), map, VIEW);
        assert_eq!(offset, Vec2::ZERO);
    }

    #[test]
    fn test_offset_always_within_bounds() {
        let map = Vec2::new(3000.0, 1000.0);
        for x in (0..3000).step_by(250) {
            for y in (0..1000).step_by(125) {
                let o = camera_offset(Vec2::new(x as f32, y as f32), map, VIEW);
                assert!(o.x >= 0.0 && o.x <= map.x - VIEW.x);
                assert!(o.y >= 0.0 && o.y <= map.y - VIEW.y);
            }
        }
    }
}
