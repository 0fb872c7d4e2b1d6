//! Painter's-algorithm compositing.
//!
//! Every `Drawable` is placed in its layer's z band; inside a band, sprites
//! lower on the screen (larger vertical centre) draw later. The scroll
//! offset is applied here, with the conversion from top-left world space
//! to Bevy's centred, y-up screen space.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::shared::*;

/// Width of one layer's z band.
pub const LAYER_BAND: f32 = 100.0;
/// Share of the band used for in-layer ordering; the rest separates layers.
const BAND_FILL: f32 = 0.9;

/// Entities in the order they were composited on the last frame. The map
/// overlay paints its tiles in this order too.
#[derive(Resource, Debug, Clone, Default)]
pub struct DrawOrder(pub Vec<Entity>);

/// Indices of `items` in draw order: ascending layer, then ascending
/// vertical centre. Stable, so ties keep their input order.
pub fn draw_order(items: &[(Layer, f32)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .0
            .cmp(&items[b].0)
            .then(items[a].1.total_cmp(&items[b].1))
    });
    order
}

/// z for the `rank`-th sprite out of `count` in `layer`.
pub fn layer_z(layer: Layer, rank: usize, count: usize) -> f32 {
    let base = layer.index() as f32 * LAYER_BAND;
    base + LAYER_BAND * BAND_FILL * rank as f32 / count.max(1) as f32
}

/// Screen-space translation for a world-space centre.
pub fn screen_position(world_center: Vec2, offset: Vec2, viewport: Vec2) -> Vec2 {
    let local = world_center - offset - viewport / 2.0;
    Vec2::new(local.x, -local.y)
}

pub fn composite_drawables(
    config: Res<GameConfig>,
    offset: Res<CameraOffset>,
    mut draw_list: ResMut<DrawOrder>,
    mut query: Query<(Entity, &Drawable, &mut Transform)>,
) {
    let mut entities = Vec::new();
    let mut keys = Vec::new();
    for (entity, drawable, _) in &query {
        entities.push(entity);
        keys.push((drawable.layer, drawable.rect.center().y));
    }

    let order = draw_order(&keys);

    let mut per_layer: HashMap<Layer, usize> = HashMap::new();
    for (layer, _) in &keys {
        *per_layer.entry(*layer).or_default() += 1;
    }

    let viewport = config.viewport();
    let mut rank_in_layer: HashMap<Layer, usize> = HashMap::new();
    draw_list.0.clear();
    for index in order {
        let entity = entities[index];
        let Ok((_, drawable, mut transform)) = query.get_mut(entity) else {
            continue;
        };
        let layer = drawable.layer;
        let rank = rank_in_layer.entry(layer).or_default();
        let z = layer_z(layer, *rank, per_layer.get(&layer).copied().unwrap_or(1));
        *rank += 1;

        let screen = screen_position(drawable.rect.center(), offset.0, viewport);
        let next = Vec3::new(screen.x, screen.y, z);
        if transform.translation != next {
            transform.translation = next;
        }
        draw_list.0.push(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_layer_sorted_by_vertical_centre() {
        let items = [
            (Layer::Main, 300.0),
            (Layer::Main, 100.0),
            (Layer::Main, 200.0),
        ];
        assert_eq!(draw_order(&items), vec![1, 2, 0]);
    }

    #[test]
    fn test_layers_beat_position() {
        let items = [
            (Layer::HouseTop, 0.0),
            (Layer::Water, 5000.0),
            (Layer::Main, 10.0),
            (Layer::Ground, 9999.0),
        ];
        assert_eq!(draw_order(&items), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = [
            (Layer::Main, 50.0),
            (Layer::Main, 50.0),
            (Layer::Main, 50.0),
        ];
        assert_eq!(draw_order(&items), vec![0, 1, 2]);
    }

    #[test]
    fn test_layer_z_bands_do_not_overlap() {
        let top_of_water = layer_z(Layer::Water, 999, 1000);
        let bottom_of_ground = layer_z(Layer::Ground, 0, 1);
        assert!(top_of_water < bottom_of_ground);
        assert!(layer_z(Layer::Main, 1, 3) > layer_z(Layer::Main, 0, 3));
    }

    #[test]
    fn test_screen_position_flips_y_around_viewport_centre() {
        let viewport = Vec2::new(1280.0, 720.0);
        assert_eq!(
            screen_position(Vec2::new(640.0, 360.0), Vec2::ZERO, viewport),
            Vec2::ZERO
        );
        assert_eq!(
            screen_position(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), viewport),
            Vec2::new(-640.0, 360.0)
        );
    }
}
