//! Full-map overlay. M opens it when no dialogue is showing; M or Escape
//! closes it. While it is up the world is suspended like for a dialogue.

use bevy::prelude::*;

use crate::render::compositor::DrawOrder;
use crate::shared::*;

#[derive(Component)]
pub struct MapViewRoot;

const BOX_SIZE: Vec2 = Vec2::new(750.0, 600.0);
const BORDER: f32 = 5.0;
const PLAYER_MARKER: f32 = 8.0;

pub fn handle_map_input(
    input: Res<PlayerInput>,
    dialogue: Res<Dialogue>,
    mut map_view: ResMut<MapView>,
) {
    if map_view.active {
        if input.escape || input.toggle_map {
            map_view.active = false;
            debug!("[MapView] Closed");
        }
    } else if input.toggle_map && !dialogue.is_active() {
        map_view.active = true;
        debug!("[MapView] Opened");
    }
}

/// Uniform scale that fits `map` inside `frame`.
pub fn map_scale(map: Vec2, frame: Vec2) -> f32 {
    if map.x <= 0.0 || map.y <= 0.0 {
        return 1.0;
    }
    (frame.x / map.x).min(frame.y / map.y)
}

/// Build the overlay when the map opens and tear it down when it closes.
/// The map never changes while open, so it is drawn once per opening, in
/// the order the compositor last painted the world.
pub fn sync_map_view(
    mut commands: Commands,
    map_view: Res<MapView>,
    bounds: Res<LevelBounds>,
    draw_order: Res<DrawOrder>,
    roots: Query<Entity, With<MapViewRoot>>,
    drawables: Query<&Drawable, With<LevelEntity>>,
    players: Query<&Actor, With<Player>>,
) {
    if !map_view.is_changed() {
        return;
    }

    for root in &roots {
        commands.entity(root).despawn_recursive();
    }
    if !map_view.active {
        return;
    }

    let scale = map_scale(bounds.size, BOX_SIZE);
    let tiles: Vec<&Drawable> = draw_order
        .0
        .iter()
        .filter_map(|&entity| drawables.get(entity).ok())
        .filter(|d| matches!(d.kind, SpriteKind::Decoration | SpriteKind::Water))
        .collect();

    commands
        .spawn((
            MapViewRoot,
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            GlobalZIndex(20),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        width: Val::Px(BOX_SIZE.x),
                        height: Val::Px(BOX_SIZE.y),
                        border: UiRect::all(Val::Px(BORDER)),
                        overflow: Overflow::clip(),
                        ..default()
                    },
                    BackgroundColor(Color::BLACK),
                    BorderColor(Color::WHITE),
                ))
                .with_children(|frame| {
                    for tile in tiles {
                        frame.spawn((
                            scaled_node(tile.rect, scale),
                            BackgroundColor(tile.visual.color),
                        ));
                    }
                    if let Ok(actor) = players.get_single() {
                        let marker = Rect::from_center_size(
                            actor.hitbox.center() * scale,
                            Vec2::splat(PLAYER_MARKER),
                        );
                        frame.spawn((scaled_node(marker, 1.0), BackgroundColor(Color::WHITE)));
                    }
                });
        });
}

fn scaled_node(rect: Rect, scale: f32) -> Node {
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(rect.min.x * scale),
        top: Val::Px(rect.min.y * scale),
        width: Val::Px((rect.width() * scale).max(1.0)),
        height: Val::Px((rect.height() * scale).max(1.0)),
        ..default()
    }
}
