//! Map data for the delivery town.
//!
//! A `MapDef` is everything one map generation needs: world size, solid
//! rectangles, named doors, the actor start, and the sprites to draw. The
//! world asks its `MapSource` for a fresh one at startup and on every reset.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

/// Axis-aligned rectangle in world pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectDef {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl RectDef {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorDef {
    pub name: String,
    pub rect: RectDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteDef {
    pub rect: RectDef,
    pub layer: Layer,
    #[serde(default)]
    pub image: Option<String>,
    /// Placeholder colour used until (or instead of) the image.
    pub color: [u8; 3],
}

impl SpriteDef {
    pub fn visual(&self) -> Visual {
        Visual {
            image: self.image.clone(),
            color: Color::srgb_u8(self.color[0], self.color[1], self.color[2]),
        }
    }
}

/// Complete definition of one map generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapDef {
    pub width: f32,
    pub height: f32,
    pub start: [f32; 2],
    #[serde(default)]
    pub obstacles: Vec<RectDef>,
    #[serde(default)]
    pub doors: Vec<DoorDef>,
    #[serde(default)]
    pub sprites: Vec<SpriteDef>,
    /// Animated water tiles. Not solid by themselves.
    #[serde(default)]
    pub water: Vec<RectDef>,
}

impl MapDef {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn start(&self) -> Vec2 {
        Vec2::from(self.start)
    }

    pub fn door_names(&self) -> Vec<String> {
        self.doors.iter().map(|d| d.name.clone()).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MAP SOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Supplies a map for each generation.
pub trait MapSource: Send + Sync {
    fn generate(&self) -> MapDef;
}

/// The map collaborator the world calls on startup and every reset.
#[derive(Resource)]
pub struct MapProvider(pub Box<dyn MapSource>);

impl FromWorld for MapProvider {
    fn from_world(world: &mut World) -> Self {
        match world.get_resource::<GameConfig>() {
            Some(config) => Self::from_config(config),
            None => Self(Box::new(BuiltinTown::new(TILE_SIZE))),
        }
    }
}

impl MapProvider {
    pub fn from_config(config: &GameConfig) -> Self {
        match &config.map_path {
            Some(path) => {
                info!("[World] Maps will be read from {}", path);
                Self(Box::new(JsonMapSource::new(path, config.tile_size)))
            }
            None => Self(Box::new(BuiltinTown::new(config.tile_size))),
        }
    }

    pub fn generate(&self) -> MapDef {
        self.0.generate()
    }
}

/// The hand-built town shipped with the game.
pub struct BuiltinTown {
    pub tile: f32,
}

impl BuiltinTown {
    pub fn new(tile: f32) -> Self {
        Self { tile }
    }
}

impl MapSource for BuiltinTown {
    fn generate(&self) -> MapDef {
        generate_town(self.tile)
    }
}

/// Reads a `MapDef` from a JSON file, falling back to the built-in town.
pub struct JsonMapSource {
    pub path: PathBuf,
    /// Tile size of the fallback town.
    pub tile: f32,
}

impl JsonMapSource {
    pub fn new(path: impl Into<PathBuf>, tile: f32) -> Self {
        Self {
            path: path.into(),
            tile,
        }
    }
}

impl MapSource for JsonMapSource {
    fn generate(&self) -> MapDef {
        match load_map_def(&self.path) {
            Ok(map) => map,
            Err(e) => {
                warn!("[World] {}; using built-in town", e);
                generate_town(self.tile)
            }
        }
    }
}

pub fn load_map_def(path: &Path) -> Result<MapDef, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read map {}: {}", path.display(), e))?;
    parse_map_def(&text).map_err(|e| format!("Invalid map {}: {}", path.display(), e))
}

pub fn parse_map_def(text: &str) -> Result<MapDef, String> {
    let map: MapDef = serde_json::from_str(text).map_err(|e| e.to_string())?;
    if map.width <= 0.0 || map.height <= 0.0 {
        return Err(format!("map size must be positive, got {}x{}", map.width, map.height));
    }
    Ok(map)
}

// ═══════════════════════════════════════════════════════════════════════
// BUILT-IN TOWN
// ═══════════════════════════════════════════════════════════════════════

const TOWN_COLS: usize = 40;
const TOWN_ROWS: usize = 30;

const GRASS: [u8; 3] = [86, 152, 74];
const WALL: [u8; 3] = [188, 150, 110];
const ROOF: [u8; 3] = [160, 60, 50];
const DOOR: [u8; 3] = [110, 70, 40];
const FENCE: [u8; 3] = [140, 110, 80];
const TREE: [u8; 3] = [40, 100, 50];
const FLOWER: [u8; 3] = [220, 200, 90];
const WATER: [u8; 3] = [55, 100, 180];

/// Two rows of houses along a central street, a pond in the south-east
/// corner, trees along the north edge, and a fence around the whole town.
pub fn generate_town(tile: f32) -> MapDef {
    let width = TOWN_COLS as f32 * tile;
    let height = TOWN_ROWS as f32 * tile;
    let mut map = MapDef {
        width,
        height,
        start: [width / 2.0, 14.5 * tile],
        obstacles: Vec::new(),
        doors: Vec::new(),
        sprites: Vec::new(),
        water: Vec::new(),
    };

    map.sprites.push(SpriteDef {
        rect: RectDef::new(0.0, 0.0, width, height),
        layer: Layer::Ground,
        image: Some("graphics/world/ground.png".into()),
        color: GRASS,
    });

    // Perimeter fence.
    for col in 0..TOWN_COLS {
        for row in [0, TOWN_ROWS - 1] {
            add_fence(&mut map, col, row, tile);
        }
    }
    for row in 1..TOWN_ROWS - 1 {
        for col in [0, TOWN_COLS - 1] {
            add_fence(&mut map, col, row, tile);
        }
    }

    // Houses: north row faces the street with doors below the wall,
    // south row likewise.
    let mut door_number = 1;
    for row_top in [5usize, 17] {
        for i in 0..5 {
            let col = 3 + i * 7;
            add_house(&mut map, col, row_top, tile, door_number);
            door_number += 1;
        }
    }

    // Trees along the north edge, between fence and houses.
    for i in 0..9 {
        let col = 2 + i * 4;
        let rect = RectDef::new(col as f32 * tile, 1.5 * tile, tile, tile * 1.5);
        map.sprites.push(SpriteDef {
            rect,
            layer: Layer::Main,
            image: Some("graphics/objects/tree.png".into()),
            color: TREE,
        });
        // Trunk only: the canopy can be walked behind.
        map.obstacles.push(RectDef::new(
            rect.x + tile * 0.25,
            rect.y + rect.h - tile * 0.5,
            tile * 0.5,
            tile * 0.5,
        ));
    }

    // Wildflowers scattered along the street, purely decorative.
    for i in 0..12 {
        let col = 2 + i * 3;
        map.sprites.push(SpriteDef {
            rect: RectDef::new(col as f32 * tile + tile * 0.25, 12.25 * tile, tile * 0.5, tile * 0.5),
            layer: Layer::Main,
            image: Some("graphics/objects/flower.png".into()),
            color: FLOWER,
        });
    }

    // Pond in the south-east corner.
    let (pond_col, pond_row, pond_w, pond_h) = (31usize, 24usize, 6usize, 4usize);
    for dy in 0..pond_h {
        for dx in 0..pond_w {
            map.water.push(RectDef::new(
                (pond_col + dx) as f32 * tile,
                (pond_row + dy) as f32 * tile,
                tile,
                tile,
            ));
        }
    }
    map.obstacles.push(RectDef::new(
        pond_col as f32 * tile,
        pond_row as f32 * tile,
        pond_w as f32 * tile,
        pond_h as f32 * tile,
    ));

    map
}

fn add_fence(map: &mut MapDef, col: usize, row: usize, tile: f32) {
    let rect = RectDef::new(col as f32 * tile, row as f32 * tile, tile, tile);
    map.sprites.push(SpriteDef {
        rect,
        layer: Layer::Main,
        image: Some("graphics/objects/fence.png".into()),
        color: FENCE,
    });
    map.obstacles.push(rect);
}

/// A 4×4-tile house: two tiles of wall, two of roof above it, and a door
/// zone one tile deep in front of the wall centre.
fn add_house(map: &mut MapDef, col: usize, row_top: usize, tile: f32, number: usize) {
    let x = col as f32 * tile;
    let y = row_top as f32 * tile;

    let roof = RectDef::new(x, y, 4.0 * tile, 2.0 * tile);
    let wall = RectDef::new(x, y + 2.0 * tile, 4.0 * tile, 2.0 * tile);
    let door = RectDef::new(x + 1.5 * tile, y + 4.0 * tile, tile, tile);

    map.sprites.push(SpriteDef {
        rect: wall,
        layer: Layer::HouseBottom,
        image: Some("graphics/house/wall.png".into()),
        color: WALL,
    });
    map.sprites.push(SpriteDef {
        rect: roof,
        layer: Layer::HouseTop,
        image: Some("graphics/house/roof.png".into()),
        color: ROOF,
    });
    map.sprites.push(SpriteDef {
        rect: RectDef::new(door.x, door.y - tile, tile, tile),
        layer: Layer::HouseBottom,
        image: Some("graphics/house/door.png".into()),
        color: DOOR,
    });

    map.obstacles.push(wall);
    map.doors.push(DoorDef {
        name: format!("{}{}", DOOR_PREFIX, number),
        rect: door,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_town_door_names_are_unique() {
        let map = generate_town(TILE_SIZE);
        let names: HashSet<_> = map.door_names().into_iter().collect();
        assert_eq!(names.len(), map.doors.len());
        assert_eq!(map.doors.len(), 10);
        assert!(names.iter().all(|n| n.starts_with(DOOR_PREFIX)));
    }

    #[test]
    fn test_town_start_is_inside_and_clear() {
        let map = generate_town(TILE_SIZE);
        let config = GameConfig::default();
        let start = Rect::from_center_size(map.start(), config.player_hitbox_size());
        assert!(map.start().x > 0.0 && map.start().x < map.width);
        assert!(map.start().y > 0.0 && map.start().y < map.height);
        for obstacle in &map.obstacles {
            assert!(!crate::world::collision::overlaps(start, obstacle.rect()));
        }
    }

    #[test]
    fn test_doors_are_reachable_not_solid() {
        let map = generate_town(TILE_SIZE);
        for door in &map.doors {
            for obstacle in &map.obstacles {
                assert!(!crate::world::collision::overlaps(door.rect.rect(), obstacle.rect()));
            }
        }
    }

    #[test]
    fn test_parse_map_def_roundtrips_minimal_json() {
        let json = r#"{
            "width": 640.0, "height": 480.0, "start": [100.0, 100.0],
            "doors": [{ "name": "Door1", "rect": { "x": 10.0, "y": 10.0, "w": 64.0, "h": 64.0 } }],
            "sprites": [{ "rect": { "x": 0.0, "y": 0.0, "w": 640.0, "h": 480.0 },
                          "layer": "Ground", "color": [0, 128, 0] }]
        }"#;
        let map = parse_map_def(json).unwrap();
        assert_eq!(map.doors[0].name, "Door1");
        assert!(map.obstacles.is_empty());
        assert_eq!(map.sprites[0].layer, Layer::Ground);
        assert_eq!(map.sprites[0].image, None);
    }

    #[test]
    fn test_parse_map_def_rejects_empty_map() {
        let json = r#"{ "width": 0.0, "height": 480.0, "start": [0.0, 0.0] }"#;
        assert!(parse_map_def(json).is_err());
    }

    #[test]
    fn test_missing_json_falls_back_to_builtin() {
        let source = JsonMapSource::new("definitely/not/here.json", 32.0);
        assert_eq!(source.generate(), generate_town(32.0));
    }

    #[test]
    fn test_config_tile_size_scales_builtin_town() {
        let default_map = MapProvider::from_config(&GameConfig::default()).generate();
        let config = GameConfig {
            tile_size: 32.0,
            ..default()
        };
        let small_map = MapProvider::from_config(&config).generate();
        assert_eq!(small_map.width * 2.0, default_map.width);
        assert_eq!(small_map.height * 2.0, default_map.height);
        assert_eq!(small_map.doors.len(), default_map.doors.len());
        assert_eq!(small_map.doors[0].rect.w, 32.0);
    }
}
