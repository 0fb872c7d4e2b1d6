//! Shared components, resources, events, and states for Doorstep.
//!
//! This is the type contract. Every domain plugin imports from here; the
//! few cross-domain imports are the collision helpers and the world reset.
//!
//! World coordinates use a top-left origin with y growing downward, the same
//! convention the map data is authored in. Conversion to Bevy's centre-origin,
//! y-up screen space happens only in the compositor.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIGURATION (read-only after startup)
// ═══════════════════════════════════════════════════════════════════════

/// Every tunable the game reads. Loaded from `assets/config.ron` by the data
/// layer; missing fields fall back to the values in `Default`.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub tile_size: f32,

    pub player_speed: f32,
    pub player_sprite_size: [f32; 2],
    /// Amount the hitbox is shrunk relative to the sprite (total, per axis).
    pub player_hitbox_inset: [f32; 2],
    pub player_frames: usize,
    /// Walk-cycle frames per second.
    pub player_animation_fps: f32,
    /// Inclusive range the package count is rolled from each day.
    pub package_range: (u32, u32),

    pub sky_start_color: [f32; 3],
    pub sky_end_color: [f32; 3],
    /// Colour units per second, per channel.
    pub sky_speed: f32,

    /// Brightness units per second during fades.
    pub transition_speed: f32,
    pub transition_message_ms: u64,

    pub rain_chance: f64,
    pub rain_lifetime_ms: (u64, u64),
    pub rain_drop_speed: (f32, f32),

    pub water_frames: usize,
    pub water_animation_fps: f32,

    pub text_color: [u8; 3],
    /// Optional JSON map file. `None` uses the built-in town.
    pub map_path: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tile_size: TILE_SIZE,
            player_speed: 200.0,
            player_sprite_size: [192.0, 192.0],
            player_hitbox_inset: [126.0, 70.0],
            player_frames: 4,
            player_animation_fps: 4.0,
            package_range: (7, 12),
            sky_start_color: [255.0, 255.0, 255.0],
            sky_end_color: [38.0, 101.0, 189.0],
            sky_speed: 1.0,
            transition_speed: 100.0,
            transition_message_ms: 2000,
            rain_chance: 0.5,
            rain_lifetime_ms: (400, 500),
            rain_drop_speed: (200.0, 250.0),
            water_frames: 4,
            water_animation_fps: 5.0,
            text_color: [70, 70, 70],
            map_path: None,
        }
    }
}

impl GameConfig {
    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn player_sprite_size(&self) -> Vec2 {
        Vec2::from(self.player_sprite_size)
    }

    pub fn player_hitbox_size(&self) -> Vec2 {
        (self.player_sprite_size() - Vec2::from(self.player_hitbox_inset)).max(Vec2::ONE)
    }

    pub fn text_color(&self) -> Color {
        Color::srgb_u8(self.text_color[0], self.text_color[1], self.text_color[2])
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RENDER LAYERS
// ═══════════════════════════════════════════════════════════════════════

/// Depth buckets, drawn in declaration order. Within a bucket, sprites are
/// drawn by ascending vertical centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Water,
    Ground,
    RainFloor,
    HouseBottom,
    Main,
    HouseTop,
    RainDrops,
}

impl Layer {
    pub const ALL: [Layer; 7] = [
        Layer::Water,
        Layer::Ground,
        Layer::RainFloor,
        Layer::HouseBottom,
        Layer::Main,
        Layer::HouseTop,
        Layer::RainDrops,
    ];

    pub fn index(self) -> usize {
        match self {
            Layer::Water => 0,
            Layer::Ground => 1,
            Layer::RainFloor => 2,
            Layer::HouseBottom => 3,
            Layer::Main => 4,
            Layer::HouseTop => 5,
            Layer::RainDrops => 6,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn name(self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// The eight animation states: walking or idle, in one of four facings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorStatus {
    Walk(Facing),
    Idle(Facing),
}

impl Default for ActorStatus {
    fn default() -> Self {
        ActorStatus::Idle(Facing::Down)
    }
}

impl ActorStatus {
    pub fn facing(self) -> Facing {
        match self {
            ActorStatus::Walk(f) | ActorStatus::Idle(f) => f,
        }
    }

    pub fn idle(self) -> Self {
        ActorStatus::Idle(self.facing())
    }

    /// Animation folder name, e.g. `down` or `down_idle`.
    pub fn animation_name(self) -> String {
        match self {
            ActorStatus::Walk(f) => f.name().to_string(),
            ActorStatus::Idle(f) => format!("{}_idle", f.name()),
        }
    }
}

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// The player-controlled moving entity.
#[derive(Component, Debug, Clone)]
pub struct Actor {
    /// Continuous centre position in world pixels.
    pub pos: Vec2,
    pub status: ActorStatus,
    /// Unit or zero movement intent.
    pub direction: Vec2,
    pub speed: f32,
    pub sprite_size: Vec2,
    pub hitbox: Rect,
    pub packages: u32,
    /// Set on the tick an interaction fires, cleared once the key is released.
    pub interact_cooldown: bool,
    pub frame_index: f32,
}

impl Actor {
    pub fn new(center: Vec2, config: &GameConfig) -> Self {
        Self {
            pos: center,
            status: ActorStatus::default(),
            direction: Vec2::ZERO,
            speed: config.player_speed,
            sprite_size: config.player_sprite_size(),
            hitbox: Rect::from_center_size(center, config.player_hitbox_size()),
            packages: 0,
            interact_cooldown: false,
            frame_index: 0.0,
        }
    }

    /// The full sprite bounds, centred on the hitbox.
    pub fn sprite_rect(&self) -> Rect {
        Rect::from_center_size(self.hitbox.center(), self.sprite_size)
    }

    /// Place the actor at `center`, snapping the hitbox to whole pixels.
    pub fn teleport(&mut self, center: Vec2) {
        self.pos = center;
        let size = self.hitbox.size();
        self.hitbox = Rect::from_center_size(center.round(), size);
        self.direction = Vec2::ZERO;
        self.status = ActorStatus::default();
        self.frame_index = 0.0;
    }

    /// Edge-detects the interact key. Returns `true` only on the first tick
    /// the key is held after having been released.
    pub fn poll_interact(&mut self, held: bool) -> bool {
        if !held {
            self.interact_cooldown = false;
            return false;
        }
        if self.interact_cooldown {
            return false;
        }
        self.interact_cooldown = true;
        true
    }
}

/// Advance a looping frame counter by `fps * dt`, wrapping to 0 at `frames`.
pub fn advance_frame(frame_index: f32, fps: f32, dt: f32, frames: usize) -> f32 {
    if frames == 0 {
        return 0.0;
    }
    let next = frame_index + fps * dt;
    if next >= frames as f32 {
        0.0
    } else {
        next
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD ENTITIES
// ═══════════════════════════════════════════════════════════════════════

/// Marker for everything owned by the current map generation.
/// Despawned wholesale on every world reset.
#[derive(Component, Debug, Default)]
pub struct LevelEntity;

/// Static collision rectangle.
#[derive(Component, Debug, Clone)]
pub struct Obstacle {
    pub hitbox: Rect,
}

/// Named interaction zone that may be owed a package.
#[derive(Component, Debug, Clone)]
pub struct Door {
    pub name: String,
    pub hitbox: Rect,
}

/// Animated water tile.
#[derive(Component, Debug, Clone, Default)]
pub struct AnimatedWater {
    pub frame_index: f32,
}

/// What an image-less sprite falls back to, and what it loads when it can.
#[derive(Debug, Clone, PartialEq)]
pub struct Visual {
    pub image: Option<String>,
    pub color: Color,
}

impl Visual {
    pub fn placeholder(color: Color) -> Self {
        Self { image: None, color }
    }

    pub fn image(path: impl Into<String>, fallback: Color) -> Self {
        Self {
            image: Some(path.into()),
            color: fallback,
        }
    }
}

/// The closed set of drawable things in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Decoration,
    Water,
    Player,
    RainFloor,
    RainDrop,
}

/// Common drawable projection consumed by the compositor.
#[derive(Component, Debug, Clone)]
pub struct Drawable {
    /// World-space bounds.
    pub rect: Rect,
    pub layer: Layer,
    pub kind: SpriteKind,
    pub visual: Visual,
}

impl Drawable {
    pub fn new(rect: Rect, layer: Layer, kind: SpriteKind, visual: Visual) -> Self {
        Self {
            rect,
            layer,
            kind,
            visual,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SHARED RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// The single modal message box. While active, world simulation is
/// suspended. Deactivating never clears the message.
#[derive(Resource, Debug, Clone)]
pub struct Dialogue {
    active: bool,
    message: String,
}

impl Default for Dialogue {
    fn default() -> Self {
        Self {
            active: false,
            message: String::from("Dialogue text"),
        }
    }
}

impl Dialogue {
    /// Show the box. `Some(text)` replaces the message; an empty text is
    /// rejected with a warning and the previous message is kept.
    pub fn activate(&mut self, text: Option<&str>) {
        match text {
            Some("") => warn!("[Dialogue] Tried to update dialogue with empty text"),
            Some(text) => self.message = text.to_string(),
            None => {}
        }
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Full-map overlay toggle. Suspends the world like the dialogue does.
#[derive(Resource, Debug, Clone, Default)]
pub struct MapView {
    pub active: bool,
}

/// Scroll offset of the viewport, in world pixels.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraOffset(pub Vec2);

/// Extents of the current map generation.
#[derive(Resource, Debug, Clone, Default)]
pub struct LevelBounds {
    pub size: Vec2,
    /// Incremented on every rebuild; day 1 is the first map.
    pub day: u32,
}

impl LevelBounds {
    pub fn rect(&self) -> Rect {
        Rect::from_corners(Vec2::ZERO, self.size)
    }
}

/// Whether rain falls today.
#[derive(Resource, Debug, Clone, Default)]
pub struct Raining(pub bool);

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Result of pressing interact on a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    Delivered,
    AlreadyDelivered,
    WrongHouse,
    UnknownDoor,
}

impl InteractOutcome {
    pub fn message(self) -> Option<&'static str> {
        match self {
            InteractOutcome::Delivered => Some(MSG_DELIVERED),
            InteractOutcome::AlreadyDelivered => Some(MSG_ALREADY_DELIVERED),
            InteractOutcome::WrongHouse => Some(MSG_WRONG_HOUSE),
            InteractOutcome::UnknownDoor => None,
        }
    }
}

#[derive(Event, Debug, Clone)]
pub struct DoorInteractionEvent {
    pub door: String,
    pub outcome: InteractOutcome,
}

/// Sent after every map generation, including the first.
#[derive(Event, Debug, Clone)]
pub struct DayStartedEvent {
    pub day: u32,
    pub packages: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// RUN CONDITIONS
// ═══════════════════════════════════════════════════════════════════════

/// True while no modal (dialogue or map overlay) is shown.
pub fn world_unsuspended(dialogue: Res<Dialogue>, map_view: Res<MapView>) -> bool {
    !dialogue.is_active() && !map_view.active
}

pub fn dialogue_active(dialogue: Res<Dialogue>) -> bool {
    dialogue.is_active()
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEM SETS
// ═══════════════════════════════════════════════════════════════════════

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Escape / map toggle.
    Modal,
    /// Actor, water, weather. Skipped while a modal is shown.
    World,
    /// Door interactions and deferred delivery resolution.
    Interaction,
    /// Sky and day transition. Never skipped.
    DayCycle,
}

/// Chain the tick sets in order and gate them on gameplay.
pub fn configure_tick_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            TickSet::Modal,
            TickSet::World.run_if(world_unsuspended),
            TickSet::Interaction,
            TickSet::DayCycle,
        )
            .chain()
            .run_if(in_state(GameState::Playing)),
    );
}

// ═══════════════════════════════════════════════════════════════════════
// INPUT SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    /// Raw movement axes in world space (y down). Not normalized.
    pub move_axis: Vec2,
    pub interact_held: bool,
    pub escape: bool,
    pub toggle_map: bool,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 64.0;
pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

pub const DOOR_PREFIX: &str = "Door";

pub const MSG_DELIVERED: &str = "Package delivered!";
pub const MSG_ALREADY_DELIVERED: &str = "Package already delivered!";
pub const MSG_WRONG_HOUSE: &str = "Wrong house!";
pub const NEXT_DAY_CAPTION: &str = "The Next Day...";
pub const DIALOGUE_PROMPT: &str = "[Press Escape to Exit]";
