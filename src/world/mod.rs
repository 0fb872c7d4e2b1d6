//! World domain plugin for Doorstep.
//!
//! Responsible for:
//! - Building a map generation from the `MapProvider`
//! - Tearing the whole level down and rebuilding it on a new day
//! - Collision geometry used by the player domain
//! - Animated water and rain particles

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand::Rng;

use crate::daycycle::sky::Sky;
use crate::delivery::interaction::InteractionHandler;
use crate::delivery::registry::DoorRegistry;
use crate::player::spawn::player_bundle;
use crate::shared::*;

pub mod collision;
pub mod maps;
pub mod water;
pub mod weather;

use maps::{MapDef, MapProvider};

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelBounds>()
            .init_resource::<Raining>()
            .init_resource::<MapProvider>()
            .add_systems(OnEnter(GameState::Playing), setup_level)
            .add_systems(
                Update,
                (
                    water::animate_water,
                    weather::spawn_rain,
                    weather::update_rain,
                )
                    .in_set(TickSet::World),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESET CAPABILITY
// ═══════════════════════════════════════════════════════════════════════

/// Something that can throw away the current day and start a fresh one.
pub trait ResettableWorld {
    fn reset(&mut self);
}

/// Everything a level rebuild touches, bundled as one system parameter.
#[derive(SystemParam)]
pub struct LevelReset<'w, 's> {
    commands: Commands<'w, 's>,
    config: Res<'w, GameConfig>,
    provider: Res<'w, MapProvider>,
    bounds: ResMut<'w, LevelBounds>,
    registry: ResMut<'w, DoorRegistry>,
    handler: ResMut<'w, InteractionHandler>,
    sky: ResMut<'w, Sky>,
    raining: ResMut<'w, Raining>,
    level_entities: Query<'w, 's, Entity, With<LevelEntity>>,
    players: Query<'w, 's, (&'static mut Actor, &'static mut Drawable), With<Player>>,
    day_events: EventWriter<'w, DayStartedEvent>,
}

impl LevelReset<'_, '_> {
    pub fn sky_reached_end_color(&self) -> bool {
        self.sky.reached_end_color
    }

    /// Replace the current map generation with a fresh one and restock the
    /// player. Any pending delivery belongs to the old doors and is dropped.
    pub fn rebuild(&mut self) {
        for entity in &self.level_entities {
            self.commands.entity(entity).try_despawn();
        }

        let map = self.provider.generate();
        spawn_map(&mut self.commands, &map);

        self.bounds.size = map.size();
        self.bounds.day += 1;

        let mut rng = rand::thread_rng();
        let packages = roll_packages(&self.config, &mut rng);

        match self.players.get_single_mut() {
            Ok((mut actor, mut drawable)) => {
                actor.teleport(map.start());
                actor.packages = packages;
                drawable.rect = actor.sprite_rect();
            }
            Err(_) => {
                self.commands
                    .spawn(player_bundle(map.start(), packages, &self.config));
            }
        }

        self.registry.clear();
        self.registry
            .assign_packages(&map.door_names(), packages, &mut rng);
        if self.handler.cancel().is_some() {
            info!("[World] Pending delivery discarded by the new day");
        }

        self.raining.0 = rng.gen_bool(self.config.rain_chance.clamp(0.0, 1.0));

        info!(
            "[World] Day {}: {} doors, {} assigned, {} packages, raining: {}",
            self.bounds.day,
            map.doors.len(),
            self.registry.assigned_count(),
            packages,
            self.raining.0
        );
        self.day_events.send(DayStartedEvent {
            day: self.bounds.day,
            packages,
        });
    }
}

impl ResettableWorld for LevelReset<'_, '_> {
    fn reset(&mut self) {
        self.sky.reset();
        self.rebuild();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LEVEL CONSTRUCTION
// ═══════════════════════════════════════════════════════════════════════

/// Roll today's package count from the configured inclusive range.
pub fn roll_packages(config: &GameConfig, rng: &mut impl Rng) -> u32 {
    let (lo, hi) = config.package_range;
    if lo >= hi {
        return lo;
    }
    rng.gen_range(lo..=hi)
}

/// Spawn every static entity a map describes. All of them carry
/// `LevelEntity` so the next reset can find them.
pub fn spawn_map(commands: &mut Commands, map: &MapDef) {
    for obstacle in &map.obstacles {
        commands.spawn((
            LevelEntity,
            Obstacle {
                hitbox: obstacle.rect(),
            },
        ));
    }

    for door in &map.doors {
        commands.spawn((
            LevelEntity,
            Door {
                name: door.name.clone(),
                hitbox: door.rect.rect(),
            },
        ));
    }

    for sprite in &map.sprites {
        commands.spawn((
            LevelEntity,
            Drawable::new(
                sprite.rect.rect(),
                sprite.layer,
                SpriteKind::Decoration,
                sprite.visual(),
            ),
            Transform::default(),
            Visibility::default(),
        ));
    }

    for tile in &map.water {
        commands.spawn((
            LevelEntity,
            AnimatedWater::default(),
            Drawable::new(
                tile.rect(),
                Layer::Water,
                SpriteKind::Water,
                Visual::image(water::frame_path(0), water::WATER_COLOR),
            ),
            Transform::default(),
            Visibility::default(),
        ));
    }
}

/// Build the first day when gameplay starts.
pub fn setup_level(mut world: LevelReset) {
    world.rebuild();
}
