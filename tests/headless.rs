//! Headless integration tests for Doorstep.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic plugins and systems (skipping all rendering/UI), and verify
//! that the delivery loop and the day cycle work together.
//!
//! Run with: `cargo test --test headless`

use std::time::Duration;

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use doorstep::daycycle::sky::Sky;
use doorstep::daycycle::transition::{DayTransition, TransitionPhase};
use doorstep::daycycle::DayCyclePlugin;
use doorstep::data::DataPlugin;
use doorstep::delivery::interaction::InteractionHandler;
use doorstep::delivery::registry::DoorRegistry;
use doorstep::delivery::stats::DeliveryStats;
use doorstep::delivery::DeliveryPlugin;
use doorstep::input::InputPlugin;
use doorstep::player::PlayerPlugin;
use doorstep::render::compositor::{composite_drawables, DrawOrder};
use doorstep::shared::*;
use doorstep::ui::dialogue_box::close_dialogue_on_escape;
use doorstep::ui::map_view::{handle_map_input, sync_map_view, MapViewRoot};
use doorstep::world::weather::{update_rain, RainParticle};
use doorstep::world::{LevelReset, ResettableWorld, WorldPlugin};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with every logic plugin and the modal key
/// handling, but NO rendering, windowing, or asset loading. Each tick is
/// 100 ms of game time.
fn build_test_app(config: GameConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));

    // ── Config before any plugin reads it ────────────────────────────────
    app.insert_resource(config);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources / Events (mirrors main.rs) ──────────────────────
    app.init_resource::<Dialogue>().init_resource::<MapView>();
    app.add_event::<DoorInteractionEvent>()
        .add_event::<DayStartedEvent>();
    configure_tick_sets(&mut app);

    app.add_plugins((
        DataPlugin,
        InputPlugin,
        WorldPlugin,
        PlayerPlugin,
        DeliveryPlugin,
        DayCyclePlugin,
    ));
    app.add_systems(
        Update,
        (
            close_dialogue_on_escape.run_if(dialogue_active),
            handle_map_input,
        )
            .chain()
            .in_set(TickSet::Modal),
    );

    app
}

/// Ticks through Loading into Playing and builds the first day.
fn boot(app: &mut App) {
    app.update();
    app.update();
    assert_eq!(
        app.world().resource::<State<GameState>>().get(),
        &GameState::Playing
    );
}

fn input(app: &mut App) -> Mut<'_, PlayerInput> {
    app.world_mut().resource_mut::<PlayerInput>()
}

fn actor(app: &mut App) -> Actor {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&Actor, With<Player>>();
    query.single(world).clone()
}

fn doors(app: &mut App) -> Vec<Door> {
    let world = app.world_mut();
    let mut query = world.query::<&Door>();
    let mut doors: Vec<Door> = query.iter(world).cloned().collect();
    doors.sort_by(|a, b| a.name.cmp(&b.name));
    doors
}

/// Put the player on a door without moving through the world.
fn stand_on(app: &mut App, door: &Door) {
    let world = app.world_mut();
    let mut query = world.query_filtered::<&mut Actor, With<Player>>();
    let mut actor = query.single_mut(world);
    actor.teleport(door.hitbox.center());
}

/// One tick with the interact key held, then one with it released.
fn press_interact(app: &mut App) {
    input(app).interact_held = true;
    app.update();
    input(app).interact_held = false;
    app.update();
}

fn press_escape(app: &mut App) {
    input(app).escape = true;
    app.update();
    input(app).escape = false;
}

fn force_reset(mut world: LevelReset) {
    world.reset();
}

fn assigned_door(app: &mut App, assigned: bool) -> Door {
    let all = doors(app);
    let registry = app.world().resource::<DoorRegistry>();
    all.into_iter()
        .find(|d| registry.get(&d.name).map(|s| s.package_assigned) == Some(assigned))
        .expect("a door with the requested assignment")
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_builds_first_day() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    let bounds = app.world().resource::<LevelBounds>().clone();
    assert_eq!(bounds.day, 1);
    assert!(bounds.size.x > 0.0 && bounds.size.y > 0.0);

    let player = actor(&mut app);
    assert!((7..=12).contains(&player.packages));

    let door_count = doors(&mut app).len();
    assert_eq!(door_count, 10);
    let registry = app.world().resource::<DoorRegistry>();
    assert_eq!(registry.len(), door_count);
    assert_eq!(
        registry.assigned_count(),
        (player.packages as usize).min(door_count)
    );
    assert_eq!(registry.delivered_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Delivery
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_delivery_is_deferred_until_dialogue_closes() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    let door = assigned_door(&mut app, true);
    let before = actor(&mut app).packages;
    stand_on(&mut app, &door);

    press_interact(&mut app);
    assert_eq!(actor(&mut app).packages, before - 1);
    {
        let dialogue = app.world().resource::<Dialogue>();
        assert!(dialogue.is_active());
        assert_eq!(dialogue.message(), MSG_DELIVERED);
    }
    assert!(!app.world().resource::<DoorRegistry>().get(&door.name).unwrap().delivered);
    assert!(app.world().resource::<InteractionHandler>().is_pending());

    // A second press while the dialogue is open does nothing.
    press_interact(&mut app);
    assert_eq!(actor(&mut app).packages, before - 1);

    press_escape(&mut app);
    assert!(!app.world().resource::<Dialogue>().is_active());
    assert!(app.world().resource::<DoorRegistry>().get(&door.name).unwrap().delivered);
    assert!(!app.world().resource::<InteractionHandler>().is_pending());

    // Knocking again reports the earlier delivery and keeps the count.
    press_interact(&mut app);
    assert_eq!(actor(&mut app).packages, before - 1);
    assert_eq!(
        app.world().resource::<Dialogue>().message(),
        MSG_ALREADY_DELIVERED
    );

    let stats = app.world().resource::<DeliveryStats>();
    assert_eq!(stats.days_started, 1);
    assert_eq!(stats.packages_today, before);
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.repeat_knocks, 1);
}

#[test]
fn test_wrong_house_keeps_inventory() {
    let config = GameConfig {
        package_range: (3, 3),
        ..default()
    };
    let mut app = build_test_app(config);
    boot(&mut app);

    let door = assigned_door(&mut app, false);
    stand_on(&mut app, &door);
    press_interact(&mut app);

    assert_eq!(actor(&mut app).packages, 3);
    let dialogue = app.world().resource::<Dialogue>();
    assert!(dialogue.is_active());
    assert_eq!(dialogue.message(), MSG_WRONG_HOUSE);
    assert!(!app.world().resource::<InteractionHandler>().is_pending());

    let stats = app.world().resource::<DeliveryStats>();
    assert_eq!(stats.wrong_house, 1);
    assert_eq!(stats.delivered, 0);
}

#[test]
fn test_holding_interact_fires_once() {
    let config = GameConfig {
        package_range: (3, 3),
        ..default()
    };
    let mut app = build_test_app(config);
    boot(&mut app);

    let door = assigned_door(&mut app, false);
    stand_on(&mut app, &door);

    input(&mut app).interact_held = true;
    app.update();
    assert!(app.world().resource::<Dialogue>().is_active());

    // Close the dialogue while the key is still held: no new interaction.
    input(&mut app).escape = true;
    app.update();
    input(&mut app).escape = false;
    app.update();
    app.update();
    assert!(!app.world().resource::<Dialogue>().is_active());

    // Releasing re-arms it.
    input(&mut app).interact_held = false;
    app.update();
    input(&mut app).interact_held = true;
    app.update();
    assert!(app.world().resource::<Dialogue>().is_active());
}

#[test]
fn test_reset_cancels_pending_delivery() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    let door = assigned_door(&mut app, true);
    stand_on(&mut app, &door);
    press_interact(&mut app);
    assert!(app.world().resource::<InteractionHandler>().is_pending());

    app.world_mut()
        .run_system_once(force_reset)
        .expect("reset runs");
    app.update();

    assert_eq!(app.world().resource::<LevelBounds>().day, 2);
    assert!(!app.world().resource::<InteractionHandler>().is_pending());

    // Closing the old dialogue must not mark anything on the new map.
    press_escape(&mut app);
    assert_eq!(app.world().resource::<DoorRegistry>().delivered_count(), 0);

    let player = actor(&mut app);
    assert!((7..=12).contains(&player.packages));
    assert_eq!(doors(&mut app).len(), 10);

    let stats = app.world().resource::<DeliveryStats>();
    assert_eq!(stats.days_started, 2);
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.delivered_today, 0);
    assert_eq!(stats.packages_today, player.packages);
}

#[test]
fn test_rain_expiring_on_reset_tick_is_despawned_once() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    let mut lifetime = Timer::from_seconds(0.001, TimerMode::Once);
    lifetime.tick(Duration::from_millis(5));
    let drop = app
        .world_mut()
        .spawn((
            LevelEntity,
            RainParticle {
                lifetime,
                velocity: None,
            },
            Drawable::new(
                Rect::new(0.0, 0.0, 8.0, 16.0),
                Layer::RainDrops,
                SpriteKind::RainDrop,
                Visual::placeholder(Color::WHITE),
            ),
        ))
        .id();

    // Both systems queue a despawn for the same particle before either applies.
    let mut schedule = Schedule::default();
    schedule.add_systems((update_rain, force_reset).chain_ignore_deferred());
    schedule.run(app.world_mut());

    assert!(!app.world().entities().contains(drop));
    assert_eq!(app.world().resource::<LevelBounds>().day, 2);
    app.update();
    assert_eq!(doors(&mut app).len(), 10);
}

// ─────────────────────────────────────────────────────────────────────────────
// Modals
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dialogue_suspends_movement_but_not_the_sky() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    app.world_mut()
        .resource_mut::<Dialogue>()
        .activate(Some("Hello"));
    input(&mut app).move_axis = Vec2::new(1.0, 0.0);
    let start = actor(&mut app).pos;
    let sky_before = app.world().resource::<Sky>().color;

    for _ in 0..3 {
        app.update();
    }
    assert_eq!(actor(&mut app).pos, start);
    assert!(app.world().resource::<Sky>().color[0] < sky_before[0]);

    press_escape(&mut app);
    app.update();
    assert!(actor(&mut app).pos.x > start.x);
}

#[test]
fn test_map_overlay_toggles_and_blocks_movement() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    input(&mut app).toggle_map = true;
    app.update();
    input(&mut app).toggle_map = false;
    assert!(app.world().resource::<MapView>().active);

    input(&mut app).move_axis = Vec2::new(0.0, 1.0);
    let start = actor(&mut app).pos;
    app.update();
    assert_eq!(actor(&mut app).pos, start);

    press_escape(&mut app);
    assert!(!app.world().resource::<MapView>().active);
}

#[test]
fn test_map_overlay_paints_in_draw_order() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(GameConfig::default())
        .insert_resource(LevelBounds {
            size: Vec2::new(1280.0, 720.0),
            day: 1,
        })
        .init_resource::<CameraOffset>()
        .init_resource::<DrawOrder>()
        .init_resource::<MapView>()
        .add_systems(Update, (composite_drawables, sync_map_view).chain());

    let roof_color = Color::srgb(1.0, 0.0, 0.0);
    let water_color = Color::srgb(0.0, 0.0, 1.0);
    app.world_mut().spawn((
        LevelEntity,
        Drawable::new(
            Rect::new(0.0, 0.0, 256.0, 128.0),
            Layer::HouseTop,
            SpriteKind::Decoration,
            Visual::placeholder(roof_color),
        ),
        Transform::default(),
    ));
    app.world_mut().spawn((
        LevelEntity,
        Drawable::new(
            Rect::new(0.0, 300.0, 64.0, 364.0),
            Layer::Water,
            SpriteKind::Water,
            Visual::placeholder(water_color),
        ),
        Transform::default(),
    ));

    app.update();
    app.world_mut().resource_mut::<MapView>().active = true;
    app.update();

    let world = app.world_mut();
    let mut roots = world.query_filtered::<&Children, With<MapViewRoot>>();
    let frame = roots.single(world)[0];
    let tiles: Vec<Entity> = world
        .get::<Children>(frame)
        .expect("map frame has tiles")
        .iter()
        .copied()
        .collect();
    let colors: Vec<Color> = tiles
        .iter()
        .filter_map(|&tile| world.get::<BackgroundColor>(tile).map(|c| c.0))
        .collect();
    assert_eq!(colors, vec![water_color, roof_color]);
}

#[test]
fn test_map_does_not_open_over_dialogue() {
    let mut app = build_test_app(GameConfig::default());
    boot(&mut app);

    app.world_mut().resource_mut::<Dialogue>().activate(None);
    input(&mut app).toggle_map = true;
    app.update();
    assert!(!app.world().resource::<MapView>().active);
}

// ─────────────────────────────────────────────────────────────────────────────
// Day cycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_day_transition_cycle() {
    let config = GameConfig {
        sky_speed: 10_000.0,
        transition_speed: 1_000.0,
        transition_message_ms: 300,
        ..default()
    };
    let mut app = build_test_app(config);
    boot(&mut app);

    let mut phases = vec![app.world().resource::<DayTransition>().phase];
    let mut days = vec![app.world().resource::<LevelBounds>().day];
    for _ in 0..40 {
        app.update();
        let transition = app.world().resource::<DayTransition>();
        assert!((0.0..=255.0).contains(&transition.brightness));
        let phase = transition.phase;
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
        let day = app.world().resource::<LevelBounds>().day;
        if days.last() != Some(&day) {
            days.push(day);
        }
        if phases.len() == 5 {
            break;
        }
    }

    assert_eq!(
        phases,
        vec![
            TransitionPhase::Idle,
            TransitionPhase::FadeIn,
            TransitionPhase::Message,
            TransitionPhase::FadeOut,
            TransitionPhase::Idle,
        ]
    );
    assert_eq!(days, vec![1, 2]);
    assert_eq!(app.world().resource::<DayTransition>().brightness, 255.0);
}

#[test]
fn test_transition_runs_while_dialogue_is_open() {
    let config = GameConfig {
        sky_speed: 10_000.0,
        transition_speed: 10_000.0,
        ..default()
    };
    let mut app = build_test_app(config);
    boot(&mut app);

    app.world_mut().resource_mut::<Dialogue>().activate(None);
    for _ in 0..5 {
        app.update();
    }
    assert!(app.world().resource::<LevelBounds>().day >= 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Map source
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_json_map_file_is_used() {
    let path = std::env::temp_dir().join(format!("doorstep_map_{}.json", std::process::id()));
    let json = r#"{
        "width": 960.0, "height": 640.0, "start": [480.0, 320.0],
        "obstacles": [{ "x": 0.0, "y": 0.0, "w": 64.0, "h": 64.0 }],
        "doors": [
            { "name": "DoorA", "rect": { "x": 100.0, "y": 500.0, "w": 64.0, "h": 64.0 } },
            { "name": "DoorB", "rect": { "x": 700.0, "y": 500.0, "w": 64.0, "h": 64.0 } }
        ]
    }"#;
    std::fs::write(&path, json).expect("write temp map");

    let config = GameConfig {
        map_path: Some(path.to_string_lossy().into_owned()),
        ..default()
    };
    let mut app = build_test_app(config);
    boot(&mut app);

    assert_eq!(
        app.world().resource::<LevelBounds>().size,
        Vec2::new(960.0, 640.0)
    );
    let names: Vec<String> = doors(&mut app).into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["DoorA".to_string(), "DoorB".to_string()]);
    // More packages than doors: every door gets one.
    assert_eq!(app.world().resource::<DoorRegistry>().assigned_count(), 2);

    let _ = std::fs::remove_file(path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Compositor
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compositor_orders_layers_then_rows() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(GameConfig::default())
        .init_resource::<CameraOffset>()
        .init_resource::<DrawOrder>()
        .add_systems(Update, composite_drawables);

    let spawn = |app: &mut App, layer: Layer, y: f32| {
        app.world_mut()
            .spawn((
                Drawable::new(
                    Rect::new(0.0, y, 64.0, y + 64.0),
                    layer,
                    SpriteKind::Decoration,
                    Visual::placeholder(Color::WHITE),
                ),
                Transform::default(),
            ))
            .id()
    };

    let roof = spawn(&mut app, Layer::HouseTop, 0.0);
    let low = spawn(&mut app, Layer::Main, 500.0);
    let high = spawn(&mut app, Layer::Main, 100.0);
    let ground = spawn(&mut app, Layer::Ground, 900.0);

    app.update();

    let order = app.world().resource::<DrawOrder>().0.clone();
    assert_eq!(order, vec![ground, high, low, roof]);

    let z = |app: &App, e: Entity| app.world().get::<Transform>(e).unwrap().translation.z;
    assert!(z(&app, ground) < z(&app, high));
    assert!(z(&app, high) < z(&app, low));
    assert!(z(&app, low) < z(&app, roof));

    // Screen space is y-up around the viewport centre.
    let top = app.world().get::<Transform>(roof).unwrap().translation;
    assert_eq!(top.x, 32.0 - 640.0);
    assert_eq!(top.y, -(32.0 - 360.0));
}
