//! Rain: puddles on the ground and falling drops above everything.
//!
//! While it rains and no modal is open, every tick adds one puddle and one
//! drop at a random spot on the map. Both live for a short random time;
//! drops also drift down-left while they live.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

/// Maximum number of rain particles alive at once.
const MAX_RAIN_PARTICLES: usize = 600;

const DROP_VARIANTS: usize = 3;
const FLOOR_VARIANTS: usize = 3;
const DROP_SIZE: Vec2 = Vec2::new(8.0, 16.0);
const FLOOR_SIZE: Vec2 = Vec2::new(32.0, 16.0);
/// Direction drops travel in; scaled by each drop's speed.
const DROP_DIRECTION: Vec2 = Vec2::new(-2.0, 4.0);

#[derive(Component, Debug)]
pub struct RainParticle {
    pub lifetime: Timer,
    /// `None` for puddles, which stay put.
    pub velocity: Option<Vec2>,
}

pub fn spawn_rain(
    mut commands: Commands,
    config: Res<GameConfig>,
    raining: Res<Raining>,
    bounds: Res<LevelBounds>,
    particles: Query<(), With<RainParticle>>,
) {
    if !raining.0 || bounds.size == Vec2::ZERO {
        return;
    }
    if particles.iter().count() + 2 > MAX_RAIN_PARTICLES {
        return;
    }

    let mut rng = rand::thread_rng();

    let floor_pos = random_point(&mut rng, bounds.size);
    commands.spawn(rain_bundle(
        Rect::from_corners(floor_pos, floor_pos + FLOOR_SIZE),
        Layer::RainFloor,
        SpriteKind::RainFloor,
        format!("graphics/rain/floor/{}.png", rng.gen_range(0..FLOOR_VARIANTS)),
        lifetime(&config, &mut rng),
        None,
    ));

    let drop_pos = random_point(&mut rng, bounds.size);
    let (lo, hi) = config.rain_drop_speed;
    let speed = if lo < hi { rng.gen_range(lo..hi) } else { lo };
    commands.spawn(rain_bundle(
        Rect::from_corners(drop_pos, drop_pos + DROP_SIZE),
        Layer::RainDrops,
        SpriteKind::RainDrop,
        format!("graphics/rain/drops/{}.png", rng.gen_range(0..DROP_VARIANTS)),
        lifetime(&config, &mut rng),
        Some(DROP_DIRECTION * speed),
    ));
}

/// Move drops and despawn particles whose time is up.
pub fn update_rain(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut RainParticle, &mut Drawable)>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle, mut drawable) in &mut query {
        if let Some(velocity) = particle.velocity {
            let offset = velocity * dt;
            drawable.rect = Rect::from_corners(drawable.rect.min + offset, drawable.rect.max + offset);
        }
        particle.lifetime.tick(time.delta());
        if particle.lifetime.finished() {
            // A reset on the same tick may already have queued this one.
            commands.entity(entity).try_despawn();
        }
    }
}

fn random_point(rng: &mut impl Rng, size: Vec2) -> Vec2 {
    Vec2::new(rng.gen_range(0.0..=size.x), rng.gen_range(0.0..=size.y))
}

fn lifetime(config: &GameConfig, rng: &mut impl Rng) -> Timer {
    let (lo, hi) = config.rain_lifetime_ms;
    let ms = if lo < hi { rng.gen_range(lo..=hi) } else { lo };
    Timer::from_seconds(ms as f32 / 1000.0, TimerMode::Once)
}

fn rain_bundle(
    rect: Rect,
    layer: Layer,
    kind: SpriteKind,
    image: String,
    lifetime: Timer,
    velocity: Option<Vec2>,
) -> impl Bundle {
    (
        LevelEntity,
        RainParticle { lifetime, velocity },
        Drawable::new(rect, layer, kind, Visual::image(image, Color::srgba(0.6, 0.7, 1.0, 0.6))),
        Transform::default(),
        Visibility::default(),
    )
}
