use bevy::prelude::*;

use crate::shared::*;
use crate::world::collision::step_actor;

/// Turn the raw movement axes into a direction and animation status.
///
/// Horizontal input wins the facing when both axes are held. With no input
/// the actor idles in whatever direction it last faced.
pub fn apply_intent(actor: &mut Actor, axis: Vec2) {
    actor.direction = axis.normalize_or_zero();

    let facing = if axis.x > 0.0 {
        Some(Facing::Right)
    } else if axis.x < 0.0 {
        Some(Facing::Left)
    } else if axis.y < 0.0 {
        Some(Facing::Up)
    } else if axis.y > 0.0 {
        Some(Facing::Down)
    } else {
        None
    };

    actor.status = match facing {
        Some(facing) => ActorStatus::Walk(facing),
        None => actor.status.idle(),
    };
}

/// Core movement system: input intent, then axis-separated collision
/// against every obstacle, then clamping to the level.
pub fn player_movement(
    time: Res<Time>,
    input: Res<PlayerInput>,
    bounds: Res<LevelBounds>,
    obstacles: Query<&Obstacle>,
    mut players: Query<(&mut Actor, &mut Drawable), With<Player>>,
) {
    let Ok((mut actor, mut drawable)) = players.get_single_mut() else {
        return;
    };

    apply_intent(&mut actor, input.move_axis);
    if actor.direction == Vec2::ZERO {
        return;
    }

    let solid: Vec<Rect> = obstacles.iter().map(|o| o.hitbox).collect();
    let velocity = actor.direction * actor.speed * time.delta_secs();
    let (pos, hitbox) = step_actor(
        actor.pos,
        actor.hitbox,
        actor.sprite_size,
        velocity,
        &solid,
        bounds.rect(),
    );
    actor.pos = pos;
    actor.hitbox = hitbox;
    drawable.rect = actor.sprite_rect();
}
