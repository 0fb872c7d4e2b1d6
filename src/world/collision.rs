//! Axis-separated AABB resolution between the actor and static obstacles.
//!
//! The actor moves one axis at a time: the tentative position is applied,
//! every overlapping obstacle pushes the hitbox flush against its leading
//! edge, and the continuous position is re-synced from the hitbox. Sliding
//! along walls falls out of doing x and y separately.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Strict intersection test. Rectangles that only share an edge do not
/// overlap, so a hitbox pushed flush against a wall stays free.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

fn with_left(r: Rect, left: f32) -> Rect {
    let w = r.width();
    Rect::new(left, r.min.y, left + w, r.max.y)
}

fn with_right(r: Rect, right: f32) -> Rect {
    let w = r.width();
    Rect::new(right - w, r.min.y, right, r.max.y)
}

fn with_top(r: Rect, top: f32) -> Rect {
    let h = r.height();
    Rect::new(r.min.x, top, r.max.x, top + h)
}

fn with_bottom(r: Rect, bottom: f32) -> Rect {
    let h = r.height();
    Rect::new(r.min.x, bottom - h, r.max.x, bottom)
}

/// Move `r` so its centre sits at `center` on one axis only.
pub fn with_center_on(r: Rect, axis: Axis, center: f32) -> Rect {
    let half = r.half_size();
    match axis {
        Axis::Horizontal => Rect::new(center - half.x, r.min.y, center + half.x, r.max.y),
        Axis::Vertical => Rect::new(r.min.x, center - half.y, r.max.x, center + half.y),
    }
}

/// Push `hitbox` out of every obstacle it overlaps, along `axis` only.
///
/// `direction` is the sign of the movement on that axis; zero means the
/// actor did not move on this axis and no push is applied. Obstacles are
/// resolved in iteration order and the last push wins when obstacles
/// overlap each other.
pub fn resolve_axis<'a>(
    mut hitbox: Rect,
    axis: Axis,
    direction: f32,
    obstacles: impl IntoIterator<Item = &'a Rect>,
) -> Rect {
    for obstacle in obstacles {
        if !overlaps(hitbox, *obstacle) {
            continue;
        }
        hitbox = match axis {
            Axis::Horizontal if direction > 0.0 => with_right(hitbox, obstacle.min.x),
            Axis::Horizontal if direction < 0.0 => with_left(hitbox, obstacle.max.x),
            Axis::Vertical if direction > 0.0 => with_bottom(hitbox, obstacle.min.y),
            Axis::Vertical if direction < 0.0 => with_top(hitbox, obstacle.max.y),
            _ => hitbox,
        };
    }
    hitbox
}

/// Keep `rect` inside `bounds`, one edge at a time (left, right, top, bottom).
pub fn clamp_to_bounds(mut rect: Rect, bounds: Rect) -> Rect {
    if rect.min.x < bounds.min.x {
        rect = with_left(rect, bounds.min.x);
    }
    if rect.max.x > bounds.max.x {
        rect = with_right(rect, bounds.max.x);
    }
    if rect.min.y < bounds.min.y {
        rect = with_top(rect, bounds.min.y);
    }
    if rect.max.y > bounds.max.y {
        rect = with_bottom(rect, bounds.max.y);
    }
    rect
}

/// One full movement step: x then y with collision, then bounds clamping of
/// the sprite rect. Returns the new continuous position and hitbox.
pub fn step_actor(
    pos: Vec2,
    hitbox: Rect,
    sprite_size: Vec2,
    velocity: Vec2,
    obstacles: &[Rect],
    bounds: Rect,
) -> (Vec2, Rect) {
    let mut pos = pos;

    // The continuous position keeps its fraction unless a collision moved
    // the hitbox, in which case it snaps to the resolved centre.
    pos.x += velocity.x;
    let moved = with_center_on(hitbox, Axis::Horizontal, pos.x.round());
    let mut hitbox = resolve_axis(moved, Axis::Horizontal, velocity.x.signum_or_zero(), obstacles);
    if hitbox != moved {
        pos.x = hitbox.center().x;
    }

    pos.y += velocity.y;
    let moved = with_center_on(hitbox, Axis::Vertical, pos.y.round());
    hitbox = resolve_axis(moved, Axis::Vertical, velocity.y.signum_or_zero(), obstacles);
    if hitbox != moved {
        pos.y = hitbox.center().y;
    }

    let sprite = Rect::from_center_size(hitbox.center(), sprite_size);
    let clamped = clamp_to_bounds(sprite, bounds);
    if clamped != sprite {
        let center = clamped.center();
        pos = center;
        hitbox = Rect::from_center_size(center, hitbox.size());
    }

    (pos, hitbox)
}

trait SignumOrZero {
    fn signum_or_zero(self) -> f32;
}

impl SignumOrZero for f32 {
    fn signum_or_zero(self) -> f32 {
        if self == 0.0 {
            0.0
        } else {
            self.signum()
        }
    }
}
