//! Player domain: walking the town and animating the courier.
//!
//! The entity itself is spawned by the world on the first map generation
//! (see `spawn::player_bundle`) and teleported back to the start on every
//! new day.

pub mod animation;
pub mod movement;
pub mod spawn;

use bevy::prelude::*;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (movement::player_movement, animation::animate_player)
                .chain()
                .in_set(TickSet::World),
        );
    }
}
