//! Delivery domain: which doors are owed a package, and what happens when
//! the player knocks.

use bevy::prelude::*;

use crate::shared::*;

pub mod interaction;
pub mod registry;
pub mod stats;

use interaction::InteractionHandler;
use registry::DoorRegistry;
use stats::DeliveryStats;

pub struct DeliveryPlugin;

impl Plugin for DeliveryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DoorRegistry>()
            .init_resource::<InteractionHandler>()
            .init_resource::<DeliveryStats>()
            .add_systems(
                Update,
                (
                    interaction::resolve_pending_delivery,
                    interaction::handle_door_interactions.run_if(world_unsuspended),
                )
                    .chain()
                    .in_set(TickSet::Interaction),
            )
            .add_systems(
                Update,
                (stats::track_door_interactions, stats::track_day_started)
                    .after(TickSet::DayCycle)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
