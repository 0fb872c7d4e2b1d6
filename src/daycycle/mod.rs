//! Day cycle domain: the sky drifts toward evening, and reaching it kicks
//! off the fade-to-black transition that rebuilds the world.
//!
//! Neither system is ever suspended by a modal, so leaving a dialogue open
//! cannot stall the day.

use bevy::prelude::*;

use crate::shared::*;

pub mod sky;
pub mod transition;

use sky::Sky;
use transition::DayTransition;

pub struct DayCyclePlugin;

impl Plugin for DayCyclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Sky>()
            .init_resource::<DayTransition>()
            .add_systems(
                Update,
                (sky::advance_sky, transition::advance_transition)
                    .chain()
                    .in_set(TickSet::DayCycle),
            );
    }
}
