//! Door interaction: pressing interact while standing on a door.
//!
//! A successful delivery takes the package from the player immediately but
//! only marks the door delivered once the confirmation dialogue has been
//! closed. Until then the delivery is held as pending and no other
//! interaction is processed.

use bevy::prelude::*;

use crate::shared::*;
use crate::world::collision::overlaps;

use super::registry::DoorRegistry;

/// A delivery waiting for its confirmation dialogue to close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    pub door: String,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct InteractionHandler {
    pub pending: Option<PendingDelivery>,
}

impl InteractionHandler {
    /// Drop any pending delivery without applying it.
    pub fn cancel(&mut self) -> Option<PendingDelivery> {
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Apply the delivery table for one interaction with `door`.
///
/// | assigned | delivered | effect                             |
/// |----------|-----------|------------------------------------|
/// | yes      | no        | take one package, hold as pending  |
/// | yes      | yes       | nothing                            |
/// | no       | any       | nothing                            |
pub fn interact_with_door(
    registry: &DoorRegistry,
    packages: &mut u32,
    door: &str,
    handler: &mut InteractionHandler,
) -> InteractOutcome {
    let Some(state) = registry.get(door) else {
        return InteractOutcome::UnknownDoor;
    };

    match (state.package_assigned, state.delivered) {
        (true, false) => {
            *packages = packages.saturating_sub(1);
            handler.pending = Some(PendingDelivery {
                door: door.to_string(),
            });
            InteractOutcome::Delivered
        }
        (true, true) => InteractOutcome::AlreadyDelivered,
        (false, _) => InteractOutcome::WrongHouse,
    }
}

/// Once the dialogue is closed, mark the pending door as delivered.
pub fn resolve_pending_delivery(
    dialogue: Res<Dialogue>,
    mut handler: ResMut<InteractionHandler>,
    mut registry: ResMut<DoorRegistry>,
) {
    if dialogue.is_active() {
        return;
    }
    let Some(pending) = handler.pending.take() else {
        return;
    };
    if registry.mark_delivered(&pending.door) {
        info!(
            "[Delivery] {} marked delivered ({} remaining)",
            pending.door,
            registry.remaining()
        );
    } else {
        warn!("[Delivery] Pending door '{}' no longer exists", pending.door);
    }
}

/// Edge-triggered interact against whichever door the player stands on.
pub fn handle_door_interactions(
    input: Res<PlayerInput>,
    mut players: Query<&mut Actor, With<Player>>,
    doors: Query<&Door>,
    registry: Res<DoorRegistry>,
    mut handler: ResMut<InteractionHandler>,
    mut dialogue: ResMut<Dialogue>,
    mut events: EventWriter<DoorInteractionEvent>,
) {
    let Ok(mut actor) = players.get_single_mut() else {
        return;
    };

    if !actor.poll_interact(input.interact_held) {
        return;
    }
    if dialogue.is_active() || handler.is_pending() {
        return;
    }

    let hitbox = actor.hitbox;
    let Some(door) = doors.iter().find(|door| overlaps(door.hitbox, hitbox)) else {
        return;
    };

    let outcome = interact_with_door(&registry, &mut actor.packages, &door.name, &mut handler);
    match outcome.message() {
        Some(message) => dialogue.activate(Some(message)),
        None => {
            warn!("[Delivery] Door '{}' is not in the registry", door.name);
            return;
        }
    }

    info!(
        "[Delivery] {} -> {:?} ({} packages left)",
        door.name, outcome, actor.packages
    );
    events.send(DoorInteractionEvent {
        door: door.name.clone(),
        outcome,
    });
}
