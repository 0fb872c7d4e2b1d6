//! Door registry: which doors are owed a package today and which have
//! already received one.

use std::collections::HashMap;

use bevy::prelude::*;
use rand::seq::index;
use rand::Rng;

/// Per-door delivery state, keyed by door name in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoorState {
    pub package_assigned: bool,
    pub delivered: bool,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DoorRegistry {
    states: HashMap<String, DoorState>,
    /// Guard against assigning twice within one map generation.
    doors_assigned: bool,
}

impl DoorRegistry {
    /// Pick `min(packages, doors)` doors uniformly at random, without
    /// replacement, to receive a package. Every door starts undelivered.
    /// Doors are counted by distinct name.
    ///
    /// Returns `false` and changes nothing if this generation was already
    /// assigned; call `clear` first to reassign.
    pub fn assign_packages(
        &mut self,
        door_names: &[String],
        packages: u32,
        rng: &mut impl Rng,
    ) -> bool {
        if self.doors_assigned {
            return false;
        }

        let mut unique: Vec<&String> = Vec::with_capacity(door_names.len());
        for name in door_names {
            if unique.contains(&name) {
                warn!("[Delivery] Duplicate door name '{}', doors share one entry", name);
            } else {
                unique.push(name);
            }
        }

        let total = unique.len();
        let assigned = (packages as usize).min(total);
        let mut picked = vec![false; total];
        for i in index::sample(rng, total, assigned).iter() {
            picked[i] = true;
        }

        self.states = unique
            .into_iter()
            .zip(picked)
            .map(|(name, package_assigned)| {
                (
                    name.clone(),
                    DoorState {
                        package_assigned,
                        delivered: false,
                    },
                )
            })
            .collect();

        self.doors_assigned = true;
        true
    }

    /// Forget every door and allow a fresh assignment.
    pub fn clear(&mut self) {
        self.states.clear();
        self.doors_assigned = false;
    }

    pub fn is_assigned(&self) -> bool {
        self.doors_assigned
    }

    pub fn get(&self, door: &str) -> Option<&DoorState> {
        self.states.get(door)
    }

    /// Mark a door as delivered. Returns `false` if the door is unknown.
    pub fn mark_delivered(&mut self, door: &str) -> bool {
        match self.states.get_mut(door) {
            Some(state) => {
                state.delivered = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn assigned_count(&self) -> usize {
        self.states.values().filter(|s| s.package_assigned).count()
    }

    pub fn delivered_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| s.package_assigned && s.delivered)
            .count()
    }

    /// Assigned doors still waiting for their package.
    pub fn remaining(&self) -> usize {
        self.assigned_count() - self.delivered_count()
    }

    #[cfg(test)]
    pub(crate) fn insert(&mut self, door: &str, state: DoorState) {
        self.states.insert(door.to_string(), state);
        self.doors_assigned = true;
    }
}
