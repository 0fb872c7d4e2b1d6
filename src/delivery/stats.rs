//! Delivery stats: passive listeners on the door and day events.
//!
//! Nothing here changes gameplay. When a new day starts, the day that just
//! ended is summarised in the log.

use bevy::prelude::*;

use crate::shared::*;

#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DeliveryStats {
    pub days_started: u32,
    pub packages_loaded: u32,
    pub delivered: u32,
    pub wrong_house: u32,
    pub repeat_knocks: u32,
    /// Packages the player set out with on the current day.
    pub packages_today: u32,
    pub delivered_today: u32,
}

impl DeliveryStats {
    pub fn record_interaction(&mut self, outcome: InteractOutcome) {
        match outcome {
            InteractOutcome::Delivered => {
                self.delivered = self.delivered.saturating_add(1);
                self.delivered_today = self.delivered_today.saturating_add(1);
            }
            InteractOutcome::AlreadyDelivered => {
                self.repeat_knocks = self.repeat_knocks.saturating_add(1);
            }
            InteractOutcome::WrongHouse => {
                self.wrong_house = self.wrong_house.saturating_add(1);
            }
            InteractOutcome::UnknownDoor => {}
        }
    }

    /// Start counting a new day. Returns the finished day's
    /// `(delivered, packages)` if there was one.
    pub fn start_day(&mut self, packages: u32) -> Option<(u32, u32)> {
        let finished = (self.days_started > 0).then_some((self.delivered_today, self.packages_today));
        self.days_started = self.days_started.saturating_add(1);
        self.packages_loaded = self.packages_loaded.saturating_add(packages);
        self.packages_today = packages;
        self.delivered_today = 0;
        finished
    }
}

pub fn track_door_interactions(
    mut events: EventReader<DoorInteractionEvent>,
    mut stats: ResMut<DeliveryStats>,
) {
    for event in events.read() {
        stats.record_interaction(event.outcome);
    }
}

pub fn track_day_started(
    mut events: EventReader<DayStartedEvent>,
    mut stats: ResMut<DeliveryStats>,
) {
    for event in events.read() {
        if let Some((delivered, packages)) = stats.start_day(event.packages) {
            info!(
                "[Stats] Day {} ended with {}/{} packages delivered",
                event.day.saturating_sub(1),
                delivered,
                packages
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_bump_their_counters() {
        let mut stats = DeliveryStats::default();
        stats.record_interaction(InteractOutcome::Delivered);
        stats.record_interaction(InteractOutcome::WrongHouse);
        stats.record_interaction(InteractOutcome::AlreadyDelivered);
        stats.record_interaction(InteractOutcome::UnknownDoor);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.delivered_today, 1);
        assert_eq!(stats.wrong_house, 1);
        assert_eq!(stats.repeat_knocks, 1);
    }

    #[test]
    fn test_first_day_has_no_summary() {
        let mut stats = DeliveryStats::default();
        assert_eq!(stats.start_day(8), None);
        stats.record_interaction(InteractOutcome::Delivered);
        assert_eq!(stats.start_day(11), Some((1, 8)));
        assert_eq!(stats.delivered_today, 0);
        assert_eq!(stats.packages_loaded, 19);
        assert_eq!(stats.days_started, 2);
    }
}
