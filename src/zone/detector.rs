//! Observer/zone overlap tracking.
//!
//! The detector does not test geometry itself. An [`OverlapQuery`] reports
//! which zones the observer currently touches, and the detector turns the
//! frame-to-frame difference into [`ZoneEvent`]s.

use std::collections::BTreeSet;

use crate::core::Vec3;
use crate::zone::{ZoneId, ZoneRegistry};

/// Edge-triggered overlap change for one zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneEvent {
    Enter(ZoneId),
    Exit(ZoneId),
}

/// Spatial overlap collaborator (physics/trigger layer).
pub trait OverlapQuery {
    /// Push the id of every zone `observer` currently overlaps into `out`.
    fn overlapping(&self, observer: Vec3, zones: &ZoneRegistry, out: &mut Vec<ZoneId>);
}

/// Point-in-AABB overlap against the registered zone bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundsOverlap;

impl OverlapQuery for BoundsOverlap {
    fn overlapping(&self, observer: Vec3, zones: &ZoneRegistry, out: &mut Vec<ZoneId>) {
        out.extend(
            zones
                .iter()
                .filter(|(_, zone)| zone.contains(observer))
                .map(|(id, _)| id),
        );
    }
}

/// Tracks which zones the observer was inside last tick.
pub struct ZoneDetector {
    query: Box<dyn OverlapQuery>,
    inside: BTreeSet<ZoneId>,
    scratch: Vec<ZoneId>,
}

impl ZoneDetector {
    pub fn new(query: Box<dyn OverlapQuery>) -> Self {
        Self {
            query,
            inside: BTreeSet::new(),
            scratch: Vec::new(),
        }
    }

    /// Sample overlaps at `observer` and append the resulting events to `events`.
    ///
    /// Exits are reported before enters, each group in id order, so leaving
    /// one zone and entering its neighbour in the same frame ends on the
    /// neighbour.
    pub fn update(&mut self, observer: Vec3, zones: &ZoneRegistry, events: &mut Vec<ZoneEvent>) {
        self.scratch.clear();
        self.query.overlapping(observer, zones, &mut self.scratch);
        let now: BTreeSet<ZoneId> = self.scratch.iter().copied().collect();

        events.extend(self.inside.difference(&now).map(|&id| ZoneEvent::Exit(id)));
        events.extend(now.difference(&self.inside).map(|&id| ZoneEvent::Enter(id)));

        self.inside = now;
    }

    /// Forget all tracked overlaps (e.g. after a teleport). No events are emitted.
    pub fn reset(&mut self) {
        self.inside.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Aabb;
    use crate::zone::{WeatherKind, ZoneVolume};

    fn zone(kind: WeatherKind, min: f32, max: f32) -> ZoneVolume {
        ZoneVolume::new(
            kind,
            1.0,
            Aabb::new(Vec3::new(min, -10.0, -10.0), Vec3::new(max, 10.0, 10.0)),
        )
        .unwrap()
    }

    #[test]
    fn test_enter_then_exit() {
        let mut registry = ZoneRegistry::new();
        let rain = registry.add(zone(WeatherKind::Rain, 0.0, 10.0));
        let mut detector = ZoneDetector::new(Box::new(BoundsOverlap));
        let mut events = Vec::new();

        detector.update(Vec3::new(-5.0, 0.0, 0.0), &registry, &mut events);
        assert!(events.is_empty());

        detector.update(Vec3::new(5.0, 0.0, 0.0), &registry, &mut events);
        assert_eq!(events, vec![ZoneEvent::Enter(rain)]);

        events.clear();
        detector.update(Vec3::new(6.0, 0.0, 0.0), &registry, &mut events);
        assert!(events.is_empty(), "staying inside must not re-emit");

        detector.update(Vec3::new(15.0, 0.0, 0.0), &registry, &mut events);
        assert_eq!(events, vec![ZoneEvent::Exit(rain)]);
    }

    #[test]
    fn test_crossing_adjacent_zones_reports_exit_before_enter() {
        let mut registry = ZoneRegistry::new();
        let rain = registry.add(zone(WeatherKind::Rain, 0.0, 10.0));
        let snow = registry.add(zone(WeatherKind::Snow, 10.5, 20.0));
        let mut detector = ZoneDetector::new(Box::new(BoundsOverlap));
        let mut events = Vec::new();

        detector.update(Vec3::new(5.0, 0.0, 0.0), &registry, &mut events);
        events.clear();
        detector.update(Vec3::new(15.0, 0.0, 0.0), &registry, &mut events);
        assert_eq!(events, vec![ZoneEvent::Exit(rain), ZoneEvent::Enter(snow)]);
    }

    #[test]
    fn test_removed_zone_reports_exit() {
        let mut registry = ZoneRegistry::new();
        let rain = registry.add(zone(WeatherKind::Rain, 0.0, 10.0));
        let mut detector = ZoneDetector::new(Box::new(BoundsOverlap));
        let mut events = Vec::new();

        detector.update(Vec3::new(5.0, 0.0, 0.0), &registry, &mut events);
        registry.remove(rain);
        events.clear();
        detector.update(Vec3::new(5.0, 0.0, 0.0), &registry, &mut events);
        assert_eq!(events, vec![ZoneEvent::Exit(rain)]);
    }

    #[test]
    fn test_reset_re_enters_on_next_update() {
        let mut registry = ZoneRegistry::new();
        let rain = registry.add(zone(WeatherKind::Rain, 0.0, 10.0));
        let mut detector = ZoneDetector::new(Box::new(BoundsOverlap));
        let mut events = Vec::new();

        detector.update(Vec3::new(5.0, 0.0, 0.0), &registry, &mut events);
        events.clear();
        detector.reset();
        detector.update(Vec3::new(5.0, 0.0, 0.0), &registry, &mut events);
        assert_eq!(events, vec![ZoneEvent::Enter(rain)]);
    }
}
