//! Weather zones: authored regions that carry a weather kind and intensity.
//!
//! Zones are registered once in a [`ZoneRegistry`] and referred to by
//! [`ZoneId`]. Ids are never reused, so an id held after its zone was removed
//! simply fails to resolve.

pub mod detector;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result, Vec3};
use crate::math::Aabb;

pub use detector::{BoundsOverlap, OverlapQuery, ZoneDetector, ZoneEvent};

/// Kind of precipitation a zone produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeatherKind {
    #[default]
    None,
    Rain,
    Snow,
}

impl WeatherKind {
    /// Whether entering a zone of this kind can switch the weather.
    #[inline]
    pub fn is_precipitation(self) -> bool {
        !matches!(self, WeatherKind::None)
    }
}

/// Identifier handed out by [`ZoneRegistry::add`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(u64);

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// A static weather region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneVolume {
    kind: WeatherKind,
    /// Target intensity while this zone is active, `[0.0, 1.0]`.
    intensity: f32,
    bounds: Aabb,
}

impl ZoneVolume {
    /// Create a zone, rejecting intensities outside `[0, 1]` and inverted bounds.
    pub fn new(kind: WeatherKind, intensity: f32, bounds: Aabb) -> Result<Self> {
        let zone = Self { kind, intensity, bounds };
        zone.validate()?;
        Ok(zone)
    }

    pub fn kind(&self) -> WeatherKind {
        self.kind
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Whether `point` lies inside the zone bounds.
    pub fn contains(&self, point: Vec3) -> bool {
        self.bounds.contains_point(point)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(Error::InvalidZone(format!(
                "intensity {} outside [0, 1]",
                self.intensity
            )));
        }
        if !self.bounds.is_well_formed() {
            return Err(Error::InvalidZone(format!(
                "bounds min {:?} / max {:?} are not ordered",
                self.bounds.min, self.bounds.max
            )));
        }
        Ok(())
    }
}

/// On-disk zone list.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ZoneFile {
    zones: Vec<ZoneVolume>,
}

/// Owns every zone in the scene.
#[derive(Debug)]
pub struct ZoneRegistry {
    /// Ordered so overlap queries report zones deterministically
    zones: BTreeMap<ZoneId, ZoneVolume>,
    next_id: u64,
}

impl Default for ZoneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoneRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            zones: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Build a registry from a list of already-validated zones.
    pub fn from_volumes(volumes: impl IntoIterator<Item = ZoneVolume>) -> Self {
        let mut registry = Self::new();
        for zone in volumes {
            registry.add(zone);
        }
        registry
    }

    /// Add a zone and return its id.
    pub fn add(&mut self, zone: ZoneVolume) -> ZoneId {
        let id = ZoneId(self.next_id);
        self.next_id += 1;
        self.zones.insert(id, zone);
        id
    }

    /// Remove a zone. Ids held elsewhere become stale.
    pub fn remove(&mut self, id: ZoneId) -> Option<ZoneVolume> {
        self.zones.remove(&id)
    }

    /// Get a zone by id.
    pub fn get(&self, id: ZoneId) -> Option<&ZoneVolume> {
        self.zones.get(&id)
    }

    pub fn contains(&self, id: ZoneId) -> bool {
        self.zones.contains_key(&id)
    }

    /// Iterate all zones in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &ZoneVolume)> {
        self.zones.iter().map(|(id, zone)| (*id, zone))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Load zones from a JSON file of the form `{ "zones": [ ... ] }`.
    ///
    /// Every zone is validated; the first bad one fails the whole load.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let file: ZoneFile = serde_json::from_str(&json)?;
        for (index, zone) in file.zones.iter().enumerate() {
            zone.validate().map_err(|e| {
                Error::InvalidZone(format!("{} (entry {index} in {})", e, path.display()))
            })?;
        }
        log::info!("Loaded {} weather zones from {}", file.zones.len(), path.display());
        Ok(Self::from_volumes(file.zones))
    }

    /// Save all zones as JSON.
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let file = ZoneFile {
            zones: self.zones.values().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}
