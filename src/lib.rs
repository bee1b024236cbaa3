//! Squall - zone-driven weather for first-person scenes
//!
//! Detects when the observer enters or leaves weather zones, ramps a shared
//! intensity, and keeps precipitation particles, rain audio, and fog in step
//! with it. See [`weather::WeatherSystem`].

pub mod core;
pub mod math;
pub mod zone;
pub mod weather;

pub use weather::{Collaborators, WeatherConfig, WeatherSystem};
pub use zone::{WeatherKind, ZoneEvent, ZoneId, ZoneRegistry, ZoneVolume};
