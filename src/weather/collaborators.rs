//! Interfaces to the systems weather drives but does not own.
//!
//! Everything here is injected through [`Collaborators`] when the
//! [`super::WeatherSystem`] is built. Any of them may be absent; the matching
//! output is then skipped.

use crate::core::Vec3;
use crate::zone::{OverlapQuery, WeatherKind};

/// Post-process fog effect.
pub trait FogEffect {
    /// Current density as the effect reports it.
    fn density(&self) -> f32;
    fn set_density(&mut self, density: f32);
    fn set_intensity(&mut self, intensity: f32);
    /// Linear RGB.
    fn set_color(&mut self, color: [f32; 3]);
    /// Raw weather strength hint for effects that shade precipitation themselves.
    fn set_weather_intensity(&mut self, _intensity: f32) {}
}

/// Handle to a live particle emitter instance.
pub trait ParticleEmitter {
    fn set_position(&mut self, position: Vec3);
    /// Particles per second.
    fn set_emission_rate(&mut self, rate: f32);
    fn set_start_size(&mut self, size: f32);
    /// Extent of the spawn volume.
    fn set_shape_scale(&mut self, _scale: Vec3) {}
    /// False once the host destroyed the instance behind our back.
    fn is_alive(&self) -> bool {
        true
    }
    fn destroy(&mut self);
}

/// Creates emitters for each precipitation kind.
///
/// Returning `None` means nothing is registered for that kind.
pub trait EmitterFactory {
    fn spawn_rain(&mut self, position: Vec3) -> Option<Box<dyn ParticleEmitter>>;
    fn spawn_snow(&mut self, position: Vec3) -> Option<Box<dyn ParticleEmitter>>;
}

/// Pick the factory constructor for `kind`.
pub fn instantiate(
    factory: &mut dyn EmitterFactory,
    kind: WeatherKind,
    position: Vec3,
) -> Option<Box<dyn ParticleEmitter>> {
    match kind {
        WeatherKind::Rain => factory.spawn_rain(position),
        WeatherKind::Snow => factory.spawn_snow(position),
        WeatherKind::None => None,
    }
}

/// Looping ambient audio channel.
pub trait AudioChannel {
    fn play(&mut self);
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn set_volume(&mut self, volume: f32);
}

/// Factory with nothing registered.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEmitters;

impl EmitterFactory for NoEmitters {
    fn spawn_rain(&mut self, _position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        None
    }

    fn spawn_snow(&mut self, _position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        None
    }
}

/// Everything the weather system talks to, handed over at construction.
pub struct Collaborators {
    pub emitters: Box<dyn EmitterFactory>,
    pub rain_audio: Option<Box<dyn AudioChannel>>,
    pub fog: Option<Box<dyn FogEffect>>,
    /// When absent, zone events must be fed in with
    /// [`super::WeatherSystem::queue_event`].
    pub overlap: Option<Box<dyn OverlapQuery>>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            emitters: Box::new(NoEmitters),
            rain_audio: None,
            fog: None,
            overlap: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::testing::RecordingFactory;

    #[test]
    fn test_instantiate_dispatches_on_kind() {
        let factory = RecordingFactory::new();
        let mut handle = factory.clone();

        assert!(instantiate(&mut handle, WeatherKind::Rain, Vec3::ZERO).is_some());
        assert!(instantiate(&mut handle, WeatherKind::Snow, Vec3::ZERO).is_some());
        assert!(instantiate(&mut handle, WeatherKind::None, Vec3::ZERO).is_none());

        let spawned: Vec<_> = factory.spawned().iter().map(|e| e.borrow().kind).collect();
        assert_eq!(spawned, vec![WeatherKind::Rain, WeatherKind::Snow]);
    }

    #[test]
    fn test_no_emitters_spawns_nothing() {
        let mut factory = NoEmitters;
        assert!(instantiate(&mut factory, WeatherKind::Rain, Vec3::ZERO).is_none());
    }
}
