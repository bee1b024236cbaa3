//! Feeds intensity into the precipitation emitter.

use crate::core::Vec3;
use crate::weather::config::ParticleConfig;
use crate::weather::state_machine::EmitterSlot;

/// How strongly fog shrinks particles: full density halves the start size.
const FOG_SIZE_FALLOFF: f32 = 0.5;

/// Stateless per-tick mapping from intensity to emitter parameters.
///
/// The emitter itself belongs to the state machine; this only writes to it.
#[derive(Clone, Debug)]
pub struct ParticleEmissionDriver {
    config: ParticleConfig,
}

impl ParticleEmissionDriver {
    pub fn new(config: ParticleConfig) -> Self {
        Self { config }
    }

    /// Emission rate for the slot's kind at `intensity`.
    pub fn emission_rate(&self, slot: &EmitterSlot, intensity: f32) -> f32 {
        intensity * self.config.max_rate(slot.kind())
    }

    /// Start size under fog of the given density.
    pub fn start_size(&self, fog_density: f32) -> f32 {
        (self.config.max_particle_size * (1.0 - fog_density * FOG_SIZE_FALLOFF)).max(0.0)
    }

    /// Track the observer and apply rate and size.
    ///
    /// The rate uses the kind the emitter was spawned for, so an emitter
    /// fading out after its zone was left keeps thinning out instead of
    /// cutting off.
    pub fn update(&self, slot: &mut EmitterSlot, observer: Vec3, intensity: f32, fog_density: f32) {
        let rate = self.emission_rate(slot, intensity);
        let size = self.start_size(fog_density);

        let emitter = slot.emitter_mut();
        emitter.set_position(observer + Vec3::Y * self.config.height_offset);
        emitter.set_emission_rate(rate);
        emitter.set_start_size(size);
    }
}
