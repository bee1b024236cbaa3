//! Zone-driven weather and its coupling to particles, audio, and fog.
//!
//! The main entry point is [`WeatherSystem`]. Call [`tick`](WeatherSystem::tick)
//! once per frame with the frame time and the observer position. Within a
//! tick, zone events are handled and the intensity advanced before any output
//! is written, so particles, audio, and fog all see the same intensity.

pub mod audio;
pub mod collaborators;
pub mod config;
pub mod fog;
pub mod particles;
pub mod state_machine;
pub mod transition;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use audio::AudioCrossfader;
pub use collaborators::{AudioChannel, Collaborators, EmitterFactory, FogEffect, ParticleEmitter};
pub use config::{AudioConfig, FogCouplingConfig, ParticleConfig, WeatherConfig};
pub use fog::{FogCouplingAdapter, FogOutput, FogParams, FogUniform};
pub use particles::ParticleEmissionDriver;
pub use state_machine::{ActiveZone, WeatherPhase, WeatherSignal, WeatherStateMachine};
pub use transition::{IntensityTransition, TransitionHandle, TransitionScheduler, TransitionStatus};

use crate::core::{Result, Vec3};
use crate::zone::{WeatherKind, ZoneDetector, ZoneEvent, ZoneId, ZoneRegistry, ZoneVolume};

// ---------------------------------------------------------------------------
// WeatherSystem
// ---------------------------------------------------------------------------

/// Owns the zones, the state machine, and the three output drivers.
pub struct WeatherSystem {
    config: WeatherConfig,
    zones: ZoneRegistry,
    detector: Option<ZoneDetector>,
    machine: WeatherStateMachine,
    particles: ParticleEmissionDriver,
    audio: AudioCrossfader,
    fog: FogCouplingAdapter,
    /// Host-supplied trigger events, applied at the start of the next tick
    queued: Vec<ZoneEvent>,
    events: Vec<ZoneEvent>,
    observer: Vec3,
}

impl WeatherSystem {
    /// Build the system. Fails only if `config` does not validate.
    pub fn new(config: WeatherConfig, zones: ZoneRegistry, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let Collaborators {
            emitters,
            rain_audio,
            fog,
            overlap,
        } = collaborators;

        let system = Self {
            machine: WeatherStateMachine::new(&config, emitters),
            particles: ParticleEmissionDriver::new(config.particles.clone()),
            audio: AudioCrossfader::new(config.audio.clone(), rain_audio),
            fog: FogCouplingAdapter::new(config.fog.clone(), fog),
            detector: overlap.map(ZoneDetector::new),
            zones,
            config,
            queued: Vec::new(),
            events: Vec::new(),
            observer: Vec3::ZERO,
        };
        log::info!(
            "Weather system ready: {} zones, {:.1}s transitions, overlap {}",
            system.zones.len(),
            system.config.transition_duration,
            if system.detector.is_some() { "detected" } else { "host-driven" }
        );
        Ok(system)
    }

    /// Queue an overlap event from the host's trigger system for the next tick.
    pub fn queue_event(&mut self, event: ZoneEvent) {
        self.queued.push(event);
    }

    /// Advance one frame.
    pub fn tick(&mut self, dt: f32, observer: Vec3) {
        self.observer = observer;
        self.machine.set_observer_position(observer);

        // 1. Zone events: detected overlaps first, then host triggers
        self.events.clear();
        if let Some(detector) = self.detector.as_mut() {
            detector.update(observer, &self.zones, &mut self.events);
        }
        self.events.append(&mut self.queued);
        let events = std::mem::take(&mut self.events);
        for &event in &events {
            self.apply_event(event);
        }
        self.events = events;

        // 2. Active zone removed from the scene counts as leaving it
        if let Some(active) = self.machine.active_zone() {
            if !self.zones.contains(active.id) {
                log::warn!("Active {} was removed; fading weather out", active.id);
                self.machine.on_zone_exit(active.id);
            }
        }

        // 3. Intensity
        self.machine.advance(dt);
        for signal in self.machine.drain_signals() {
            self.audio.handle_signal(signal);
        }

        // 4. Outputs, all from the same intensity
        let intensity = self.machine.current_intensity();
        let kind = self.machine.current_kind();
        let active = self.machine.active_zone();

        self.fog.update(dt, kind, intensity);
        let fog_density = self.fog.density().unwrap_or(0.0);
        if let Some(slot) = self.machine.emitter_mut() {
            self.particles.update(slot, observer, intensity, fog_density);
        }
        self.audio.update(dt, active);
    }

    /// Destroy the emitter and stop audio.
    pub fn shutdown(&mut self) {
        self.machine.shutdown();
        self.audio.shutdown();
        if let Some(detector) = self.detector.as_mut() {
            detector.reset();
        }
        self.queued.clear();
        log::info!("Weather system shut down");
    }

    // -----------------------------------------------------------------------
    // Zones
    // -----------------------------------------------------------------------

    pub fn add_zone(&mut self, zone: ZoneVolume) -> ZoneId {
        self.zones.add(zone)
    }

    /// Remove a zone. If it was active, the weather fades out on the next tick.
    pub fn remove_zone(&mut self, id: ZoneId) -> Option<ZoneVolume> {
        self.zones.remove(id)
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[inline]
    pub fn current_intensity(&self) -> f32 {
        self.machine.current_intensity()
    }

    #[inline]
    pub fn current_kind(&self) -> WeatherKind {
        self.machine.current_kind()
    }

    pub fn phase(&self) -> WeatherPhase {
        self.machine.phase()
    }

    pub fn state_machine(&self) -> &WeatherStateMachine {
        &self.machine
    }

    pub fn audio(&self) -> &AudioCrossfader {
        &self.audio
    }

    pub fn fog(&self) -> &FogCouplingAdapter {
        &self.fog
    }

    #[inline]
    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    pub fn observer(&self) -> Vec3 {
        self.observer
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn apply_event(&mut self, event: ZoneEvent) {
        match event {
            ZoneEvent::Enter(id) => match self.zones.get(id) {
                Some(zone) => {
                    self.machine.on_zone_enter(id, zone);
                }
                None => log::trace!("Ignoring enter of unknown {id}"),
            },
            ZoneEvent::Exit(id) => {
                self.machine.on_zone_exit(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
