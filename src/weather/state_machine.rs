//! Zone-driven weather state.
//!
//! Owns the active zone, the shared intensity, the single live transition and
//! the particle emitter instance. Zone events switch state immediately;
//! intensity only moves in [`WeatherStateMachine::advance`].

use std::collections::HashSet;

use crate::core::Vec3;
use crate::weather::collaborators::{instantiate, EmitterFactory, ParticleEmitter};
use crate::weather::config::{ParticleConfig, WeatherConfig};
use crate::weather::transition::{TransitionHandle, TransitionScheduler, TransitionStatus, TransitionStep};
use crate::zone::{WeatherKind, ZoneId, ZoneVolume};

/// Coarse state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherPhase {
    /// No zone; intensity settles to zero.
    Idle,
    /// A zone is active and intensity converges on its target.
    Active,
}

/// Requests for the audio crossfader, produced while handling events and ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeatherSignal {
    /// Rain became active; start the channel if it is idle.
    StartRain,
    /// Intensity settled at zero; fade the channel out and stop it.
    FadeOut,
}

/// Snapshot of the zone currently driving the weather.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveZone {
    pub id: ZoneId,
    pub kind: WeatherKind,
    pub intensity: f32,
}

/// The emitter instance together with the kind it was spawned for.
pub struct EmitterSlot {
    kind: WeatherKind,
    emitter: Box<dyn ParticleEmitter>,
}

impl EmitterSlot {
    pub fn kind(&self) -> WeatherKind {
        self.kind
    }

    pub fn emitter_mut(&mut self) -> &mut dyn ParticleEmitter {
        self.emitter.as_mut()
    }
}

pub struct WeatherStateMachine {
    active_zone: Option<ActiveZone>,
    current_intensity: f32,
    target_intensity: f32,
    scheduler: TransitionScheduler,
    transition_duration: f32,
    emitter: Option<EmitterSlot>,
    factory: Box<dyn EmitterFactory>,
    particles: ParticleConfig,
    observer: Vec3,
    signals: Vec<WeatherSignal>,
    /// Kinds we already warned about having no emitter
    missing_emitters: HashSet<WeatherKind>,
}

impl WeatherStateMachine {
    pub fn new(config: &WeatherConfig, factory: Box<dyn EmitterFactory>) -> Self {
        Self {
            active_zone: None,
            current_intensity: 0.0,
            target_intensity: 0.0,
            scheduler: TransitionScheduler::new(),
            transition_duration: config.transition_duration,
            emitter: None,
            factory,
            particles: config.particles.clone(),
            observer: Vec3::ZERO,
            signals: Vec::new(),
            missing_emitters: HashSet::new(),
        }
    }

    /// Latest observer position, used to place newly spawned emitters.
    pub fn set_observer_position(&mut self, position: Vec3) {
        self.observer = position;
    }

    /// Observer entered `zone`. Returns true if the weather switched.
    pub fn on_zone_enter(&mut self, id: ZoneId, zone: &ZoneVolume) -> bool {
        let kind = zone.kind();
        if !kind.is_precipitation() {
            log::trace!("Ignoring enter of {id}: zone has no weather");
            return false;
        }
        if self.active_zone.is_some_and(|active| active.id == id) {
            log::trace!("Ignoring re-entry of active {id}");
            return false;
        }

        self.scheduler.cancel();
        self.prune_dead_emitter();

        if self.emitter.as_ref().is_some_and(|slot| slot.kind != kind) {
            self.destroy_emitter();
        }
        if self.emitter.is_none() {
            self.spawn_emitter(kind);
        }

        self.active_zone = Some(ActiveZone {
            id,
            kind,
            intensity: zone.intensity(),
        });
        self.start_transition(zone.intensity());

        if kind == WeatherKind::Rain {
            self.signals.push(WeatherSignal::StartRain);
        }

        log::debug!(
            "Weather -> {:?} via {id}, intensity {:.3} -> {:.3}",
            kind,
            self.current_intensity,
            zone.intensity()
        );
        true
    }

    /// Observer left zone `id`. Exits of anything but the active zone are ignored.
    pub fn on_zone_exit(&mut self, id: ZoneId) -> bool {
        if !self.active_zone.is_some_and(|active| active.id == id) {
            log::trace!("Ignoring exit of inactive {id}");
            return false;
        }

        self.scheduler.cancel();
        self.active_zone = None;
        self.start_transition(0.0);

        log::debug!("Left {id}, intensity {:.3} -> 0", self.current_intensity);
        true
    }

    /// Step the live transition by `dt` seconds.
    ///
    /// When a transition toward zero completes, the emitter is destroyed and a
    /// [`WeatherSignal::FadeOut`] is queued.
    pub fn advance(&mut self, dt: f32) -> Option<TransitionStep> {
        // Losing the emitter stops a ramp toward a zone. A fade-out keeps
        // going so intensity still settles at zero and audio gets FadeOut.
        if self.prune_dead_emitter() && self.active_zone.is_some() {
            self.scheduler.cancel();
        }

        let step = self.scheduler.advance(dt)?;
        self.current_intensity = step.value;

        if step.status == TransitionStatus::Completed {
            log::debug!("Transition {:?} settled at {:.3}", step.handle, step.value);
            if self.target_intensity == 0.0 {
                self.destroy_emitter();
                self.signals.push(WeatherSignal::FadeOut);
            }
        }
        Some(step)
    }

    /// Take all queued signals.
    pub fn drain_signals(&mut self) -> std::vec::Drain<'_, WeatherSignal> {
        self.signals.drain(..)
    }

    /// Cancel everything and destroy the emitter. Intensity is left as is.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.active_zone = None;
        self.destroy_emitter();
        self.signals.clear();
    }

    pub fn phase(&self) -> WeatherPhase {
        if self.active_zone.is_some() {
            WeatherPhase::Active
        } else {
            WeatherPhase::Idle
        }
    }

    pub fn active_zone(&self) -> Option<ActiveZone> {
        self.active_zone
    }

    /// Kind of the active zone, `None` when idle.
    pub fn current_kind(&self) -> WeatherKind {
        self.active_zone.map_or(WeatherKind::None, |zone| zone.kind)
    }

    #[inline]
    pub fn current_intensity(&self) -> f32 {
        self.current_intensity
    }

    #[inline]
    pub fn target_intensity(&self) -> f32 {
        self.target_intensity
    }

    pub fn transition_handle(&self) -> Option<TransitionHandle> {
        self.scheduler.handle()
    }

    pub fn is_transitioning(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Kind of the live emitter, if any.
    pub fn emitter_kind(&self) -> Option<WeatherKind> {
        self.emitter.as_ref().map(EmitterSlot::kind)
    }

    /// The live emitter. A handle the host already destroyed is not returned.
    pub fn emitter_mut(&mut self) -> Option<&mut EmitterSlot> {
        self.emitter.as_mut().filter(|slot| slot.emitter.is_alive())
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn start_transition(&mut self, target: f32) {
        self.target_intensity = target;
        self.scheduler
            .start(self.current_intensity, target, self.transition_duration);
    }

    fn spawn_emitter(&mut self, kind: WeatherKind) {
        let position = self.observer + Vec3::Y * self.particles.height_offset;
        let Some(mut emitter) = instantiate(self.factory.as_mut(), kind, position) else {
            if self.missing_emitters.insert(kind) {
                log::warn!("No particle emitter registered for {kind:?}; particles disabled for it");
            }
            return;
        };

        emitter.set_shape_scale(Vec3::from(self.particles.shape_scale));
        emitter.set_start_size(self.particles.max_particle_size);
        emitter.set_emission_rate(self.current_intensity * self.particles.max_rate(kind));
        self.emitter = Some(EmitterSlot { kind, emitter });
    }

    fn destroy_emitter(&mut self) {
        if let Some(mut slot) = self.emitter.take() {
            if slot.emitter.is_alive() {
                slot.emitter.destroy();
            }
        }
    }

    /// Drop a slot whose emitter was destroyed out of band. Returns true if one was dropped.
    fn prune_dead_emitter(&mut self) -> bool {
        if self.emitter.as_ref().is_some_and(|slot| !slot.emitter.is_alive()) {
            log::warn!("Particle emitter was destroyed externally; dropping it");
            self.emitter = None;
            return true;
        }
        false
    }
}
