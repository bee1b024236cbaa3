//! Recording collaborators for tests.
//!
//! Each fake shares its state through `Rc<RefCell<..>>` so a test can keep a
//! probe after boxing the fake into the system.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::core::Vec3;
use crate::weather::collaborators::{AudioChannel, EmitterFactory, FogEffect, ParticleEmitter};
use crate::zone::WeatherKind;

#[derive(Debug, Default)]
pub struct EmitterState {
    pub kind: WeatherKind,
    pub position: Vec3,
    pub rate: f32,
    pub start_size: f32,
    pub shape_scale: Option<Vec3>,
    pub destroyed: bool,
    /// Cleared to simulate the host deleting the instance.
    pub alive: bool,
}

pub type EmitterProbe = Rc<RefCell<EmitterState>>;

struct RecordingEmitter {
    state: EmitterProbe,
}

impl ParticleEmitter for RecordingEmitter {
    fn set_position(&mut self, position: Vec3) {
        self.state.borrow_mut().position = position;
    }

    fn set_emission_rate(&mut self, rate: f32) {
        self.state.borrow_mut().rate = rate;
    }

    fn set_start_size(&mut self, size: f32) {
        self.state.borrow_mut().start_size = size;
    }

    fn set_shape_scale(&mut self, scale: Vec3) {
        self.state.borrow_mut().shape_scale = Some(scale);
    }

    fn is_alive(&self) -> bool {
        let state = self.state.borrow();
        state.alive && !state.destroyed
    }

    fn destroy(&mut self) {
        let mut state = self.state.borrow_mut();
        assert!(!state.destroyed, "emitter destroyed twice");
        state.destroyed = true;
    }
}

#[derive(Default)]
struct FactoryLog {
    spawned: Vec<EmitterProbe>,
    missing: HashSet<WeatherKind>,
}

/// Emitter factory that records every instance it hands out.
#[derive(Clone, Default)]
pub struct RecordingFactory {
    log: Rc<RefCell<FactoryLog>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend nothing is registered for `kind`.
    pub fn without(self, kind: WeatherKind) -> Self {
        self.log.borrow_mut().missing.insert(kind);
        self
    }

    pub fn spawned(&self) -> Vec<EmitterProbe> {
        self.log.borrow().spawned.clone()
    }

    pub fn last(&self) -> Option<EmitterProbe> {
        self.log.borrow().spawned.last().cloned()
    }

    /// Emitters not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.log
            .borrow()
            .spawned
            .iter()
            .filter(|e| !e.borrow().destroyed)
            .count()
    }

    fn spawn(&mut self, kind: WeatherKind, position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        let mut log = self.log.borrow_mut();
        if log.missing.contains(&kind) {
            return None;
        }
        let state = Rc::new(RefCell::new(EmitterState {
            kind,
            position,
            alive: true,
            ..Default::default()
        }));
        log.spawned.push(state.clone());
        Some(Box::new(RecordingEmitter { state }))
    }
}

impl EmitterFactory for RecordingFactory {
    fn spawn_rain(&mut self, position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        self.spawn(WeatherKind::Rain, position)
    }

    fn spawn_snow(&mut self, position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        self.spawn(WeatherKind::Snow, position)
    }
}

#[derive(Debug, Default)]
pub struct ChannelState {
    pub playing: bool,
    pub volume: f32,
    pub play_calls: u32,
    pub stop_calls: u32,
}

/// Audio channel fake.
#[derive(Clone, Default)]
pub struct RecordingChannel {
    pub state: Rc<RefCell<ChannelState>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioChannel for RecordingChannel {
    fn play(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = true;
        state.play_calls += 1;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.playing = false;
        state.stop_calls += 1;
    }

    fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume;
    }
}

#[derive(Debug, Default)]
pub struct FogState {
    pub density: f32,
    pub intensity: f32,
    pub color: [f32; 3],
    pub weather_intensity: f32,
    pub writes: u32,
}

/// Fog effect fake; `density()` returns the last value written.
#[derive(Clone, Default)]
pub struct RecordingFog {
    pub state: Rc<RefCell<FogState>>,
}

impl RecordingFog {
    pub fn with_density(density: f32) -> Self {
        let fog = Self::default();
        fog.state.borrow_mut().density = density;
        fog
    }
}

impl FogEffect for RecordingFog {
    fn density(&self) -> f32 {
        self.state.borrow().density
    }

    fn set_density(&mut self, density: f32) {
        let mut state = self.state.borrow_mut();
        state.density = density;
        state.writes += 1;
    }

    fn set_intensity(&mut self, intensity: f32) {
        self.state.borrow_mut().intensity = intensity;
    }

    fn set_color(&mut self, color: [f32; 3]) {
        self.state.borrow_mut().color = color;
    }

    fn set_weather_intensity(&mut self, intensity: f32) {
        self.state.borrow_mut().weather_intensity = intensity;
    }
}
