//! Weather configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::zone::WeatherKind;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full weather configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Seconds an intensity transition takes, regardless of distance covered.
    pub transition_duration: f32,
    pub particles: ParticleConfig,
    pub audio: AudioConfig,
    pub fog: FogCouplingConfig,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            transition_duration: 2.0,
            particles: ParticleConfig::default(),
            audio: AudioConfig::default(),
            fog: FogCouplingConfig::default(),
        }
    }
}

impl WeatherConfig {
    /// Reject values that would make the ramps run backwards or never settle.
    pub fn validate(&self) -> Result<()> {
        non_negative("transition_duration", self.transition_duration)?;

        let p = &self.particles;
        non_negative("particles.height_offset", p.height_offset)?;
        for (axis, value) in ["x", "y", "z"].iter().zip(p.shape_scale) {
            non_negative(&format!("particles.shape_scale.{axis}"), value)?;
        }
        non_negative("particles.max_particle_size", p.max_particle_size)?;
        non_negative("particles.rain_max_rate", p.rain_max_rate)?;
        non_negative("particles.snow_max_rate", p.snow_max_rate)?;

        let a = &self.audio;
        if !(0.0..=1.0).contains(&a.max_rain_volume) {
            return Err(Error::Config(format!(
                "audio.max_rain_volume {} outside [0, 1]",
                a.max_rain_volume
            )));
        }
        non_negative("audio.transition_speed", a.transition_speed)?;
        non_negative("audio.stop_epsilon", a.stop_epsilon)?;

        let f = &self.fog;
        non_negative("fog.base_intensity", f.base_intensity)?;
        non_negative("fog.base_density", f.base_density)?;
        non_negative("fog.rain_boost", f.rain_boost)?;
        non_negative("fog.snow_boost", f.snow_boost)?;
        non_negative("fog.lerp_speed", f.lerp_speed)?;
        non_negative("fog.pulse_amplitude", f.pulse_amplitude)?;
        non_negative("fog.pulse_frequency", f.pulse_frequency)?;

        Ok(())
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty-printed JSON.
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}

fn non_negative(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be a finite value >= 0, got {value}")))
    }
}

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

/// Emitter placement and emission limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Height above the observer the emitter is kept at.
    pub height_offset: f32,
    /// Spawn volume extent applied when an emitter is created.
    pub shape_scale: [f32; 3],
    /// Start size with no fog.
    pub max_particle_size: f32,
    /// Particles per second at full rain intensity.
    pub rain_max_rate: f32,
    /// Particles per second at full snow intensity.
    pub snow_max_rate: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            height_offset: 10.0,
            shape_scale: [50.0, 1.0, 50.0],
            max_particle_size: 0.1,
            rain_max_rate: 200.0,
            snow_max_rate: 100.0,
        }
    }
}

impl ParticleConfig {
    /// Emission rate at intensity 1.0 for `kind`.
    pub fn max_rate(&self, kind: WeatherKind) -> f32 {
        match kind {
            WeatherKind::Rain => self.rain_max_rate,
            WeatherKind::Snow => self.snow_max_rate,
            WeatherKind::None => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Rain channel volume ramp.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Volume at zone intensity 1.0, `[0.0, 1.0]`.
    pub max_rain_volume: f32,
    /// Exponential approach rate (per second).
    pub transition_speed: f32,
    /// Below this the channel counts as silent and may be stopped.
    pub stop_epsilon: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_rain_volume: 0.5,
            transition_speed: 2.0,
            stop_epsilon: 0.01,
        }
    }
}

// ---------------------------------------------------------------------------
// Fog
// ---------------------------------------------------------------------------

/// How weather feeds the fog effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogCouplingConfig {
    /// Fog intensity before weather and pulsation.
    pub base_intensity: f32,
    /// Fog density before weather and pulsation.
    pub base_density: f32,
    /// Linear RGB.
    pub color: [f32; 3],
    /// Added boost at full rain intensity.
    pub rain_boost: f32,
    /// Added boost at full snow intensity.
    pub snow_boost: f32,
    /// Approach rate of the boost toward its target (per second).
    pub lerp_speed: f32,
    pub pulsation: bool,
    pub pulse_amplitude: f32,
    /// Radians per second.
    pub pulse_frequency: f32,
}

impl Default for FogCouplingConfig {
    fn default() -> Self {
        Self {
            base_intensity: 0.5,
            base_density: 0.05,
            color: [0.12, 0.18, 0.22],
            rain_boost: 0.1,
            snow_boost: 0.05,
            lerp_speed: 0.5,
            pulsation: true,
            pulse_amplitude: 0.018,
            pulse_frequency: 0.85,
        }
    }
}

impl FogCouplingConfig {
    /// Boost at intensity 1.0 for `kind`.
    pub fn boost(&self, kind: WeatherKind) -> f32 {
        match kind {
            WeatherKind::Rain => self.rain_boost,
            WeatherKind::Snow => self.snow_boost,
            WeatherKind::None => 0.0,
        }
    }
}
