//! Weather to fog coupling.
//!
//! The adapter keeps its own smoothed boost on top of the already smoothed
//! intensity, so fog thickens a little behind the precipitation.

use bytemuck::{Pod, Zeroable};

use crate::core::logging::WarnOnce;
use crate::weather::collaborators::FogEffect;
use crate::weather::config::FogCouplingConfig;
use crate::weather::transition::lerp;
use crate::zone::WeatherKind;

/// Share of the base intensity that survives before weather is added.
const BASE_INTENSITY_SCALE: f32 = 0.7;
/// Share of the boost and pulse applied to density.
const DENSITY_SHARE: f32 = 0.5;
/// Share of the raw weather intensity passed on as a shading hint.
const WEATHER_HINT_SCALE: f32 = 0.5;

/// Values written to the fog effect on the last update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FogOutput {
    pub intensity: f32,
    pub density: f32,
    pub weather_intensity: f32,
}

pub struct FogCouplingAdapter {
    fog: Option<Box<dyn FogEffect>>,
    config: FogCouplingConfig,
    boost: f32,
    time: f32,
    last: FogOutput,
    missing_fog: WarnOnce,
}

impl FogCouplingAdapter {
    pub fn new(config: FogCouplingConfig, fog: Option<Box<dyn FogEffect>>) -> Self {
        Self {
            fog,
            config,
            boost: 0.0,
            time: 0.0,
            last: FogOutput::default(),
            missing_fog: WarnOnce::new(),
        }
    }

    /// Recompute fog parameters from this tick's weather and write them out.
    pub fn update(&mut self, dt: f32, kind: WeatherKind, intensity: f32) {
        let Some(fog) = self.fog.as_mut() else {
            self.missing_fog
                .warn(format_args!("No fog effect attached; weather fog coupling disabled"));
            return;
        };

        self.time += dt.max(0.0);

        let target = self.config.boost(kind) * intensity;
        let t = (dt.max(0.0) * self.config.lerp_speed).min(1.0);
        self.boost = lerp(self.boost, target, t);

        let pulse = if self.config.pulsation {
            (self.time * self.config.pulse_frequency).sin() * self.config.pulse_amplitude
        } else {
            0.0
        };

        let out = FogOutput {
            intensity: self.config.base_intensity * BASE_INTENSITY_SCALE + self.boost + pulse,
            density: self.config.base_density + (self.boost + pulse) * DENSITY_SHARE,
            weather_intensity: intensity * WEATHER_HINT_SCALE,
        };

        fog.set_intensity(out.intensity);
        fog.set_density(out.density);
        fog.set_color(self.config.color);
        fog.set_weather_intensity(out.weather_intensity);
        self.last = out;
    }

    /// Density the fog effect currently reports, `None` without a fog effect.
    pub fn density(&self) -> Option<f32> {
        self.fog.as_ref().map(|fog| fog.density())
    }

    /// Smoothed weather boost.
    #[inline]
    pub fn boost(&self) -> f32 {
        self.boost
    }

    pub fn last_output(&self) -> FogOutput {
        self.last
    }
}

// ---------------------------------------------------------------------------
// Reference fog effect
// ---------------------------------------------------------------------------

/// GPU-ready fog parameters.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FogUniform {
    pub color: [f32; 3],
    pub density: f32,
    pub intensity: f32,
    pub weather_intensity: f32,
    pub _pad: [f32; 2],
}

/// Plain fog effect for hosts without their own: stores clamped parameters
/// and exposes them as a [`FogUniform`].
#[derive(Clone, Debug, PartialEq)]
pub struct FogParams {
    density: f32,
    intensity: f32,
    color: [f32; 3],
    weather_intensity: f32,
}

impl FogParams {
    pub const MIN_DENSITY: f32 = 0.03;
    pub const MAX_DENSITY: f32 = 0.12;

    pub fn new(density: f32, intensity: f32, color: [f32; 3]) -> Self {
        Self {
            density: density.clamp(Self::MIN_DENSITY, Self::MAX_DENSITY),
            intensity: intensity.clamp(0.0, 1.0),
            color,
            weather_intensity: 0.0,
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn uniform(&self) -> FogUniform {
        FogUniform {
            color: self.color,
            density: self.density,
            intensity: self.intensity,
            weather_intensity: self.weather_intensity,
            _pad: [0.0; 2],
        }
    }
}

impl Default for FogParams {
    fn default() -> Self {
        Self::new(0.05, 0.5, [0.12, 0.18, 0.22])
    }
}

impl FogEffect for FogParams {
    fn density(&self) -> f32 {
        self.density
    }

    fn set_density(&mut self, density: f32) {
        self.density = density.clamp(Self::MIN_DENSITY, Self::MAX_DENSITY);
    }

    fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.clamp(0.0, 1.0);
    }

    fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }

    fn set_weather_intensity(&mut self, intensity: f32) {
        self.weather_intensity = intensity;
    }
}
