//! Weather walk-through — moves an observer across weather zones and logs
//! what the particles, audio, and fog receive.
//!
//! Usage: cargo run --bin weather_walk -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Weather config JSON (default: built-in defaults)
//!   --zones <PATH>    Zone list JSON (default: rain on x 0..40, snow on x 60..100)
//!   --speed <M/S>     Observer walking speed along +x (default: 4.0)
//!   --dt <SECONDS>    Frame time (default: 0.016)
//!   --seconds <S>     Simulated duration (default: 35.0)

use std::path::PathBuf;

use glam::Vec3;

use squall::core::logging;
use squall::math::Aabb;
use squall::weather::{AudioChannel, Collaborators, EmitterFactory, FogParams, ParticleEmitter};
use squall::zone::BoundsOverlap;
use squall::{WeatherConfig, WeatherKind, WeatherSystem, ZoneRegistry, ZoneVolume};

/// Emitter that only logs what it is told.
struct LogEmitter {
    kind: WeatherKind,
    rate: f32,
}

impl ParticleEmitter for LogEmitter {
    fn set_position(&mut self, _position: Vec3) {}

    fn set_emission_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn set_start_size(&mut self, _size: f32) {}

    fn destroy(&mut self) {
        log::info!("{:?} emitter destroyed (last rate {:.1}/s)", self.kind, self.rate);
    }
}

struct LogFactory;

impl EmitterFactory for LogFactory {
    fn spawn_rain(&mut self, position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        log::info!("Rain emitter spawned at {position}");
        Some(Box::new(LogEmitter { kind: WeatherKind::Rain, rate: 0.0 }))
    }

    fn spawn_snow(&mut self, position: Vec3) -> Option<Box<dyn ParticleEmitter>> {
        log::info!("Snow emitter spawned at {position}");
        Some(Box::new(LogEmitter { kind: WeatherKind::Snow, rate: 0.0 }))
    }
}

#[derive(Default)]
struct LogChannel {
    playing: bool,
}

impl AudioChannel for LogChannel {
    fn play(&mut self) {
        log::info!("Rain audio: play");
        self.playing = true;
    }

    fn stop(&mut self) {
        log::info!("Rain audio: stop");
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_volume(&mut self, _volume: f32) {}
}

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let zones_path = parse_str_arg(&args, "--zones").map(PathBuf::from);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(4.0);
    let dt = parse_f32_arg(&args, "--dt").unwrap_or(0.016);
    let seconds = parse_f32_arg(&args, "--seconds").unwrap_or(35.0);

    let (frames, report_every) = match frame_plan(dt, seconds) {
        Some(plan) => plan,
        None => {
            log::error!("--dt must be > 0 and --seconds >= 0, got dt={dt} seconds={seconds}");
            std::process::exit(1);
        }
    };

    let config = match config_path {
        Some(path) => match WeatherConfig::load_sync(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => WeatherConfig::default(),
    };

    let zones = match zones_path {
        Some(path) => match ZoneRegistry::load_sync(&path) {
            Ok(zones) => zones,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => match default_zones() {
            Ok(zones) => zones,
            Err(e) => {
                log::error!("Built-in zones are invalid: {e}");
                std::process::exit(1);
            }
        },
    };

    let collaborators = Collaborators {
        emitters: Box::new(LogFactory),
        rain_audio: Some(Box::new(LogChannel::default())),
        fog: Some(Box::new(FogParams::default())),
        overlap: Some(Box::new(BoundsOverlap)),
    };
    let mut system = match WeatherSystem::new(config, zones, collaborators) {
        Ok(system) => system,
        Err(e) => {
            log::error!("Invalid weather config: {e}");
            std::process::exit(1);
        }
    };

    let mut observer = Vec3::new(-10.0, 1.7, 0.0);

    for frame in 0..frames {
        system.tick(dt, observer);
        observer.x += speed * dt;

        if frame % report_every == 0 {
            let fog = system.fog().last_output();
            log::info!(
                "t={:5.1}s x={:6.1} {:?} intensity={:.3} volume={:.3} fog density={:.4} intensity={:.3}",
                frame as f32 * dt,
                observer.x,
                system.current_kind(),
                system.current_intensity(),
                system.audio().current_volume(),
                fog.density,
                fog.intensity,
            );
        }
    }

    system.shutdown();
}

fn default_zones() -> squall::core::Result<ZoneRegistry> {
    let band = |min_x: f32, max_x: f32| {
        Aabb::new(Vec3::new(min_x, -100.0, -100.0), Vec3::new(max_x, 100.0, 100.0))
    };
    Ok(ZoneRegistry::from_volumes([
        ZoneVolume::new(WeatherKind::Rain, 1.0, band(0.0, 40.0))?,
        ZoneVolume::new(WeatherKind::Snow, 0.7, band(60.0, 100.0))?,
    ]))
}

/// Frame count and report interval, `None` unless `dt > 0` and `seconds >= 0`.
fn frame_plan(dt: f32, seconds: f32) -> Option<(u32, u32)> {
    if !(dt > 0.0 && dt.is_finite() && seconds >= 0.0 && seconds.is_finite()) {
        return None;
    }
    let frames = (seconds / dt).ceil() as u32;
    let report_every = (1.0 / dt).round().max(1.0) as u32;
    Some((frames, report_every))
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
