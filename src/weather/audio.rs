//! Rain channel volume, eased toward the weather.
//!
//! Volume uses exponential smoothing rather than the linear intensity ramp so
//! the rain fades in and out with an ease-out curve.

use crate::core::logging::WarnOnce;
use crate::weather::collaborators::AudioChannel;
use crate::weather::config::AudioConfig;
use crate::weather::state_machine::{ActiveZone, WeatherSignal};
use crate::weather::transition::lerp;
use crate::zone::WeatherKind;

pub struct AudioCrossfader {
    channel: Option<Box<dyn AudioChannel>>,
    config: AudioConfig,
    current_volume: f32,
    target_volume: f32,
    /// Whether the channel should keep playing once it goes quiet
    wanted: bool,
    missing_channel: WarnOnce,
}

impl AudioCrossfader {
    pub fn new(config: AudioConfig, channel: Option<Box<dyn AudioChannel>>) -> Self {
        Self {
            channel,
            config,
            current_volume: 0.0,
            target_volume: 0.0,
            wanted: false,
            missing_channel: WarnOnce::new(),
        }
    }

    /// Apply a request from the state machine.
    pub fn handle_signal(&mut self, signal: WeatherSignal) {
        match signal {
            WeatherSignal::StartRain => self.start(),
            WeatherSignal::FadeOut => self.begin_fade_out(),
        }
    }

    /// Start playback if the channel is idle. Never restarts a playing channel.
    pub fn start(&mut self) {
        self.wanted = true;
        let Some(channel) = self.channel.as_mut() else {
            self.missing_channel
                .warn(format_args!("No rain audio channel; rain will be silent"));
            return;
        };
        if !channel.is_playing() {
            log::debug!("Starting rain audio");
            channel.play();
        }
    }

    /// Let the volume decay and stop the channel once it is silent.
    pub fn begin_fade_out(&mut self) {
        self.wanted = false;
        self.target_volume = 0.0;
    }

    /// Ease volume toward the level implied by `active` for this tick.
    pub fn update(&mut self, dt: f32, active: Option<ActiveZone>) {
        self.target_volume = match active {
            Some(zone) if zone.kind == WeatherKind::Rain => {
                self.config.max_rain_volume * zone.intensity
            }
            Some(_) => {
                // A non-rain zone took over: rain should go quiet and stop.
                self.wanted = false;
                0.0
            }
            None => 0.0,
        };

        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        let t = (dt.max(0.0) * self.config.transition_speed).min(1.0);
        self.current_volume = lerp(self.current_volume, self.target_volume, t);

        if !self.wanted && channel.is_playing() && self.current_volume < self.config.stop_epsilon {
            log::debug!("Rain audio faded out; stopping channel");
            channel.stop();
            self.current_volume = 0.0;
        }
        channel.set_volume(self.current_volume);
    }

    #[inline]
    pub fn current_volume(&self) -> f32 {
        self.current_volume
    }

    #[inline]
    pub fn target_volume(&self) -> f32 {
        self.target_volume
    }

    pub fn is_playing(&self) -> bool {
        self.channel.as_ref().is_some_and(|c| c.is_playing())
    }

    /// Stop the channel immediately.
    pub fn shutdown(&mut self) {
        self.wanted = false;
        self.current_volume = 0.0;
        self.target_volume = 0.0;
        if let Some(channel) = self.channel.as_mut() {
            if channel.is_playing() {
                channel.stop();
            }
            channel.set_volume(0.0);
        }
    }
}
