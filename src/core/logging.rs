//! Logging initialization and utilities

use std::fmt;

/// Initialize the logging system
///
/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG environment variable.
///
/// # Example
/// ```no_run
/// squall::core::logging::init();
/// log::info!("Weather started");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}

/// Latch for warnings that would otherwise repeat every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct WarnOnce {
    fired: bool,
}

impl WarnOnce {
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Emit `args` as a warning the first time only. Returns true if it was emitted.
    pub fn warn(&mut self, args: fmt::Arguments<'_>) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        log::warn!("{args}");
        true
    }
}
