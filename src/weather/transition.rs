//! Cancellable, resumable intensity ramps.
//!
//! A transition is plain data advanced once per tick by its owner. Replacing
//! the scheduler's task is the only way to cancel, so two ramps can never
//! write the same intensity.

/// Linear interpolation in the form that stays monotonic in `t`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Result of advancing a transition by one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionStatus {
    Running,
    /// Reached the target; the value is exactly the target.
    Completed,
}

/// A single linear ramp from `start` to `target` over `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntensityTransition {
    start: f32,
    target: f32,
    elapsed: f32,
    duration: f32,
}

impl IntensityTransition {
    /// Both endpoints are clamped to `[0.0, 1.0]`.
    pub fn new(start: f32, target: f32, duration: f32) -> Self {
        Self {
            start: start.clamp(0.0, 1.0),
            target: target.clamp(0.0, 1.0),
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Advance by `dt` seconds and return the new value.
    pub fn advance(&mut self, dt: f32) -> (f32, TransitionStatus) {
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.duration {
            return (self.target, TransitionStatus::Completed);
        }
        (self.value(), TransitionStatus::Running)
    }

    /// Value at the current elapsed time.
    pub fn value(&self) -> f32 {
        let (lo, hi) = if self.start <= self.target {
            (self.start, self.target)
        } else {
            (self.target, self.start)
        };
        // Rounding in `target - start` must not push past either endpoint.
        lerp(self.start, self.target, self.progress()).clamp(lo, hi)
    }

    /// Fraction of the duration elapsed, `[0.0, 1.0]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

/// Identifies one started transition. A new start always yields a new handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionHandle(u64);

/// What happened to the live transition during [`TransitionScheduler::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionStep {
    pub handle: TransitionHandle,
    pub value: f32,
    pub status: TransitionStatus,
}

/// Holds at most one live [`IntensityTransition`].
#[derive(Debug, Default)]
pub struct TransitionScheduler {
    live: Option<(TransitionHandle, IntensityTransition)>,
    next_handle: u64,
}

impl TransitionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any live transition with a new one and return its handle.
    pub fn start(&mut self, from: f32, target: f32, duration: f32) -> TransitionHandle {
        if let Some((old, _)) = self.live.take() {
            log::trace!("Transition {old:?} replaced before completion");
        }
        self.next_handle += 1;
        let handle = TransitionHandle(self.next_handle);
        self.live = Some((handle, IntensityTransition::new(from, target, duration)));
        handle
    }

    /// Drop the live transition without finalizing it.
    ///
    /// Returns the value it had reached, if one was live.
    pub fn cancel(&mut self) -> Option<f32> {
        self.live.take().map(|(_, transition)| transition.value())
    }

    /// Advance the live transition. A completed transition is removed.
    pub fn advance(&mut self, dt: f32) -> Option<TransitionStep> {
        let (handle, transition) = self.live.as_mut()?;
        let handle = *handle;
        let (value, status) = transition.advance(dt);
        if status == TransitionStatus::Completed {
            self.live = None;
        }
        Some(TransitionStep { handle, value, status })
    }

    /// Handle of the live transition, if any.
    pub fn handle(&self) -> Option<TransitionHandle> {
        self.live.as_ref().map(|(handle, _)| *handle)
    }

    pub fn live(&self) -> Option<&IntensityTransition> {
        self.live.as_ref().map(|(_, transition)| transition)
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }
}
