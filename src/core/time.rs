//! Frame clock

use std::time::Duration;

/// Manager-local clock advanced once per tick.
///
/// Deferred work is scheduled against `elapsed()`, so the clock only moves
/// when the host steps it. This keeps timed recycling deterministic under
/// pauses, slow motion, and tests.
#[derive(Debug, Clone)]
pub struct Time {
    /// Total time advanced since creation
    elapsed: Duration,
    /// Duration of the last step
    delta: Duration,
    /// Number of steps taken
    frame: u64,
}

impl Time {
    /// Create a clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame: 0,
        }
    }

    /// Advance the clock by an explicit step
    pub fn advance(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame += 1;
    }

    /// Total time advanced
    #[must_use]
    #[inline]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Duration of the last step
    #[must_use]
    #[inline]
    pub const fn delta(&self) -> Duration {
        self.delta
    }

    /// Duration of the last step in seconds
    #[must_use]
    #[inline]
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Number of steps taken
    #[must_use]
    #[inline]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
