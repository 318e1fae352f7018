//! # Frame Clock
//!
//! Time and frame scheduling for the tick loop.
//!
//! - [`TimeSource`] answers "what time is it" (milliseconds, monotonic).
//! - [`FrameClock`] adds the single suspension point of the loop:
//!   `next_frame()` returns once the next frame is due.
//!
//! Browser hosts do not implement [`FrameClock`]; their frame callback hands
//! the timestamp straight to
//! [`LifecycleController::tick`](crate::LifecycleController::tick).

use std::time::{Duration, Instant};

/// Nominal frame interval (60 Hz) in milliseconds.
pub const NOMINAL_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Monotonic millisecond time source.
pub trait TimeSource {
    /// Current time in milliseconds.
    fn now_ms(&self) -> f64;
}

/// Cooperative per-frame scheduler.
pub trait FrameClock: TimeSource {
    /// Yields until the next frame and returns its timestamp.
    fn next_frame(&mut self) -> f64;
}

/// Deterministic clock advancing a fixed interval per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepClock {
    now_ms: f64,
    interval_ms: f64,
}

impl FixedStepClock {
    /// Creates a clock starting at `start_ms`.
    #[must_use]
    pub const fn new(start_ms: f64, interval_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            interval_ms,
        }
    }

    /// A clock at t = 0 ticking at the nominal 60 Hz.
    #[must_use]
    pub const fn sixty_hz() -> Self {
        Self::new(0.0, NOMINAL_FRAME_INTERVAL_MS)
    }

    /// Moves time forward without producing a frame.
    pub fn advance(&mut self, ms: f64) {
        self.now_ms += ms;
    }

    /// Frame interval in milliseconds.
    #[must_use]
    pub const fn interval_ms(&self) -> f64 {
        self.interval_ms
    }
}

impl TimeSource for FixedStepClock {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

impl FrameClock for FixedStepClock {
    fn next_frame(&mut self) -> f64 {
        self.now_ms += self.interval_ms;
        self.now_ms
    }
}

/// Wall-clock frame pacing for native hosts.
#[derive(Debug, Clone)]
pub struct RealtimeClock {
    origin: Instant,
    frame_duration: Duration,
    last_frame: Instant,
}

impl RealtimeClock {
    /// Creates a clock pacing frames at `fps`.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            frame_duration: Duration::from_micros(1_000_000 / u64::from(fps.max(1))),
            last_frame: now,
        }
    }
}

impl Default for RealtimeClock {
    fn default() -> Self {
        Self::new(60)
    }
}

impl TimeSource for RealtimeClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl FrameClock for RealtimeClock {
    fn next_frame(&mut self) -> f64 {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }
        self.last_frame = Instant::now();
        self.now_ms()
    }
}
