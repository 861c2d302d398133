//! Source nodes (switch and clock) and the timebase clocks read from.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::power::PowerState;

/// Smallest accepted clock period.
pub const MIN_CLOCK_PERIOD_MS: u64 = 1;

/// Default clock period for new clock nodes.
pub const DEFAULT_CLOCK_PERIOD_MS: u64 = 1000;

/// Source of "now" for clock evaluation.
pub trait Timebase: Send + Sync + fmt::Debug {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock timebase backed by the monotonic system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimebase;

impl Timebase for SystemTimebase {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A timebase that only moves when told to.
///
/// Clones share the same position, so a test can keep one handle and give
/// another to the graph.
#[derive(Debug, Clone)]
pub struct ManualTimebase {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl Default for ManualTimebase {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualTimebase {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.offset_nanos
            .fetch_add(duration_nanos(by), Ordering::SeqCst);
    }

    /// Jump to an absolute offset from the origin.
    pub fn set_elapsed(&self, elapsed: Duration) {
        self.offset_nanos
            .store(duration_nanos(elapsed), Ordering::SeqCst);
    }

    /// Offset from the origin.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Timebase for ManualTimebase {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// A manually toggled source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub powered: bool,
}

impl Switch {
    pub fn state(&self) -> PowerState {
        PowerState::from_bool(self.powered)
    }

    pub fn toggle(&mut self) -> bool {
        self.powered = !self.powered;
        self.powered
    }
}

/// A square-wave source.
///
/// On for the first period after its reference instant, off for the next,
/// and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    period_ms: u64,
    reference: Instant,
}

impl Clock {
    /// Create a clock whose first period starts at `now`.
    pub fn new(period_ms: u64, now: Instant) -> Self {
        Self {
            period_ms: period_ms.max(MIN_CLOCK_PERIOD_MS),
            reference: now,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn reference(&self) -> Instant {
        self.reference
    }

    /// Change the period, clamped to [`MIN_CLOCK_PERIOD_MS`]. The reference
    /// instant is kept, so elapsed time is not rescaled. Returns the applied
    /// period.
    pub fn set_period_ms(&mut self, period_ms: u64) -> u64 {
        self.period_ms = period_ms.max(MIN_CLOCK_PERIOD_MS);
        self.period_ms
    }

    /// Restart the wave at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.reference = now;
    }

    /// State of the wave at `now`. Instants before the reference read as the
    /// start of the first period.
    pub fn state_at(&self, now: Instant) -> PowerState {
        let elapsed = now.saturating_duration_since(self.reference);
        let cycles = elapsed.as_millis() / u128::from(self.period_ms);
        PowerState::from_bool(cycles % 2 == 0)
    }
}
