//! Status LED pattern.

use core::time::Duration;

use crate::mode::OperatingMode;
use crate::types::Instant;

/// Blink period while waiting for a connection.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// What the LED is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorPattern {
    /// Sleeping.
    Off,
    /// Active, waiting for a host.
    Blinking,
    /// Active and connected.
    Solid,
}

impl IndicatorPattern {
    #[must_use]
    pub const fn for_state(mode: OperatingMode, connected: bool) -> Self {
        match (mode, connected) {
            (OperatingMode::Sleeping, _) => Self::Off,
            (OperatingMode::Active, true) => Self::Solid,
            (OperatingMode::Active, false) => Self::Blinking,
        }
    }
}

/// Derives the LED level from connection state and elapsed time.
///
/// Blinking is timed against the monotonic clock, so poll jitter does not
/// change the blink rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    interval: Duration,
    last_toggle: Instant,
    lit: bool,
}

impl StatusIndicator {
    #[must_use]
    pub const fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_toggle: now,
            lit: false,
        }
    }

    /// LED level for this cycle.
    pub fn update(&mut self, connected: bool, now: Instant) -> bool {
        if connected {
            self.lit = true;
        } else if now.saturating_duration_since(self.last_toggle) >= self.interval {
            self.last_toggle = now;
            self.lit = !self.lit;
        }
        self.lit
    }

    pub fn force_off(&mut self) {
        self.lit = false;
    }

    #[inline]
    #[must_use]
    pub const fn is_lit(&self) -> bool {
        self.lit
    }
}
