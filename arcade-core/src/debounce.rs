//! Debounce engine.
//!
//! A sample that differs from the previous one restarts the stability timer.
//! Once a sample has been held for at least the stabilization window and it
//! differs from the debounced value, the debounced value flips and a single
//! [`EdgeEvent`] is reported. Bounces shorter than the window never surface.
//!
//! The filter must be polled more often than the window; a starved filter
//! simply sees fewer samples and may merge transitions.

use core::time::Duration;

use crate::input::DigitalInputs;
use crate::types::{EdgeEvent, Instant, Level, PinId, Polarity};

/// Stabilization window for buttons and directional switches.
pub const BUTTON_DEBOUNCE: Duration = Duration::from_millis(5);

/// Stabilization window for the mode switch.
pub const MODE_DEBOUNCE: Duration = Duration::from_millis(25);

/// Time-based filter over logical (pressed/released) samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    /// Debounced value.
    stable: bool,
    /// Most recent sample.
    last_sample: bool,
    /// When `last_sample` last changed, or when `stable` last flipped.
    since: Instant,
}

impl Debouncer {
    /// Create a filter already settled on `asserted`.
    #[must_use]
    pub const fn new(window: Duration, asserted: bool, now: Instant) -> Self {
        Self {
            window,
            stable: asserted,
            last_sample: asserted,
            since: now,
        }
    }

    /// Feed one sample taken at `now`.
    pub fn update(&mut self, asserted: bool, now: Instant) -> EdgeEvent {
        if asserted != self.last_sample {
            self.last_sample = asserted;
            self.since = now;
            return EdgeEvent::None;
        }

        if asserted != self.stable && now.saturating_duration_since(self.since) >= self.window {
            self.stable = asserted;
            self.since = now;
            return if asserted {
                EdgeEvent::Pressed
            } else {
                EdgeEvent::Released
            };
        }

        EdgeEvent::None
    }

    /// Forget all history and settle on `asserted`.
    pub fn reset(&mut self, asserted: bool, now: Instant) {
        *self = Self::new(self.window, asserted, now);
    }

    #[inline]
    #[must_use]
    pub const fn is_asserted(&self) -> bool {
        self.stable
    }

    #[inline]
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }
}

/// A physical switch: pin, polarity and its debounce filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitalInput {
    pin: PinId,
    polarity: Polarity,
    raw: Level,
    filter: Debouncer,
}

impl DigitalInput {
    /// Create an input that starts released.
    #[must_use]
    pub const fn new(pin: PinId, polarity: Polarity, window: Duration, now: Instant) -> Self {
        Self {
            pin,
            polarity,
            raw: polarity.idle_level(),
            filter: Debouncer::new(window, false, now),
        }
    }

    /// Create an input settled on an already-sampled level.
    #[must_use]
    pub const fn with_level(
        pin: PinId,
        polarity: Polarity,
        window: Duration,
        level: Level,
        now: Instant,
    ) -> Self {
        Self {
            pin,
            polarity,
            raw: level,
            filter: Debouncer::new(window, polarity.is_asserted(level), now),
        }
    }

    /// Read the pin and run it through the filter.
    pub fn sample<P: DigitalInputs + ?Sized>(&mut self, pins: &mut P, now: Instant) -> EdgeEvent {
        let level = pins.read_level(self.pin);
        self.update(level, now)
    }

    /// Run an already-read level through the filter.
    pub fn update(&mut self, level: Level, now: Instant) -> EdgeEvent {
        self.raw = level;
        self.filter.update(self.polarity.is_asserted(level), now)
    }

    /// Settle the filter on `level` without reporting an edge.
    pub fn resync(&mut self, level: Level, now: Instant) {
        self.raw = level;
        self.filter.reset(self.polarity.is_asserted(level), now);
    }

    /// Settle the filter on the released state.
    pub fn release(&mut self, now: Instant) {
        self.resync(self.polarity.idle_level(), now);
    }

    #[inline]
    #[must_use]
    pub const fn pin(&self) -> PinId {
        self.pin
    }

    #[inline]
    #[must_use]
    pub const fn raw_level(&self) -> Level {
        self.raw
    }

    /// Debounced pressed state.
    #[inline]
    #[must_use]
    pub const fn is_pressed(&self) -> bool {
        self.filter.is_asserted()
    }
}
