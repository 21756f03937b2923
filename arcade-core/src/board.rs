//! Board capabilities besides pin sampling: clock, status LED, low-power wait.

use core::future::Future;
use core::time::Duration;

use crate::input::DigitalInputs;
use crate::types::{Instant, Level, PinId};

/// Error type for wake source configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeError {
    /// The pin is not wired on this board.
    UnknownPin,
    /// The board cannot wake on this level for the pin.
    UnsupportedLevel,
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;

    /// Yield for `duration`, letting other tasks run.
    fn delay(&mut self, duration: Duration) -> impl Future<Output = ()>;
}

/// Single status LED.
pub trait StatusLed {
    fn set_lit(&mut self, lit: bool);
}

/// Low-power wait primitive.
pub trait LowPowerWait {
    /// Register `pin` reaching `level` as the wake condition.
    fn enable_wake_source(&mut self, pin: PinId, level: Level) -> Result<(), WakeError>;

    /// Park until the wake condition is observed.
    ///
    /// Pending output (logs, LED state) must be committed before parking;
    /// nothing else runs on the control path until this returns.
    fn enter_wait(&mut self) -> impl Future<Output = ()>;
}

/// Everything the stick controller needs from the board.
pub trait Board: DigitalInputs + Clock + StatusLed + LowPowerWait {}

impl<T> Board for T where T: DigitalInputs + Clock + StatusLed + LowPowerWait {}
