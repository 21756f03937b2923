//! Digital input sampling trait.

use crate::types::{Level, PinId};

/// Internal resistor configuration for an input pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Raw digital pin access.
///
/// Implemented by the board for real GPIO and by simulated boards in tests,
/// so the debounce and aggregation logic never touches hardware directly.
pub trait DigitalInputs {
    /// Configure `pin` as an input with the given pull resistor.
    fn configure_pin(&mut self, pin: PinId, pull: Pull);

    /// Sample the instantaneous level of `pin`.
    ///
    /// Pins the board does not know read as [`Level::High`], the idle level of
    /// a pulled-up switch.
    fn read_level(&mut self, pin: PinId) -> Level;
}
