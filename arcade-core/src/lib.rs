//! Platform-agnostic core of a hybrid arcade stick.
//!
//! This crate holds everything about the stick that does not depend on a
//! particular chip: debouncing, the directional encoder, the operating mode
//! machine, the status LED pattern, and the controller that ties them
//! together. It can be used both in embedded `no_std` environments and on
//! host for testing.
//!
//! # Overview
//!
//! - [`types`]: Core data structures ([`Buttons`], [`DirectionalState`], [`StickReport`])
//! - [`debounce`]: Stabilization filter ([`Debouncer`], [`DigitalInput`])
//! - [`input`]: Pin access trait ([`DigitalInputs`])
//! - [`output`]: Report sink trait ([`ReportSink`])
//! - [`board`]: Clock, LED and low-power traits ([`Board`])
//! - [`aggregator`]: One pass over all controls ([`InputAggregator`])
//! - [`mode`]: Active/Sleeping state machine ([`ModeController`])
//! - [`status`]: LED pattern ([`StatusIndicator`])
//! - [`config`]: Pin map, timing and labels ([`StickConfig`])
//! - [`controller`]: The poll cycle ([`StickController`])
//!
//! # Report
//!
//! One report is three bytes:
//! ```text
//! [buttons 1..8][buttons 9..16][hat: 0 = Up, clockwise to 7 = Up-Left, 8 = centered]
//! ```
//!
//! # Example
//!
//! ```rust
//! use arcade_core::{DirectionalState, Debouncer, EdgeEvent, Instant, BUTTON_DEBOUNCE};
//!
//! // Opposing directions resolve to Up and Left.
//! let dir = DirectionalState::from_switches(true, true, true, false);
//! assert_eq!(dir, DirectionalState::UpLeft);
//! assert_eq!(dir.hat_value(), 7);
//!
//! // A press is reported once it has been stable for the window.
//! let mut filter = Debouncer::new(BUTTON_DEBOUNCE, false, Instant::ZERO);
//! assert_eq!(filter.update(true, Instant::from_millis(0)), EdgeEvent::None);
//! assert_eq!(filter.update(true, Instant::from_millis(5)), EdgeEvent::Pressed);
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and logging (for embedded targets)
//! - **`log`**: Route logging through the `log` facade instead
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod aggregator;
pub mod board;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod input;
pub mod mode;
pub mod output;
pub mod status;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use aggregator::{DirectionPins, InputAggregator, InputSnapshot};
pub use board::{Board, Clock, LowPowerWait, StatusLed, WakeError};
pub use config::{ConfigError, Labels, Locale, PinMap, StickConfig, BUTTON_COUNT, LOOP_DELAY};
pub use controller::{CycleOutcome, StickController};
pub use debounce::{Debouncer, DigitalInput, BUTTON_DEBOUNCE, MODE_DEBOUNCE};
pub use input::{DigitalInputs, Pull};
pub use mode::{ModeController, ModeEvent, OperatingMode, WAKE_LEVEL};
pub use output::{AnalogAxes, ReportConfig, ReportError, ReportSink, ReportState};
pub use status::{IndicatorPattern, StatusIndicator, BLINK_INTERVAL};
pub use types::{
    ButtonId, Buttons, DirectionalState, EdgeEvent, Instant, Level, PinId, Polarity, StickReport,
};
