//! Hybrid arcade stick firmware for RP2040.
//!
//! Reads ten buttons, a four-way stick and a mode switch, and reports them to
//! the host as a USB HID gamepad. The mode switch at power-on selects between
//! running and parking in a low-power wait; pressing it later toggles the
//! stick to sleep, and pressing it while asleep wakes it up again.
//!
//! # Hardware Configuration
//!
//! | Function        | GPIO    | Description |
//! |-----------------|---------|-------------|
//! | Buttons 1..8    | 2..9    | Action buttons, active low |
//! | Start / Select  | 10, 11  | Buttons 9 and 10, active low |
//! | Up/Down/Left/Right | 12..15 | Stick switches, active low |
//! | Mode            | 16      | Mode switch, also the wake source |
//! | LED             | 25      | On-board LED (status indicator) |
//!
//! All inputs use the internal pull-ups.
//!
//! # Architecture
//!
//! The firmware uses the Embassy async runtime with two tasks:
//!
//! - **USB Task**: Manages the USB device stack
//! - **Stick Task**: Runs the [`StickController`](arcade_core::StickController)
//!   poll cycle over the [`PicoBoard`] and the [`UsbReportService`]
//!
//! The only state shared between them is the link flag published by
//! [`UsbLinkHandler`].
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (resets on panic)
//! - **`locale-es`**: Spanish device name and log messages
//! - **`zero-delay`**: Run poll cycles back to back

#![no_std]

// Re-export core types for convenience
pub use arcade_core::{
    CycleOutcome, Locale, OperatingMode, PinMap, ReportConfig, ReportError, ReportSink,
    StickConfig, StickController,
};

pub mod board;
pub mod usb_output;

pub use board::PicoBoard;
pub use usb_output::{configure_usb_hid, UsbLinkHandler, UsbReportService, REPORT_DESCRIPTOR};

/// Stick configuration selected by the crate features.
#[must_use]
pub const fn stick_config() -> StickConfig {
    let config = StickConfig::DEFAULT;
    #[cfg(feature = "locale-es")]
    let config = config.with_locale(Locale::Spanish);
    #[cfg(feature = "zero-delay")]
    let config = config.with_loop_delay(core::time::Duration::ZERO);
    config
}
