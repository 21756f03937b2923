//! Report sink trait, report layout and error types.

use core::future::Future;

use crate::types::{ButtonId, DirectionalState, StickReport};

/// Error type for report service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReportError {
    /// The service has not been started with `begin`.
    NotStarted,
    /// The requested report layout is not what the transport advertises.
    UnsupportedLayout,
    /// Transport not ready (e.g. host not attached).
    NotReady,
    /// Transport I/O error.
    Io,
}

/// Analog axes enabled in the report, one bit per axis. The stick has none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogAxes(pub u8);

impl AnalogAxes {
    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Report layout requested from the service on `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportConfig {
    pub button_count: u8,
    pub hat_switch_count: u8,
    pub axes: AnalogAxes,
}

impl ReportConfig {
    /// The arcade stick layout: 10 buttons, one hat switch, no analog axes.
    pub const STICK: Self = Self {
        button_count: 10,
        hat_switch_count: 1,
        axes: AnalogAxes::NONE,
    };
}

/// Destination for button and hat changes.
///
/// `press`, `release` and `set_directional` only update the pending report
/// and must be idempotent; `send_report` commits it to the transport. The
/// service runs its own scheduling and is driven from the single control task.
pub trait ReportSink {
    /// Start the service with the given report layout.
    fn begin(&mut self, config: &ReportConfig) -> Result<(), ReportError>;

    /// Stop the service, closing a live connection.
    fn end(&mut self);

    /// Whether a host is connected and reports will be delivered.
    fn is_connected(&self) -> bool;

    fn press(&mut self, button: ButtonId);

    fn release(&mut self, button: ButtonId);

    fn set_directional(&mut self, direction: DirectionalState);

    /// Commit the pending report. Implementations skip the transfer when
    /// nothing changed since the last one.
    fn send_report(&mut self) -> impl Future<Output = Result<(), ReportError>>;
}

/// Pending report with change tracking, for use inside [`ReportSink`] impls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportState {
    report: StickReport,
    dirty: bool,
}

impl ReportState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            report: StickReport::neutral(),
            dirty: false,
        }
    }

    pub fn press(&mut self, button: ButtonId) {
        self.set_button(button, true);
    }

    pub fn release(&mut self, button: ButtonId) {
        self.set_button(button, false);
    }

    fn set_button(&mut self, button: ButtonId, pressed: bool) {
        if self.report.buttons.is_pressed(button) != pressed {
            self.report.buttons.set(button, pressed);
            self.dirty = true;
        }
    }

    pub fn set_directional(&mut self, direction: DirectionalState) {
        if self.report.hat != direction {
            self.report.hat = direction;
            self.dirty = true;
        }
    }

    /// Return to neutral without scheduling a transfer.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// The pending report if it changed since the last call.
    pub fn take_dirty(&mut self) -> Option<StickReport> {
        if self.dirty {
            self.dirty = false;
            Some(self.report)
        } else {
            None
        }
    }

    /// Schedule the current report again, e.g. after a failed transfer.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    #[must_use]
    pub const fn report(&self) -> &StickReport {
        &self.report
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}
