//! Simulated board and recording sink shared by the unit tests.

extern crate std;

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use core::time::Duration;
use std::vec::Vec;

use crate::board::{Clock, LowPowerWait, StatusLed, WakeError};
use crate::input::{DigitalInputs, Pull};
use crate::output::{ReportConfig, ReportError, ReportSink, ReportState};
use crate::types::{ButtonId, DirectionalState, Instant, Level, PinId, StickReport};

const GPIO_COUNT: usize = 32;

/// Board whose pins, clock and wake source are driven by the test.
pub struct SimBoard {
    pub levels: [Level; GPIO_COUNT],
    pub now: Instant,
    pub lit: bool,
    pub led_history: Vec<bool>,
    pub configured: Vec<(PinId, Pull)>,
    pub wake_source: Option<(PinId, Level)>,
    pub reject_wake: Option<WakeError>,
    pub waits: usize,
    pub delays: Vec<Duration>,
    /// Simulated time spent parked per wait.
    pub sleep_time: Duration,
    /// Level left on the wake pin when the wait returns; the wake level if
    /// `None`. Models contact bounce at the wake instant.
    pub level_at_wake: Option<Level>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            levels: [Level::High; GPIO_COUNT],
            now: Instant::ZERO,
            lit: false,
            led_history: Vec::new(),
            configured: Vec::new(),
            wake_source: None,
            reject_wake: None,
            waits: 0,
            delays: Vec::new(),
            sleep_time: Duration::from_secs(1),
            level_at_wake: None,
        }
    }

    pub fn set_level(&mut self, pin: PinId, level: Level) {
        self.levels[pin.0 as usize] = level;
    }

    pub fn advance_millis(&mut self, millis: u64) {
        self.now += Duration::from_millis(millis);
    }
}

impl DigitalInputs for SimBoard {
    fn configure_pin(&mut self, pin: PinId, pull: Pull) {
        self.configured.push((pin, pull));
    }

    fn read_level(&mut self, pin: PinId) -> Level {
        self.levels
            .get(pin.0 as usize)
            .copied()
            .unwrap_or(Level::High)
    }
}

impl Clock for SimBoard {
    fn now(&self) -> Instant {
        self.now
    }

    async fn delay(&mut self, duration: Duration) {
        self.delays.push(duration);
        self.now += duration;
    }
}

impl StatusLed for SimBoard {
    fn set_lit(&mut self, lit: bool) {
        self.lit = lit;
        self.led_history.push(lit);
    }
}

impl LowPowerWait for SimBoard {
    fn enable_wake_source(&mut self, pin: PinId, level: Level) -> Result<(), WakeError> {
        if let Some(err) = self.reject_wake {
            return Err(err);
        }
        self.wake_source = Some((pin, level));
        Ok(())
    }

    /// Parks for `sleep_time`, then wakes with the wake pin at its wake level
    /// (or at `level_at_wake`).
    ///
    /// Wakes on the level alone. The release-then-press arming of the Pico
    /// board's wait is not modelled here, so the controller tests start each
    /// wake with the switch already pressed.
    async fn enter_wait(&mut self) {
        self.waits += 1;
        self.now += self.sleep_time;
        if let Some((pin, level)) = self.wake_source {
            self.set_level(pin, self.level_at_wake.unwrap_or(level));
        }
    }
}

/// Report sink that records every call.
pub struct RecordingSink {
    pub begins: usize,
    pub ends: usize,
    pub started: bool,
    /// Host side of the link; `is_connected` also requires `started`.
    pub link_up: bool,
    pub begin_result: Result<(), ReportError>,
    pub presses: Vec<ButtonId>,
    pub releases: Vec<ButtonId>,
    pub directions: Vec<DirectionalState>,
    pub sent: Vec<StickReport>,
    state: ReportState,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            begins: 0,
            ends: 0,
            started: false,
            link_up: true,
            begin_result: Ok(()),
            presses: Vec::new(),
            releases: Vec::new(),
            directions: Vec::new(),
            sent: Vec::new(),
            state: ReportState::new(),
        }
    }

    /// Already started with a host attached.
    pub fn connected() -> Self {
        Self {
            started: true,
            ..Self::new()
        }
    }
}

impl ReportSink for RecordingSink {
    fn begin(&mut self, _config: &ReportConfig) -> Result<(), ReportError> {
        self.begins += 1;
        self.begin_result?;
        self.started = true;
        self.state.clear();
        Ok(())
    }

    fn end(&mut self) {
        self.ends += 1;
        self.started = false;
    }

    fn is_connected(&self) -> bool {
        self.started && self.link_up
    }

    fn press(&mut self, button: ButtonId) {
        self.presses.push(button);
        self.state.press(button);
    }

    fn release(&mut self, button: ButtonId) {
        self.releases.push(button);
        self.state.release(button);
    }

    fn set_directional(&mut self, direction: DirectionalState) {
        self.directions.push(direction);
        self.state.set_directional(direction);
    }

    async fn send_report(&mut self) -> Result<(), ReportError> {
        if !self.started {
            return Err(ReportError::NotStarted);
        }
        if let Some(report) = self.state.take_dirty() {
            self.sent.push(report);
        }
        Ok(())
    }
}

/// Run a future that never returns `Pending` to completion.
pub fn block_on<F: Future>(mut f: F) -> F::Output {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);

    // SAFETY: `f` is not moved after pinning
    let mut f = unsafe { Pin::new_unchecked(&mut f) };

    match f.as_mut().poll(&mut cx) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("Simulated future returned Pending unexpectedly"),
    }
}
