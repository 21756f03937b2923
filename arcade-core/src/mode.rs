//! Operating mode state machine.
//!
//! ```text
//!            boot: mode pin High          boot: mode pin Low
//!                   |                            |
//!                   v       SwitchPressed        v
//!               +--------+ -----------------> +----------+
//!               | Active |                    | Sleeping |
//!               +--------+ <----------------- +----------+
//!                            WakeObserved
//! ```
//!
//! The mode is only ever changed by [`ModeController::handle`]. A hardware
//! wake is delivered as [`ModeEvent::WakeObserved`] once the wait returns.

use core::time::Duration;

use crate::debounce::DigitalInput;
use crate::input::DigitalInputs;
use crate::types::{EdgeEvent, Instant, Level, PinId, Polarity};

/// Mode pin level that selects wireless (Active) operation at boot.
pub const MODE_WIRELESS_LEVEL: Level = Level::High;

/// Mode pin level that wakes the processor from the low-power wait.
pub const WAKE_LEVEL: Level = Level::Low;

/// The mode switch closes to ground; a press is a falling edge.
pub const MODE_SWITCH_POLARITY: Polarity = Polarity::ActiveLow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Report service running, inputs polled.
    Active,
    /// Report service stopped, processor parked.
    Sleeping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeEvent {
    /// Debounced press of the mode switch.
    SwitchPressed,
    /// The low-power wait returned on the wake source.
    WakeObserved,
}

/// Owns the operating mode and the debounced mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    mode: OperatingMode,
    switch: DigitalInput,
}

impl ModeController {
    /// Decide the initial mode from the instantaneous mode pin level.
    ///
    /// No debouncing happens here; the switch filter is seeded with the same
    /// level so that a switch already held at power-on produces no edge.
    #[must_use]
    pub const fn boot(pin: PinId, boot_level: Level, window: Duration, now: Instant) -> Self {
        let mode = if boot_level.is_high() == MODE_WIRELESS_LEVEL.is_high() {
            OperatingMode::Active
        } else {
            OperatingMode::Sleeping
        };
        Self {
            mode,
            switch: DigitalInput::with_level(pin, MODE_SWITCH_POLARITY, window, boot_level, now),
        }
    }

    /// Transition function. Returns the new mode when the event changed it.
    pub fn handle(&mut self, event: ModeEvent) -> Option<OperatingMode> {
        let next = match (self.mode, event) {
            (OperatingMode::Active, ModeEvent::SwitchPressed) => OperatingMode::Sleeping,
            (OperatingMode::Sleeping, ModeEvent::WakeObserved) => OperatingMode::Active,
            _ => return None,
        };
        debug!("Mode {:?} -> {:?} on {:?}", self.mode, next, event);
        self.mode = next;
        Some(next)
    }

    /// Sample the mode switch. A debounced press while Active moves to
    /// Sleeping; nothing else changes the mode here.
    pub fn poll_switch<P: DigitalInputs + ?Sized>(
        &mut self,
        pins: &mut P,
        now: Instant,
    ) -> Option<OperatingMode> {
        if self.mode != OperatingMode::Active {
            return None;
        }
        match self.switch.sample(pins, now) {
            EdgeEvent::Pressed => self.handle(ModeEvent::SwitchPressed),
            EdgeEvent::Released | EdgeEvent::None => None,
        }
    }

    /// Consume a wake and re-seed the switch filter on [`WAKE_LEVEL`].
    ///
    /// The wait returns on the raw edge, so the contact may still be bouncing.
    /// Seeding on the level that caused the wake makes the held press
    /// already-pressed; a bounce is a short glitch and never a second sleep
    /// request.
    pub fn wake(&mut self, now: Instant) -> Option<OperatingMode> {
        self.switch.resync(WAKE_LEVEL, now);
        self.handle(ModeEvent::WakeObserved)
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> OperatingMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn switch_pin(&self) -> PinId {
        self.switch.pin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debounce::MODE_DEBOUNCE;
    use crate::testing::SimBoard;

    const MODE_PIN: PinId = PinId(16);

    fn active() -> (ModeController, SimBoard) {
        let board = SimBoard::new();
        let ctl = ModeController::boot(MODE_PIN, Level::High, MODE_DEBOUNCE, board.now);
        (ctl, board)
    }

    #[test]
    fn test_boot_follows_instantaneous_level() {
        let high = ModeController::boot(MODE_PIN, Level::High, MODE_DEBOUNCE, Instant::ZERO);
        assert_eq!(high.mode(), OperatingMode::Active);

        let low = ModeController::boot(MODE_PIN, Level::Low, MODE_DEBOUNCE, Instant::ZERO);
        assert_eq!(low.mode(), OperatingMode::Sleeping);
    }

    #[test]
    fn test_transition_table() {
        let (mut ctl, _) = active();
        assert_eq!(ctl.handle(ModeEvent::WakeObserved), None);
        assert_eq!(
            ctl.handle(ModeEvent::SwitchPressed),
            Some(OperatingMode::Sleeping)
        );
        assert_eq!(ctl.handle(ModeEvent::SwitchPressed), None);
        assert_eq!(
            ctl.handle(ModeEvent::WakeObserved),
            Some(OperatingMode::Active)
        );
    }

    #[test]
    fn test_bouncy_press_sleeps_exactly_once() {
        let (mut ctl, mut board) = active();
        let mut transitions = 0;

        // 10 ms of bounce, then held low for 60 ms.
        for t in 0..70u64 {
            let level = if t < 10 && t % 2 == 0 {
                Level::High
            } else {
                Level::Low
            };
            board.set_level(MODE_PIN, level);
            board.advance_millis(1);
            let now = board.now;
            if ctl.poll_switch(&mut board, now).is_some() {
                transitions += 1;
            }
        }

        assert_eq!(transitions, 1);
        assert_eq!(ctl.mode(), OperatingMode::Sleeping);
    }

    #[test]
    fn test_short_mode_glitch_is_ignored() {
        let (mut ctl, mut board) = active();
        board.set_level(MODE_PIN, Level::Low);
        for _ in 0..10 {
            board.advance_millis(1);
            let now = board.now;
            assert_eq!(ctl.poll_switch(&mut board, now), None);
        }
        board.set_level(MODE_PIN, Level::High);
        for _ in 0..100 {
            board.advance_millis(1);
            let now = board.now;
            assert_eq!(ctl.poll_switch(&mut board, now), None);
        }
        assert_eq!(ctl.mode(), OperatingMode::Active);
    }

    #[test]
    fn test_wake_reseeds_switch() {
        let boot = ModeController::boot(MODE_PIN, Level::Low, MODE_DEBOUNCE, Instant::ZERO);
        let mut ctl = boot;
        let mut board = SimBoard::new();

        // Wake fires while the switch is still held down.
        board.set_level(MODE_PIN, Level::Low);
        board.advance_millis(1_000);
        let now = board.now;
        assert_eq!(ctl.wake(now), Some(OperatingMode::Active));

        // Holding, then releasing, never re-enters Sleeping.
        for _ in 0..50 {
            board.advance_millis(1);
            let now = board.now;
            assert_eq!(ctl.poll_switch(&mut board, now), None);
        }
        board.set_level(MODE_PIN, Level::High);
        for _ in 0..50 {
            board.advance_millis(1);
            let now = board.now;
            assert_eq!(ctl.poll_switch(&mut board, now), None);
        }

        // The next press does.
        board.set_level(MODE_PIN, Level::Low);
        let mut slept = false;
        for _ in 0..50 {
            board.advance_millis(1);
            let now = board.now;
            slept |= ctl.poll_switch(&mut board, now) == Some(OperatingMode::Sleeping);
        }
        assert!(slept);
    }

    #[test]
    fn test_bounce_at_wake_instant_does_not_sleep_again() {
        let mut ctl = ModeController::boot(MODE_PIN, Level::Low, MODE_DEBOUNCE, Instant::ZERO);
        let mut board = SimBoard::new();

        // The contact bounces high right as the wait returns.
        board.set_level(MODE_PIN, Level::High);
        board.advance_millis(1_000);
        let now = board.now;
        assert_eq!(ctl.wake(now), Some(OperatingMode::Active));

        let now = board.now;
        assert_eq!(ctl.poll_switch(&mut board, now), None);

        // Then settles low and stays held.
        board.set_level(MODE_PIN, Level::Low);
        for _ in 0..100 {
            board.advance_millis(1);
            let now = board.now;
            assert_eq!(ctl.poll_switch(&mut board, now), None);
        }
        assert_eq!(ctl.mode(), OperatingMode::Active);
    }
}
