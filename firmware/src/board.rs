//! Pico board: GPIO sampling, embassy clock, status LED and the low-power wait.

use arcade_core::{
    Clock, DigitalInputs, Instant, Level, LowPowerWait, PinId, Pull, StatusLed, WakeError,
    MODE_DEBOUNCE,
};
use embassy_rp::gpio::{self, Flex, Output};
use embassy_time::Timer;

/// Bank 0 GPIO count on the RP2040.
pub const GPIO_COUNT: usize = 30;

fn to_embassy(duration: core::time::Duration) -> embassy_time::Duration {
    embassy_time::Duration::from_micros(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
}

/// Board implementation over embassy-rp.
///
/// Inputs are attached as [`Flex`] pins so that the pull can be chosen when
/// the controller configures them. A pin that was never attached reads high,
/// the idle level of a pulled-up switch.
pub struct PicoBoard<'d> {
    pins: [Option<Flex<'d>>; GPIO_COUNT],
    led: Output<'d>,
    wake: Option<(PinId, Level)>,
}

impl<'d> PicoBoard<'d> {
    pub fn new(led: Output<'d>) -> Self {
        Self {
            pins: core::array::from_fn(|_| None),
            led,
            wake: None,
        }
    }

    /// Attach the GPIO wired to `id`.
    pub fn attach(&mut self, id: PinId, pin: Flex<'d>) {
        match self.pins.get_mut(id.0 as usize) {
            Some(slot) => *slot = Some(pin),
            None => defmt::warn!("GPIO{} out of range, not attached", id.0),
        }
    }

    fn pin_mut(&mut self, id: PinId) -> Option<&mut Flex<'d>> {
        self.pins.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}

impl DigitalInputs for PicoBoard<'_> {
    fn configure_pin(&mut self, pin: PinId, pull: Pull) {
        let Some(flex) = self.pin_mut(pin) else {
            defmt::warn!("GPIO{} not attached", pin.0);
            return;
        };
        flex.set_as_input();
        flex.set_pull(match pull {
            Pull::None => gpio::Pull::None,
            Pull::Up => gpio::Pull::Up,
            Pull::Down => gpio::Pull::Down,
        });
    }

    fn read_level(&mut self, pin: PinId) -> Level {
        self.pin_mut(pin)
            .map_or(Level::High, |flex| Level::from_high(flex.is_high()))
    }
}

impl Clock for PicoBoard<'_> {
    fn now(&self) -> Instant {
        Instant::from_micros(embassy_time::Instant::now().as_micros())
    }

    async fn delay(&mut self, duration: core::time::Duration) {
        Timer::after(to_embassy(duration)).await;
    }
}

impl StatusLed for PicoBoard<'_> {
    fn set_lit(&mut self, lit: bool) {
        self.led.set_level(gpio::Level::from(lit));
    }
}

impl LowPowerWait for PicoBoard<'_> {
    fn enable_wake_source(&mut self, pin: PinId, level: Level) -> Result<(), WakeError> {
        if self.pin_mut(pin).is_none() {
            return Err(WakeError::UnknownPin);
        }
        self.wake = Some((pin, level));
        Ok(())
    }

    /// Park on the wake pin's edge interrupt.
    ///
    /// The executor sleeps with WFE while nothing is pending. The switch that
    /// requested sleep is usually still held, so the wait first lets it go
    /// back to idle for the mode debounce window before arming on the wake
    /// level.
    async fn enter_wait(&mut self) {
        let Some((id, level)) = self.wake else {
            defmt::warn!("No wake source armed, not parking");
            return;
        };
        let Some(pin) = self.pin_mut(id) else {
            return;
        };

        defmt::flush();
        match level {
            Level::Low => {
                pin.wait_for_high().await;
                Timer::after(to_embassy(MODE_DEBOUNCE)).await;
                pin.wait_for_low().await;
            }
            Level::High => {
                pin.wait_for_low().await;
                Timer::after(to_embassy(MODE_DEBOUNCE)).await;
                pin.wait_for_high().await;
            }
        }
    }
}
