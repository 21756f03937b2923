//! Stick configuration: pin map, timing, and user-facing labels.

use core::time::Duration;

use crate::aggregator::DirectionPins;
use crate::board::WakeError;
use crate::debounce::{BUTTON_DEBOUNCE, MODE_DEBOUNCE};
use crate::status::BLINK_INTERVAL;
use crate::types::PinId;

/// Number of physical buttons: 8 action buttons, Start and Select.
pub const BUTTON_COUNT: usize = 10;

/// Default delay at the end of every Active cycle.
///
/// Gives the transport's own tasks processor time. Zero disables the delay
/// for the lowest latency.
pub const LOOP_DELAY: Duration = Duration::from_millis(1);

/// Error type for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The same GPIO is assigned to two functions.
    DuplicatePin(PinId),
    /// The board refused the mode pin as a wake source.
    WakeSource(WakeError),
}

impl From<WakeError> for ConfigError {
    fn from(err: WakeError) -> Self {
        ConfigError::WakeSource(err)
    }
}

/// GPIO assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMap {
    /// Button slots in HID order: Button 1..8 are the action buttons,
    /// Button 9 is Start, Button 10 is Select.
    pub buttons: [PinId; BUTTON_COUNT],
    pub directions: DirectionPins,
    /// Wired/wireless mode switch, also the wake source.
    pub mode: PinId,
    pub led: PinId,
}

impl PinMap {
    /// Raspberry Pi Pico wiring: buttons on GP2..GP11, stick on GP12..GP15,
    /// mode switch on GP16, on-board LED on GP25.
    pub const PICO: Self = Self {
        buttons: [
            PinId(2),
            PinId(3),
            PinId(4),
            PinId(5),
            PinId(6),
            PinId(7),
            PinId(8),
            PinId(9),
            PinId(10),
            PinId(11),
        ],
        directions: DirectionPins {
            up: PinId(12),
            down: PinId(13),
            left: PinId(14),
            right: PinId(15),
        },
        mode: PinId(16),
        led: PinId(25),
    };

    /// Every input pin: buttons, directions, then the mode switch.
    pub fn inputs(&self) -> impl Iterator<Item = PinId> + Clone + '_ {
        self.buttons
            .iter()
            .copied()
            .chain(self.directions.as_array())
            .chain(core::iter::once(self.mode))
    }

    /// Reject a GPIO used for more than one function.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = self.inputs().chain(core::iter::once(self.led));
        for (i, pin) in all.clone().enumerate() {
            if all.clone().skip(i + 1).any(|other| other == pin) {
                return Err(ConfigError::DuplicatePin(pin));
            }
        }
        Ok(())
    }
}

/// Language of the device name and log messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Locale {
    #[default]
    English,
    Spanish,
}

/// User-facing strings for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub device_name: &'static str,
    pub manufacturer: &'static str,
    pub banner: &'static str,
    pub mode_wireless: &'static str,
    pub mode_wired: &'static str,
    pub starting_service: &'static str,
    pub stopping_service: &'static str,
    pub entering_sleep: &'static str,
    pub waking: &'static str,
}

const ENGLISH: Labels = Labels {
    device_name: "ArcadeStick",
    manufacturer: "MatMont01",
    banner: "Hybrid Arcade Stick - Firmware v1.0",
    mode_wireless: "Current mode: WIRELESS.",
    mode_wired: "Current mode: WIRED.",
    starting_service: "Starting report service. Waiting for connection...",
    stopping_service: "Stopping report service.",
    entering_sleep: "Entering low-power mode. Press the mode button to wake up.",
    waking: "Waking up from low-power mode!",
};

const SPANISH: Labels = Labels {
    device_name: "PalancaArcade",
    manufacturer: "MatMont01",
    banner: "Palanca Arcade Hibrida - Firmware v1.0",
    mode_wireless: "Modo actual: INALAMBRICO.",
    mode_wired: "Modo actual: CABLEADO.",
    starting_service: "Iniciando servicio de reportes. Buscando conexion...",
    stopping_service: "Deteniendo servicio de reportes.",
    entering_sleep: "Entrando en modo de bajo consumo. Presione el boton de modo para despertar.",
    waking: "Despertando del modo de bajo consumo!",
};

impl Locale {
    #[must_use]
    pub const fn labels(self) -> &'static Labels {
        match self {
            Locale::English => &ENGLISH,
            Locale::Spanish => &SPANISH,
        }
    }
}

/// Complete stick configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickConfig {
    pub pins: PinMap,
    /// Stabilization window for buttons and the stick.
    pub button_debounce: Duration,
    /// Stabilization window for the mode switch.
    pub mode_debounce: Duration,
    /// Delay after each Active cycle; zero for none.
    pub loop_delay: Duration,
    pub blink_interval: Duration,
    pub locale: Locale,
}

impl StickConfig {
    pub const DEFAULT: Self = Self {
        pins: PinMap::PICO,
        button_debounce: BUTTON_DEBOUNCE,
        mode_debounce: MODE_DEBOUNCE,
        loop_delay: LOOP_DELAY,
        blink_interval: BLINK_INTERVAL,
        locale: Locale::English,
    };

    #[must_use]
    pub const fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub const fn with_loop_delay(mut self, delay: Duration) -> Self {
        self.loop_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_pins(mut self, pins: PinMap) -> Self {
        self.pins = pins;
        self
    }

    #[must_use]
    pub const fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pins.validate()
    }
}

impl Default for StickConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
