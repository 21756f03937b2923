//! Core stick types: pins, levels, time, buttons, directions and the report.

use core::ops::{Add, AddAssign};
use core::time::Duration;

/// Board GPIO number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

/// Electrical level of a digital pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    #[inline]
    #[must_use]
    pub const fn from_high(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_high(self) -> bool {
        matches!(self, Level::High)
    }

    #[inline]
    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Level::Low)
    }
}

/// Which electrical level counts as "asserted" (pressed) for an input.
///
/// Switches wired to ground with a pull-up are [`Polarity::ActiveLow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveLow,
    ActiveHigh,
}

impl Polarity {
    /// Convert an electrical level into a logical pressed/released value.
    #[inline]
    #[must_use]
    pub const fn is_asserted(self, level: Level) -> bool {
        match self {
            Polarity::ActiveLow => level.is_low(),
            Polarity::ActiveHigh => level.is_high(),
        }
    }

    /// Level read while the input is released.
    #[inline]
    #[must_use]
    pub const fn idle_level(self) -> Level {
        match self {
            Polarity::ActiveLow => Level::High,
            Polarity::ActiveHigh => Level::Low,
        }
    }
}

/// Monotonic timestamp in microseconds since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Instant(u64);

impl Instant {
    pub const ZERO: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis.saturating_mul(1_000))
    }

    #[inline]
    #[must_use]
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Instant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Self::Output {
        let micros = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        Instant(self.0.saturating_add(micros))
    }
}

impl AddAssign<Duration> for Instant {
    fn add_assign(&mut self, rhs: Duration) {
        *self = *self + rhs;
    }
}

/// Edge reported by a debounced input for one poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeEvent {
    /// The input became asserted.
    Pressed,
    /// The input returned to its idle level.
    Released,
    /// No observable change since the previous poll.
    #[default]
    None,
}

impl EdgeEvent {
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, EdgeEvent::None)
    }
}

/// HID button usage, 1-based (Button 1..=16).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(u8);

impl ButtonId {
    pub const MAX: u8 = 16;

    /// Button usage `n`, if it fits the 16-bit button field.
    #[must_use]
    pub const fn new(n: u8) -> Option<Self> {
        if n >= 1 && n <= Self::MAX {
            Some(Self(n))
        } else {
            None
        }
    }

    /// Button for a 0-based slot index. Callers guarantee `index < 16`.
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u8 + 1)
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Bit for this button in a [`Buttons`] field.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> Buttons {
        Buttons(1 << (self.0 - 1))
    }
}

/// Pressed buttons as a bitfield, bit 0 = Button 1.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Buttons(pub u16);

impl Buttons {
    /// No buttons pressed.
    pub const NONE: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Buttons) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(self, button: ButtonId) -> bool {
        self.contains(button.mask())
    }

    #[inline]
    pub fn set(&mut self, button: ButtonId, pressed: bool) {
        if pressed {
            self.0 |= button.mask().0;
        } else {
            self.0 &= !button.mask().0;
        }
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// 8-way stick position plus centered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DirectionalState {
    #[default]
    Centered,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl DirectionalState {
    /// All nine values, in hat order.
    pub const ALL: [Self; 9] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
        Self::Centered,
    ];

    /// HID null value used for [`DirectionalState::Centered`].
    pub const HAT_NULL: u8 = 8;

    /// Resolve four independent switches into one direction.
    ///
    /// Up wins over Down and Left wins over Right; the horizontal axis is
    /// combined with whichever vertical direction is active.
    #[must_use]
    pub const fn from_switches(up: bool, down: bool, left: bool, right: bool) -> Self {
        if up {
            if left {
                Self::UpLeft
            } else if right {
                Self::UpRight
            } else {
                Self::Up
            }
        } else if down {
            if left {
                Self::DownLeft
            } else if right {
                Self::DownRight
            } else {
                Self::Down
            }
        } else if left {
            Self::Left
        } else if right {
            Self::Right
        } else {
            Self::Centered
        }
    }

    /// Hat switch value: 0 = Up, clockwise to 7 = UpLeft, 8 = centered (null).
    #[must_use]
    pub const fn hat_value(self) -> u8 {
        match self {
            Self::Up => 0,
            Self::UpRight => 1,
            Self::Right => 2,
            Self::DownRight => 3,
            Self::Down => 4,
            Self::DownLeft => 5,
            Self::Left => 6,
            Self::UpLeft => 7,
            Self::Centered => Self::HAT_NULL,
        }
    }
}

/// One gamepad report: button bitmap plus hat switch.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StickReport {
    pub buttons: Buttons,
    pub hat: DirectionalState,
}

impl StickReport {
    /// Size of the wire form in bytes.
    pub const SIZE: usize = 3;

    /// No buttons pressed, stick centered.
    #[must_use]
    pub const fn neutral() -> Self {
        Self {
            buttons: Buttons::NONE,
            hat: DirectionalState::Centered,
        }
    }

    /// Wire form: `[buttons_lo, buttons_hi, hat]`.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let [lo, hi] = self.buttons.raw().to_le_bytes();
        [lo, hi, self.hat.hat_value() & 0x0F]
    }
}
