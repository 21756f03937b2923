//! Input aggregation: one pass over every physical control per cycle.

use core::array;
use core::time::Duration;

use crate::debounce::DigitalInput;
use crate::input::DigitalInputs;
use crate::output::ReportSink;
use crate::types::{ButtonId, DirectionalState, EdgeEvent, Instant, PinId, Polarity};

/// Pins of the four directional switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DirectionPins {
    pub up: PinId,
    pub down: PinId,
    pub left: PinId,
    pub right: PinId,
}

impl DirectionPins {
    #[must_use]
    pub const fn as_array(&self) -> [PinId; 4] {
        [self.up, self.down, self.left, self.right]
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot<const N: usize> {
    /// Edge per button slot; slot `i` is HID Button `i + 1`.
    pub edges: [EdgeEvent; N],
    pub direction: DirectionalState,
}

impl<const N: usize> InputSnapshot<N> {
    /// True when no button changed.
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.edges.iter().all(|e| e.is_none())
    }
}

/// Debounces `N` buttons and four directional switches.
///
/// All switches are active-low (closed to ground, pulled up).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAggregator<const N: usize> {
    buttons: [DigitalInput; N],
    directions: [DigitalInput; 4],
    direction: DirectionalState,
}

impl<const N: usize> InputAggregator<N> {
    const FITS_BUTTON_FIELD: () = assert!(N <= ButtonId::MAX as usize);

    /// Build the aggregator with every input released as of `now`.
    #[must_use]
    pub fn new(
        button_pins: [PinId; N],
        direction_pins: DirectionPins,
        window: Duration,
        now: Instant,
    ) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS_BUTTON_FIELD;

        let input = |pin| DigitalInput::new(pin, Polarity::ActiveLow, window, now);
        let dirs = direction_pins.as_array();
        Self {
            buttons: array::from_fn(|i| input(button_pins[i])),
            directions: array::from_fn(|i| input(dirs[i])),
            direction: DirectionalState::Centered,
        }
    }

    /// Sample and debounce every control without touching the sink.
    pub fn sample<P: DigitalInputs + ?Sized>(&mut self, pins: &mut P, now: Instant) -> InputSnapshot<N> {
        let edges = array::from_fn(|i| self.buttons[i].sample(pins, now));

        for dir in self.directions.iter_mut() {
            dir.sample(pins, now);
        }
        let [up, down, left, right] = self.directions.each_ref().map(DigitalInput::is_pressed);
        self.direction = DirectionalState::from_switches(up, down, left, right);

        InputSnapshot {
            edges,
            direction: self.direction,
        }
    }

    /// Sample every control and forward the changes to `sink`.
    ///
    /// Button edges become `press`/`release` calls; the direction is set on
    /// every poll.
    pub fn poll<P, S>(&mut self, pins: &mut P, now: Instant, sink: &mut S) -> InputSnapshot<N>
    where
        P: DigitalInputs + ?Sized,
        S: ReportSink,
    {
        let snapshot = self.sample(pins, now);

        for (i, edge) in snapshot.edges.iter().enumerate() {
            let button = ButtonId::from_index(i);
            match edge {
                EdgeEvent::Pressed => {
                    trace!("Button {} pressed", button.get());
                    sink.press(button);
                }
                EdgeEvent::Released => {
                    trace!("Button {} released", button.get());
                    sink.release(button);
                }
                EdgeEvent::None => {}
            }
        }
        sink.set_directional(snapshot.direction);

        snapshot
    }

    /// Settle every input on released as of `now`.
    ///
    /// A switch still held afterwards is reported as a fresh press once it
    /// has been stable for the window.
    pub fn reset(&mut self, now: Instant) {
        for input in self.buttons.iter_mut().chain(self.directions.iter_mut()) {
            input.release(now);
        }
        self.direction = DirectionalState::Centered;
    }

    /// Release everything that is pressed in `sink`, center the stick and
    /// [`reset`](Self::reset) the filters.
    pub fn release_all<S: ReportSink>(&mut self, now: Instant, sink: &mut S) {
        for (i, input) in self.buttons.iter().enumerate() {
            if input.is_pressed() {
                sink.release(ButtonId::from_index(i));
            }
        }
        sink.set_directional(DirectionalState::Centered);
        self.reset(now);
    }

    /// Direction computed by the last poll.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> DirectionalState {
        self.direction
    }

    /// Debounced state of button slot `index`.
    #[must_use]
    pub fn is_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(DigitalInput::is_pressed)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::debounce::BUTTON_DEBOUNCE;
    use crate::testing::{RecordingSink, SimBoard};
    use crate::types::Level;

    const BUTTONS: [PinId; 3] = [PinId(2), PinId(3), PinId(4)];
    const DIRS: DirectionPins = DirectionPins {
        up: PinId(12),
        down: PinId(13),
        left: PinId(14),
        right: PinId(15),
    };

    fn setup() -> (InputAggregator<3>, SimBoard, RecordingSink) {
        let board = SimBoard::new();
        let aggregator = InputAggregator::new(BUTTONS, DIRS, BUTTON_DEBOUNCE, board.now);
        (aggregator, board, RecordingSink::connected())
    }

    /// Poll once per millisecond for `millis` milliseconds.
    fn poll_for(
        aggregator: &mut InputAggregator<3>,
        board: &mut SimBoard,
        sink: &mut RecordingSink,
        millis: u64,
    ) -> std::vec::Vec<InputSnapshot<3>> {
        (0..millis)
            .map(|_| {
                board.advance_millis(1);
                let now = board.now;
                aggregator.poll(board, now, sink)
            })
            .collect()
    }

    #[test]
    fn test_held_button_presses_once_then_releases_once() {
        let (mut agg, mut board, mut sink) = setup();

        board.set_level(PinId(3), Level::Low);
        poll_for(&mut agg, &mut board, &mut sink, 20);
        assert_eq!(sink.presses, [ButtonId::new(2).unwrap()]);
        assert!(sink.releases.is_empty());
        assert!(agg.is_pressed(1));

        board.set_level(PinId(3), Level::High);
        poll_for(&mut agg, &mut board, &mut sink, 20);
        assert_eq!(sink.presses.len(), 1);
        assert_eq!(sink.releases, [ButtonId::new(2).unwrap()]);
    }

    #[test]
    fn test_idle_polls_are_quiet() {
        let (mut agg, mut board, mut sink) = setup();
        board.set_level(PinId(12), Level::Low);
        poll_for(&mut agg, &mut board, &mut sink, 10);

        let snapshots = poll_for(&mut agg, &mut board, &mut sink, 2);
        assert!(snapshots.iter().all(InputSnapshot::is_quiet));
        assert_eq!(snapshots[0].direction, DirectionalState::Up);
        assert_eq!(snapshots[0].direction, snapshots[1].direction);
    }

    #[test]
    fn test_up_left_diagonal() {
        let (mut agg, mut board, mut sink) = setup();
        board.set_level(DIRS.up, Level::Low);
        board.set_level(DIRS.left, Level::Low);
        poll_for(&mut agg, &mut board, &mut sink, 10);
        assert_eq!(agg.direction(), DirectionalState::UpLeft);
        assert_eq!(sink.directions.last(), Some(&DirectionalState::UpLeft));
    }

    #[test]
    fn test_up_and_down_resolves_to_up() {
        let (mut agg, mut board, mut sink) = setup();
        board.set_level(DIRS.up, Level::Low);
        board.set_level(DIRS.down, Level::Low);
        poll_for(&mut agg, &mut board, &mut sink, 10);
        assert_eq!(agg.direction(), DirectionalState::Up);
    }

    #[test]
    fn test_direction_waits_for_debounce() {
        let (mut agg, mut board, mut sink) = setup();
        board.set_level(DIRS.right, Level::Low);
        let snapshots = poll_for(&mut agg, &mut board, &mut sink, 3);
        assert!(snapshots
            .iter()
            .all(|s| s.direction == DirectionalState::Centered));
    }

    #[test]
    fn test_release_all_releases_pressed_buttons() {
        let (mut agg, mut board, mut sink) = setup();
        board.set_level(PinId(2), Level::Low);
        board.set_level(DIRS.down, Level::Low);
        poll_for(&mut agg, &mut board, &mut sink, 10);

        let now = board.now;
        agg.release_all(now, &mut sink);
        assert_eq!(sink.releases, [ButtonId::new(1).unwrap()]);
        assert_eq!(sink.directions.last(), Some(&DirectionalState::Centered));
        assert!(!agg.is_pressed(0));
        assert_eq!(agg.direction(), DirectionalState::Centered);

        // Still held: re-pressed after the window.
        poll_for(&mut agg, &mut board, &mut sink, 10);
        assert_eq!(sink.presses.len(), 2);
    }
}
