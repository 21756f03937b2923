//! StickController: owns the mode machine, the inputs and the report sink,
//! and runs the poll cycle.

use crate::aggregator::InputAggregator;
use crate::board::Board;
use crate::config::{ConfigError, Labels, StickConfig, BUTTON_COUNT};
use crate::input::Pull;
use crate::mode::{ModeController, OperatingMode, WAKE_LEVEL};
use crate::output::{ReportConfig, ReportSink};
use crate::status::{IndicatorPattern, StatusIndicator};

/// What a single cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleOutcome {
    /// Active cycle; inputs were forwarded only if `connected`.
    Active { connected: bool },
    /// The mode switch was pressed; the service is stopped and the next
    /// cycle parks.
    EnteredSleep,
    /// Parked, woke up, and restarted the service.
    Woke,
}

/// The arcade stick.
///
/// Single owner of all control state. One [`run_cycle`](Self::run_cycle)
/// runs to completion before the next; the only place it suspends for long
/// is the low-power wait while Sleeping.
///
/// # Error Handling
///
/// A disconnected host skips forwarding for the cycle. A failed service
/// start is logged and leaves the stick Active and unconnected, retrying the
/// connection check every cycle while the LED blinks.
pub struct StickController<B, S> {
    board: B,
    sink: S,
    config: StickConfig,
    mode: ModeController,
    inputs: InputAggregator<BUTTON_COUNT>,
    indicator: StatusIndicator,
}

impl<B: Board, S: ReportSink> StickController<B, S> {
    /// Validate `config`, configure every input with a pull-up, arm the wake
    /// source and read the boot-time mode.
    pub fn new(mut board: B, sink: S, config: StickConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        for pin in config.pins.inputs() {
            board.configure_pin(pin, Pull::Up);
        }
        board.enable_wake_source(config.pins.mode, WAKE_LEVEL)?;

        let now = board.now();
        let boot_level = board.read_level(config.pins.mode);
        let mode = ModeController::boot(config.pins.mode, boot_level, config.mode_debounce, now);
        let inputs = InputAggregator::new(
            config.pins.buttons,
            config.pins.directions,
            config.button_debounce,
            now,
        );

        Ok(Self {
            board,
            sink,
            config,
            mode,
            inputs,
            indicator: StatusIndicator::new(config.blink_interval, now),
        })
    }

    /// Apply the boot-time mode: start the service when Active, make sure it
    /// is stopped when Sleeping.
    pub async fn boot(&mut self) {
        info!("{}", self.labels().banner);
        match self.mode.mode() {
            OperatingMode::Active => self.start_service(),
            OperatingMode::Sleeping => self.stop_service().await,
        }
    }

    /// Boot, then cycle forever.
    ///
    /// This method never returns.
    pub async fn run(&mut self) -> ! {
        self.boot().await;
        loop {
            self.run_cycle().await;
        }
    }

    /// Run one cycle in the current mode.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.mode.mode() {
            OperatingMode::Active => self.active_cycle().await,
            OperatingMode::Sleeping => self.sleep_cycle().await,
        }
    }

    async fn active_cycle(&mut self) -> CycleOutcome {
        let now = self.board.now();

        // Mode check first, so a sleep request never sends another report.
        if self.mode.poll_switch(&mut self.board, now) == Some(OperatingMode::Sleeping) {
            self.stop_service().await;
            return CycleOutcome::EnteredSleep;
        }

        let connected = self.sink.is_connected();
        if connected {
            self.inputs.poll(&mut self.board, now, &mut self.sink);
            if let Err(e) = self.sink.send_report().await {
                warn!("Report not sent: {:?}", e);
            }
        }

        let lit = self.indicator.update(connected, now);
        self.board.set_lit(lit);

        if !self.config.loop_delay.is_zero() {
            self.board.delay(self.config.loop_delay).await;
        }

        CycleOutcome::Active { connected }
    }

    async fn sleep_cycle(&mut self) -> CycleOutcome {
        self.indicator.force_off();
        self.board.set_lit(false);
        info!("{}", self.labels().entering_sleep);

        self.board.enter_wait().await;

        let now = self.board.now();
        info!("{}", self.labels().waking);
        self.mode.wake(now);
        self.inputs.reset(now);
        self.start_service();
        CycleOutcome::Woke
    }

    fn start_service(&mut self) {
        let labels = self.labels();
        info!("{}", labels.mode_wireless);
        info!("{}", labels.starting_service);
        if let Err(e) = self.sink.begin(&ReportConfig::STICK) {
            warn!("Report service failed to start: {:?}", e);
        }
    }

    async fn stop_service(&mut self) {
        let labels = self.labels();
        info!("{}", labels.mode_wired);
        info!("{}", labels.stopping_service);

        // Leave the host with a neutral report before the link goes away.
        if self.sink.is_connected() {
            let now = self.board.now();
            self.inputs.release_all(now, &mut self.sink);
            if let Err(e) = self.sink.send_report().await {
                warn!("Neutral report not sent: {:?}", e);
            }
        }
        self.sink.end();
    }

    fn labels(&self) -> &'static Labels {
        self.config.labels()
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> OperatingMode {
        self.mode.mode()
    }

    /// Current LED pattern.
    #[must_use]
    pub fn indicator_pattern(&self) -> IndicatorPattern {
        IndicatorPattern::for_state(self.mode.mode(), self.sink.is_connected())
    }

    #[must_use]
    pub fn config(&self) -> &StickConfig {
        &self.config
    }

    /// Get a reference to the board.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// Get a mutable reference to the board.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Get a reference to the report sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get a mutable reference to the report sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decompose the controller into its board and sink.
    pub fn into_parts(self) -> (B, S) {
        (self.board, self.sink)
    }
}
