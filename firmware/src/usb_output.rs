//! USB HID report service.

use arcade_core::{
    ButtonId, DirectionalState, ReportConfig, ReportError, ReportSink, ReportState, StickReport,
    BUTTON_COUNT,
};
use defmt::{debug, info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::{HidWriter, State};
use embassy_usb::{Builder, Handler};
use portable_atomic::{AtomicBool, Ordering};

/// Size of one input report on the wire.
pub const REPORT_SIZE: usize = StickReport::SIZE;

pub type UsbDriver<'d> = Driver<'d, USB>;

/// Arcade stick HID Report Descriptor.
///
/// This descriptor defines a gamepad with:
/// - 10 buttons (8 action buttons, Start, Select)
/// - 1 hat switch (0 = Up, clockwise, 8 = centered / null state)
/// - no analog axes
pub const REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x05, // Usage (Gamepad)
    0xA1, 0x01, // Collection (Application)
    //
    // --- Buttons (10 buttons) ---
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x0A, //   Usage Maximum (Button 10)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x95, 0x0A, //   Report Count (10)
    0x75, 0x01, //   Report Size (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x06, //   Report Size (6)
    0x81, 0x03, //   Input (Constant) - padding
    //
    // --- Hat switch ---
    0x05, 0x01, //   Usage Page (Generic Desktop)
    0x09, 0x39, //   Usage (Hat switch)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x07, //   Logical Maximum (7)
    0x35, 0x00, //   Physical Minimum (0)
    0x46, 0x3B, 0x01, //   Physical Maximum (315)
    0x65, 0x14, //   Unit (Degrees)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x04, //   Report Size (4)
    0x81, 0x42, //   Input (Data, Variable, Absolute, Null State)
    0x65, 0x00, //   Unit (None)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x04, //   Report Size (4)
    0x81, 0x03, //   Input (Constant) - padding
    //
    0xC0, // End Collection
];

/// Host has configured the device and the bus is not suspended.
static LINK_UP: AtomicBool = AtomicBool::new(false);

fn link_up() -> bool {
    LINK_UP.load(Ordering::Acquire)
}

/// USB device state handler.
///
/// Tracks enumeration and suspend so that the control task can tell whether
/// a host is listening.
#[derive(Default)]
pub struct UsbLinkHandler {
    configured: bool,
    suspended: bool,
}

impl UsbLinkHandler {
    pub const fn new() -> Self {
        Self {
            configured: false,
            suspended: false,
        }
    }

    fn publish(&self) {
        LINK_UP.store(self.configured && !self.suspended, Ordering::Release);
    }
}

impl Handler for UsbLinkHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            self.configured = false;
            self.publish();
        }
    }

    fn reset(&mut self) {
        self.configured = false;
        self.suspended = false;
        self.publish();
    }

    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
        self.configured = configured;
        self.publish();
    }

    fn suspended(&mut self, suspended: bool) {
        debug!("USB suspended: {}", suspended);
        self.suspended = suspended;
        self.publish();
    }
}

/// USB HID report service.
///
/// Wraps an embassy-usb HID writer. The USB stack itself keeps running in its
/// own task; `begin`/`end` gate whether this service forwards reports.
pub struct UsbReportService<'d> {
    writer: HidWriter<'d, UsbDriver<'d>, REPORT_SIZE>,
    state: ReportState,
    started: bool,
}

impl<'d> UsbReportService<'d> {
    /// Create a new report service from the given HID writer.
    pub fn new(writer: HidWriter<'d, UsbDriver<'d>, REPORT_SIZE>) -> Self {
        Self {
            writer,
            state: ReportState::new(),
            started: false,
        }
    }
}

impl ReportSink for UsbReportService<'_> {
    fn begin(&mut self, config: &ReportConfig) -> Result<(), ReportError> {
        let fits = config.axes.is_empty()
            && config.hat_switch_count <= 1
            && usize::from(config.button_count) <= BUTTON_COUNT;
        if !fits {
            return Err(ReportError::UnsupportedLayout);
        }
        self.started = true;
        // Greet the host with a neutral report.
        self.state.clear();
        self.state.mark_dirty();
        Ok(())
    }

    fn end(&mut self) {
        self.started = false;
        self.state.clear();
    }

    fn is_connected(&self) -> bool {
        self.started && link_up()
    }

    fn press(&mut self, button: ButtonId) {
        self.state.press(button);
    }

    fn release(&mut self, button: ButtonId) {
        self.state.release(button);
    }

    fn set_directional(&mut self, direction: DirectionalState) {
        self.state.set_directional(direction);
    }

    async fn send_report(&mut self) -> Result<(), ReportError> {
        if !self.started {
            return Err(ReportError::NotStarted);
        }
        if !link_up() {
            return Err(ReportError::NotReady);
        }
        let Some(report) = self.state.take_dirty() else {
            return Ok(());
        };

        if let Err(e) = self.writer.write(&report.to_bytes()).await {
            warn!("HID write failed: {:?}", e);
            self.state.mark_dirty();
            return Err(ReportError::Io);
        }
        Ok(())
    }
}

/// Configure the USB HID class in the USB builder.
///
/// Returns the HID writer for use by the application.
pub fn configure_usb_hid<'d>(
    builder: &mut Builder<'d, UsbDriver<'d>>,
    state: &'d mut State<'d>,
) -> HidWriter<'d, UsbDriver<'d>, REPORT_SIZE> {
    let config = embassy_usb::class::hid::Config {
        report_descriptor: REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 1,
        max_packet_size: 8,
        hid_subclass: embassy_usb::class::hid::HidSubclass::No,
        hid_boot_protocol: embassy_usb::class::hid::HidBootProtocol::None,
    };

    HidWriter::new(builder, state, config)
}
