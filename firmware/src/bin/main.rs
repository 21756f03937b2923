#![no_std]
#![no_main]

use arcade_core::PinId;
use arcade_stick::{
    configure_usb_hid, stick_config, PicoBoard, StickController, UsbLinkHandler, UsbReportService,
};
use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Flex, Level, Output};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

type Stick = StickController<PicoBoard<'static>, UsbReportService<'static>>;

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();

/// USB link state handler.
static LINK_HANDLER: StaticCell<UsbLinkHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let config = stick_config();
    let labels = config.labels();
    info!("{} starting...", labels.device_name);

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- Board Setup (GPIO numbers match PinMap::PICO) ---
    let mut board = PicoBoard::new(Output::new(p.PIN_25, Level::Low));
    board.attach(PinId(2), Flex::new(p.PIN_2));
    board.attach(PinId(3), Flex::new(p.PIN_3));
    board.attach(PinId(4), Flex::new(p.PIN_4));
    board.attach(PinId(5), Flex::new(p.PIN_5));
    board.attach(PinId(6), Flex::new(p.PIN_6));
    board.attach(PinId(7), Flex::new(p.PIN_7));
    board.attach(PinId(8), Flex::new(p.PIN_8));
    board.attach(PinId(9), Flex::new(p.PIN_9));
    board.attach(PinId(10), Flex::new(p.PIN_10));
    board.attach(PinId(11), Flex::new(p.PIN_11));
    board.attach(PinId(12), Flex::new(p.PIN_12));
    board.attach(PinId(13), Flex::new(p.PIN_13));
    board.attach(PinId(14), Flex::new(p.PIN_14));
    board.attach(PinId(15), Flex::new(p.PIN_15));
    board.attach(PinId(16), Flex::new(p.PIN_16));

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let mut usb_config = UsbConfig::new(0x1209, 0x0001); // pid.codes test VID/PID
    usb_config.manufacturer = Some(labels.manufacturer);
    usb_config.product = Some(labels.device_name);
    usb_config.serial_number = Some("001");
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );
    builder.handler(LINK_HANDLER.init(UsbLinkHandler::new()));

    // Configure HID class
    let hid_state = HID_STATE.init(State::new());
    let hid_writer = configure_usb_hid(&mut builder, hid_state);

    // Build the USB device
    let usb_device = builder.build();

    let report_service = UsbReportService::new(hid_writer);

    let stick = match StickController::new(board, report_service, config) {
        Ok(stick) => stick,
        Err(e) => {
            error!("Invalid stick configuration: {:?}", e);
            return;
        }
    };

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device).unwrap());
    spawner.spawn(stick_task(stick).unwrap());
}

/// USB device task - runs the USB stack.
#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, Driver<'static, USB>>) {
    device.run().await;
}

/// Stick task - boots the controller and runs the poll cycle forever.
#[embassy_executor::task]
async fn stick_task(mut stick: Stick) {
    stick.run().await
}
