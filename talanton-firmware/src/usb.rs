//! USB HID joystick emitter
//!
//! The device enumerates as a joystick with 32 buttons and one 10-bit
//! Brake axis (Simulation Controls page). No other axes are declared,
//! so host software sees exactly one analog channel to bind.
//!
//! [`BrakeAxis::set_brake`] transmits a report on every call - setting
//! the axis and making it observable to the host are the same
//! operation, there is no separate "send" step to forget.

use defmt::warn;
use embassy_rp::peripherals::USB;
use embassy_usb::class::hid::{self, HidWriter};
use embassy_usb::{Builder, UsbDevice};
use static_cell::StaticCell;

use talanton_core::axis::AXIS_MAX;

pub type UsbDriver = embassy_rp::usb::Driver<'static, USB>;

/// HID report descriptor: joystick, 32 buttons, one 10-bit brake axis
pub const PEDAL_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    0x05, 0x09, //   Usage Page (Button)
    0x19, 0x01, //   Usage Minimum (Button 1)
    0x29, 0x20, //   Usage Maximum (Button 32)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x20, //   Report Count (32)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0x05, 0x02, //   Usage Page (Simulation Controls)
    0x09, 0xC5, //   Usage (Brake)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    0xC0, // End Collection
];

/// Input report matching [`PEDAL_REPORT_DESCRIPTOR`]
pub struct PedalReport {
    pub buttons: u32,
    pub brake: u16,
}

impl PedalReport {
    /// Pack the report little-endian, buttons first
    pub fn to_bytes(&self) -> [u8; 6] {
        let mut bytes = [0u8; 6];
        bytes[..4].copy_from_slice(&self.buttons.to_le_bytes());
        bytes[4..].copy_from_slice(&self.brake.to_le_bytes());
        bytes
    }
}

/// The brake axis as the rest of the firmware sees it
pub struct BrakeAxis {
    writer: HidWriter<'static, UsbDriver, 8>,
}

impl BrakeAxis {
    /// Set the brake axis value and send the report
    pub async fn set_brake(&mut self, value: u16) {
        let report = PedalReport {
            buttons: 0,
            brake: value.min(AXIS_MAX),
        };

        // A failed write means the host missed one report; the next
        // axis update replaces it
        if let Err(e) = self.writer.write(&report.to_bytes()).await {
            warn!("HID report write failed: {:?}", e);
        }
    }
}

/// Build the USB device and the HID brake axis on top of it
pub fn configure(driver: UsbDriver) -> (UsbDevice<'static, UsbDriver>, BrakeAxis) {
    static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
    static MSOS_DESC: StaticCell<[u8; 128]> = StaticCell::new();
    static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
    static HID_STATE: StaticCell<hid::State<'static>> = StaticCell::new();

    let mut config = embassy_usb::Config::new(0xF055, 0x4C50);
    config.manufacturer = Some("Talanton");
    config.product = Some("Load Cell Pedal");
    config.serial_number = Some("0001");

    let mut builder = Builder::new(
        driver,
        config,
        CONFIG_DESC.init([0; 256]),
        BOS_DESC.init([0; 256]),
        MSOS_DESC.init([0; 128]),
        CONTROL_BUF.init([0; 64]),
    );

    let hid_config = hid::Config {
        report_descriptor: PEDAL_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: 10,
        max_packet_size: 8,
    };
    let writer =
        HidWriter::<_, 8>::new(&mut builder, HID_STATE.init(hid::State::new()), hid_config);

    (builder.build(), BrakeAxis { writer })
}
