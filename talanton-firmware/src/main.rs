//! Talanton - Load-Cell Brake Pedal Firmware
//!
//! RP2040 firmware that reads an HX711 load-cell bridge and reports it
//! as a USB HID joystick brake axis. Two buttons provide utility
//! modes: a bind sweep that drives the virtual axis through its full
//! range so host software can auto-detect it, and a tare that
//! re-zeroes the cell. A persisted byte in flash remembers the
//! amplifier gain across power cycles.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::InterruptHandler as UsbInterruptHandler;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use talanton_core::app::PedalState;
use talanton_core::settings::{
    resolve_gain, GainPolicy, SCALE, STORE_SETTLE_MS, TARE_SAMPLES, TARE_SETTLE_MS,
};
use talanton_core::sweep::{BindSweep, DEFAULT_SWEEP_CYCLES, STEP_DELAY_MS};
use talanton_core::traits::LoadCell;
use talanton_drivers::loadcell::Hx711;

use crate::storage::SettingsStore;

mod storage;
mod usb;

/// Negate readings for cells wired to read negative under load
const INVERTED_LOAD: bool = false;

/// Validation policy for the stored gain byte
///
/// `Faithful` reproduces the classic behavior where 128 is rejected
/// too; `Intended` accepts both legal gains.
const GAIN_POLICY: GainPolicy = GainPolicy::Intended;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Talanton pedal firmware starting");

    let p = embassy_rp::init(Default::default());

    // Resolve the persisted gain setting, repairing it if invalid
    let mut store = SettingsStore::new(p.FLASH, p.DMA_CH0);
    let stored = match store.read_gain().await {
        Ok(stored) => stored,
        Err(e) => {
            warn!("Gain setting read failed: {:?}", e);
            None
        }
    };
    let resolved = resolve_gain(stored, GAIN_POLICY);
    if resolved.rewrite {
        info!("Stored gain invalid, resetting to {}", resolved.gain.as_byte());
        if store.write_gain(resolved.gain.as_byte()).await.is_err() {
            // Carry on with the in-memory value; next boot repairs again
            warn!("Failed to persist gain setting");
        }
        // Let storage settle before it is touched again
        Timer::after_millis(STORE_SETTLE_MS).await;
    }
    info!("Gain setting: {}", resolved.gain.as_byte());

    // Load cell on GPIO2 (DOUT) and GPIO3 (PD_SCK)
    let dout = Input::new(p.PIN_2, Pull::None);
    let sck = Output::new(p.PIN_3, Level::Low);
    let mut loadcell = Hx711::new(dout, sck, Delay);
    loadcell.set_gain(resolved.gain);
    loadcell.set_scale(SCALE);
    loadcell.tare(TARE_SAMPLES);

    // Utility buttons, pull-up wiring, active low
    let bind_button = Input::new(p.PIN_8, Pull::Up);
    let tare_button = Input::new(p.PIN_9, Pull::Up);

    let usb_driver = embassy_rp::usb::Driver::new(p.USB, Irqs);
    let (usb_device, mut brake) = usb::configure(usb_driver);
    spawner.spawn(usb_task(usb_device)).unwrap();

    brake.set_brake(0).await;
    info!("Entering poll loop");

    let mut pedal = PedalState::new(INVERTED_LOAD);
    loop {
        if bind_button.is_low() {
            // Runs to completion; buttons and sensor are not observed
            // again until the sweep has drained (~8s)
            info!("Bind mode: sweeping the brake axis");
            let mut sweep = BindSweep::new(DEFAULT_SWEEP_CYCLES);
            while let Some(value) = sweep.next_value() {
                brake.set_brake(value).await;
                Timer::after_millis(STEP_DELAY_MS).await;
            }
            info!("Bind mode done");
        }

        if tare_button.is_low() {
            info!("Re-zeroing load cell");
            Timer::after_millis(TARE_SETTLE_MS).await;
            loadcell.tare(TARE_SAMPLES);
            info!("Done");
        }

        if loadcell.is_ready() {
            let raw = loadcell.read_units(1);
            brake.set_brake(pedal.update_from_reading(raw)).await;
        } else {
            // Not ready: keep the previous axis value, retry next pass.
            // The short sleep also lets the USB task run.
            Timer::after_millis(1).await;
        }
    }
}

#[embassy_executor::task]
async fn usb_task(mut device: embassy_usb::UsbDevice<'static, usb::UsbDriver>) {
    device.run().await;
}
