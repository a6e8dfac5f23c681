//! HX711 24-bit load-cell ADC driver
//!
//! The HX711 has no register interface. Data comes out over a two-wire
//! serial scheme: DOUT drops low when a conversion is ready, then each
//! PD_SCK rising edge shifts out one bit, MSB first, 24 bits of two's
//! complement. One to three extra clock pulses after the data select
//! the input channel and gain for the *next* conversion:
//!
//! - 25 clocks total: channel A, gain 128
//! - 26 clocks total: channel B, gain 32 (unused here)
//! - 27 clocks total: channel A, gain 64
//!
//! The driver keeps a tare offset and a scale factor so callers work
//! in calibrated units instead of raw counts.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use talanton_core::settings::Gain;
use talanton_core::traits::LoadCell;

/// Half-period of the bit-bang clock in microseconds
///
/// The HX711 needs PD_SCK high for at least 0.2 us and resets if it
/// stays high longer than 60 us.
const CLOCK_HALF_PERIOD_US: u32 = 1;

/// Trailing pulses that select channel A at the given gain
const fn gain_pulses(gain: Gain) -> u8 {
    match gain {
        Gain::X128 => 1,
        Gain::X64 => 3,
    }
}

/// Sign-extend a 24-bit two's complement value
const fn sign_extend_24(raw: u32) -> i32 {
    ((raw << 8) as i32) >> 8
}

/// Bit-banged HX711 driver
///
/// Generic over the DOUT input pin, the PD_SCK output pin and a delay
/// provider. Pin errors are ignored: GPIO on the targets this runs on
/// is infallible, and the chip gives us no way to report one anyway.
pub struct Hx711<IN, OUT, D> {
    dout: IN,
    sck: OUT,
    delay: D,
    gain: Gain,
    offset: i32,
    scale: i32,
}

impl<IN, OUT, D> Hx711<IN, OUT, D>
where
    IN: InputPin,
    OUT: OutputPin,
    D: DelayNs,
{
    /// Create a driver with the clock line idle
    ///
    /// Gain starts at the chip's power-on default of 128; offset and
    /// scale start neutral until `tare`/`set_scale` configure them.
    pub fn new(dout: IN, mut sck: OUT, delay: D) -> Self {
        let _ = sck.set_low();
        Self {
            dout,
            sck,
            delay,
            gain: Gain::X128,
            offset: 0,
            scale: 1,
        }
    }

    /// Current tare offset in raw counts
    pub fn offset(&self) -> i32 {
        self.offset
    }

    fn pulse(&mut self) {
        let _ = self.sck.set_high();
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        let _ = self.sck.set_low();
        self.delay.delay_us(CLOCK_HALF_PERIOD_US);
    }

    /// Shift out one raw conversion, blocking until the chip is ready
    fn read_raw(&mut self) -> i32 {
        // Not ready yet means poll again; there is no timeout by design
        while !self.dout.is_low().unwrap_or(false) {}

        let mut raw: u32 = 0;
        for _ in 0..24 {
            let _ = self.sck.set_high();
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
            let bit = self.dout.is_high().unwrap_or(false) as u32;
            raw = (raw << 1) | bit;
            let _ = self.sck.set_low();
            self.delay.delay_us(CLOCK_HALF_PERIOD_US);
        }

        // Select gain for the next conversion
        for _ in 0..gain_pulses(self.gain) {
            self.pulse();
        }

        sign_extend_24(raw)
    }

    fn read_average(&mut self, samples: u8) -> i32 {
        let samples = samples.max(1);
        let mut sum: i64 = 0;
        for _ in 0..samples {
            sum += self.read_raw() as i64;
        }
        (sum / samples as i64) as i32
    }
}

impl<IN, OUT, D> LoadCell for Hx711<IN, OUT, D>
where
    IN: InputPin,
    OUT: OutputPin,
    D: DelayNs,
{
    fn is_ready(&mut self) -> bool {
        self.dout.is_low().unwrap_or(false)
    }

    fn read_units(&mut self, samples: u8) -> i32 {
        (self.read_average(samples) - self.offset) / self.scale
    }

    fn tare(&mut self, samples: u8) {
        self.offset = self.read_average(samples);
    }

    fn set_gain(&mut self, gain: Gain) {
        self.gain = gain;
    }

    fn set_scale(&mut self, scale: i32) {
        // A zero scale would divide every reading by zero
        self.scale = if scale == 0 { 1 } else { scale };
    }
}
