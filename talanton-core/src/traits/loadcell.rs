//! Load-cell sensor trait

use crate::settings::Gain;

/// Trait for a load-cell bridge sensor
///
/// Implementations handle the specific ADC bridge chip (HX711, NAU7802,
/// etc.). There is deliberately no error channel: the sensor is either
/// ready or it is not, and a not-ready sensor is handled by polling
/// again on the next loop iteration. A truly absent sensor is
/// indistinguishable from one that is never ready, and the device
/// carries on reporting the last axis value.
pub trait LoadCell {
    /// Check whether a conversion is ready to be read
    ///
    /// Takes `&mut self` because probing the data line may require
    /// mutable pin access.
    fn is_ready(&mut self) -> bool;

    /// Read `samples` conversions, average them, subtract the tare
    /// offset and divide by the scale factor
    ///
    /// Blocks until each conversion is ready.
    fn read_units(&mut self, samples: u8) -> i32;

    /// Re-zero the cell by averaging `samples` raw conversions into
    /// the tare offset
    fn tare(&mut self, samples: u8);

    /// Set the amplifier gain, applied from the next conversion on
    fn set_gain(&mut self, gain: Gain);

    /// Set the scale factor used by [`read_units`](Self::read_units)
    fn set_scale(&mut self, scale: i32);
}
