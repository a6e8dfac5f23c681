//! Pedal application state
//!
//! One struct owns everything the poll loop mutates, instead of the
//! pile of globals this firmware descends from. The axis value only
//! changes through [`PedalState::update_from_reading`], so iterations
//! where the sensor is not ready leave the last reported value alone.

use crate::axis::map_reading;

/// State owned by the poll loop
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PedalState {
    inverted: bool,
    axis: u16,
}

impl PedalState {
    /// Create pedal state with the axis at rest
    pub const fn new(inverted: bool) -> Self {
        Self { inverted, axis: 0 }
    }

    /// Map a scaled load-cell reading onto the axis and remember it
    ///
    /// Returns the clamped axis value to hand to the HID emitter.
    pub fn update_from_reading(&mut self, raw: i32) -> u16 {
        self.axis = map_reading(raw, self.inverted);
        self.axis
    }

    /// Last axis value handed to the emitter
    pub const fn axis(&self) -> u16 {
        self.axis
    }

    /// Whether readings are negated before clamping
    pub const fn inverted(&self) -> bool {
        self.inverted
    }
}
