//! Axis mapping and clamping
//!
//! The host sees a single 10-bit brake axis. Scaled load-cell readings
//! land roughly in this range already (the scale factor is chosen for
//! that), but nothing stops a hard stomp or a drifting tare from going
//! past either end, so every value is clamped before it reaches USB.

/// Maximum axis value (10-bit axis, 0-1023)
pub const AXIS_MAX: u16 = 1023;

/// Clamp a scaled reading into the axis range
pub const fn clamp_axis(value: i32) -> u16 {
    if value < 0 {
        0
    } else if value > AXIS_MAX as i32 {
        AXIS_MAX
    } else {
        value as u16
    }
}

/// Map a scaled load-cell reading onto the brake axis
///
/// Inversion is applied before clamping, so a cell wired backwards
/// (compression reads negative) produces the mirrored pre-clamp value.
pub const fn map_reading(raw: i32, inverted: bool) -> u16 {
    // saturating_neg: i32::MIN has no negation, saturate instead of overflowing
    let signed = if inverted { raw.saturating_neg() } else { raw };
    clamp_axis(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(clamp_axis(0), 0);
        assert_eq!(clamp_axis(512), 512);
        assert_eq!(clamp_axis(1023), 1023);
    }

    #[test]
    fn test_clamp_out_of_range() {
        // Examples straight from the bench: an over-range stomp and a
        // reading below the tare point.
        assert_eq!(clamp_axis(2000), 1023);
        assert_eq!(clamp_axis(-500), 0);
        assert_eq!(clamp_axis(i32::MAX), 1023);
        assert_eq!(clamp_axis(i32::MIN), 0);
    }

    #[test]
    fn test_inversion_mirrors_before_clamp() {
        // Same magnitude through both branches
        assert_eq!(map_reading(300, false), 300);
        assert_eq!(map_reading(-300, true), 300);

        // Inverted positive readings clamp at the bottom
        assert_eq!(map_reading(300, true), 0);
        assert_eq!(map_reading(-300, false), 0);
    }

    proptest! {
        #[test]
        fn axis_always_in_range(raw in any::<i32>(), inverted in any::<bool>()) {
            let axis = map_reading(raw, inverted);
            prop_assert!(axis <= AXIS_MAX);
        }
    }
}
