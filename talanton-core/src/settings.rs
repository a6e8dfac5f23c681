//! Persisted amplifier-gain setting
//!
//! A single byte in flash remembers the HX711 channel-A gain across
//! power cycles. The decode step is an explicit, named policy because
//! the device this firmware descends from shipped with a validation
//! expression whose operator precedence made it reject 128 as well as
//! garbage: any stored byte other than exactly 64 was rewritten to 64.
//!
//! [`GainPolicy::Faithful`] reproduces that behavior bit for bit;
//! [`GainPolicy::Intended`] accepts both legal gains and resets only
//! genuinely invalid bytes. The firmware picks one at build time and
//! the test suite pins down both.

/// Amplifier gain for the load-cell bridge (channel A)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Gain {
    /// Low sensitivity
    X64 = 64,
    /// High sensitivity
    X128 = 128,
}

impl Gain {
    /// Get the gain as the byte stored in flash
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decode a stored byte, `None` if it is not a legal gain
    pub const fn from_byte(value: u8) -> Option<Self> {
        match value {
            64 => Some(Gain::X64),
            128 => Some(Gain::X128),
            _ => None,
        }
    }
}

/// Gain used when the stored byte is invalid or missing
pub const DEFAULT_GAIN: Gain = Gain::X64;

/// Calibration scale factor applied to the load-cell driver
///
/// Chosen so raw counts from the bridge land in the 0-1023 axis range.
/// Negative because the reference cell reads negative under compression.
pub const SCALE: i32 = -1000;

/// Samples averaged when re-zeroing the cell
pub const TARE_SAMPLES: u8 = 10;

/// Settle time after a setting write before touching storage again
pub const STORE_SETTLE_MS: u64 = 50;

/// Settle time between a tare button press and the actual re-zero
pub const TARE_SETTLE_MS: u64 = 1000;

/// How the stored gain byte is validated at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GainPolicy {
    /// Original behavior: anything other than exactly 64 is reset to 64,
    /// including a perfectly legal 128
    Faithful,
    /// Accept 64 and 128, reset only bytes that are neither
    Intended,
}

/// Outcome of validating the stored gain byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GainResolution {
    /// Gain to apply to the sensor
    pub gain: Gain,
    /// Whether the resolved gain must be written back to storage
    pub rewrite: bool,
}

/// Validate the stored gain byte and decide whether to repair it
///
/// `stored` is `None` when storage holds no value yet (first boot or
/// erased flash); that is treated the same as a corrupt byte.
pub fn resolve_gain(stored: Option<u8>, policy: GainPolicy) -> GainResolution {
    match policy {
        GainPolicy::Faithful => match stored {
            Some(64) => GainResolution {
                gain: Gain::X64,
                rewrite: false,
            },
            _ => GainResolution {
                gain: DEFAULT_GAIN,
                rewrite: true,
            },
        },
        GainPolicy::Intended => match stored.and_then(Gain::from_byte) {
            Some(gain) => GainResolution {
                gain,
                rewrite: false,
            },
            None => GainResolution {
                gain: DEFAULT_GAIN,
                rewrite: true,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_64_accepted_under_both_policies() {
        for policy in [GainPolicy::Faithful, GainPolicy::Intended] {
            let r = resolve_gain(Some(64), policy);
            assert_eq!(r.gain, Gain::X64);
            assert!(!r.rewrite);
        }
    }

    #[test]
    fn test_stored_128_faithful_rewrites() {
        // The surprising branch: 128 is a legal gain but the original
        // validation still clobbered it.
        let r = resolve_gain(Some(128), GainPolicy::Faithful);
        assert_eq!(r.gain, Gain::X64);
        assert!(r.rewrite);
    }

    #[test]
    fn test_stored_128_intended_accepted() {
        let r = resolve_gain(Some(128), GainPolicy::Intended);
        assert_eq!(r.gain, Gain::X128);
        assert!(!r.rewrite);
    }

    #[test]
    fn test_uninitialized_bytes_reset() {
        // 0x00 and 0xFF are what erased or never-written flash decodes to
        for byte in [0u8, 255] {
            for policy in [GainPolicy::Faithful, GainPolicy::Intended] {
                let r = resolve_gain(Some(byte), policy);
                assert_eq!(r.gain, Gain::X64);
                assert!(r.rewrite);
            }
        }
    }

    #[test]
    fn test_missing_value_resets() {
        for policy in [GainPolicy::Faithful, GainPolicy::Intended] {
            let r = resolve_gain(None, policy);
            assert_eq!(r.gain, DEFAULT_GAIN);
            assert!(r.rewrite);
        }
    }

    #[test]
    fn test_gain_byte_round_trip() {
        assert_eq!(Gain::from_byte(Gain::X64.as_byte()), Some(Gain::X64));
        assert_eq!(Gain::from_byte(Gain::X128.as_byte()), Some(Gain::X128));
        assert_eq!(Gain::from_byte(0), None);
        assert_eq!(Gain::from_byte(96), None);
    }
}
