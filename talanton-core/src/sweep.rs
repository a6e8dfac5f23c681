//! Bind sweep state machine
//!
//! Host software binds a control by watching it exercise its full
//! range. Rather than asking the user to stomp the pedal, the firmware
//! sweeps the virtual axis from 0 to 1023 and back, twice, at a fixed
//! step rate. The sequence lives here as a state machine advanced one
//! step per call; the firmware drains it to completion before polling
//! buttons again, which keeps the original blocking contract (the
//! sweep cannot be cancelled once started).

use crate::axis::AXIS_MAX;

/// Number of full down-up cycles per sweep
pub const DEFAULT_SWEEP_CYCLES: u8 = 2;

/// Delay between sweep steps in milliseconds
///
/// 2 ms per step makes one cycle take about 4 seconds, a whole sweep
/// about 8.
pub const STEP_DELAY_MS: u64 = 2;

/// Sweep phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepPhase {
    /// Sweep finished or never started
    Idle,
    /// Pedal travelling down (axis rising 0 -> 1023)
    Down,
    /// Pedal coming back up (axis falling 1023 -> 0)
    Up,
}

/// Full-range axis sweep, one value per step
///
/// Each cycle emits `0, 1, ..., 1023, 1022, ..., 0` - strictly
/// monotonic within a phase, with the 1023 turnaround emitted once.
/// After the last cycle the sweep ends at 0 and yields `None` forever.
#[derive(Debug, Clone)]
pub struct BindSweep {
    phase: SweepPhase,
    value: u16,
    cycles_left: u8,
}

impl BindSweep {
    /// Create a sweep with the given number of down-up cycles
    pub fn new(cycles: u8) -> Self {
        Self {
            phase: if cycles == 0 {
                SweepPhase::Idle
            } else {
                SweepPhase::Down
            },
            value: 0,
            cycles_left: cycles,
        }
    }

    /// Current phase
    pub fn phase(&self) -> SweepPhase {
        self.phase
    }

    /// Whether the sweep has run to completion
    pub fn is_done(&self) -> bool {
        self.phase == SweepPhase::Idle
    }

    /// Advance one step and return the axis value to emit
    pub fn next_value(&mut self) -> Option<u16> {
        match self.phase {
            SweepPhase::Idle => None,
            SweepPhase::Down => {
                let value = self.value;
                if value == AXIS_MAX {
                    self.phase = SweepPhase::Up;
                } else {
                    self.value += 1;
                }
                Some(value)
            }
            SweepPhase::Up => {
                self.value -= 1;
                let value = self.value;
                if value == 0 {
                    self.cycles_left -= 1;
                    self.phase = if self.cycles_left == 0 {
                        SweepPhase::Idle
                    } else {
                        SweepPhase::Down
                    };
                }
                Some(value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Values per cycle: 1024 down plus 1023 up (turnaround not repeated)
    const CYCLE_LEN: usize = 2 * (AXIS_MAX as usize + 1) - 1;

    fn drain(sweep: &mut BindSweep) -> Vec<u16> {
        core::iter::from_fn(|| sweep.next_value()).collect()
    }

    #[test]
    fn test_single_cycle_sequence_exact() {
        let mut sweep = BindSweep::new(1);
        let values = drain(&mut sweep);

        let expected: Vec<u16> = (0..=AXIS_MAX).chain((0..AXIS_MAX).rev()).collect();
        assert_eq!(values, expected);
        assert_eq!(values.len(), CYCLE_LEN);
        assert_eq!(*values.last().unwrap(), 0);
        assert!(sweep.is_done());
    }

    #[test]
    fn test_default_sweep_is_two_cycles() {
        let mut sweep = BindSweep::new(DEFAULT_SWEEP_CYCLES);
        let values = drain(&mut sweep);

        assert_eq!(values.len(), 2 * CYCLE_LEN);

        let cycle: Vec<u16> = (0..=AXIS_MAX).chain((0..AXIS_MAX).rev()).collect();
        assert_eq!(&values[..CYCLE_LEN], cycle.as_slice());
        assert_eq!(&values[CYCLE_LEN..], cycle.as_slice());
    }

    #[test]
    fn test_monotonic_per_phase() {
        let mut sweep = BindSweep::new(1);

        // Down phase rises by exactly one per step
        let mut prev = sweep.next_value().unwrap();
        assert_eq!(prev, 0);
        while sweep.phase() == SweepPhase::Down {
            let v = sweep.next_value().unwrap();
            assert_eq!(v, prev + 1);
            prev = v;
        }
        assert_eq!(prev, AXIS_MAX);

        // Up phase falls by exactly one per step
        while let Some(v) = sweep.next_value() {
            assert_eq!(v, prev - 1);
            prev = v;
        }
        assert_eq!(prev, 0);
    }

    #[test]
    fn test_exhausted_sweep_stays_idle() {
        let mut sweep = BindSweep::new(1);
        while sweep.next_value().is_some() {}

        assert_eq!(sweep.phase(), SweepPhase::Idle);
        assert_eq!(sweep.next_value(), None);
        assert_eq!(sweep.next_value(), None);
    }

    #[test]
    fn test_zero_cycles_is_empty() {
        let mut sweep = BindSweep::new(0);
        assert!(sweep.is_done());
        assert_eq!(sweep.next_value(), None);
    }
}
