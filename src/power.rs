//! The night's power budget. Drain is wall-clock based so the rate is
//! independent of the frame rate.

pub const STARTING_CHARGE: f64 = 100.0;

/// Percent per second, indexed by usage level.
pub const DRAIN_RATES: [f64; 5] = [0.1, 0.25, 0.35, 0.5, 0.75];

pub const MAX_USAGE_LEVEL: usize = DRAIN_RATES.len() - 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerMeter {
    remaining: f64,
    usage_level: usize,
    last_sample_ms: f64,
    depleted: bool,
}

impl PowerMeter {
    pub fn new(now_ms: f64) -> Self {
        PowerMeter::with_charge(now_ms, STARTING_CHARGE)
    }

    pub fn with_charge(now_ms: f64, charge: f64) -> Self {
        PowerMeter {
            remaining: charge.max(0.0),
            usage_level: 0,
            last_sample_ms: now_ms,
            depleted: false,
        }
    }

    /// Reselect the drain rate from the number of active power-hungry
    /// features, capped at the top of the table.
    pub fn set_usage(&mut self, active_features: usize) {
        self.usage_level = active_features.min(MAX_USAGE_LEVEL);
    }

    pub fn usage_level(&self) -> usize {
        self.usage_level
    }

    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Drain for the wall-clock time since the previous sample, flooring at
    /// zero. Returns `true` exactly once, on the tick the meter first hits
    /// empty.
    pub fn drain(&mut self, now_ms: f64) -> bool {
        let elapsed_s = ((now_ms - self.last_sample_ms) / 1000.0).max(0.0);
        self.last_sample_ms = now_ms;
        self.remaining = (self.remaining - DRAIN_RATES[self.usage_level] * elapsed_s).max(0.0);

        if self.remaining <= 0.0 && !self.depleted {
            self.depleted = true;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn usage_level_is_capped_at_the_table() {
        let mut meter = PowerMeter::new(0.0);
        meter.set_usage(0);
        assert_eq!(meter.usage_level(), 0);
        meter.set_usage(3);
        assert_eq!(meter.usage_level(), 3);
        meter.set_usage(5);
        assert_eq!(meter.usage_level(), MAX_USAGE_LEVEL);
    }

    #[test]
    fn drain_is_proportional_to_elapsed_time() {
        let mut meter = PowerMeter::new(0.0);
        meter.set_usage(2);
        meter.drain(10_000.0);
        assert_relative_eq!(meter.remaining(), 100.0 - 0.35 * 10.0);
    }

    #[test]
    fn remaining_never_increases_and_never_goes_negative() {
        let mut meter = PowerMeter::with_charge(0.0, 1.0);
        meter.set_usage(4);
        let mut previous = meter.remaining();
        for tick in 1..=100 {
            meter.drain(tick as f64 * 100.0);
            assert!(meter.remaining() <= previous);
            assert!(meter.remaining() >= 0.0);
            previous = meter.remaining();
        }
        assert_eq!(meter.remaining(), 0.0);
    }

    #[test]
    fn idle_night_runs_out_after_a_thousand_seconds() {
        // usage 0 drains 0.1%/s, so a full charge lasts 1000 s
        let mut meter = PowerMeter::new(0.0);
        meter.set_usage(0);

        let mut fired = 0;
        for second in 1..=1_100 {
            if meter.drain(second as f64 * 1000.0) {
                fired += 1;
            }
        }
        assert_relative_eq!(meter.remaining(), 0.0);
        assert!(meter.is_depleted());
        assert_eq!(fired, 1);
    }

    #[test]
    fn depletion_latch_fires_exactly_once() {
        let mut meter = PowerMeter::with_charge(0.0, 0.5);
        meter.set_usage(4);
        assert!(meter.drain(3_600_000.0));
        for tick in 1..=10 {
            assert!(!meter.drain(3_600_000.0 + tick as f64));
        }
        assert!(meter.is_depleted());
    }

    #[test]
    fn clock_skew_does_not_refund_charge() {
        let mut meter = PowerMeter::new(1_000.0);
        meter.set_usage(1);
        meter.drain(2_000.0);
        let before = meter.remaining();
        // a sample from the past drains nothing
        meter.drain(500.0);
        assert_eq!(meter.remaining(), before);
    }
}
