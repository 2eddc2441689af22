use super::{error::ConfigurationError, Priority};

/// Shortest slice a dispatch may be given, in time units.
pub const TIME_MINIMUM: u64 = 3;

/// Time-slice bounds derived once from the timer interrupt period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSliceConfig {
    time_minimum: u64,
    time_high: u64,
    time_low: u64,
}

impl TimeSliceConfig {
    pub fn from_period(period: u64) -> Result<Self, ConfigurationError> {
        if period == 0 {
            return Err(ConfigurationError::NonPositivePeriod(period));
        }

        Ok(Self {
            time_minimum: TIME_MINIMUM,
            time_high: period,
            time_low: period / 2,
        })
    }

    pub fn time_minimum(&self) -> u64 {
        self.time_minimum
    }

    pub fn time_high(&self) -> u64 {
        self.time_high
    }

    pub fn time_low(&self) -> u64 {
        self.time_low
    }

    /// Slice for a process of `priority` when `ready` processes are waiting and
    /// `extra` more are competing outside the ready list.
    pub fn slice(&self, priority: Priority, ready: usize, extra: usize) -> u64 {
        let base = match priority {
            Priority::High => self.time_high,
            Priority::Normal => self.time_low,
        };
        let contenders = (ready + extra).max(1) as u64;
        (base / contenders).max(self.time_minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_follow_the_period() {
        let config = TimeSliceConfig::from_period(11).unwrap();
        assert_eq!(config.time_high(), 11);
        assert_eq!(config.time_low(), 5);
        assert_eq!(config.time_minimum(), 3);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(
            TimeSliceConfig::from_period(0),
            Err(ConfigurationError::NonPositivePeriod(0))
        );
    }

    #[test]
    fn slice_never_drops_below_minimum() {
        for period in [1, 2, 7, 10, 64, 1000] {
            let config = TimeSliceConfig::from_period(period).unwrap();
            for priority in [Priority::High, Priority::Normal] {
                for ready in 0..40 {
                    for extra in [1, 2] {
                        let slice = config.slice(priority, ready, extra);
                        assert!(slice >= TIME_MINIMUM);
                        let base = match priority {
                            Priority::High => config.time_high(),
                            Priority::Normal => config.time_low(),
                        };
                        let raw = base / (ready + extra) as u64;
                        if raw >= TIME_MINIMUM {
                            assert_eq!(slice, raw);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn high_priority_gets_at_least_as_much() {
        let config = TimeSliceConfig::from_period(40).unwrap();
        for ready in 0..20 {
            for extra in [1, 2] {
                assert!(
                    config.slice(Priority::High, ready, extra)
                        >= config.slice(Priority::Normal, ready, extra)
                );
            }
        }
        assert_eq!(config.slice(Priority::High, 0, 1), 40);
        assert_eq!(config.slice(Priority::Normal, 0, 1), 20);
    }
}
