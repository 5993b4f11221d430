use serde::{Deserialize, Serialize};

/// Epoch identifier (sequential counter starting at 1)
pub type EpochIndex = u64;

/// Seconds since the Unix epoch
pub type Timestamp = u64;

/// Four weeks
pub const EPOCH_LENGTH_SECS: u64 = 28 * 24 * 60 * 60;

/// Accounting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epoch {
    pub index: EpochIndex,
    pub start_time: Timestamp,
}

/// Result of a clock advance that crossed at least one epoch boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rollover {
    pub from: EpochIndex,
    pub to: EpochIndex,
}

impl Rollover {
    /// Number of boundaries crossed
    pub fn epochs_elapsed(&self) -> u64 {
        self.to - self.from
    }
}

/// Period clock: tracks the current epoch and rolls it forward on demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodClock {
    current: Epoch,
    length_secs: u64,
}

impl PeriodClock {
    /// Start epoch 1 at `start_time`
    pub fn new(start_time: Timestamp, length_secs: u64) -> Self {
        PeriodClock {
            current: Epoch {
                index: 1,
                start_time,
            },
            length_secs: length_secs.max(1),
        }
    }

    pub fn current(&self) -> Epoch {
        self.current
    }

    pub fn index(&self) -> EpochIndex {
        self.current.index
    }

    pub fn length_secs(&self) -> u64 {
        self.length_secs
    }

    /// True while no epoch has fully elapsed
    pub fn is_first_epoch(&self) -> bool {
        self.current.index == 1
    }

    /// Advance by `floor(elapsed / length)` epochs when due.
    /// Idle epochs are skipped in one step; a `now` before the epoch start never rewinds.
    pub fn advance_if_due(&mut self, now: Timestamp) -> Option<Rollover> {
        let elapsed = now.saturating_sub(self.current.start_time);
        let epochs = elapsed / self.length_secs;
        if epochs == 0 {
            return None;
        }

        let from = self.current.index;
        self.current.index += epochs;
        self.current.start_time += epochs * self.length_secs;

        Some(Rollover {
            from,
            to: self.current.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 24 * 60 * 60;

    #[test]
    fn test_no_advance_before_boundary() {
        let mut clock = PeriodClock::new(1_000, EPOCH_LENGTH_SECS);
        assert_eq!(clock.advance_if_due(1_000 + 21 * DAY), None);
        assert_eq!(clock.advance_if_due(1_000 + 28 * DAY - 1), None);
        assert!(clock.is_first_epoch());
    }

    #[test]
    fn test_advance_on_boundary() {
        let mut clock = PeriodClock::new(0, EPOCH_LENGTH_SECS);
        let rollover = clock.advance_if_due(28 * DAY).unwrap();

        assert_eq!(rollover, Rollover { from: 1, to: 2 });
        assert_eq!(clock.current().start_time, 28 * DAY);

        // Idempotent for the same instant
        assert_eq!(clock.advance_if_due(28 * DAY), None);
    }

    #[test]
    fn test_skips_idle_epochs() {
        let mut clock = PeriodClock::new(0, EPOCH_LENGTH_SECS);
        let rollover = clock.advance_if_due(84 * DAY + 5).unwrap();

        assert_eq!(rollover.epochs_elapsed(), 3);
        assert_eq!(clock.index(), 4);
        assert_eq!(clock.current().start_time, 84 * DAY);
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut clock = PeriodClock::new(10 * DAY, EPOCH_LENGTH_SECS);
        assert_eq!(clock.advance_if_due(0), None);
        assert_eq!(clock.index(), 1);
    }
}
