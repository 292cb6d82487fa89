//! Clock

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use jiff::{SignedDuration, Timestamp};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Arc<AtomicI64>,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            millis: Arc::new(AtomicI64::new(start.as_millisecond())),
        }
    }

    /// Move the clock forward (or backward, for a negative duration). Saturates at the ends of
    /// the supported range.
    pub fn advance(&self, by: SignedDuration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(if by.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        });

        _ = self
            .millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |millis| {
                Some(millis.saturating_add(delta))
            });
    }

    /// Jump to an exact instant.
    pub fn set(&self, to: Timestamp) {
        self.millis.store(to.as_millisecond(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        let millis = self.millis.load(Ordering::SeqCst);

        Timestamp::from_millisecond(millis).unwrap_or(if millis < 0 {
            Timestamp::MIN
        } else {
            Timestamp::MAX
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn manual_clock_advances_and_is_shared_between_clones() -> TestResult {
        let start: Timestamp = "2026-03-01T08:00:00Z".parse()?;
        let clock = ManualClock::new(start);
        let other = clock.clone();

        clock.advance(SignedDuration::from_mins(5));

        assert_eq!(other.now(), "2026-03-01T08:05:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn manual_clock_set_jumps_to_instant() -> TestResult {
        let clock = ManualClock::new("2026-03-01T08:00:00Z".parse()?);
        let target: Timestamp = "2026-03-02T09:30:00Z".parse()?;

        clock.set(target);

        assert_eq!(clock.now(), target);

        Ok(())
    }

    #[test]
    fn manual_clock_saturates_in_the_direction_of_travel() -> TestResult {
        let clock = ManualClock::new("2026-03-01T08:00:00Z".parse()?);

        clock.advance(SignedDuration::MIN);
        assert_eq!(clock.now(), Timestamp::MIN);

        clock.advance(SignedDuration::MAX);
        clock.advance(SignedDuration::MAX);
        clock.advance(SignedDuration::MAX);
        assert_eq!(clock.now(), Timestamp::MAX);

        Ok(())
    }
}
