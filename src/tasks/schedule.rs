//! # When and how often a submitted task runs.
//!
//! [`Schedule`] mirrors the four classic timer submission shapes:
//! - one-shot after a delay or at an instant ([`Schedule::Once`]),
//! - fixed-delay repetition ([`Schedule::FixedDelay`]): the next run starts
//!   `period` after the previous run *finished*,
//! - fixed-rate repetition ([`Schedule::FixedRate`]): runs are spaced `period`
//!   apart from the first scheduled instant; late runs catch up back-to-back.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use mdns_scheduler::Schedule;
//!
//! let probe = Schedule::fixed_rate(Duration::ZERO, Duration::from_millis(250));
//! assert_eq!(probe.period(), Some(Duration::from_millis(250)));
//! assert!(Schedule::after(Duration::from_secs(1)).period().is_none());
//! ```

use std::time::{Duration, Instant};

/// Furthest a timer looks ahead. Later deadlines (up to `Duration::MAX`) are
/// held at this distance, which in practice means "never".
pub(crate) const HORIZON: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// `at + d` with `d` capped at [`HORIZON`]; never panics.
pub(crate) fn saturating_add(at: Instant, d: Duration) -> Instant {
    at.checked_add(d.min(HORIZON))
        .or_else(|| at.checked_add(Duration::from_secs(365 * 24 * 60 * 60)))
        .unwrap_or(at)
}

/// First run of a schedule: relative to submission, or an absolute instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Start {
    /// Relative delay measured from the moment of submission.
    After(Duration),
    /// Absolute instant; instants in the past run as soon as possible.
    At(Instant),
}

impl Start {
    /// Resolves the start to an absolute instant.
    ///
    /// Delays beyond the timer horizon (30 years) resolve to the horizon.
    pub fn resolve(self, now: Instant) -> Instant {
        match self {
            Start::After(delay) => saturating_add(now, delay),
            Start::At(at) => at,
        }
    }

    /// Delay from `now` until the first run (zero for instants in the past).
    pub fn delay_from(self, now: Instant) -> Duration {
        match self {
            Start::After(delay) => delay,
            Start::At(at) => at.saturating_duration_since(now),
        }
    }
}

/// Submission shape for [`GuardedTimer::submit`](crate::GuardedTimer::submit).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedule {
    /// Run once.
    Once(Start),
    /// Repeat with `period` between the end of one run and the start of the next.
    FixedDelay {
        /// First run.
        first: Start,
        /// Gap between runs; must be non-zero.
        period: Duration,
    },
    /// Repeat every `period` measured from the first scheduled instant.
    FixedRate {
        /// First run.
        first: Start,
        /// Spacing between scheduled instants; must be non-zero.
        period: Duration,
    },
}

impl Schedule {
    /// One run after `delay`.
    #[inline]
    pub fn after(delay: Duration) -> Self {
        Schedule::Once(Start::After(delay))
    }

    /// One run at `at`.
    #[inline]
    pub fn at(at: Instant) -> Self {
        Schedule::Once(Start::At(at))
    }

    /// Fixed-delay repetition starting after `delay`.
    #[inline]
    pub fn fixed_delay(delay: Duration, period: Duration) -> Self {
        Schedule::FixedDelay {
            first: Start::After(delay),
            period,
        }
    }

    /// Fixed-rate repetition starting after `delay`.
    #[inline]
    pub fn fixed_rate(delay: Duration, period: Duration) -> Self {
        Schedule::FixedRate {
            first: Start::After(delay),
            period,
        }
    }

    /// First run of the schedule.
    pub fn first(&self) -> Start {
        match *self {
            Schedule::Once(first) => first,
            Schedule::FixedDelay { first, .. } | Schedule::FixedRate { first, .. } => first,
        }
    }

    /// Repetition period, `None` for one-shot schedules.
    pub fn period(&self) -> Option<Duration> {
        match *self {
            Schedule::Once(_) => None,
            Schedule::FixedDelay { period, .. } | Schedule::FixedRate { period, .. } => {
                Some(period)
            }
        }
    }

    /// True when this schedule repeats with a zero period.
    #[inline]
    pub(crate) fn has_zero_period(&self) -> bool {
        self.period() == Some(Duration::ZERO)
    }

    /// Computes the next due instant after a run.
    ///
    /// - `scheduled`: instant the finished run was due at
    /// - `finished`: instant the run returned
    pub(crate) fn next_after(&self, scheduled: Instant, finished: Instant) -> Option<Instant> {
        match *self {
            Schedule::Once(_) => None,
            Schedule::FixedDelay { period, .. } => Some(saturating_add(finished, period)),
            Schedule::FixedRate { period, .. } => Some(saturating_add(scheduled, period)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_resolution() {
        let now = Instant::now();
        assert_eq!(Start::After(Duration::from_secs(2)).resolve(now), now + Duration::from_secs(2));
        assert_eq!(Start::At(now).resolve(now + Duration::from_secs(5)), now);
        assert_eq!(Start::At(now).delay_from(now + Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn test_fixed_delay_measures_from_finish() {
        let s = Schedule::fixed_delay(Duration::ZERO, Duration::from_millis(100));
        let due = Instant::now();
        let finished = due + Duration::from_millis(40);
        assert_eq!(s.next_after(due, finished), Some(finished + Duration::from_millis(100)));
    }

    #[test]
    fn test_fixed_rate_measures_from_schedule() {
        let s = Schedule::fixed_rate(Duration::ZERO, Duration::from_millis(100));
        let due = Instant::now();
        let finished = due + Duration::from_millis(40);
        assert_eq!(s.next_after(due, finished), Some(due + Duration::from_millis(100)));
    }

    #[test]
    fn test_once_does_not_repeat() {
        let s = Schedule::after(Duration::from_millis(5));
        let now = Instant::now();
        assert_eq!(s.next_after(now, now), None);
        assert!(!s.has_zero_period());
    }

    #[test]
    fn test_huge_durations_saturate() {
        let now = Instant::now();
        assert_eq!(Start::After(Duration::MAX).resolve(now), now + HORIZON);
        assert_eq!(Start::After(Duration::MAX).delay_from(now), Duration::MAX);

        let s = Schedule::fixed_delay(Duration::ZERO, Duration::MAX);
        assert_eq!(s.next_after(now, now), Some(now + HORIZON));
        let s = Schedule::fixed_rate(Duration::ZERO, Duration::MAX);
        assert_eq!(s.next_after(now, now), Some(now + HORIZON));
    }

    #[test]
    fn test_zero_period_detected() {
        assert!(Schedule::fixed_rate(Duration::ZERO, Duration::ZERO).has_zero_period());
        assert!(!Schedule::fixed_delay(Duration::ZERO, Duration::from_nanos(1)).has_zero_period());
    }
}
