//! Poll policy configuration.

use std::time::Duration;

use crate::error::{RelayError, Result};

/// How often and how many times a job's status is checked.
///
/// The poller sleeps one `interval` before every status check, so a session
/// never waits longer than `max_attempts * interval` in total (request latency
/// not included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

impl PollPolicy {
    /// Create a policy; both values must be positive.
    pub fn new(max_attempts: u32, interval: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(RelayError::InvalidInput(
                "max_attempts must be greater than zero".to_string(),
            ));
        }
        if interval.is_zero() {
            return Err(RelayError::InvalidInput(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            interval,
        })
    }

    /// Create a policy from an interval expressed in nanoseconds.
    pub fn from_interval_nanos(max_attempts: u32, interval_nanos: u64) -> Result<Self> {
        Self::new(max_attempts, Duration::from_nanos(interval_nanos))
    }

    /// Derive the attempt budget from a wall-clock budget.
    ///
    /// The attempt count is rounded down, with a floor of one attempt; the
    /// deadline must be at least one interval long.
    pub fn with_deadline(deadline: Duration, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(RelayError::InvalidInput(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if deadline < interval {
            return Err(RelayError::InvalidInput(format!(
                "deadline {deadline:?} is shorter than one poll interval {interval:?}"
            )));
        }
        let attempts = deadline.as_nanos() / interval.as_nanos();
        let attempts = u32::try_from(attempts).unwrap_or(u32::MAX);
        Self::new(attempts.max(1), interval)
    }

    /// Set the attempt budget
    pub fn with_max_attempts(self, max_attempts: u32) -> Result<Self> {
        Self::new(max_attempts, self.interval)
    }

    /// Set the interval between checks
    pub fn with_interval(self, interval: Duration) -> Result<Self> {
        Self::new(self.max_attempts, interval)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Upper bound on the time spent sleeping across one poll session.
    pub fn max_total_wait(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}
