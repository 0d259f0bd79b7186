//! Verdict poll policy
//!
//! The reference behavior polled every 60 seconds forever and leaned on the
//! host's invocation deadline to stop. Here the loop is explicitly bounded:
//! a maximum attempt count and a fixed or capped-exponential delay, with a
//! distinct timed-out outcome when the budget runs out.

use std::time::Duration;

use filegate_core::{GateConfig, PollBackoff};

/// Exponential delays are capped at this multiple of the base interval.
const MAX_BACKOFF_MULTIPLIER: u64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
    pub backoff: PollBackoff,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            interval: Duration::from_secs(60),
            max_attempts: 30,
            backoff: PollBackoff::Fixed,
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &GateConfig) -> Self {
        PollPolicy {
            interval: Duration::from_secs(config.poll_interval_secs),
            max_attempts: config.poll_max_attempts,
            backoff: config.poll_backoff,
        }
    }

    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        PollPolicy {
            interval,
            max_attempts,
            backoff: PollBackoff::Fixed,
        }
    }

    /// Delay before poll `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            PollBackoff::Fixed => self.interval,
            PollBackoff::Exponential => {
                let shift = attempt.saturating_sub(1).min(63);
                let multiplier = 1u64
                    .checked_shl(shift)
                    .unwrap_or(MAX_BACKOFF_MULTIPLIER)
                    .min(MAX_BACKOFF_MULTIPLIER);
                self.interval.saturating_mul(multiplier as u32)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_backoff_is_constant() {
        let policy = PollPolicy::fixed(Duration::from_secs(60), 5);
        for attempt in 1..=5 {
            assert_eq!(policy.delay_for(attempt), Duration::from_secs(60));
        }
    }

    #[test]
    fn exponential_backoff_doubles_then_caps() {
        let policy = PollPolicy {
            interval: Duration::from_secs(10),
            max_attempts: 10,
            backoff: PollBackoff::Exponential,
        };
        assert_eq!(policy.delay_for(1), Duration::from_secs(10));
        assert_eq!(policy.delay_for(2), Duration::from_secs(20));
        assert_eq!(policy.delay_for(3), Duration::from_secs(40));
        assert_eq!(policy.delay_for(4), Duration::from_secs(80));
        // Capped at 10x the base interval.
        assert_eq!(policy.delay_for(5), Duration::from_secs(100));
        assert_eq!(policy.delay_for(30), Duration::from_secs(100));
    }

    #[test]
    fn default_matches_reference_interval() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(60));
        assert_eq!(policy.backoff, PollBackoff::Fixed);
    }
}
