//! Bounded retries for flaky cases

use std::time::Duration;

/// How often a case may run before its failure is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included
    pub max_attempts: u32,
    /// Base pause between attempts; grows linearly with the attempt number
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::once()
    }
}

impl RetryPolicy {
    /// Run once, never retry
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::from_millis(100),
        }
    }

    /// Allow `retries` reruns after the first failure
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            ..Self::once()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Whether another attempt may follow the `attempt`-th (1-based) failure
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Pause before the attempt following `attempt`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.delay.saturating_mul(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_once_never_retries() {
        let policy = RetryPolicy::default();
        assert_eq!(policy, RetryPolicy::once());
        assert!(!policy.allows_retry(1));
    }

    #[rstest]
    #[case(1, true)]
    #[case(3, true)]
    #[case(4, false)]
    #[case(5, false)]
    fn test_three_retries(#[case] attempt: u32, #[case] expected: bool) {
        let policy = RetryPolicy::with_retries(3);
        assert_eq!(policy.max_attempts, 4);
        assert_eq!(policy.allows_retry(attempt), expected);
    }

    #[test]
    fn test_linear_delay() {
        let policy = RetryPolicy::with_retries(2).with_delay(Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(100));
    }
}
