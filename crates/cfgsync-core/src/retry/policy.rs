use std::time::Duration;

/// Retries allowed per logical operation before a fault becomes terminal.
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff grows by this much per attempt: 10s, 20s, 30s.
pub const BACKOFF_STEP: Duration = Duration::from_secs(10);

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Stop and hand the fault to the caller.
    GiveUp,
    /// Sleep for the given delay, then replay the request.
    RetryAfter(Duration),
}

/// Bounded backoff policy.
///
/// The values are fixed policy constants; there is no config knob for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries (not counting the first call).
    pub max_attempts: u32,
    /// Delay multiplier per attempt.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            backoff_step: BACKOFF_STEP,
        }
    }
}

impl RetryPolicy {
    /// Decide what to do after the `attempts`-th retryable fault (1-based,
    /// already counted).
    pub fn decide(&self, attempts: u32) -> RetryDecision {
        if attempts > self.max_attempts {
            return RetryDecision::GiveUp;
        }
        RetryDecision::RetryAfter(self.backoff_step.saturating_mul(attempts))
    }
}
