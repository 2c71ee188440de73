/// Retryable faults seen by the in-flight logical operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryCounter {
    attempts: u32,
}

impl RetryCounter {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Count one more retryable fault and return the new total.
    pub(crate) fn record_failure(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    pub(crate) fn reset(&mut self) {
        self.attempts = 0;
    }
}
