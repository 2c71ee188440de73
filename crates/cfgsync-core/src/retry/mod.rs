//! Retry and backoff policy.
//!
//! Connectivity and generic faults are retried a bounded number of times with
//! a growing delay. The counter lives on the session and is shared by every
//! call a logical operation makes, including all pages of a paged walk.

mod counter;
mod policy;

pub use counter::RetryCounter;
pub use policy::{RetryDecision, RetryPolicy, BACKOFF_STEP, MAX_ATTEMPTS};
