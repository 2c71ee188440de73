//! Remote faults and their classification.
//!
//! The RPC protocol carries no structured error taxonomy, so faults are
//! sorted by the text of their message. Higher layers (the fetcher and the
//! retry scheduler) only ever look at the resulting [`FaultKind`].

mod classify;
mod error;

pub use classify::{classify, classify_message, FaultKind, THROTTLE_PHRASE};
pub use error::RemoteFault;
