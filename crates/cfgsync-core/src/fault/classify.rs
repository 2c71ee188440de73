//! Classify remote fault messages into retry/paging categories.

use super::error::RemoteFault;

/// Phrase the server uses when a single request would return more rows than
/// it allows. Matched case-sensitively.
pub const THROTTLE_PHRASE: &str = "Query request too large";

/// Matched case-insensitively.
const AUTHENTICATION_PHRASES: &[&str] = &[
    "unauthorized",
    "not authorized",
    "authentication failed",
    "invalid credentials",
    "access denied",
];

/// Matched case-insensitively.
const CONNECTIVITY_PHRASES: &[&str] = &[
    "connection refused",
    "couldn't connect",
    "failed to connect",
    "connection reset",
    "timed out",
    "timeout",
    "network is unreachable",
    "no route to host",
    "could not resolve host",
];

/// Category of a remote fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The request asked for more rows than the server allows; page instead.
    Throttle,
    /// Bad credentials or denied access. Never retried.
    Authentication,
    /// Transport-level failure (refused, timed out, unreachable).
    Connectivity,
    /// Anything else.
    Generic,
}

/// Classify a fault message. Checks run in priority order: throttle,
/// authentication, connectivity, then generic.
pub fn classify_message(message: &str) -> FaultKind {
    if message.contains(THROTTLE_PHRASE) {
        return FaultKind::Throttle;
    }
    let lower = message.to_ascii_lowercase();
    if AUTHENTICATION_PHRASES.iter().any(|p| lower.contains(p)) {
        return FaultKind::Authentication;
    }
    if CONNECTIVITY_PHRASES.iter().any(|p| lower.contains(p)) {
        return FaultKind::Connectivity;
    }
    FaultKind::Generic
}

pub fn classify(fault: &RemoteFault) -> FaultKind {
    classify_message(&fault.message)
}
