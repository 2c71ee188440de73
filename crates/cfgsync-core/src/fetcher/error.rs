//! Terminal errors of a logical fetch.

use thiserror::Error;

use crate::fault::RemoteFault;
use crate::paging::EstimateError;

/// The one terminal fault a logical operation ends with.
///
/// Every variant keeps the remote fault that caused it; see [`FetchError::fault`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Credentials were rejected. Never retried.
    #[error("{operation}: authentication rejected: {fault}")]
    Authentication {
        operation: String,
        #[source]
        fault: RemoteFault,
    },
    /// Connectivity or generic faults kept coming after every retry.
    #[error("{operation}: giving up after {retries} retries: {fault}")]
    RetriesExhausted {
        operation: String,
        retries: u32,
        #[source]
        fault: RemoteFault,
    },
    /// The throttle fault did not carry usable sizing numbers.
    #[error("{operation}: cannot size pages ({source}): {fault}")]
    Estimation {
        operation: String,
        fault: RemoteFault,
        #[source]
        source: EstimateError,
    },
    /// The server throttled a page request of an already paged walk.
    #[error("{operation}: throttled again while paging at skip {skip}: {fault}")]
    ProtocolViolation {
        operation: String,
        skip: u64,
        #[source]
        fault: RemoteFault,
    },
    /// A raw query was throttled but does not start with SELECT, so it cannot
    /// be rewritten into pages.
    #[error("{operation}: throttled query does not start with SELECT and cannot be paged: {fault}")]
    UnpageableQuery {
        operation: String,
        #[source]
        fault: RemoteFault,
    },
    /// A plain call (no collection to page) was throttled.
    #[error("{operation}: throttled on a call that cannot be paged: {fault}")]
    NotPageable {
        operation: String,
        #[source]
        fault: RemoteFault,
    },
}

impl FetchError {
    /// The remote fault at the root of this error.
    pub fn fault(&self) -> &RemoteFault {
        match self {
            FetchError::Authentication { fault, .. }
            | FetchError::RetriesExhausted { fault, .. }
            | FetchError::Estimation { fault, .. }
            | FetchError::ProtocolViolation { fault, .. }
            | FetchError::UnpageableQuery { fault, .. }
            | FetchError::NotPageable { fault, .. } => fault,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            FetchError::Authentication { operation, .. }
            | FetchError::RetriesExhausted { operation, .. }
            | FetchError::Estimation { operation, .. }
            | FetchError::ProtocolViolation { operation, .. }
            | FetchError::UnpageableQuery { operation, .. }
            | FetchError::NotPageable { operation, .. } => operation,
        }
    }
}
