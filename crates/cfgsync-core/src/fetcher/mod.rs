//! Remote collection fetcher.
//!
//! A [`Session`] owns one transport plus the pagination state and retry
//! counter for the logical operation in flight. Both call shapes (list by
//! criteria, raw query) run through the same loop:
//!
//! 1. build the call from the captured request and the current page window;
//! 2. on success, extract the collection and either return it (not paging)
//!    or append it and move to the next page;
//! 3. on a fault, classify it: page on throttle, fail on authentication,
//!    back off and replay on connectivity/generic faults.
//!
//! The caller gets either every row, in offset order, or one terminal
//! [`FetchError`]. Backoff sleeps block the calling thread.

mod error;
mod extract;
mod shape;

pub use error::FetchError;
pub use extract::extract_collection;
pub use shape::{FIRST_KEY, SKIP_KEY};

use serde_json::{Map, Value};
use std::time::Duration;

use crate::fault::{classify, FaultKind, RemoteFault};
use crate::paging::{estimate_page_size, PaginationState};
use crate::request::ReplayableRequest;
use crate::retry::{RetryCounter, RetryDecision, RetryPolicy};
use crate::transport::Transport;
use shape::{CallShape, ListShape, Paging, QueryShape};

/// Operation name used for raw queries.
pub const QUERY_OPERATION: &str = "executeQuery";
/// Response key holding raw query rows.
pub const QUERY_RESULT_KEY: &str = "row";

type Sleep = Box<dyn FnMut(Duration) + Send>;

/// One client session: a transport and the engine state that goes with it.
///
/// Not for sharing between concurrent operations; run one session per
/// concurrent fetch.
pub struct Session<T> {
    transport: T,
    policy: RetryPolicy,
    pagination: PaginationState,
    retries: RetryCounter,
    sleep: Sleep,
}

impl<T: Transport> Session<T> {
    /// Session that backs off with `std::thread::sleep`.
    pub fn new(transport: T) -> Self {
        Self::with_sleep(transport, std::thread::sleep)
    }

    /// Session with a custom backoff sleep (tests pass a recorder).
    pub fn with_sleep<F>(transport: T, sleep: F) -> Self
    where
        F: FnMut(Duration) + Send + 'static,
    {
        Self {
            transport,
            policy: RetryPolicy::default(),
            pagination: PaginationState::default(),
            retries: RetryCounter::default(),
            sleep: Box::new(sleep),
        }
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn retry_counter(&self) -> &RetryCounter {
        &self.retries
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Fetch every object matching `criteria` from a list operation.
    ///
    /// `criteria` is the argument record of the call (search criteria,
    /// returned tags, ...); while paging it additionally carries
    /// [`SKIP_KEY`]/[`FIRST_KEY`]. `result_key` names the collection in the
    /// response.
    pub fn list(
        &mut self,
        operation: &str,
        criteria: Map<String, Value>,
        result_key: &str,
    ) -> Result<Vec<Value>, FetchError> {
        let request = ReplayableRequest::new(operation, vec![Value::Object(criteria)]);
        let shape = ListShape {
            result_key: result_key.to_string(),
        };
        self.fetch(&request, &shape)
    }

    /// Run a raw `SELECT` and return every row.
    pub fn query(&mut self, sql: &str) -> Result<Vec<Value>, FetchError> {
        self.query_as(QUERY_OPERATION, sql, QUERY_RESULT_KEY)
    }

    /// Like [`Session::query`] with an explicit operation name and result key.
    pub fn query_as(
        &mut self,
        operation: &str,
        sql: &str,
        result_key: &str,
    ) -> Result<Vec<Value>, FetchError> {
        let request = ReplayableRequest::new(operation, vec![Value::String(sql.to_string())]);
        let shape = QueryShape {
            result_key: result_key.to_string(),
        };
        self.fetch(&request, &shape)
    }

    /// One plain call under the same fault handling, without paging. A
    /// throttle fault here is terminal.
    pub fn call(&mut self, operation: &str, arguments: Vec<Value>) -> Result<Value, FetchError> {
        let request = ReplayableRequest::new(operation, arguments);
        self.begin();
        loop {
            match self.transport.call(request.operation(), request.arguments()) {
                Ok(response) => {
                    self.retries.reset();
                    return Ok(response);
                }
                Err(fault) => self.handle_fault(&request, fault, Paging::Unsupported)?,
            }
        }
    }

    /// Clear whatever a previous, failed operation left behind.
    fn begin(&mut self) {
        if self.pagination.is_active() {
            tracing::debug!(
                skip = self.pagination.skip(),
                "discarding pagination state of a failed operation"
            );
            self.pagination.reset();
        }
        self.retries.reset();
    }

    fn fetch<S: CallShape>(
        &mut self,
        request: &ReplayableRequest,
        shape: &S,
    ) -> Result<Vec<Value>, FetchError> {
        self.begin();
        let mut rows = Vec::new();
        loop {
            let window = self.pagination.window();
            let arguments = shape.arguments(request, window);
            let response = match self.transport.call(request.operation(), &arguments) {
                Ok(response) => response,
                Err(fault) => {
                    self.handle_fault(request, fault, shape.paging(request))?;
                    continue;
                }
            };

            let page = extract_collection(response, shape.result_key());
            if !self.pagination.is_active() {
                self.retries.reset();
                return Ok(page.unwrap_or_default());
            }

            let page = page.unwrap_or_default();
            tracing::debug!(
                operation = request.operation(),
                iteration = self.pagination.current_iteration(),
                skip = self.pagination.skip(),
                rows = page.len(),
                "page fetched"
            );
            rows.extend(page);

            if !self.pagination.advance() {
                tracing::info!(
                    operation = request.operation(),
                    rows = rows.len(),
                    total_rows = self.pagination.total_rows(),
                    "paged fetch complete"
                );
                self.pagination.reset();
                self.retries.reset();
                return Ok(rows);
            }
        }
    }

    /// Decide what a fault means for the operation. `Ok(())` means replay.
    fn handle_fault(
        &mut self,
        request: &ReplayableRequest,
        fault: RemoteFault,
        paging: Paging,
    ) -> Result<(), FetchError> {
        let kind = classify(&fault);
        let operation = request.operation();
        tracing::debug!(
            operation,
            arguments = ?request.arguments(),
            ?kind,
            attempts = self.retries.attempts(),
            fault = %fault,
            "remote fault"
        );

        match kind {
            FaultKind::Throttle => self.start_paging(request, fault, paging),
            FaultKind::Authentication => {
                tracing::error!(operation, fault = %fault, "authentication rejected");
                Err(FetchError::Authentication {
                    operation: operation.to_string(),
                    fault,
                })
            }
            FaultKind::Connectivity | FaultKind::Generic => {
                if kind == FaultKind::Connectivity {
                    tracing::warn!(operation, fault = %fault, "connectivity fault");
                }
                let attempts = self.retries.record_failure();
                match self.policy.decide(attempts) {
                    RetryDecision::GiveUp => {
                        tracing::error!(
                            operation,
                            arguments = ?request.arguments(),
                            attempts,
                            fault = %fault,
                            "retries exhausted"
                        );
                        Err(FetchError::RetriesExhausted {
                            operation: operation.to_string(),
                            retries: self.policy.max_attempts,
                            fault,
                        })
                    }
                    RetryDecision::RetryAfter(delay) => {
                        tracing::warn!(
                            operation,
                            attempt = attempts,
                            delay_secs = delay.as_secs(),
                            fault = %fault,
                            "retrying after backoff"
                        );
                        (self.sleep)(delay);
                        Ok(())
                    }
                }
            }
        }
    }

    /// Throttle fault: estimate a page size and switch to paging.
    fn start_paging(
        &mut self,
        request: &ReplayableRequest,
        fault: RemoteFault,
        paging: Paging,
    ) -> Result<(), FetchError> {
        let operation = request.operation().to_string();
        if self.pagination.is_active() {
            let skip = self.pagination.skip();
            tracing::error!(%operation, skip, fault = %fault, "throttled while already paging");
            return Err(FetchError::ProtocolViolation {
                operation,
                skip,
                fault,
            });
        }
        match paging {
            Paging::Supported => {}
            Paging::NonSelectQuery => {
                tracing::error!(%operation, fault = %fault, "throttled query does not start with SELECT");
                return Err(FetchError::UnpageableQuery { operation, fault });
            }
            Paging::Unsupported => {
                tracing::error!(%operation, fault = %fault, "throttled request cannot be paged");
                return Err(FetchError::NotPageable { operation, fault });
            }
        }

        let estimate = match estimate_page_size(&fault.message) {
            Ok(estimate) => estimate,
            Err(source) => {
                tracing::error!(%operation, error = %source, fault = %fault, "page size estimation failed");
                return Err(FetchError::Estimation {
                    operation,
                    fault,
                    source,
                });
            }
        };
        self.pagination.activate(estimate);
        tracing::info!(
            %operation,
            total_rows = estimate.total_rows,
            page_size = estimate.page_size,
            pages = self.pagination.iterations_remaining(),
            "query too large, paging"
        );
        Ok(())
    }
}
