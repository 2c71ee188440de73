//! Paging: page-size estimation, pagination state and query rewriting.
//!
//! When the server rejects a request as too large, its fault text carries the
//! total row count and a size hint. From those we derive a page size and walk
//! the result set with a skip/first window, one page at a time.

mod estimate;
mod query;
mod state;

pub use estimate::{estimate_page_size, EstimateError, PageEstimate, PAGE_SIZE_DIVISOR};
pub use query::{is_pageable_query, rewrite_query};
pub use state::PaginationState;

/// Row window for one page: skip `skip` rows, then return at most `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: u64,
    pub first: u64,
}
