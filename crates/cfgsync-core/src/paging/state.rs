//! Pagination state for one session.

use super::estimate::PageEstimate;
use super::PageWindow;

/// Where a session is in a paged walk of a result set.
///
/// Idle (the default) until a throttle fault is seen for the in-flight
/// logical operation; then active with a fixed page size until every page has
/// been fetched. Only the fetcher mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    active: bool,
    skip: u64,
    page_size: u64,
    total_rows: u64,
    iterations_remaining: u64,
    current_iteration: u64,
}

impl PaginationState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rows already consumed; the skip value of the page in flight.
    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn iterations_remaining(&self) -> u64 {
        self.iterations_remaining
    }

    /// 1-based page number while active, 0 when idle.
    pub fn current_iteration(&self) -> u64 {
        self.current_iteration
    }

    /// Window for the next request, or `None` when not paging.
    pub fn window(&self) -> Option<PageWindow> {
        self.active.then_some(PageWindow {
            skip: self.skip,
            first: self.page_size,
        })
    }

    /// Start paging from offset 0 with the estimated page size.
    ///
    /// Walks the `pages` the estimate planned.
    pub(crate) fn activate(&mut self, estimate: PageEstimate) {
        debug_assert!(estimate.page_size > 0 && estimate.pages > 0);
        *self = Self {
            active: true,
            skip: 0,
            page_size: estimate.page_size,
            total_rows: estimate.total_rows,
            iterations_remaining: estimate.pages,
            current_iteration: 1,
        };
    }

    /// Record that the current page completed. Returns `true` if another page
    /// must be fetched (the window has moved forward), `false` once the walk
    /// is exhausted.
    pub(crate) fn advance(&mut self) -> bool {
        self.iterations_remaining = self.iterations_remaining.saturating_sub(1);
        if self.iterations_remaining == 0 {
            return false;
        }
        self.skip += self.page_size;
        self.current_iteration += 1;
        true
    }

    /// Back to idle: all zero, inactive.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
