//! Derive a safe page size from a throttle fault message.

use thiserror::Error;

/// Fixed policy: request a fifth of the server's suggested row count per page.
pub const PAGE_SIZE_DIVISOR: u64 = 5;

/// Result of a successful estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEstimate {
    /// Total rows the server says match the request.
    pub total_rows: u64,
    /// Rows to request per page.
    pub page_size: u64,
    /// Pages to walk: `total_rows / page_size + 1`.
    pub pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    #[error("throttle message carries {found} number(s), need a row total and a size hint")]
    TooFewNumbers { found: usize },
    #[error("size hint {hint} gives a page size of zero")]
    ZeroPageSize { hint: u64 },
    #[error("number {digits} in throttle message is out of range")]
    OutOfRange { digits: String },
    #[error("{total_rows} rows at {page_size} per page is too many pages")]
    TooManyPages { total_rows: u64, page_size: u64 },
}

/// Maximal runs of ASCII digits, left to right.
fn digit_runs(message: &str) -> impl Iterator<Item = &str> {
    message
        .split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

fn parse_run(run: &str) -> Result<u64, EstimateError> {
    run.parse::<u64>().map_err(|_| EstimateError::OutOfRange {
        digits: run.to_string(),
    })
}

/// Estimate `(total_rows, page_size)` from a throttle fault message.
///
/// The first number in the message is the total row count and the second is
/// the server's size hint; the page size is the hint divided by
/// [`PAGE_SIZE_DIVISOR`]. Any further numbers are ignored.
pub fn estimate_page_size(message: &str) -> Result<PageEstimate, EstimateError> {
    let runs: Vec<&str> = digit_runs(message).take(2).collect();
    let [total, hint] = runs.as_slice() else {
        return Err(EstimateError::TooFewNumbers { found: runs.len() });
    };
    let total_rows = parse_run(total)?;
    let hint = parse_run(hint)?;
    let page_size = hint / PAGE_SIZE_DIVISOR;
    if page_size == 0 {
        return Err(EstimateError::ZeroPageSize { hint });
    }
    let pages = (total_rows / page_size)
        .checked_add(1)
        .ok_or(EstimateError::TooManyPages {
            total_rows,
            page_size,
        })?;
    Ok(PageEstimate {
        total_rows,
        page_size,
        pages,
    })
}
