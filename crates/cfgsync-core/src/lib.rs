pub mod config;
pub mod logging;

pub mod fault;
pub mod fetcher;
pub mod paging;
pub mod request;
pub mod retry;
pub mod transport;

pub use fetcher::{FetchError, Session};
