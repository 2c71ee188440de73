//! Call shapes: how each kind of request carries a page window.

use serde_json::Value;

use crate::paging::{is_pageable_query, rewrite_query, PageWindow};
use crate::request::ReplayableRequest;

/// Keys added to a list request's argument record while paging.
pub const SKIP_KEY: &str = "skip";
pub const FIRST_KEY: &str = "first";

/// Whether a throttled request can be split into pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Paging {
    Supported,
    /// Raw query that does not start with SELECT.
    NonSelectQuery,
    Unsupported,
}

/// Strategy the fetcher uses to build each call and read its result.
pub(crate) trait CallShape {
    /// Response key holding the collection.
    fn result_key(&self) -> &str;

    /// Whether a throttled `request` can be turned into pages at all.
    fn paging(&self, request: &ReplayableRequest) -> Paging;

    /// Arguments for the next call. `window` is `Some` while paging; the
    /// request's own arguments are never modified.
    fn arguments(&self, request: &ReplayableRequest, window: Option<PageWindow>) -> Vec<Value>;
}

/// List-by-criteria: the first argument is a record that gets `skip`/`first`
/// fields while paging.
pub(crate) struct ListShape {
    pub result_key: String,
}

impl CallShape for ListShape {
    fn result_key(&self) -> &str {
        &self.result_key
    }

    fn paging(&self, request: &ReplayableRequest) -> Paging {
        match request.arguments().first() {
            Some(Value::Object(_)) => Paging::Supported,
            _ => Paging::Unsupported,
        }
    }

    fn arguments(&self, request: &ReplayableRequest, window: Option<PageWindow>) -> Vec<Value> {
        let mut arguments = request.arguments().to_vec();
        if let (Some(window), Some(Value::Object(record))) = (window, arguments.first_mut()) {
            record.insert(SKIP_KEY.to_string(), Value::from(window.skip));
            record.insert(FIRST_KEY.to_string(), Value::from(window.first));
        }
        arguments
    }
}

/// Raw query: the first argument is the SQL text, rewritten while paging.
pub(crate) struct QueryShape {
    pub result_key: String,
}

impl QueryShape {
    fn sql(request: &ReplayableRequest) -> Option<&str> {
        request.arguments().first().and_then(Value::as_str)
    }
}

impl CallShape for QueryShape {
    fn result_key(&self) -> &str {
        &self.result_key
    }

    fn paging(&self, request: &ReplayableRequest) -> Paging {
        match Self::sql(request) {
            Some(sql) if is_pageable_query(sql) => Paging::Supported,
            Some(_) => Paging::NonSelectQuery,
            None => Paging::Unsupported,
        }
    }

    fn arguments(&self, request: &ReplayableRequest, window: Option<PageWindow>) -> Vec<Value> {
        let mut arguments = request.arguments().to_vec();
        if let (Some(window), Some(sql)) = (window, Self::sql(request)) {
            arguments[0] = Value::String(rewrite_query(sql, window).into_owned());
        }
        arguments
    }
}
