//! Integration test: local JSON RPC server that throttles unpaged requests,
//! driven through the curl transport.
//!
//! Starts the server, runs list and query fetches through a session and
//! asserts every row arrives, in order, after the expected number of pages.

mod common;

use cfgsync_core::config::CfgsyncConfig;
use cfgsync_core::transport::HttpTransport;
use cfgsync_core::{FetchError, Session};
use common::rpc_server::{self, Mode};
use serde_json::{json, Map, Value};

fn reference_rows() -> Vec<Value> {
    (0..237).map(|i| json!({"pkid": format!("id-{i:03}")})).collect()
}

fn session_for(endpoint: &str) -> Session<HttpTransport> {
    let cfg = CfgsyncConfig {
        endpoint: endpoint.to_string(),
        username: Some("sync".to_string()),
        password: Some("secret".to_string()),
        connect_timeout_secs: 5,
        request_timeout_secs: 10,
        ..CfgsyncConfig::default()
    };
    let transport = HttpTransport::new(&cfg).expect("transport");
    Session::with_sleep(transport, |_| {})
}

#[test]
fn throttled_query_is_paged_over_http() {
    let server = rpc_server::start(reference_rows(), Mode::Paging);
    let mut session = session_for(&server.endpoint);

    let rows = session
        .query("SELECT pkid FROM device ORDER BY pkid")
        .expect("query");

    assert_eq!(rows, reference_rows());
    // One throttled request plus floor(237 / 10) + 1 pages.
    assert_eq!(server.requests(), 25);
    assert!(!session.pagination().is_active());
    assert_eq!(session.retry_counter().attempts(), 0);
}

#[test]
fn throttled_list_is_paged_over_http() {
    let server = rpc_server::start(reference_rows(), Mode::Paging);
    let mut session = session_for(&server.endpoint);
    let mut criteria = Map::new();
    criteria.insert("searchCriteria".to_string(), json!({"name": "%"}));

    let rows = session
        .list("listPhone", criteria, "phone")
        .expect("list");

    assert_eq!(rows.len(), 237);
    assert_eq!(rows.first(), Some(&json!({"pkid": "id-000"})));
    assert_eq!(rows.last(), Some(&json!({"pkid": "id-236"})));
    assert_eq!(server.requests(), 25);
}

#[test]
fn unauthorized_is_not_retried_over_http() {
    let server = rpc_server::start(reference_rows(), Mode::Unauthorized);
    let mut session = session_for(&server.endpoint);

    let err = session.query("SELECT pkid FROM device").unwrap_err();

    assert!(matches!(err, FetchError::Authentication { .. }), "{err}");
    assert_eq!(server.requests(), 1);
}
