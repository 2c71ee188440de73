//! HTTP/JSON transport over libcurl.
//!
//! Each operation is a `POST <endpoint>/<operation>` with a JSON body
//! `{"operation": ..., "arguments": [...]}`. One curl handle is kept for the
//! session so the connection is reused across pages and retries.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use super::envelope::parse_response;
use super::Transport;
use crate::config::CfgsyncConfig;
use crate::fault::RemoteFault;

/// Blocking HTTP transport. Call from `spawn_blocking` if used from async code.
pub struct HttpTransport {
    easy: curl::easy::Easy,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(cfg: &CfgsyncConfig) -> Result<Self> {
        let mut endpoint = cfg.endpoint_url()?;
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let mut easy = curl::easy::Easy::new();
        easy.post(true)?;
        easy.follow_location(false)?;
        easy.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))?;
        easy.timeout(Duration::from_secs(cfg.request_timeout_secs))?;
        if !cfg.verify_tls {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }
        if let Some(user) = &cfg.username {
            easy.username(user)?;
            if let Some(password) = cfg.resolve_password() {
                easy.password(&password)?;
            }
        }

        let mut list = curl::easy::List::new();
        list.append("Content-Type: application/json")?;
        list.append("Accept: application/json")?;
        // Suppress `Expect: 100-continue`.
        list.append("Expect:")?;
        for (k, v) in &cfg.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        easy.http_headers(list).context("setting request headers")?;

        Ok(Self { easy, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn operation_url(&self, operation: &str) -> Result<Url, RemoteFault> {
        self.endpoint.join(operation).map_err(|e| {
            RemoteFault::new(format!("invalid operation name {operation:?}: {e}"))
                .with_code("Client")
        })
    }
}

/// Turn a curl error into a fault whose message the classifier understands.
fn curl_fault(e: curl::Error) -> RemoteFault {
    let prefix = if e.is_couldnt_connect() {
        "connection refused"
    } else if e.is_operation_timedout() {
        "timed out"
    } else if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        "could not resolve host"
    } else if e.is_recv_error() || e.is_send_error() || e.is_got_nothing() || e.is_read_error() {
        "connection reset"
    } else {
        "transport error"
    };
    RemoteFault::new(format!("{prefix}: {e}")).with_code(format!("curl:{}", e.code()))
}

impl Transport for HttpTransport {
    fn call(&mut self, operation: &str, arguments: &[Value]) -> Result<Value, RemoteFault> {
        let url = self.operation_url(operation)?;
        let body = serde_json::to_vec(&json!({
            "operation": operation,
            "arguments": arguments,
        }))
        .map_err(|e| RemoteFault::new(format!("cannot encode request: {e}")).with_code("Client"))?;

        self.easy.url(url.as_str()).map_err(curl_fault)?;
        self.easy.post_fields_copy(&body).map_err(curl_fault)?;

        let mut response = Vec::new();
        {
            let mut transfer = self.easy.transfer();
            transfer
                .write_function(|data| {
                    response.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(curl_fault)?;
            transfer.perform().map_err(curl_fault)?;
        }

        let status = self.easy.response_code().map_err(curl_fault)?;
        tracing::trace!(operation, status, bytes = response.len(), "rpc response");
        parse_response(status, &response)
    }
}
