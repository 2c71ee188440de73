//! Minimal HTTP/1.1 JSON RPC server for integration tests.
//!
//! Serves a fixed row set through `executeQuery` (raw SQL with an optional
//! `SKIP n FIRST m` clause) and `listPhone` (argument record with optional
//! `skip`/`first`). Requests without a window are rejected with a throttle
//! fault, like a server enforcing a row ceiling.

use serde_json::{json, Map, Value};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

pub const THROTTLED: &str = "Query request too large. Total rows matched: 237 rows. \
                             Suggestive Row Fetch: less than 50 rows";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Throttle unpaged requests, serve paged ones.
    Paging,
    /// Answer every request with a bare 401.
    Unauthorized,
}

pub struct RpcServer {
    /// Base endpoint, e.g. "http://127.0.0.1:12345/rpc".
    pub endpoint: String,
    requests: Arc<AtomicUsize>,
}

impl RpcServer {
    /// Requests served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(rows: Vec<Value>, mode: Mode) -> RpcServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let rows = Arc::new(rows);
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let rows = Arc::clone(&rows);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &rows, mode, &counter));
        }
    });
    RpcServer {
        endpoint: format!("http://127.0.0.1:{}/rpc", port),
        requests,
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Read one request; returns (path, body).
fn read_request(stream: &mut TcpStream) -> Option<(String, Vec<u8>)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };
    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let path = head.split_whitespace().nth(1)?.to_string();
    Some((path, buf[header_end..header_end + content_length].to_vec()))
}

fn handle(mut stream: TcpStream, rows: &[Value], mode: Mode, requests: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(5)));
    let Some((path, body)) = read_request(&mut stream) else {
        return;
    };
    requests.fetch_add(1, Ordering::SeqCst);

    let (status, reason, payload) = match mode {
        Mode::Unauthorized => (401, "Unauthorized", String::new()),
        Mode::Paging => respond(rows, &path, &body),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn query_window(sql: &str) -> Option<(usize, usize)> {
    let tokens: Vec<&str> = sql.split_whitespace().collect();
    let i = tokens.iter().position(|t| t.eq_ignore_ascii_case("SKIP"))?;
    let skip = tokens.get(i + 1)?.parse().ok()?;
    let first = tokens.get(i + 3)?.parse().ok()?;
    Some((skip, first))
}

fn list_window(record: &Map<String, Value>) -> Option<(usize, usize)> {
    let skip = record.get("skip")?.as_u64()? as usize;
    let first = record.get("first")?.as_u64()? as usize;
    Some((skip, first))
}

fn respond(rows: &[Value], path: &str, body: &[u8]) -> (u32, &'static str, String) {
    let Ok(request) = serde_json::from_slice::<Value>(body) else {
        return (400, "Bad Request", String::new());
    };
    let operation = request["operation"].as_str().unwrap_or_default();
    if !path.ends_with(&format!("/{operation}")) {
        return (404, "Not Found", String::new());
    }
    let first_arg = &request["arguments"][0];
    let (window, key) = match operation {
        "executeQuery" => (first_arg.as_str().and_then(query_window), "row"),
        "listPhone" => (first_arg.as_object().and_then(list_window), "phone"),
        _ => return (404, "Not Found", String::new()),
    };
    match window {
        None => {
            let fault = json!({"fault": {"message": THROTTLED, "code": "Server"}});
            (500, "Internal Server Error", fault.to_string())
        }
        Some((skip, first)) => {
            let start = skip.min(rows.len());
            let end = (skip + first).min(rows.len());
            let mut result = Map::new();
            result.insert(key.to_string(), Value::Array(rows[start..end].to_vec()));
            (200, "OK", json!({ "return": result }).to_string())
        }
    }
}
