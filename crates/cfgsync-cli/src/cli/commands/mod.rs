//! CLI command handlers. Each command is in its own file.

mod call;
mod config_path;
mod list;
mod query;

pub use call::run_call;
pub use config_path::run_config_path;
pub use list::run_list;
pub use query::run_query;

use anyhow::{Context, Result};
use cfgsync_core::config::CfgsyncConfig;
use cfgsync_core::transport::HttpTransport;
use cfgsync_core::Session;
use serde_json::Value;
use std::io::Write;

/// Open a session against the configured endpoint.
fn open_session(cfg: &CfgsyncConfig) -> Result<Session<HttpTransport>> {
    let transport = HttpTransport::new(cfg)
        .with_context(|| format!("setting up transport for {}", cfg.endpoint))?;
    Ok(Session::new(transport))
}

/// Parse a JSON command-line argument.
fn parse_json_arg(flag: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| format!("{flag} is not valid JSON: {raw}"))
}

/// Print records as JSON lines on stdout.
fn print_records(records: &[Value]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
