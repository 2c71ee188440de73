//! `cfgsync call <operation> [--arg <json>]...` – one unpaged operation.

use anyhow::{Context, Result};
use cfgsync_core::config::CfgsyncConfig;
use serde_json::Value;

use super::{open_session, parse_json_arg, print_records};

pub async fn run_call(cfg: &CfgsyncConfig, operation: &str, args: &[String]) -> Result<()> {
    let arguments = args
        .iter()
        .map(|raw| parse_json_arg("--arg", raw))
        .collect::<Result<Vec<Value>>>()?;
    let response = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let operation = operation.to_string();
        move || -> Result<Value> {
            let mut session = open_session(&cfg)?;
            Ok(session.call(&operation, arguments)?)
        }
    })
    .await
    .context("call task join")??;
    print_records(std::slice::from_ref(&response))
}
