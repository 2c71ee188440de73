//! `cfgsync query <sql>` – run a raw SELECT, paging if the server asks.

use anyhow::{Context, Result};
use cfgsync_core::config::CfgsyncConfig;
use cfgsync_core::fetcher::QUERY_OPERATION;
use serde_json::Value;

use super::{open_session, print_records};

pub async fn run_query(cfg: &CfgsyncConfig, sql: &str, result_key: &str) -> Result<()> {
    let rows = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let sql = sql.to_string();
        let result_key = result_key.to_string();
        move || -> Result<Vec<Value>> {
            let mut session = open_session(&cfg)?;
            Ok(session.query_as(QUERY_OPERATION, &sql, &result_key)?)
        }
    })
    .await
    .context("query task join")??;
    tracing::info!("query returned {} rows", rows.len());
    print_records(&rows)
}
