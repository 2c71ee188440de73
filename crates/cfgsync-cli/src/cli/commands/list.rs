//! `cfgsync list <operation> --result-key <key>` – fetch a whole collection.

use anyhow::{Context, Result};
use cfgsync_core::config::CfgsyncConfig;
use serde_json::{Map, Value};

use super::{open_session, parse_json_arg, print_records};

/// Build the argument record for a list call.
pub(super) fn list_record(criteria: &str, returned_tags: Option<&str>) -> Result<Map<String, Value>> {
    let mut record = Map::new();
    let criteria = parse_json_arg("--criteria", criteria)?;
    if !criteria.is_object() {
        anyhow::bail!("--criteria must be a JSON object");
    }
    record.insert("searchCriteria".to_string(), criteria);
    if let Some(tags) = returned_tags {
        record.insert("returnedTags".to_string(), parse_json_arg("--returned-tags", tags)?);
    }
    Ok(record)
}

pub async fn run_list(
    cfg: &CfgsyncConfig,
    operation: &str,
    result_key: &str,
    criteria: &str,
    returned_tags: Option<&str>,
) -> Result<()> {
    let record = list_record(criteria, returned_tags)?;
    let rows = tokio::task::spawn_blocking({
        let cfg = cfg.clone();
        let operation = operation.to_string();
        let result_key = result_key.to_string();
        move || -> Result<Vec<Value>> {
            let mut session = open_session(&cfg)?;
            Ok(session.list(&operation, record, &result_key)?)
        }
    })
    .await
    .context("list task join")??;
    tracing::info!("{} returned {} records", operation, rows.len());
    print_records(&rows)
}
