//! CLI for cfgsync.

mod commands;

use anyhow::Result;
use cfgsync_core::config::{self, CfgsyncConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_call, run_config_path, run_list, run_query};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cfgsync")]
#[command(about = "cfgsync: bulk list and query fetches against a remote configuration service", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/cfgsync/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every object returned by a list operation.
    List {
        /// Operation name, e.g. listPhone.
        operation: String,
        /// Response field holding the collection, e.g. phone.
        #[arg(long, value_name = "KEY")]
        result_key: String,
        /// Search criteria as a JSON object.
        #[arg(long, default_value = "{}", value_name = "JSON")]
        criteria: String,
        /// Returned tags as a JSON object.
        #[arg(long, value_name = "JSON")]
        returned_tags: Option<String>,
    },

    /// Run a raw SELECT and print every row.
    Query {
        /// SQL text; must start with SELECT to be paged.
        sql: String,
        /// Response field holding the rows.
        #[arg(long, default_value = "row", value_name = "KEY")]
        result_key: String,
    },

    /// Issue a single operation (no paging) and print the response.
    Call {
        /// Operation name.
        operation: String,
        /// Positional argument as JSON; repeat for several.
        #[arg(long = "arg", value_name = "JSON")]
        args: Vec<String>,
    },

    /// Print the default config file location.
    ConfigPath,
}

fn load_config(path: Option<&PathBuf>) -> Result<CfgsyncConfig> {
    let cfg = match path {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config for endpoint {}", cfg.endpoint);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_file = cli.config;
        let load = || load_config(config_file.as_ref());

        match cli.command {
            CliCommand::List {
                operation,
                result_key,
                criteria,
                returned_tags,
            } => {
                run_list(
                    &load()?,
                    &operation,
                    &result_key,
                    &criteria,
                    returned_tags.as_deref(),
                )
                .await?
            }
            CliCommand::Query { sql, result_key } => run_query(&load()?, &sql, &result_key).await?,
            CliCommand::Call { operation, args } => run_call(&load()?, &operation, &args).await?,
            CliCommand::ConfigPath => run_config_path()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
