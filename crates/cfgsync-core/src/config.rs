use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

fn default_connect_timeout_secs() -> u64 {
    15
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_verify_tls() -> bool {
    true
}

/// Connection settings loaded from `~/.config/cfgsync/config.toml`.
///
/// Retry and paging limits are not configurable; see `retry` and `paging`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgsyncConfig {
    /// Base URL of the RPC service; operations are posted to `<endpoint>/<operation>`.
    pub endpoint: String,
    /// User for HTTP basic auth (None = no auth).
    #[serde(default)]
    pub username: Option<String>,
    /// Password for HTTP basic auth. Prefer `password_env` over storing it here.
    #[serde(default)]
    pub password: Option<String>,
    /// Environment variable holding the password, read when `password` is unset.
    #[serde(default)]
    pub password_env: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds, per page.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Verify the server certificate and host name.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Extra HTTP headers sent with every call.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for CfgsyncConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://localhost:8443/rpc/".to_string(),
            username: None,
            password: None,
            password_env: Some("CFGSYNC_PASSWORD".to_string()),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            verify_tls: default_verify_tls(),
            headers: BTreeMap::new(),
        }
    }
}

impl CfgsyncConfig {
    /// Parsed endpoint; must be http or https.
    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.endpoint)
            .with_context(|| format!("invalid endpoint URL {:?}", self.endpoint))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => anyhow::bail!("endpoint scheme must be http or https, got {other}"),
        }
    }

    /// Password from the config, else from the `password_env` variable.
    pub fn resolve_password(&self) -> Option<String> {
        self.password.clone().or_else(|| {
            self.password_env
                .as_deref()
                .and_then(|var| std::env::var(var).ok())
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("cfgsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<CfgsyncConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: CfgsyncConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.endpoint_url()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CfgsyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CfgsyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
