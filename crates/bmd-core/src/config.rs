use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Retry policy parameters for the transport (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of transport attempts per job (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/bmd/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmdConfig {
    /// Maximum number of downloads running at once.
    pub max_concurrent: usize,
    /// On-disk size poll interval for progress reporting, in milliseconds.
    pub progress_poll_ms: u64,
    /// Maximum redirect hops followed by probe and transport.
    pub max_redirects: u32,
    /// Connect timeout in seconds for probe and transport.
    pub connect_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for BmdConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 2,
            progress_poll_ms: 250,
            max_redirects: 10,
            connect_timeout_secs: 15,
            retry: None,
        }
    }
}

impl BmdConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.progress_poll_ms.max(1))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bmd")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BmdConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BmdConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: BmdConfig = toml::from_str(&data)?;
    Ok(cfg)
}
