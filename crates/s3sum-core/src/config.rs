use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::hasher::ContentAlgorithm;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per part (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.1 = 100ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.1,
            max_delay_secs: 5,
        }
    }
}

impl RetryConfig {
    /// Converts to the engine's retry policy. Non-finite or negative delays
    /// from a hand-edited config fall back to the built-in default.
    pub fn to_policy(&self) -> RetryPolicy {
        let base_delay = Duration::try_from_secs_f64(self.base_delay_secs)
            .unwrap_or(RetryPolicy::default().base_delay);
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay,
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/s3sum/config.toml`.
/// CLI flags override these values per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3sumConfig {
    /// Default part size in MiB (S3 multipart minimum is 5).
    pub part_size_mib: u64,
    /// Default number of concurrent part workers.
    pub threads: usize,
    /// Default content digest algorithm.
    #[serde(default)]
    pub algorithm: ContentAlgorithm,
    /// Render checksums as hex instead of base64.
    #[serde(default)]
    pub print_hex: bool,
    /// Optional retry policy for transient read failures; None disables retry.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for S3sumConfig {
    fn default() -> Self {
        Self {
            part_size_mib: 64,
            threads: 16,
            algorithm: ContentAlgorithm::Sha256,
            print_hex: false,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("s3sum")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<S3sumConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = S3sumConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: S3sumConfig = toml::from_str(&data)?;
    Ok(cfg)
}
