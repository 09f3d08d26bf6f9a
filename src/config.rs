//! Configuration loading for the mdmint CLI.
//!
//! Configuration is loaded from a TOML file with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.mdmint/config.toml` (user)
//! 3. Built-in defaults
//!
//! Every section and key is optional.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CacheConfig, DEFAULT_TTL};
use crate::controller::{DEFAULT_DEBOUNCE, FileDraftStore};
use crate::providers::DEFAULT_LATENCY;
use crate::service::{Mdmint, MdmintBuilder};
use crate::{MdmintError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheSection,
    #[serde(default)]
    pub conversion: ConversionSection,
    #[serde(default)]
    pub drafts: DraftsSection,
    #[serde(default)]
    pub download: DownloadSection,
}

/// Response cache settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    /// Entry time-to-live in seconds (default: 3600).
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

/// Backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionSection {
    /// Simulated backend latency in milliseconds (default: 500).
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for ConversionSection {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

fn default_latency_ms() -> u64 {
    DEFAULT_LATENCY.as_millis() as u64
}

/// Draft persistence settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftsSection {
    /// Draft file (default: `<data dir>/mdmint/drafts.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Quiet period before a draft is written, in milliseconds (default: 1000).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for DraftsSection {
    fn default() -> Self {
        Self {
            path: None,
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

/// Download settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadSection {
    /// Directory downloads are written to (default: current directory).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided)
    /// 2. `~/.mdmint/config.toml`
    /// 3. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MdmintError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MdmintError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path, or `None` to use defaults.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MdmintError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mdmint").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }

    /// A service builder carrying the cache and backend settings.
    pub fn service_builder(&self) -> MdmintBuilder {
        Mdmint::builder()
            .cache(CacheConfig::new().ttl(Duration::from_secs(self.cache.ttl_secs)))
            .latency(Duration::from_millis(self.conversion.latency_ms))
    }

    /// Draft file location.
    pub fn drafts_path(&self) -> PathBuf {
        self.drafts
            .path
            .clone()
            .unwrap_or_else(FileDraftStore::default_path)
    }

    pub fn drafts_debounce(&self) -> Duration {
        Duration::from_millis(self.drafts.debounce_ms)
    }

    /// Download directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download
            .dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
