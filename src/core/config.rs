use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://api.frankfurter.dev/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FrankfurterProviderConfig {
    #[serde(default = "default_api_base")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FrankfurterProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub frankfurter: FrankfurterProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Objects are written to `{root}/{bucket}/{key}`
    Disk { root: String },
    /// Objects are sent with `PUT {endpoint}/{bucket}/{key}`
    Http { endpoint: String },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Disk {
            root: ".".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl AppConfig {
    /// Loads the config at `path`, or the default config file when it exists.
    /// Falls back to built-in defaults otherwise.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let default_path = Self::default_config_path()?;
        if default_path.exists() {
            debug!("Loading default config");
            Self::load_from_path(&default_path)
        } else {
            debug!(
                "No config at {}, using built-in defaults",
                default_path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxingest", "fxingest")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
