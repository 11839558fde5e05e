// crates/globex-core/src/config.rs

//! Configuration for the pipeline.
//!
//! Loaded from a TOML file; every section and field has a default, so an
//! empty file (or no file) yields the stock endpoint chain.

use crate::error::{GlobexError, Result};
use crate::raw::SchemaFamily;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GLOBEX_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STORE_FILE_NAME: &str = "store.json";

pub const DEFAULT_REVERSE_GEOCODE_URL: &str =
    "https://api.bigdatacloud.net/data/reverse-geocode-client";

/// A candidate data source: URL plus the schema its payload uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub schema: SchemaFamily,
}

impl Source {
    pub fn new(url: impl Into<String>, schema: SchemaFamily) -> Self {
        Self {
            url: url.into(),
            schema,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub fallback: FallbackConfig,
    pub storage: StorageConfig,
    pub geolocation: GeolocationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Full-list endpoints, tried in order.
    pub all: Vec<Source>,
    /// Base URLs for single-country lookups (`{base}/name/..`, `{base}/alpha/..`).
    pub lookup: Vec<Source>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            all: vec![
                Source::new("https://restcountries.com/v3.1/all", SchemaFamily::V3),
                Source::new("https://restcountries.com/v2/all", SchemaFamily::V2),
                Source::new(
                    "https://api.allorigins.win/raw?url=https://restcountries.com/v3.1/all",
                    SchemaFamily::V3,
                ),
                Source::new(
                    "https://raw.githubusercontent.com/mledoze/countries/master/countries.json",
                    SchemaFamily::V3,
                ),
                Source::new("https://restcountries.eu/rest/v2/all", SchemaFamily::V2),
            ],
            lookup: vec![
                Source::new("https://restcountries.com/v3.1", SchemaFamily::V3),
                Source::new("https://restcountries.com/v2", SchemaFamily::V2),
                Source::new("https://restcountries.eu/rest/v2", SchemaFamily::V2),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout; a timed-out source counts as unreachable.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Use the dataset compiled into the crate.
    pub bundled: bool,
    /// External dataset (`.json` or `.json.gz`); takes precedence over `bundled`.
    pub path: Option<PathBuf>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            bundled: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key-value store file; defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(p) => Ok(p.clone()),
            None => project_dirs()
                .map(|dirs| dirs.data_dir().join(STORE_FILE_NAME))
                .ok_or_else(|| GlobexError::Config("could not determine a data directory".into())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub reverse_geocode_url: String,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            reverse_geocode_url: DEFAULT_REVERSE_GEOCODE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "globex", "globex")
}

impl Config {
    /// Resolves the config: explicit path, then `GLOBEX_CONFIG`, then the
    /// platform config file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        if let Some(path) = project_dirs().map(|d| d.config_dir().join(CONFIG_FILE_NAME)) {
            if path.is_file() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GlobexError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| GlobexError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.all.is_empty() {
            return Err(GlobexError::Config("sources.all must list at least one source".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(GlobexError::Config("fetch.timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
