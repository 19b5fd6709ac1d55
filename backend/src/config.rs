//! Application configuration file support.
//!
//! Settings are read from `grayband.toml` and then overridden from the
//! environment (`YT_API_KEY`, `SOURCE_TYPE`, `HOST`, `PORT`). Every section is
//! optional; missing values fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::BandWidth;
use crate::services::chart::Theme;
use crate::youtube::{SourceType, MAX_DETAIL_BATCH};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "GRAYBAND_CONFIG";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("No grayband.toml found in standard locations")]
    NotFound,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub youtube: YouTubeSettings,
    #[serde(default)]
    pub local: LocalSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub theme: Theme,
}

/// Video source selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(rename = "type", default = "default_source_type")]
    pub source_type: String,
}

/// YouTube Data API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Local fixture settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSettings {
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

/// Analysis defaults applied when a request leaves a field unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    #[serde(default = "default_max_videos")]
    pub max_videos: usize,
    #[serde(default)]
    pub band_width: BandWidth,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Below this many matching videos the type filter is dropped.
    #[serde(default = "default_min_reference_videos")]
    pub min_reference_videos: usize,
    /// Videos younger than this are left out of the benchmark.
    #[serde(default = "default_min_age_days")]
    pub min_age_days: u32,
}

/// HTTP server bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_source_type() -> String {
    "youtube".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_page_size() -> usize {
    50
}

fn default_max_videos() -> usize {
    10
}

fn default_horizon_days() -> u32 {
    30
}

fn default_min_reference_videos() -> usize {
    5
}

fn default_min_age_days() -> u32 {
    3
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            source_type: default_source_type(),
        }
    }
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_videos: default_max_videos(),
            band_width: BandWidth::default(),
            horizon_days: default_horizon_days(),
            min_reference_videos: default_min_reference_videos(),
            min_age_days: default_min_age_days(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from a TOML string and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(ConfigError)` if file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `grayband.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("grayband.toml"),
            PathBuf::from("backend/grayband.toml"),
            PathBuf::from("../grayband.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Resolve the effective configuration for a process.
    ///
    /// Uses `GRAYBAND_CONFIG` when set, otherwise the default search path,
    /// otherwise built-in defaults. Environment overrides are applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => match Self::from_default_location() {
                Ok(config) => config,
                Err(ConfigError::NotFound) => Self::default(),
                Err(e) => return Err(e),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("YT_API_KEY").filter(|k| !k.is_empty()) {
            self.youtube.api_key = key;
        }
        if let Some(source_type) = lookup("SOURCE_TYPE") {
            self.source.source_type = source_type;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a valid port number: {}", port)))?;
        }
        self.validate()
    }

    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source_type()?;

        let analysis = &self.analysis;
        if !(5..=50).contains(&analysis.max_videos) {
            return Err(ConfigError::Invalid(format!(
                "analysis.max_videos must be within 5..=50, got {}",
                analysis.max_videos
            )));
        }
        if analysis.horizon_days == 0 {
            return Err(ConfigError::Invalid(
                "analysis.horizon_days must be positive".to_string(),
            ));
        }
        if analysis.min_reference_videos == 0 {
            return Err(ConfigError::Invalid(
                "analysis.min_reference_videos must be positive".to_string(),
            ));
        }
        // Reference curves span `age` days; a zero-day curve cannot be generated.
        if analysis.min_age_days == 0 {
            return Err(ConfigError::Invalid(
                "analysis.min_age_days must be positive".to_string(),
            ));
        }
        if self.youtube.page_size == 0 || self.youtube.page_size > MAX_DETAIL_BATCH {
            return Err(ConfigError::Invalid(format!(
                "youtube.page_size must be within 1..={}, got {}",
                MAX_DETAIL_BATCH, self.youtube.page_size
            )));
        }
        Ok(())
    }

    /// Get the configured source type.
    pub fn source_type(&self) -> Result<SourceType, ConfigError> {
        SourceType::from_str(&self.source.source_type).map_err(ConfigError::Invalid)
    }

    /// Socket address string for the HTTP server.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
