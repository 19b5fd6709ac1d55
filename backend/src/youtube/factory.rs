//! Video source factory.
//!
//! Picks the live API client or the in-memory source from configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use super::error::{SourceError, SourceResult};
use super::local::LocalSource;
use super::source::VideoSource;
use crate::config::AppConfig;

/// Video source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// YouTube Data API v3
    YouTube,
    /// In-memory source, optionally loaded from a JSON fixture
    Local,
}

impl FromStr for SourceType {
    type Err = String;

    /// Parse a source type ("youtube", "local").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" | "yt" => Ok(Self::YouTube),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown source type: {}", s)),
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::YouTube => write!(f, "youtube"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl SourceType {
    /// Get the source type from the `SOURCE_TYPE` environment variable.
    ///
    /// Defaults to YouTube when an API key is present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("SOURCE_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("YT_API_KEY").is_ok_and(|k| !k.is_empty()) {
            Self::YouTube
        } else {
            Self::Local
        }
    }
}

/// Factory for video source instances.
pub struct SourceFactory;

impl SourceFactory {
    /// Create the source selected by `config`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn VideoSource>)` - Shared source instance
    /// * `Err(SourceError::ConfigurationError)` - Missing key, unreadable fixture
    ///   or a source type whose feature is disabled
    pub fn create(config: &AppConfig) -> SourceResult<Arc<dyn VideoSource>> {
        let source_type = config
            .source_type()
            .map_err(|e| SourceError::configuration(e.to_string()))?;
        info!(source = %source_type, "Creating video source");

        match source_type {
            SourceType::YouTube => {
                #[cfg(feature = "youtube-source")]
                {
                    let client = super::client::YouTubeSource::new(&config.youtube)?;
                    Ok(Arc::new(client) as Arc<dyn VideoSource>)
                }
                #[cfg(not(feature = "youtube-source"))]
                {
                    Err(SourceError::configuration(
                        "YouTube source feature not enabled",
                    ))
                }
            }
            SourceType::Local => {
                let source = match &config.local.fixture_path {
                    Some(path) => LocalSource::from_fixture_file(path)?,
                    None => LocalSource::new(),
                };
                Ok(Arc::new(source) as Arc<dyn VideoSource>)
            }
        }
    }

    /// Create an empty in-memory source.
    pub fn create_local() -> Arc<dyn VideoSource> {
        Arc::new(LocalSource::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_source_type_from_str() {
        assert_eq!(SourceType::from_str("local").unwrap(), SourceType::Local);
        assert_eq!(SourceType::from_str("YouTube").unwrap(), SourceType::YouTube);
        assert_eq!(SourceType::from_str("yt").unwrap(), SourceType::YouTube);
        assert!(SourceType::from_str("postgres").is_err());
        assert_eq!(SourceType::YouTube.to_string(), "youtube");
    }

    #[tokio::test]
    async fn test_create_local_source() {
        let source = SourceFactory::create_local();
        assert!(source.health_check().await.unwrap());
    }

    #[test]
    fn test_local_with_missing_fixture() {
        let mut config = AppConfig::default();
        config.source.source_type = "local".to_string();
        config.local.fixture_path = Some(PathBuf::from("/no/such/fixture.json"));
        assert!(matches!(
            SourceFactory::create(&config),
            Err(SourceError::ConfigurationError { .. })
        ));
    }

    #[cfg(feature = "youtube-source")]
    #[test]
    fn test_youtube_requires_key() {
        let config = AppConfig::default();
        assert!(SourceFactory::create(&config).is_err());

        let mut config = AppConfig::default();
        config.youtube.api_key = "key".to_string();
        assert!(SourceFactory::create(&config).is_ok());
    }
}
