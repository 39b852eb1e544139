use crate::core::valuation::MAX_CONCURRENT_FETCHES;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FinCatchProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub fincatch: Option<FinCatchProviderConfig>,
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            fincatch: Some(FinCatchProviderConfig {
                base_url: "http://localhost:3000".to_string(),
            }),
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
            }),
        }
    }
}

/// Wiring defaults for embedding applications. The engine functions take
/// their collaborators directly; nothing here is read at computation
/// time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Default display currency.
    pub currency: String,
    /// Override for the batch fan-out chunk size; see
    /// [`AppConfig::fan_out_chunk_size`].
    #[serde(default)]
    pub max_concurrent_fetches: Option<usize>,
}

impl AppConfig {
    /// Chunk size to pass to the batch operations,
    /// [`MAX_CONCURRENT_FETCHES`] unless overridden.
    pub fn fan_out_chunk_size(&self) -> usize {
        self.max_concurrent_fetches
            .unwrap_or(MAX_CONCURRENT_FETCHES)
            .max(1)
    }

    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "vnfolio")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_when_providers_absent() {
        let yaml_str = r#"
currency: "VND"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "VND");
        assert_eq!(config.max_concurrent_fetches, None);
        assert_eq!(
            config.providers.fincatch.unwrap().base_url,
            "http://localhost:3000"
        );
        assert_eq!(
            config.providers.yahoo.unwrap().base_url,
            "https://query1.finance.yahoo.com"
        );
    }

    #[test]
    fn test_config_deserialization_with_providers() {
        let yaml_str = r#"
providers:
  fincatch:
    base_url: "http://data.internal:3000"
  yahoo:
    base_url: "http://example.com/yahoo"
currency: "USD"
max_concurrent_fetches: 8
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.max_concurrent_fetches, Some(8));
        assert_eq!(
            config.providers.fincatch.unwrap().base_url,
            "http://data.internal:3000"
        );
        assert_eq!(
            config.providers.yahoo.unwrap().base_url,
            "http://example.com/yahoo"
        );
    }

    #[test]
    fn test_fan_out_chunk_size() {
        let mut config: AppConfig =
            serde_yaml::from_str("currency: \"VND\"\n").expect("Failed to deserialize");
        assert_eq!(config.fan_out_chunk_size(), MAX_CONCURRENT_FETCHES);

        config.max_concurrent_fetches = Some(8);
        assert_eq!(config.fan_out_chunk_size(), 8);

        // A nonsense zero never reaches the chunking code.
        config.max_concurrent_fetches = Some(0);
        assert_eq!(config.fan_out_chunk_size(), 1);
    }

    #[test]
    fn test_load_from_path() {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        fs::write(config_file.path(), "currency: \"EUR\"\n").expect("Failed to write config");

        let config = AppConfig::load_from_path(config_file.path()).expect("Failed to load");
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/nonexistent/vnfolio/config.yaml");
        assert!(result.is_err());
    }
}
