use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::DEFAULT_VIDEO_LINK_PREFIX;
use crate::search::DEFAULT_FUZZY_THRESHOLD;

/// Configuration for the chapter search tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Catalog location and link settings
    pub catalog: CatalogConfig,

    /// Search tuning
    pub search: SearchConfig,

    /// Static file server settings
    pub server: ServerConfig,

    /// Ingestion job settings
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog file path or http(s) URL
    pub source: String,

    /// Base URL that relative sources are resolved against
    pub site_root: Option<String>,

    /// Prefix of every video's canonical link
    pub video_link_prefix: String,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum fuzzy distance for a chapter to match (0 = exact, 1 = anything)
    pub fuzzy_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Listening port
    pub port: u16,

    /// Directory holding the built UI
    pub static_dir: PathBuf,

    /// Document returned for paths that match no asset
    pub index_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IngestConfig {
    /// Video platform API base URL
    pub api_url: String,

    /// API key
    pub api_key: Option<String>,

    /// Channel whose uploads are ingested
    pub channel_id: String,

    /// Only videos published after this RFC 3339 timestamp are listed
    pub published_after: String,

    /// Search page size
    pub max_results: u32,

    /// Where the catalog file is written
    pub output_path: PathBuf,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "public/videos.json".to_string(),
            site_root: None,
            video_link_prefix: DEFAULT_VIDEO_LINK_PREFIX.to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            static_dir: PathBuf::from("build"),
            index_file: "index.html".to_string(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.googleapis.com/youtube/v3/".to_string(),
            api_key: None,
            channel_id: "UCwCkRo2WQx_9JRWISLC47fw".to_string(),
            published_after: "2022-02-23T00:00:00Z".to_string(),
            max_results: 50, // API maximum
            output_path: PathBuf::from("public/videos.json"),
            request_timeout_seconds: 30,
        }
    }
}

/// Files probed by [`Config::load`], in order
pub const CONFIG_PATHS: [&str; 2] = ["chapter-search.toml", "config/chapter-search.toml"];

impl Config {
    /// Load configuration from the first readable config file
    pub fn load() -> Result<Self> {
        for path in &CONFIG_PATHS {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Err(anyhow!("No configuration file found"))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Defaults with environment variable overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(source) = lookup("CHAPTER_SEARCH_CATALOG") {
            self.catalog.source = source;
        }

        if let Some(site_root) = lookup("CHAPTER_SEARCH_SITE_ROOT") {
            self.catalog.site_root = Some(site_root);
        }

        if let Some(api_key) = lookup("YOUTUBE_API_KEY") {
            self.ingest.api_key = Some(api_key);
        }

        if let Some(channel_id) = lookup("CHAPTER_SEARCH_CHANNEL_ID") {
            self.ingest.channel_id = channel_id;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_search()?;
        self.validate_server()?;
        self.validate_ingest()?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Validate the settings read by catalog search
    pub fn validate_search(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.search.fuzzy_threshold) {
            return Err(anyhow!(
                "fuzzy_threshold must be between 0 and 1, got {}",
                self.search.fuzzy_threshold
            ));
        }

        if self.catalog.source.is_empty() {
            return Err(anyhow!("catalog source must not be empty"));
        }

        Ok(())
    }

    /// Validate the static server settings
    pub fn validate_server(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(anyhow!("server port must be greater than 0"));
        }

        Ok(())
    }

    /// Validate the ingestion settings
    pub fn validate_ingest(&self) -> Result<()> {
        if self.ingest.max_results == 0 || self.ingest.max_results > 50 {
            return Err(anyhow!(
                "max_results must be between 1 and 50, got {}",
                self.ingest.max_results
            ));
        }

        chrono::DateTime::parse_from_rfc3339(&self.ingest.published_after)
            .with_context(|| format!("published_after is not RFC 3339: {}", self.ingest.published_after))?;

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Chapter Search Configuration:\n\
            - Catalog: {}\n\
            - Video Link Prefix: {}\n\
            - Fuzzy Threshold: {}\n\
            - Server: port {} serving {}\n\
            - Ingest Channel: {} (after {})",
            self.catalog.source,
            self.catalog.video_link_prefix,
            self.search.fuzzy_threshold,
            self.server.port,
            self.server.static_dir.display(),
            self.ingest.channel_id,
            self.ingest.published_after,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_catalog_source(mut self, source: impl Into<String>) -> Self {
        self.config.catalog.source = source.into();
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.config.search.fuzzy_threshold = threshold;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.search.fuzzy_threshold, 0.3);
        assert_eq!(config.catalog.video_link_prefix, "https://youtu.be/");
        assert!(config.ingest.api_key.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_port(8080)
            .with_fuzzy_threshold(0.1)
            .with_catalog_source("videos.json")
            .build();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.search.fuzzy_threshold, 0.1);
        assert_eq!(config.catalog.source, "videos.json");
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
        assert!(ConfigBuilder::new().with_fuzzy_threshold(1.5).build().validate().is_err());
        assert!(ConfigBuilder::new().with_port(0).build().validate().is_err());

        let mut config = Config::default();
        config.ingest.published_after = "last tuesday".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.ingest.max_results = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_section_validation_is_independent() {
        let mut config = Config::default();
        config.ingest.published_after = "last tuesday".to_string();
        config.ingest.max_results = 0;

        assert!(config.validate_search().is_ok());
        assert!(config.validate_server().is_ok());
        assert!(config.validate_ingest().is_err());

        let config = ConfigBuilder::new().with_fuzzy_threshold(-0.5).build();
        assert!(config.validate_search().is_err());
        assert!(config.validate_ingest().is_ok());

        let config = ConfigBuilder::new().with_catalog_source("").build();
        assert!(config.validate_search().is_err());
    }

    #[test]
    fn test_from_env_matches_defaults_with_env_applied() {
        let mut expected = Config::default();
        expected.apply_env();
        assert_eq!(Config::from_env().unwrap(), expected);
    }

    #[test]
    fn test_summary_lists_effective_settings() {
        let config = ConfigBuilder::new()
            .with_port(8080)
            .with_fuzzy_threshold(0.25)
            .with_catalog_source("https://example.com/videos.json")
            .build();
        let summary = config.summary();

        assert!(summary.starts_with("Chapter Search Configuration:"));
        assert!(summary.contains("- Catalog: https://example.com/videos.json"));
        assert!(summary.contains("- Fuzzy Threshold: 0.25"));
        assert!(summary.contains("- Server: port 8080 serving build"));
        assert!(summary.contains("- Ingest Channel: UCwCkRo2WQx_9JRWISLC47fw (after 2022-02-23T00:00:00Z)"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8081"),
            ("CHAPTER_SEARCH_CATALOG", "https://example.com/videos.json"),
            ("YOUTUBE_API_KEY", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.catalog.source, "https://example.com/videos.json");
        assert_eq!(config.ingest.api_key.as_deref(), Some("secret"));
        assert_eq!(config.ingest.channel_id, IngestConfig::default().channel_id);
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[server]\nport = 4000\n").unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.index_file, "index.html");
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_save_and_load_from() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapter-search.toml");
        let config = ConfigBuilder::new().with_port(5000).build();

        config.save(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
