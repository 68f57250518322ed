/// Catalog loading from a local file or over HTTP
use super::{load, LoadError, RawVideo, Video};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

/// Where the catalog file lives
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File(PathBuf),
    Url(Url),
}

impl CatalogSource {
    /// Resolve a source string.
    ///
    /// Absolute http(s) URLs are fetched directly. Anything else is joined
    /// onto `site_root` when one is given, or read from disk otherwise.
    pub fn resolve(source: &str, site_root: Option<&str>) -> Result<Self, LoadError> {
        if source.starts_with("http://") || source.starts_with("https://") {
            let url = Url::parse(source).map_err(|e| LoadError::InvalidSource(e.to_string()))?;
            return Ok(Self::Url(url));
        }

        match site_root {
            Some(root) => {
                let base = Url::parse(root).map_err(|e| LoadError::InvalidSource(e.to_string()))?;
                let url = base
                    .join(source)
                    .map_err(|e| LoadError::InvalidSource(e.to_string()))?;
                Ok(Self::Url(url))
            }
            None => Ok(Self::File(PathBuf::from(source))),
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Loads and builds the video catalog
#[derive(Clone)]
pub struct CatalogLoader {
    client: Client,
    link_prefix: String,
}

impl CatalogLoader {
    /// Create a new loader
    pub fn new(link_prefix: impl Into<String>, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_client(client, link_prefix)
    }

    /// Create a loader around an existing HTTP client
    pub fn with_client(client: Client, link_prefix: impl Into<String>) -> Self {
        Self {
            client,
            link_prefix: link_prefix.into(),
        }
    }

    /// Fetch the raw catalog records.
    ///
    /// `null` slots (left behind by failed ingestion items) are skipped.
    pub async fn fetch_raw(&self, source: &CatalogSource) -> Result<Vec<RawVideo>, LoadError> {
        let body = match source {
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
            CatalogSource::Url(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                response.text().await?
            }
        };

        let slots: Vec<Option<RawVideo>> = serde_json::from_str(&body)?;
        let total = slots.len();
        let items: Vec<RawVideo> = slots.into_iter().flatten().collect();
        if items.len() != total {
            warn!("⚠️ Skipped {} empty catalog entries", total - items.len());
        }

        debug!("Fetched {} raw catalog records from {}", items.len(), source);
        Ok(items)
    }

    /// Fetch and build the catalog
    pub async fn load(&self, source: &CatalogSource) -> Result<Vec<Video>, LoadError> {
        info!("📥 Loading catalog from {}", source);
        let raw = self.fetch_raw(source).await?;
        load(&raw, &self.link_prefix)
    }

    /// Fetch and build the catalog, logging any failure and falling back to an empty catalog
    pub async fn load_or_empty(&self, source: &CatalogSource) -> Vec<Video> {
        match self.load(source).await {
            Ok(videos) => videos,
            Err(e) => {
                error!("❌ Failed to load catalog from {}: {}", source, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_path_is_file() {
        let source = CatalogSource::resolve("public/videos.json", None).unwrap();
        assert_eq!(source, CatalogSource::File(PathBuf::from("public/videos.json")));
    }

    #[test]
    fn test_resolve_against_site_root() {
        let source = CatalogSource::resolve("./videos.json", Some("https://example.com/app/")).unwrap();
        match source {
            CatalogSource::Url(url) => assert_eq!(url.as_str(), "https://example.com/app/videos.json"),
            other => panic!("expected url, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_absolute_url_ignores_root() {
        let source =
            CatalogSource::resolve("https://cdn.example.com/videos.json", Some("https://example.com/")).unwrap();
        assert_eq!(source.to_string(), "https://cdn.example.com/videos.json");
    }

    #[test]
    fn test_resolve_rejects_bad_root() {
        assert!(matches!(
            CatalogSource::resolve("videos.json", Some("not a url")),
            Err(LoadError::InvalidSource(_))
        ));
    }
}
