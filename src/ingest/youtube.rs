/// YouTube Data API client used for ingestion
use super::{IngestError, SearchPage, VideoSource};
use crate::catalog::RawVideo;
use crate::config::IngestConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the search and videos endpoints
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
    channel_id: String,
    published_after: String,
    max_results: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    published_at: String,
    title: String,
    #[serde(default)]
    description: String,
}

impl From<SearchResponse> for SearchPage {
    fn from(response: SearchResponse) -> Self {
        Self {
            video_ids: response.items.into_iter().filter_map(|item| item.id.video_id).collect(),
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        }
    }
}

impl From<VideoItem> for RawVideo {
    fn from(item: VideoItem) -> Self {
        Self {
            id: item.id,
            published_at: item.snippet.published_at,
            title: item.snippet.title,
            description: item.snippet.description,
        }
    }
}

impl YouTubeClient {
    /// Create a client from ingestion settings
    pub fn new(config: &IngestConfig) -> Result<Self, IngestError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| IngestError::Config("an API key is required for ingestion".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.api_url)?,
            api_key,
            channel_id: config.channel_id.clone(),
            published_after: config.published_after.clone(),
            max_results: config.max_results,
        })
    }

    fn search_url(&self, page_token: Option<&str>) -> Result<Url, IngestError> {
        let mut url = self.base_url.join("search")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("key", &self.api_key)
                .append_pair("channelId", &self.channel_id)
                .append_pair("part", "snippet,id")
                .append_pair("order", "date")
                .append_pair("maxResults", &self.max_results.to_string())
                .append_pair("publishedAfter", &self.published_after);
            if let Some(token) = page_token {
                query.append_pair("pageToken", token);
            }
        }
        Ok(url)
    }

    fn videos_url(&self, video_id: &str) -> Result<Url, IngestError> {
        let mut url = self.base_url.join("videos")?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("part", "snippet")
            .append_pair("id", video_id);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, IngestError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::Api { status, body });
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl VideoSource for YouTubeClient {
    async fn search_page(&self, page_token: Option<&str>) -> Result<SearchPage, IngestError> {
        debug!("Requesting search page {:?}", page_token);
        let response: SearchResponse = self.get_json(self.search_url(page_token)?).await?;
        Ok(response.into())
    }

    async fn video_details(&self, video_id: &str) -> Result<Option<RawVideo>, IngestError> {
        let response: VideosResponse = self.get_json(self.videos_url(video_id)?).await?;
        Ok(response.items.into_iter().next().map(RawVideo::from))
    }
}
