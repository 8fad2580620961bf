// YouTube adapter — latest uploads for a channel via the Data API search
// endpoint. Titles come back HTML-entity-encoded (`&#39;`), which the
// Activity constructor decodes.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::Adapter;
use crate::activity::{parse_timestamp, Activity, Platform};
use crate::config::Config;
use crate::http;
use crate::text::strip_markup;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com";

const MAX_RESULTS: &str = "10";

pub struct YouTubeAdapter {
    client: reqwest::Client,
    base_url: String,
    channel_id: String,
    api_key: String,
}

impl YouTubeAdapter {
    pub fn new(channel_id: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            base_url: DEFAULT_API_URL.to_string(),
            channel_id: channel_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Requires both the channel id and an API key.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match (
            config.youtube_channel_id.as_deref(),
            config.youtube_api_key.as_deref(),
        ) {
            (Some(channel_id), Some(api_key)) => Ok(Some(Self::new(channel_id, api_key)?)),
            _ => Ok(None),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = http::normalize_base_url(base_url);
        self
    }
}

#[async_trait]
impl Adapter for YouTubeAdapter {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let url = format!("{}/youtube/v3/search", self.base_url);

        let request = self.client.get(&url).query(&[
            ("part", "snippet"),
            ("channelId", self.channel_id.as_str()),
            ("maxResults", MAX_RESULTS),
            ("order", "date"),
            ("type", "video"),
            ("key", self.api_key.as_str()),
        ]);

        let response: SearchResponse = http::fetch_json(request, "YouTube search").await?;
        let activities = map_search_results(&response);

        info!(platform = "YouTube", count = activities.len(), "Mapped YouTube uploads");

        Ok(activities)
    }
}

/// One Activity per search hit that is a video with a parseable publish time.
pub fn map_search_results(response: &SearchResponse) -> Vec<Activity> {
    response
        .items
        .iter()
        .filter_map(|item| {
            let video_id = item.id.video_id.as_deref()?;
            let timestamp = parse_timestamp(&item.snippet.published_at)?;
            Some(Activity::new(
                Platform::YouTube,
                format!("published a video: {}", strip_markup(&item.snippet.title)),
                format!("https://www.youtube.com/watch?v={video_id}"),
                timestamp,
            ))
        })
        .collect()
}

// -- Serde types for GET /youtube/v3/search --

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemId {
    /// Absent for channel and playlist hits.
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub published_at: String,
    pub title: String,
}
