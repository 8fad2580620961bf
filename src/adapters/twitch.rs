// Twitch adapter — archived broadcasts (past streams saved as VODs).
//
// Helix needs an app access token even for public data, so each run does a
// client-credentials exchange, resolves the login to a user id, then lists
// archive videos.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::Adapter;
use crate::activity::{parse_timestamp, Activity, Platform};
use crate::config::Config;
use crate::http;

pub const DEFAULT_AUTH_URL: &str = "https://id.twitch.tv";
pub const DEFAULT_API_URL: &str = "https://api.twitch.tv";

const VIDEO_LIMIT: &str = "10";

pub struct TwitchAdapter {
    client: reqwest::Client,
    auth_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    user_login: String,
}

impl TwitchAdapter {
    pub fn new(client_id: &str, client_secret: &str, user_login: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            user_login: user_login.to_lowercase(),
        })
    }

    /// Requires the client id, client secret and the channel's login name.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match (
            config.twitch_client_id.as_deref(),
            config.twitch_client_secret.as_deref(),
            config.twitch_user_login.as_deref(),
        ) {
            (Some(id), Some(secret), Some(login)) => Ok(Some(Self::new(id, secret, login)?)),
            _ => Ok(None),
        }
    }

    pub fn with_base_urls(mut self, auth_url: &str, api_url: &str) -> Self {
        self.auth_url = http::normalize_base_url(auth_url);
        self.api_url = http::normalize_base_url(api_url);
        self
    }

    async fn app_access_token(&self) -> Result<String> {
        let url = format!("{}/oauth2/token", self.auth_url);
        let request = self.client.post(&url).form(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ]);

        let token: TokenResponse = http::fetch_json(request, "Twitch token exchange")
            .await
            .context("Failed to obtain Twitch app access token")?;
        Ok(token.access_token)
    }

    /// GET a Helix endpoint with the headers every Helix call needs.
    async fn helix_get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        params: &[(&str, &str)],
    ) -> Result<HelixResponse<T>> {
        let url = format!("{}/helix/{}", self.api_url, path);
        let request = self
            .client
            .get(&url)
            .header("Client-Id", &self.client_id)
            .bearer_auth(token)
            .query(params);

        http::fetch_json(request, &format!("Twitch helix/{path}")).await
    }
}

#[async_trait]
impl Adapter for TwitchAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let token = self.app_access_token().await?;

        let users: HelixResponse<User> = self
            .helix_get("users", &token, &[("login", self.user_login.as_str())])
            .await?;
        let user = users
            .data
            .first()
            .ok_or_else(|| anyhow::anyhow!("Twitch user {} not found", self.user_login))?;

        let videos: HelixResponse<Video> = self
            .helix_get(
                "videos",
                &token,
                &[
                    ("user_id", user.id.as_str()),
                    ("type", "archive"),
                    ("first", VIDEO_LIMIT),
                ],
            )
            .await?;

        let activities = map_videos(&videos.data);

        info!(platform = "Twitch", count = activities.len(), "Mapped Twitch broadcasts");

        Ok(activities)
    }
}

/// One Activity per archived broadcast, dated by when the stream started.
pub fn map_videos(videos: &[Video]) -> Vec<Activity> {
    videos
        .iter()
        .filter_map(|video| {
            let timestamp = parse_timestamp(&video.created_at)?;
            let content = if video.title.trim().is_empty() {
                "streamed on Twitch".to_string()
            } else {
                format!("streamed: {}", video.title)
            };
            Some(Activity::new(Platform::Twitch, content, &video.url, timestamp))
        })
        .collect()
}

// -- Serde types for the OAuth and Helix APIs --

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
pub struct HelixResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub url: String,
    pub created_at: String,
}
