// Spotify adapter — recently played tracks.
//
// Spotify has no public listening history, so this trades a long-lived
// refresh token for a short-lived access token on every run, then reads
// the play history. Repeat plays of the same track collapse to one entry.

use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::Adapter;
use crate::activity::{parse_timestamp, Activity, Platform};
use crate::config::Config;
use crate::http;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com";

/// Distinct tracks kept per run after deduplication.
pub const MAX_TRACKS: usize = 10;

const HISTORY_LIMIT: &str = "50";

pub struct SpotifyAdapter {
    client: reqwest::Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl SpotifyAdapter {
    pub fn new(client_id: &str, client_secret: &str, refresh_token: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Requires the client id, client secret and refresh token.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match (
            config.spotify_client_id.as_deref(),
            config.spotify_client_secret.as_deref(),
            config.spotify_refresh_token.as_deref(),
        ) {
            (Some(id), Some(secret), Some(refresh)) => Ok(Some(Self::new(id, secret, refresh)?)),
            _ => Ok(None),
        }
    }

    /// Point both the token exchange and the Web API at another host.
    pub fn with_base_urls(mut self, accounts_url: &str, api_url: &str) -> Self {
        self.accounts_url = http::normalize_base_url(accounts_url);
        self.api_url = http::normalize_base_url(api_url);
        self
    }

    /// Exchange the refresh token for an access token.
    async fn access_token(&self) -> Result<String> {
        let url = format!("{}/api/token", self.accounts_url);
        let request = self
            .client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
            ]);

        let token: TokenResponse = http::fetch_json(request, "Spotify token refresh")
            .await
            .context("Failed to refresh Spotify access token")?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl Adapter for SpotifyAdapter {
    fn platform(&self) -> Platform {
        Platform::Spotify
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let access_token = self.access_token().await?;

        let url = format!("{}/v1/me/player/recently-played", self.api_url);
        let request = self
            .client
            .get(&url)
            .bearer_auth(&access_token)
            .query(&[("limit", HISTORY_LIMIT)]);

        let history: RecentlyPlayed = http::fetch_json(request, "Spotify recently played").await?;
        let activities = map_play_history(&history.items);

        info!(
            platform = "Spotify",
            plays = history.items.len(),
            count = activities.len(),
            "Mapped Spotify play history"
        );

        Ok(activities)
    }
}

/// Deduplicate plays by track id (first occurrence wins, so the newest play
/// of each track is kept), then map at most [`MAX_TRACKS`] of them.
///
/// Plays without a track id (local files) can't be deduplicated and are
/// kept as-is.
pub fn map_play_history(plays: &[PlayHistory]) -> Vec<Activity> {
    let mut seen: HashSet<&str> = HashSet::new();

    plays
        .iter()
        .filter(|play| match play.track.id.as_deref() {
            Some(id) => seen.insert(id),
            None => true,
        })
        .filter_map(|play| {
            let timestamp = parse_timestamp(&play.played_at)?;
            Some(Activity::new(
                Platform::Spotify,
                play_content(&play.track),
                track_url(&play.track),
                timestamp,
            ))
        })
        .take(MAX_TRACKS)
        .collect()
}

fn play_content(track: &Track) -> String {
    let artists: Vec<&str> = track.artists.iter().map(|a| a.name.as_str()).collect();
    if artists.is_empty() {
        format!("listened to {}", track.name)
    } else {
        format!("listened to {} by {}", track.name, artists.join(", "))
    }
}

fn track_url(track: &Track) -> String {
    if let Some(url) = &track.external_urls.spotify {
        return url.clone();
    }
    match &track.id {
        Some(id) => format!("https://open.spotify.com/track/{id}"),
        None => "https://open.spotify.com/".to_string(),
    }
}

// -- Serde types for the token exchange and player API --

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentlyPlayed {
    #[serde(default)]
    pub items: Vec<PlayHistory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistory {
    pub track: Track,
    pub played_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Null for local files
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}
