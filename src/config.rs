use std::env;

use anyhow::{Context, Result};

/// GitHub account whose public events are collected unless overridden.
pub const DEFAULT_GITHUB_USERNAME: &str = "MuraseRyosuke";

/// YouTube channel whose uploads are collected unless overridden.
pub const DEFAULT_YOUTUBE_CHANNEL_ID: &str = "UCYnXDiX1IXfr7IfmtKGZd7w";

/// File name inside the Gist that holds the timeline document.
pub const DEFAULT_GIST_FILENAME: &str = "timeline.json";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). `load` reads a .env
/// file first via dotenvy. Every platform field is
/// optional. An adapter whose fields are missing is simply not built.
/// Only the Gist fields are mandatory, and only for a Gist run.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub gist_id: Option<String>,
    pub gist_token: Option<String>,
    pub gist_filename: String,

    /// GitHub REST API root, for GitHub Enterprise. Used by the GitHub
    /// adapter and the Gist sink. Unset means api.github.com.
    pub github_api_url: Option<String>,

    pub github_username: Option<String>,
    /// Optional. Raises the API rate limit but public events work without it.
    pub github_token: Option<String>,

    pub youtube_channel_id: Option<String>,
    pub youtube_api_key: Option<String>,

    /// Base URL of the Mastodon instance, e.g. `https://mastodon.social`
    pub mastodon_instance: Option<String>,
    pub mastodon_username: Option<String>,

    pub bluesky_handle: Option<String>,
    pub bluesky_app_password: Option<String>,

    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_refresh_token: Option<String>,

    pub twitch_client_id: Option<String>,
    pub twitch_client_secret: Option<String>,
    pub twitch_user_login: Option<String>,

    pub note_username: Option<String>,
    pub tumblr_blog: Option<String>,
    pub vimeo_username: Option<String>,
    pub soundcloud_user_id: Option<String>,
}

impl Config {
    /// Load `.env` from the working directory (if there is one), then read
    /// configuration from environment variables.
    ///
    /// Empty values count as unset, so a CI secret that exists but is blank
    /// doesn't switch an adapter on. Variables already in the environment
    /// win over `.env`. A `.env` that exists but doesn't parse is an error.
    pub fn load() -> Result<Self> {
        check_env_file(dotenvy::dotenv())?;
        Ok(Self::from_env())
    }

    /// Read configuration from the process environment only.
    pub fn from_env() -> Self {
        Self {
            gist_id: var("GIST_ID"),
            gist_token: var("GIST_TOKEN"),
            gist_filename: var("GIST_FILENAME")
                .unwrap_or_else(|| DEFAULT_GIST_FILENAME.to_string()),
            github_api_url: var("GITHUB_API_URL"),
            github_username: var("GITHUB_USERNAME")
                .or_else(|| Some(DEFAULT_GITHUB_USERNAME.to_string())),
            github_token: var("GH_API_TOKEN"),
            youtube_channel_id: var("YOUTUBE_CHANNEL_ID")
                .or_else(|| Some(DEFAULT_YOUTUBE_CHANNEL_ID.to_string())),
            youtube_api_key: var("YOUTUBE_API_KEY"),
            mastodon_instance: var("MASTODON_INSTANCE"),
            mastodon_username: var("MASTODON_USERNAME"),
            bluesky_handle: var("BLUESKY_HANDLE"),
            bluesky_app_password: var("BLUESKY_APP_PASSWORD"),
            spotify_client_id: var("SPOTIFY_CLIENT_ID"),
            spotify_client_secret: var("SPOTIFY_CLIENT_SECRET"),
            spotify_refresh_token: var("SPOTIFY_REFRESH_TOKEN"),
            twitch_client_id: var("TWITCH_CLIENT_ID"),
            twitch_client_secret: var("TWITCH_CLIENT_SECRET"),
            twitch_user_login: var("TWITCH_USER_LOGIN"),
            note_username: var("NOTE_USERNAME"),
            tumblr_blog: var("TUMBLR_BLOG"),
            vimeo_username: var("VIMEO_USERNAME"),
            soundcloud_user_id: var("SOUNDCLOUD_USER_ID"),
        }
    }

    /// Check that the Gist sink is configured and return `(gist_id, token)`.
    /// Call this before any run that writes to the Gist.
    pub fn require_gist(&self) -> Result<(&str, &str)> {
        match (self.gist_id.as_deref(), self.gist_token.as_deref()) {
            (Some(id), Some(token)) => Ok((id, token)),
            (id, token) => {
                let missing: Vec<&str> = [("GIST_ID", id), ("GIST_TOKEN", token)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| name)
                    .collect();
                anyhow::bail!(
                    "{} not set. Add it to your .env file or CI secrets,\n\
                     or pass --output <PATH> to write a local file instead.",
                    missing.join(" and ")
                );
            }
        }
    }
}

/// A missing .env file is fine; an unreadable or malformed one is not.
fn check_env_file<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).context("Failed to load .env file"),
    }
}

/// Read an env var, treating empty and whitespace-only values as unset.
fn var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
