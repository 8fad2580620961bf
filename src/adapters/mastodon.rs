// Mastodon adapter — recent public statuses for one account.
//
// Statuses are public on every instance, so no token is needed: resolve the
// account id from the username, then list its statuses with replies and
// boosts excluded. Status bodies are HTML and get stripped and truncated.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::Adapter;
use crate::activity::{parse_timestamp, Activity, Platform};
use crate::config::Config;
use crate::http;
use crate::text::{strip_markup, truncate_chars};

/// Status text longer than this is cut with "...".
pub const MAX_CONTENT_CHARS: usize = 100;

const STATUS_LIMIT: &str = "20";

pub struct MastodonAdapter {
    client: reqwest::Client,
    instance_url: String,
    username: String,
}

impl MastodonAdapter {
    /// `instance` may be a bare host (`mastodon.social`) or a full URL.
    pub fn new(instance: &str, username: &str) -> Result<Self> {
        let instance_url = if instance.starts_with("http://") || instance.starts_with("https://") {
            http::normalize_base_url(instance)
        } else {
            format!("https://{}", http::normalize_base_url(instance))
        };

        Ok(Self {
            client: http::build_client()?,
            instance_url,
            username: username.trim_start_matches('@').to_string(),
        })
    }

    /// Requires the instance and the account username.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match (
            config.mastodon_instance.as_deref(),
            config.mastodon_username.as_deref(),
        ) {
            (Some(instance), Some(username)) => Ok(Some(Self::new(instance, username)?)),
            _ => Ok(None),
        }
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    async fn lookup_account_id(&self) -> Result<String> {
        let url = format!("{}/api/v1/accounts/lookup", self.instance_url);
        let request = self.client.get(&url).query(&[("acct", self.username.as_str())]);

        let account: Account = http::fetch_json(request, "Mastodon account lookup")
            .await
            .with_context(|| format!("Failed to resolve Mastodon account @{}", self.username))?;

        debug!(account_id = %account.id, "Resolved Mastodon account");
        Ok(account.id)
    }
}

#[async_trait]
impl Adapter for MastodonAdapter {
    fn platform(&self) -> Platform {
        Platform::Mastodon
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let account_id = self.lookup_account_id().await?;

        let url = format!(
            "{}/api/v1/accounts/{}/statuses",
            self.instance_url, account_id
        );
        let request = self.client.get(&url).query(&[
            ("exclude_replies", "true"),
            ("exclude_reblogs", "true"),
            ("limit", STATUS_LIMIT),
        ]);

        let statuses: Vec<Status> = http::fetch_json(request, "Mastodon statuses").await?;
        let activities = map_statuses(&statuses);

        info!(platform = "Mastodon", count = activities.len(), "Mapped Mastodon statuses");

        Ok(activities)
    }
}

/// Map statuses, skipping boosts and replies even if the server ignored the
/// exclude filters.
pub fn map_statuses(statuses: &[Status]) -> Vec<Activity> {
    statuses
        .iter()
        .filter(|s| s.reblog.is_none() && s.in_reply_to_id.is_none())
        .filter_map(|status| {
            let timestamp = parse_timestamp(&status.created_at)?;
            let text = strip_markup(&status.content);
            let content = if text.is_empty() {
                "posted a status".to_string()
            } else {
                format!("posted: {}", truncate_chars(&text, MAX_CONTENT_CHARS))
            };
            let url = status.url.clone().unwrap_or_else(|| status.uri.clone());
            Some(Activity::new(Platform::Mastodon, content, url, timestamp))
        })
        .collect()
}

// -- Serde types for the accounts API --

#[derive(Debug, Deserialize)]
struct Account {
    id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub id: String,
    pub created_at: String,
    /// HTML body
    pub content: String,
    pub url: Option<String>,
    pub uri: String,
    /// Present (non-null) on boosts
    pub reblog: Option<serde_json::Value>,
    pub in_reply_to_id: Option<String>,
}
