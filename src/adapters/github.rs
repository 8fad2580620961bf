// GitHub adapter — public account events.
//
// Uses the REST events endpoint for a user. Only pushes, new repositories
// and stars are worth a timeline entry; everything else (issue comments,
// branch creation, forks...) is dropped during mapping.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use super::Adapter;
use crate::activity::{parse_timestamp, Activity, Platform};
use crate::config::Config;
use crate::http;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// How many events to request per run.
const EVENTS_PER_PAGE: &str = "30";

pub struct GitHubAdapter {
    client: reqwest::Client,
    base_url: String,
    username: String,
    token: Option<String>,
}

impl GitHubAdapter {
    pub fn new(username: &str, token: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            base_url: DEFAULT_API_URL.to_string(),
            username: username.to_string(),
            token: token.map(String::from),
        })
    }

    /// Requires a username; the token and API root are optional.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(username) = config.github_username.as_deref() else {
            return Ok(None);
        };
        let adapter = Self::new(username, config.github_token.as_deref())?;
        Ok(Some(match config.github_api_url.as_deref() {
            Some(url) => adapter.with_base_url(url),
            None => adapter,
        }))
    }

    /// Point the adapter at a different API host (tests, GitHub Enterprise).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = http::normalize_base_url(base_url);
        self
    }
}

#[async_trait]
impl Adapter for GitHubAdapter {
    fn platform(&self) -> Platform {
        Platform::GitHub
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let url = format!("{}/users/{}/events", self.base_url, self.username);

        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", EVENTS_PER_PAGE)])
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let events: Vec<GitHubEvent> = http::fetch_json(request, "GitHub events").await?;
        let activities = map_events(&events);

        info!(
            platform = "GitHub",
            events = events.len(),
            count = activities.len(),
            "Mapped GitHub events"
        );

        Ok(activities)
    }
}

/// Map raw events, dropping every kind that doesn't produce an Activity.
pub fn map_events(events: &[GitHubEvent]) -> Vec<Activity> {
    events.iter().filter_map(map_event).collect()
}

/// Map one event. Returns `None` for event kinds the timeline ignores and
/// for events with an unparseable timestamp.
pub fn map_event(event: &GitHubEvent) -> Option<Activity> {
    let repo = &event.repo.name;
    let repo_url = format!("https://github.com/{repo}");

    let (content, url) = match event.kind.as_str() {
        "PushEvent" => {
            let commits = event.payload.size.or_else(|| {
                (!event.payload.commits.is_empty()).then_some(event.payload.commits.len() as u64)
            });
            let content = match commits {
                Some(1) => format!("pushed 1 commit to {repo}"),
                Some(n) => format!("pushed {n} commits to {repo}"),
                None => format!("pushed to {repo}"),
            };
            let url = match &event.payload.head {
                Some(sha) => format!("{repo_url}/commit/{sha}"),
                None => repo_url,
            };
            (content, url)
        }
        "CreateEvent" if event.payload.ref_type.as_deref() == Some("repository") => {
            (format!("created repository {repo}"), repo_url)
        }
        "WatchEvent" => (format!("starred {repo}"), repo_url),
        _ => return None,
    };

    let timestamp = parse_timestamp(&event.created_at)?;
    Some(Activity::new(Platform::GitHub, content, url, timestamp))
}

// -- Serde types for GET /users/{user}/events --

/// One entry from the public events feed. Only the fields the mapping
/// needs are deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: EventPayload,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepo {
    /// `owner/name`
    pub name: String,
}

/// The union of payload fields used across the kept event kinds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    /// CreateEvent: "repository", "branch" or "tag"
    pub ref_type: Option<String>,
    /// PushEvent: number of commits in the push
    pub size: Option<u64>,
    /// PushEvent: commit summaries (older payloads)
    #[serde(default)]
    pub commits: Vec<serde_json::Value>,
    /// PushEvent: SHA of the most recent commit after the push
    pub head: Option<String>,
}
