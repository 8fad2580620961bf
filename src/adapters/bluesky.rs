// Bluesky adapter — the account's own recent posts.
//
// Logs in with an app password (com.atproto.server.createSession), then
// reads the author feed with the session token. Reposts and replies are
// excluded: the server-side `posts_no_replies` filter handles most of it,
// and the mapping double-checks both the feed item and the post record.

use anyhow::{Context, Result};
use async_trait::async_trait;
use atrium_api::app::bsky::feed::{get_author_feed, post};
use atrium_api::types::string::Datetime;
use atrium_api::types::TryFromUnknown;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Adapter;
use crate::activity::{Activity, Platform};
use crate::config::Config;
use crate::http;
use crate::text::truncate_chars;

/// Default PDS entryway for session creation and authenticated reads.
pub const DEFAULT_SERVICE_URL: &str = "https://bsky.social";

/// Post text longer than this is cut with "...".
pub const MAX_CONTENT_CHARS: usize = 100;

const FEED_LIMIT: &str = "30";

pub struct BlueskyAdapter {
    client: reqwest::Client,
    service_url: String,
    handle: String,
    app_password: String,
}

impl BlueskyAdapter {
    pub fn new(handle: &str, app_password: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            handle: handle.trim_start_matches('@').to_string(),
            app_password: app_password.to_string(),
        })
    }

    /// Requires the handle and an app password.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match (
            config.bluesky_handle.as_deref(),
            config.bluesky_app_password.as_deref(),
        ) {
            (Some(handle), Some(password)) => Ok(Some(Self::new(handle, password)?)),
            _ => Ok(None),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.service_url = http::normalize_base_url(base_url);
        self
    }

    async fn create_session(&self) -> Result<Session> {
        let url = format!(
            "{}/xrpc/com.atproto.server.createSession",
            self.service_url
        );
        let request = self.client.post(&url).json(&CreateSessionRequest {
            identifier: &self.handle,
            password: &self.app_password,
        });

        let session: Session = http::fetch_json(request, "Bluesky createSession")
            .await
            .with_context(|| format!("Failed to log in as @{}", self.handle))?;

        debug!(did = %session.did, "Bluesky session created");
        Ok(session)
    }
}

#[async_trait]
impl Adapter for BlueskyAdapter {
    fn platform(&self) -> Platform {
        Platform::Bluesky
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let session = self.create_session().await?;

        let url = format!("{}/xrpc/app.bsky.feed.getAuthorFeed", self.service_url);
        let request = self
            .client
            .get(&url)
            .bearer_auth(&session.access_jwt)
            .query(&[
                ("actor", self.handle.as_str()),
                ("filter", "posts_no_replies"),
                ("limit", FEED_LIMIT),
            ]);

        let output: get_author_feed::Output =
            http::fetch_json(request, "app.bsky.feed.getAuthorFeed").await?;

        let posts = feed_posts(&output);
        let activities = map_posts(&self.handle, &posts);

        info!(
            platform = "Bluesky",
            feed_items = output.feed.len(),
            count = activities.len(),
            "Mapped Bluesky posts"
        );

        Ok(activities)
    }
}

/// A feed entry flattened to the fields the timeline cares about.
#[derive(Debug, Clone)]
pub struct FeedPost {
    /// AT URI, `at://did/app.bsky.feed.post/rkey`
    pub uri: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// The feed item is someone else's post reposted by this account.
    pub is_repost: bool,
    /// The post answers another post.
    pub is_reply: bool,
}

/// Flatten the typed author feed into [`FeedPost`]s.
///
/// The record field is an untyped IPLD value; it's decoded into the typed
/// post::Record to get the text, creation time and reply reference.
pub fn feed_posts(output: &get_author_feed::Output) -> Vec<FeedPost> {
    output
        .feed
        .iter()
        .map(|feed_item| {
            let post_view = &feed_item.post;
            let record = post::Record::try_from_unknown(post_view.record.clone()).ok();

            let (text, created_at, record_reply) = match &record {
                Some(record) => (
                    record.data.text.clone(),
                    to_utc(&record.data.created_at),
                    record.data.reply.is_some(),
                ),
                None => (String::new(), to_utc(&post_view.indexed_at), false),
            };

            FeedPost {
                uri: post_view.uri.clone(),
                text,
                created_at,
                is_repost: feed_item.reason.is_some(),
                is_reply: feed_item.reply.is_some() || record_reply,
            }
        })
        .collect()
}

/// Map the account's own top-level posts to Activities.
pub fn map_posts(handle: &str, posts: &[FeedPost]) -> Vec<Activity> {
    posts
        .iter()
        .filter(|p| !p.is_repost && !p.is_reply)
        .map(|p| {
            let content = if p.text.trim().is_empty() {
                "posted on Bluesky".to_string()
            } else {
                format!("posted: {}", truncate_chars(&p.text, MAX_CONTENT_CHARS))
            };
            Activity::new(
                Platform::Bluesky,
                content,
                post_web_url(handle, &p.uri),
                p.created_at,
            )
        })
        .collect()
}

/// Web link for a post: `https://bsky.app/profile/{handle}/post/{rkey}`.
pub fn post_web_url(handle: &str, at_uri: &str) -> String {
    let rkey = at_uri.rsplit('/').next().unwrap_or_default();
    format!("https://bsky.app/profile/{handle}/post/{rkey}")
}

fn to_utc(datetime: &Datetime) -> DateTime<Utc> {
    let dt: &DateTime<FixedOffset> = datetime.as_ref();
    dt.with_timezone(&Utc)
}

// -- Serde types for com.atproto.server.createSession --

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    access_jwt: String,
    did: String,
}
