// Feed-based adapters — note, Tumblr, Vimeo and SoundCloud.
//
// These platforms expose a public RSS feed per account, so one adapter
// covers all four. An RssSource says which feed to read and how to word
// each entry; feed-rs handles RSS and Atom alike.

use anyhow::{Context, Result};
use async_trait::async_trait;
use feed_rs::model::{Entry, Feed};
use tracing::info;

use super::Adapter;
use crate::activity::{Activity, Platform};
use crate::config::Config;
use crate::http;
use crate::text::{strip_markup, truncate_chars};

/// Most-recent entries kept per feed.
pub const MAX_ENTRIES: usize = 5;

/// Tumblr posts often have no title; summaries are cut to this length.
const MAX_SUMMARY_CHARS: usize = 100;

/// One account's feed on one feed-based platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssSource {
    pub platform: Platform,
    pub feed_url: String,
}

impl RssSource {
    /// Build the feed source for `platform` from its identifier in the config.
    /// Returns `None` if the platform isn't feed-based or isn't configured.
    pub fn from_config(config: &Config, platform: Platform) -> Option<Self> {
        let feed_url = match platform {
            Platform::Note => {
                let user = config.note_username.as_deref()?;
                format!("https://note.com/{user}/rss")
            }
            Platform::Tumblr => {
                let blog = config.tumblr_blog.as_deref()?;
                format!("https://{blog}.tumblr.com/rss")
            }
            Platform::Vimeo => {
                let user = config.vimeo_username.as_deref()?;
                format!("https://vimeo.com/{user}/videos/rss")
            }
            Platform::SoundCloud => {
                let user_id = config.soundcloud_user_id.as_deref()?;
                format!("https://feeds.soundcloud.com/users/soundcloud:users:{user_id}/sounds.rss")
            }
            _ => return None,
        };

        Some(Self { platform, feed_url })
    }
}

pub struct RssAdapter {
    client: reqwest::Client,
    source: RssSource,
}

impl RssAdapter {
    pub fn new(source: RssSource) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            source,
        })
    }

    pub fn source(&self) -> &RssSource {
        &self.source
    }
}

#[async_trait]
impl Adapter for RssAdapter {
    fn platform(&self) -> Platform {
        self.source.platform
    }

    async fn fetch(&self) -> Result<Vec<Activity>> {
        let what = format!("{} feed", self.source.platform);
        let response = http::send_checked(self.client.get(&self.source.feed_url), &what).await?;
        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read {what} body"))?;

        let activities = parse_feed(self.source.platform, &body)?;

        info!(
            platform = %self.source.platform,
            count = activities.len(),
            "Mapped feed entries"
        );

        Ok(activities)
    }
}

/// Parse an RSS/Atom document and map its most recent entries.
pub fn parse_feed(platform: Platform, body: &[u8]) -> Result<Vec<Activity>> {
    let feed = feed_rs::parser::parse(body)
        .with_context(|| format!("Failed to parse {platform} RSS/Atom feed"))?;
    Ok(map_feed(platform, &feed))
}

/// Map the [`MAX_ENTRIES`] most recent dated entries of a feed.
///
/// Entries without a publish or update time can't be placed on the
/// timeline and are skipped.
pub fn map_feed(platform: Platform, feed: &Feed) -> Vec<Activity> {
    let mut dated: Vec<(&Entry, chrono::DateTime<chrono::Utc>)> = feed
        .entries
        .iter()
        .filter_map(|entry| entry.published.or(entry.updated).map(|ts| (entry, ts)))
        .collect();

    dated.sort_by(|a, b| b.1.cmp(&a.1));
    dated.truncate(MAX_ENTRIES);

    dated
        .into_iter()
        .map(|(entry, timestamp)| {
            Activity::new(
                platform,
                entry_content(platform, entry),
                entry_url(entry),
                timestamp,
            )
        })
        .collect()
}

fn entry_content(platform: Platform, entry: &Entry) -> String {
    let title = entry
        .title
        .as_ref()
        .map(|t| strip_markup(&t.content))
        .filter(|t| !t.is_empty());

    match platform {
        Platform::Note => format!("published an article: {}", title.unwrap_or_default()),
        Platform::Vimeo => format!("uploaded a video: {}", title.unwrap_or_default()),
        Platform::SoundCloud => format!("uploaded a track: {}", title.unwrap_or_default()),
        _ => {
            let text = title.or_else(|| {
                entry
                    .summary
                    .as_ref()
                    .map(|s| truncate_chars(&strip_markup(&s.content), MAX_SUMMARY_CHARS))
                    .filter(|s| !s.is_empty())
            });
            match text {
                Some(text) => format!("posted: {text}"),
                None => format!("posted on {platform}"),
            }
        }
    }
}

/// First link of the entry, falling back to an id that looks like a URL.
fn entry_url(entry: &Entry) -> String {
    entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_else(|| entry.id.clone())
}
