// Activity model — the one record type that flows through the pipeline.
//
// Adapters create Activities, the pipeline sorts and windows them, and the
// sinks serialize them. Nothing mutates an Activity after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of platforms an Activity can come from.
///
/// Serialized with the platform's own spelling of its name, which is what
/// readers of the timeline document display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    GitHub,
    YouTube,
    Mastodon,
    Bluesky,
    Spotify,
    Twitch,
    #[serde(rename = "note")]
    Note,
    Tumblr,
    Vimeo,
    SoundCloud,
}

impl Platform {
    /// Every platform, in the order adapters are registered.
    pub const ALL: [Platform; 10] = [
        Platform::GitHub,
        Platform::YouTube,
        Platform::Mastodon,
        Platform::Bluesky,
        Platform::Spotify,
        Platform::Twitch,
        Platform::Note,
        Platform::Tumblr,
        Platform::Vimeo,
        Platform::SoundCloud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GitHub => "GitHub",
            Platform::YouTube => "YouTube",
            Platform::Mastodon => "Mastodon",
            Platform::Bluesky => "Bluesky",
            Platform::Spotify => "Spotify",
            Platform::Twitch => "Twitch",
            Platform::Note => "note",
            Platform::Tumblr => "Tumblr",
            Platform::Vimeo => "Vimeo",
            Platform::SoundCloud => "SoundCloud",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user action on one platform, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub platform: Platform,
    /// Display text. Never contains `<` or `>`; build it through [`Activity::new`].
    pub content: String,
    pub url: String,
    /// Serialized as an RFC 3339 string.
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    /// Build an Activity, dropping angle brackets from `content`.
    ///
    /// HTML sources are expected to have run [`strip_markup`] already; this
    /// only enforces the bracket-free invariant without deleting text.
    ///
    /// [`strip_markup`]: crate::text::strip_markup
    pub fn new(
        platform: Platform,
        content: impl AsRef<str>,
        url: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            platform,
            content: crate::text::strip_angle_brackets(content.as_ref()),
            url: url.into(),
            timestamp,
        }
    }
}

/// Parse an RFC 3339 timestamp from an API response into UTC.
///
/// Returns `None` for anything unparseable; adapters drop those records
/// rather than emit an Activity the pipeline can't order.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Serialize activities as the pretty-printed JSON document every sink writes.
pub fn to_document(activities: &[Activity]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(activities)?)
}
