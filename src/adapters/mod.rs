// Platform adapters — one per external service.
//
// Each adapter owns its identifiers, credentials and HTTP client, fetches
// from one platform, and maps the response into Activities. Adapters are
// built from the Config only when their required settings are present, so
// an unconfigured platform never makes a request and never fails the run.

pub mod bluesky;
pub mod github;
pub mod mastodon;
pub mod rss;
pub mod spotify;
pub mod twitch;
pub mod youtube;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::activity::{Activity, Platform};
use crate::config::Config;

/// Trait for fetching one platform's recent activity.
///
/// Implementations return an error for any network, auth or parse failure;
/// the pipeline is responsible for turning that into an empty contribution.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Which platform this adapter reports as.
    fn platform(&self) -> Platform;

    /// Fetch and map recent activity.
    async fn fetch(&self) -> Result<Vec<Activity>>;
}

/// Build every adapter whose required settings are present, in the fixed
/// platform order. Unconfigured platforms are logged and skipped.
pub fn build_adapters(config: &Config) -> Result<Vec<Box<dyn Adapter>>> {
    let mut adapters: Vec<Box<dyn Adapter>> = Vec::new();

    for platform in Platform::ALL {
        match build_adapter(config, platform)? {
            Some(adapter) => adapters.push(adapter),
            None => info!(platform = %platform, "Skipped: credentials not configured"),
        }
    }

    Ok(adapters)
}

/// Whether a platform has everything it needs to run. Used by
/// `timeline platforms`: builds nothing and touches no network.
pub fn is_configured(config: &Config, platform: Platform) -> bool {
    match platform {
        Platform::GitHub => config.github_username.is_some(),
        Platform::YouTube => {
            config.youtube_api_key.is_some() && config.youtube_channel_id.is_some()
        }
        Platform::Mastodon => {
            config.mastodon_instance.is_some() && config.mastodon_username.is_some()
        }
        Platform::Bluesky => {
            config.bluesky_handle.is_some() && config.bluesky_app_password.is_some()
        }
        Platform::Spotify => {
            config.spotify_client_id.is_some()
                && config.spotify_client_secret.is_some()
                && config.spotify_refresh_token.is_some()
        }
        Platform::Twitch => {
            config.twitch_client_id.is_some()
                && config.twitch_client_secret.is_some()
                && config.twitch_user_login.is_some()
        }
        Platform::Note | Platform::Tumblr | Platform::Vimeo | Platform::SoundCloud => {
            rss::RssSource::from_config(config, platform).is_some()
        }
    }
}

fn build_adapter(config: &Config, platform: Platform) -> Result<Option<Box<dyn Adapter>>> {
    Ok(match platform {
        Platform::GitHub => boxed(github::GitHubAdapter::from_config(config)?),
        Platform::YouTube => boxed(youtube::YouTubeAdapter::from_config(config)?),
        Platform::Mastodon => boxed(mastodon::MastodonAdapter::from_config(config)?),
        Platform::Bluesky => boxed(bluesky::BlueskyAdapter::from_config(config)?),
        Platform::Spotify => boxed(spotify::SpotifyAdapter::from_config(config)?),
        Platform::Twitch => boxed(twitch::TwitchAdapter::from_config(config)?),
        Platform::Note | Platform::Tumblr | Platform::Vimeo | Platform::SoundCloud => {
            match rss::RssSource::from_config(config, platform) {
                Some(source) => boxed(Some(rss::RssAdapter::new(source)?)),
                None => None,
            }
        }
    })
}

fn boxed<A: Adapter + 'static>(adapter: Option<A>) -> Option<Box<dyn Adapter>> {
    adapter.map(|a| Box::new(a) as Box<dyn Adapter>)
}
