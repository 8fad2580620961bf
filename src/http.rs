// Shared HTTP plumbing for adapters and sinks.
//
// Every platform API is "GET some JSON, bail on non-2xx, deserialize". This
// wraps reqwest with that pattern so each adapter only describes its
// endpoints and its mapping.

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

/// User agent sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("timeline/", env!("CARGO_PKG_VERSION"));

/// Build the reqwest client every adapter and sink uses.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Send a request and fail on any non-2xx status, keeping the response body
/// in the error so API complaints (bad token, unknown channel) are visible.
pub async fn send_checked(request: RequestBuilder, what: &str) -> Result<Response> {
    let response = request
        .send()
        .await
        .with_context(|| format!("{what} request failed"))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("{what} returned {status}: {body}");
    }

    Ok(response)
}

/// Send a request and deserialize its JSON response.
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
    debug!(what = what, "HTTP JSON request");

    send_checked(request, what)
        .await?
        .json::<T>()
        .await
        .with_context(|| format!("Failed to deserialize {what} response"))
}

/// Trim a trailing slash so `format!("{base}/path")` never doubles it.
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
