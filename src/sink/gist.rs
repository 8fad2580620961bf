// GitHub Gist sink.
//
// One authenticated PATCH replaces a single file's content inside an
// existing gist. GitHub applies the update as one revision, so a rejected
// request leaves the previous revision as it was.
//
// API docs: https://docs.github.com/en/rest/gists/gists#update-a-gist

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::Sink;
use crate::activity::{to_document, Activity};
use crate::http;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

pub struct GistSink {
    client: reqwest::Client,
    base_url: String,
    gist_id: String,
    token: String,
    filename: String,
}

impl GistSink {
    pub fn new(gist_id: &str, token: &str, filename: &str) -> Result<Self> {
        Ok(Self {
            client: http::build_client()?,
            base_url: DEFAULT_API_URL.to_string(),
            gist_id: gist_id.to_string(),
            token: token.to_string(),
            filename: filename.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = http::normalize_base_url(base_url);
        self
    }
}

#[async_trait]
impl Sink for GistSink {
    async fn write(&self, activities: &[Activity]) -> Result<()> {
        let url = format!("{}/gists/{}", self.base_url, self.gist_id);

        let mut files = HashMap::new();
        files.insert(
            self.filename.as_str(),
            GistFile {
                content: to_document(activities)?,
            },
        );

        let request = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&GistUpdate { files });

        http::send_checked(request, "Gist update").await?;

        debug!(gist_id = %self.gist_id, file = %self.filename, "Gist updated");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("gist {} ({})", self.gist_id, self.filename)
    }
}

// -- Request body for PATCH /gists/{id} --

#[derive(Serialize)]
struct GistUpdate<'a> {
    files: HashMap<&'a str, GistFile>,
}

#[derive(Serialize)]
struct GistFile {
    content: String,
}
