// Local file sink.
//
// The document is written to a sibling temp file and renamed into place,
// so a crash or full disk mid-write leaves the previous timeline intact.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::Sink;
use crate::activity::{to_document, Activity};

/// File name used when no output path is given.
pub const DEFAULT_OUTPUT_FILE: &str = "timeline.json";

pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn write(&self, activities: &[Activity]) -> Result<()> {
        let document = to_document(activities)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, document.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;

        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e)
                .with_context(|| format!("Failed to move timeline into {}", self.path.display()));
        }

        debug!(path = %self.path.display(), bytes = document.len(), "Wrote timeline file");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
