// Sinks — where the finished timeline goes.
//
// A sink receives the merged timeline once per run and replaces whatever it
// held before. Write failures are the run's only fatal error, so sinks
// report them rather than logging and carrying on.

pub mod file;
pub mod gist;

use anyhow::Result;
use async_trait::async_trait;

use crate::activity::{to_document, Activity};

pub use file::FileSink;
pub use gist::GistSink;

/// Trait for persisting the timeline document.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Replace the stored document with `activities`, all or nothing.
    async fn write(&self, activities: &[Activity]) -> Result<()>;

    /// Human-readable destination for logs ("gist abc123", a file path...).
    fn describe(&self) -> String;
}

/// Prints the document instead of storing it (`timeline run --dry-run`).
pub struct StdoutSink;

#[async_trait]
impl Sink for StdoutSink {
    async fn write(&self, activities: &[Activity]) -> Result<()> {
        println!("{}", to_document(activities)?);
        Ok(())
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}
