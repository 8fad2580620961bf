// The timeline pipeline: adapters -> merge -> sink.
//
// 1. Fetch from every configured adapter concurrently (fetch.rs)
// 2. Merge, sort and window the results (merge.rs)
// 3. Write the document once through the chosen sink
//
// Adapter failures stop at step 1. A sink failure is the only error that
// leaves this module.

pub mod fetch;
pub mod merge;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use tracing::info;

use crate::activity::Activity;
use crate::adapters::Adapter;
use crate::sink::Sink;

pub use fetch::{run_adapters, AdapterReport, Outcome};
pub use merge::{cutoff, merge, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

/// Default per-adapter time budget.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Run start time; the window is measured back from here.
    pub now: DateTime<Utc>,
    pub window: chrono::Duration,
    pub adapter_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            window: chrono::Duration::days(DEFAULT_WINDOW_DAYS),
            adapter_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<AdapterReport>,
    /// The merged timeline exactly as written to the sink.
    pub timeline: Vec<Activity>,
}

/// Run the whole pipeline once.
///
/// Always writes exactly one document (an empty array if every adapter came
/// back empty). Returns an error only if the sink write fails.
pub async fn run(
    adapters: &[Box<dyn Adapter>],
    sink: &dyn Sink,
    options: &RunOptions,
    progress: &ProgressBar,
) -> Result<RunSummary> {
    info!(adapters = adapters.len(), "Fetching activities");
    let reports = run_adapters(adapters, options.adapter_timeout, progress).await;

    let results: Vec<Vec<Activity>> = reports.iter().map(|r| r.activities.clone()).collect();
    let timeline = merge(results, options.now, options.window);
    info!(
        count = timeline.len(),
        cutoff = %cutoff(options.now, options.window),
        "Merged activities"
    );

    sink.write(&timeline)
        .await
        .with_context(|| format!("Failed to write timeline to {}", sink.describe()))?;
    info!(destination = %sink.describe(), count = timeline.len(), "Timeline written");

    Ok(RunSummary { reports, timeline })
}
