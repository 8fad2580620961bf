// Fan-out over adapters: run them all at once, wait for every one.
//
// Each adapter gets its own timeout. Whatever goes wrong inside one adapter
// (HTTP error, bad credentials, unparseable response, timeout) is logged
// and turned into an empty contribution here, so nothing past this point
// ever sees an adapter error.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use tracing::{info, warn};

use crate::activity::{Activity, Platform};
use crate::adapters::Adapter;

/// How one adapter's fetch ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Failed(String),
    TimedOut,
}

/// One adapter's contribution to the run.
#[derive(Debug, Clone)]
pub struct AdapterReport {
    pub platform: Platform,
    /// Empty unless `outcome` is `Ok`
    pub activities: Vec<Activity>,
    pub outcome: Outcome,
}

/// Run every adapter concurrently and collect reports in adapter order.
///
/// Never fails: a failing or slow adapter yields an empty report.
pub async fn run_adapters(
    adapters: &[Box<dyn Adapter>],
    timeout: Duration,
    progress: &ProgressBar,
) -> Vec<AdapterReport> {
    // Every adapter in flight at once; there are at most ten.
    let concurrency = adapters.len().max(1);

    stream::iter(adapters.iter().map(|adapter| async move {
        let report = run_one(adapter.as_ref(), timeout).await;
        progress.inc(1);
        report
    }))
    .buffered(concurrency)
    .collect()
    .await
}

async fn run_one(adapter: &dyn Adapter, timeout: Duration) -> AdapterReport {
    let platform = adapter.platform();

    let (activities, outcome) = match tokio::time::timeout(timeout, adapter.fetch()).await {
        Ok(Ok(activities)) => {
            info!(platform = %platform, count = activities.len(), "Fetched activities");
            (activities, Outcome::Ok)
        }
        Ok(Err(e)) => {
            let message = format!("{e:#}");
            warn!(platform = %platform, error = %message, "Adapter failed, skipping");
            (Vec::new(), Outcome::Failed(message))
        }
        Err(_) => {
            warn!(
                platform = %platform,
                timeout_secs = timeout.as_secs(),
                "Adapter timed out, skipping"
            );
            (Vec::new(), Outcome::TimedOut)
        }
    };

    AdapterReport {
        platform,
        activities,
        outcome,
    }
}
