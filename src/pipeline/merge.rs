// Merge step: flatten, newest first, keep the trailing window.
//
// Pure — the caller supplies "now", so the same inputs always give the
// same timeline.

use chrono::{DateTime, Duration, Utc};

use crate::activity::Activity;

/// Default trailing window for the timeline.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Largest window the CLI accepts (about a century).
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Concatenate per-adapter results, sort newest first, and keep only
/// activities at or after `now - window`.
///
/// The sort is stable, so activities with equal timestamps keep their
/// concatenation order. No cross-platform deduplication happens here.
pub fn merge(results: Vec<Vec<Activity>>, now: DateTime<Utc>, window: Duration) -> Vec<Activity> {
    let cutoff = cutoff(now, window);

    let mut merged: Vec<Activity> = results
        .into_iter()
        .flatten()
        .filter(|a| a.timestamp >= cutoff)
        .collect();

    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}

/// Oldest timestamp the window keeps. A window reaching past the earliest
/// representable time keeps everything.
pub fn cutoff(now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
