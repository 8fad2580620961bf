// Colored terminal output for run summaries.
//
// This module handles all terminal-specific formatting: colors and the
// per-platform table. main.rs delegates here after a run.

use colored::Colorize;

use crate::activity::Activity;
use crate::pipeline::{AdapterReport, Outcome};
use crate::text::truncate_chars;

/// Display how each adapter fared in this run.
pub fn display_reports(reports: &[AdapterReport]) {
    if reports.is_empty() {
        println!("No platforms configured. Run `timeline platforms` to see what's missing.");
        return;
    }

    println!("\n{}", "=== Platforms ===".bold());
    for report in reports {
        let status = match &report.outcome {
            Outcome::Ok => format!("{} activities", report.activities.len()).green(),
            Outcome::Failed(reason) => format!("failed: {}", truncate_chars(reason, 60)).red(),
            Outcome::TimedOut => "timed out".yellow(),
        };
        println!("  {:<12} {}", report.platform.as_str(), status);
    }

    let failed = reports
        .iter()
        .filter(|r| r.outcome != Outcome::Ok)
        .count();
    if failed > 0 {
        println!(
            "  {} {} of {} platforms contributed nothing",
            "!".bright_red(),
            failed,
            reports.len()
        );
    }
}

/// Display the merged timeline, newest first.
pub fn display_timeline(activities: &[Activity]) {
    println!(
        "\n{}",
        format!("=== Timeline ({} activities) ===", activities.len()).bold()
    );

    if activities.is_empty() {
        println!("  {}", "Nothing in the window.".dimmed());
        return;
    }

    for activity in activities {
        println!(
            "  {}  {:<10}  {}",
            activity
                .timestamp
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .dimmed(),
            activity.platform.as_str().cyan(),
            truncate_chars(&activity.content, 70),
        );
    }
}
