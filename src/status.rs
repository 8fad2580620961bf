// Configuration status display — which platforms will run, and whether the
// Gist sink is ready. Reads only the Config; makes no requests.

use colored::Colorize;

use crate::activity::Platform;
use crate::adapters::is_configured;
use crate::config::Config;

/// Display platform and sink status to the terminal.
pub fn show(config: &Config) {
    println!("{}", "Platforms:".bold());
    for platform in Platform::ALL {
        let status = if is_configured(config, platform) {
            "configured".green()
        } else {
            "skipped (credentials not set)".dimmed()
        };
        println!("  {:<12} {}", platform.as_str(), status);
    }

    let configured = Platform::ALL
        .iter()
        .filter(|p| is_configured(config, **p))
        .count();
    println!("  {configured} of {} platforms will run", Platform::ALL.len());

    println!("\n{}", "Sink:".bold());
    match config.require_gist() {
        Ok((gist_id, _)) => println!(
            "  Gist {} ({}) {}",
            gist_id,
            config.gist_filename,
            "configured".green()
        ),
        Err(_) => {
            println!("  Gist {}", "not configured".yellow());
            println!("    Set GIST_ID and GIST_TOKEN, or use `timeline run --output <PATH>`");
        }
    }
}
