use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use timeline::adapters;
use timeline::config::Config;
use timeline::output::terminal;
use timeline::pipeline::{
    self, RunOptions, DEFAULT_TIMEOUT_SECS, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
};
use timeline::sink::{FileSink, GistSink, Sink, StdoutSink};

/// Timeline: recent public activity from every platform, in one JSON document.
///
/// Polls each configured platform, keeps the last week of activity, and
/// writes it to a GitHub Gist (or a local file).
#[derive(Parser)]
#[command(name = "timeline", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch all platforms, merge, and write the timeline
    Run {
        /// Write to this local file instead of the Gist
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the document to stdout instead of writing it anywhere
        #[arg(long, conflicts_with = "output")]
        dry_run: bool,

        /// Keep activity from this many trailing days (default: 7)
        #[arg(
            long,
            default_value_t = DEFAULT_WINDOW_DAYS,
            value_parser = clap::value_parser!(i64).range(1..=MAX_WINDOW_DAYS)
        )]
        window_days: i64,

        /// Give up on a platform after this many seconds (default: 30)
        #[arg(
            long,
            default_value_t = DEFAULT_TIMEOUT_SECS,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        timeout_secs: u64,
    },

    /// Show which platforms are configured and where the timeline goes
    Platforms,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config first: it loads .env, which may set RUST_LOG
    let config = Config::load();

    // Logs go to stderr so `run --dry-run` output stays clean JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("timeline=info")),
        )
        .init();

    let result = match config {
        Ok(config) => dispatch(cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run {
            output,
            dry_run,
            window_days,
            timeout_secs,
        } => {
            // Validate the destination before any platform is contacted.
            let sink = build_sink(&config, output, dry_run)?;
            let adapters = adapters::build_adapters(&config)?;

            let options = RunOptions {
                window: chrono::Duration::days(window_days),
                adapter_timeout: Duration::from_secs(timeout_secs),
                ..RunOptions::default()
            };

            info!(
                platforms = adapters.len(),
                destination = %sink.describe(),
                "Starting timeline run"
            );

            let pb = ProgressBar::new(adapters.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  Fetching [{bar:30}] {pos}/{len} ({elapsed})")?,
            );

            let summary = pipeline::run(&adapters, sink.as_ref(), &options, &pb).await;
            pb.finish_and_clear();
            let summary = summary?;

            if !dry_run {
                terminal::display_reports(&summary.reports);
                terminal::display_timeline(&summary.timeline);
                println!("\n{} {}", "Timeline written to".bold(), sink.describe());
            }
        }

        Commands::Platforms => {
            timeline::status::show(&config);
        }
    }

    Ok(())
}

/// Pick the sink for this run. The Gist is the default destination, so its
/// credentials are only mandatory when neither --output nor --dry-run is given.
fn build_sink(config: &Config, output: Option<PathBuf>, dry_run: bool) -> Result<Box<dyn Sink>> {
    if dry_run {
        return Ok(Box::new(StdoutSink));
    }
    if let Some(path) = output {
        return Ok(Box::new(FileSink::new(path)));
    }

    let (gist_id, token) = config.require_gist()?;
    let sink = GistSink::new(gist_id, token, &config.gist_filename)?;
    Ok(Box::new(match config.github_api_url.as_deref() {
        Some(url) => sink.with_base_url(url),
        None => sink,
    }))
}
