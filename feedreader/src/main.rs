// Feed Reader Suite Runner
//
// Builds the simulated feed reader page, runs the four suites against it
// and prints the report. Exits with status 1 if any case failed, timed out
// or any suite could not be set up.
//
// Usage:
//   cargo run --bin feedreader-suite -- --latency-ms 200 --filter "New Feed"

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use feedreader::config::PageConfig;
use feedreader::suites;
use feedreader_testing_framework::utilities::{get_replay_command, ArtifactCollector};
use feedreader_testing_framework::prelude::LogReporter;
use feedreader_testing_framework::{Runner, RunnerConfig};

#[derive(Parser, Debug)]
#[command(name = "feedreader-suite")]
#[command(about = "Run the feed reader suites against the simulated page", long_about = None)]
struct Args {
    #[clap(flatten)]
    runner: RunnerConfig,

    #[clap(flatten)]
    page: PageConfig,

    /// Print the report as JSON instead of the boxed summary
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Save a JSON artifact here when the run fails
    #[arg(long)]
    artifacts_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let app = args.page.build().await?;
    if let Err(e) = app.init().await {
        warn!("Page initialisation failed: {}", e);
    }

    let mut collector = ArtifactCollector::new("feedreader", args.runner.clone())
        .with_replay_args(args.page.replay_args());
    let runner = Runner::new(args.runner.clone())
        .context("Invalid runner configuration")?
        .with_reporter(Arc::new(collector.reporter(Arc::new(LogReporter))));

    let report = runner.run(suites::registry(&app)).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        report.print();
    }

    if report.success() {
        return Ok(());
    }

    if let Some(dir) = &args.artifacts_dir {
        collector.set_report(report);
        let path = collector.save(dir).await?;
        info!("Artifact written to {}", path.display());
        info!("Replay: {}", get_replay_command(&collector.artifact()));
    }

    std::process::exit(1);
}
