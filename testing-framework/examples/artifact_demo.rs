// Example: Artifact Collection Demo
//
// Runs a small registry with one failing and one hung case, then saves the
// report as an artifact and prints its summary and replay command.
//
// Run this example with:
//   cargo run -p feedreader-testing-framework --example artifact_demo

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use feedreader_testing_framework::prelude::*;
use feedreader_testing_framework::utilities::{
    load_artifact, print_artifact_summary, ArtifactCollector,
};
use parking_lot::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║            Artifact Collection System Demo                     ║");
    println!("╚════════════════════════════════════════════════════════════════╝\n");

    // Step 1: Register suites
    println!("1. Registering suites...");
    let parked: Arc<Mutex<Vec<Done>>> = Arc::new(Mutex::new(Vec::new()));
    let mut registry = Registry::new();
    registry
        .describe("Arithmetic", |s| {
            s.it("adds", |ctx| {
                ctx.expect(1 + 1).to_be(2);
            });
            s.it("compares", |ctx| {
                ctx.expect(0).to_be_greater_than(0);
            });
            Ok(())
        })
        .describe("Slow source", |s| {
            let parked = parked.clone();
            s.it_async("never answers", move |_, done| parked.lock().push(done))
                .timeout(Duration::from_millis(200));
            Ok(())
        });

    // Step 2: Run
    println!("2. Running...\n");
    let runner = Runner::new(RunnerConfig::default())?;
    let mut collector = ArtifactCollector::new("artifact_demo", runner.config().clone());
    let report = runner.run(registry).await;
    report.print();

    collector.capture_log("INFO", format!("{} suites executed", report.suites.len()));
    collector.set_report(report);

    // Step 3: Save artifact
    println!("\n3. Saving artifact...");
    let temp_dir = std::env::temp_dir().join("feedreader_artifacts");
    let artifact_path = collector.save(&temp_dir).await?;
    println!("   ✅ Artifact saved to: {}\n", artifact_path.display());

    // Step 4: Load and display artifact
    println!("4. Loading and displaying artifact...\n");
    let loaded_artifact = load_artifact(&artifact_path).await?;
    print_artifact_summary(&loaded_artifact);

    println!("\n5. Cleanup:");
    std::fs::remove_file(&artifact_path)?;
    println!("   ✅ Artifact file removed");

    Ok(())
}
