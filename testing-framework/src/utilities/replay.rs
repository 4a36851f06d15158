// File: testing-framework/src/utilities/replay.rs
//
// Artifact Replay Utilities
//
// Load a saved run artifact, summarise it and derive the command that
// re-runs only the cases that failed.

use super::artifacts::{ArtifactCollector, RunArtifact};
use anyhow::Result;
use std::path::Path;

/// Load artifact from disk
pub async fn load_artifact(filepath: impl AsRef<Path>) -> Result<RunArtifact> {
    ArtifactCollector::load(filepath).await
}

/// Print artifact summary to stdout
pub fn print_artifact_summary(artifact: &RunArtifact) {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║                 RUN FAILURE ARTIFACT SUMMARY                   ║");
    println!("╠════════════════════════════════════════════════════════════════╣");
    println!("║ Run Name:      {:47} ║", artifact.metadata.run_name);
    println!("║ Timestamp:     {:47} ║", artifact.metadata.timestamp);
    println!(
        "║ Duration:      {:47} ║",
        format!("{} ms", artifact.metadata.duration_ms)
    );
    println!(
        "║ Timeout:       {:47} ║",
        format!("{} ms", artifact.metadata.config.timeout_ms)
    );

    if let Some(ref reason) = artifact.metadata.failure_reason {
        println!("╠════════════════════════════════════════════════════════════════╣");
        println!("║ FAILURE REASON:                                                ║");
        for line in textwrap::wrap(reason, 62) {
            println!("║ {:62} ║", line);
        }
    }

    if let Some(ref report) = artifact.report {
        let summary = report.summary();
        println!("╠════════════════════════════════════════════════════════════════╣");
        println!(
            "║ Cases:         {:47} ║",
            format!(
                "{} passed, {} failed, {} timed out",
                summary.passed, summary.failed, summary.timed_out
            )
        );
        for name in report.failing_cases() {
            for line in textwrap::wrap(&format!("✗ {}", name), 60) {
                println!("║   {:60} ║", line);
            }
        }
    }

    if !artifact.logs.is_empty() {
        println!("╠════════════════════════════════════════════════════════════════╣");
        println!("║ RECENT LOGS (last 5):                                          ║");
        for log in artifact.logs.iter().rev().take(5).rev() {
            let msg: String = if log.message.chars().count() > 52 {
                format!("{}...", log.message.chars().take(49).collect::<String>())
            } else {
                log.message.clone()
            };
            println!("║ [{:5}] {:52} ║", log.level, msg);
        }
    }

    println!("╠════════════════════════════════════════════════════════════════╣");
    println!("║ REPLAY COMMAND:                                                ║");
    for line in textwrap::wrap(&get_replay_command(artifact), 62) {
        println!("║ {:62} ║", line);
    }
    println!("╚════════════════════════════════════════════════════════════════╝");
}

/// Command that re-runs the first failing case with the same timeout
/// and the recorded replay arguments
///
/// Falls back to the configured filter (or the whole run) when the
/// artifact holds no failing case.
pub fn get_replay_command(artifact: &RunArtifact) -> String {
    let mut cmd = format!(
        "feedreader-suite --timeout-ms {}",
        artifact.metadata.config.timeout_ms
    );

    for arg in &artifact.metadata.replay_args {
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            cmd.push_str(&format!(" \"{}\"", arg));
        } else {
            cmd.push(' ');
            cmd.push_str(arg);
        }
    }

    let filter = artifact
        .report
        .as_ref()
        .and_then(|r| r.failing_cases().first().map(|s| s.to_string()))
        .or_else(|| artifact.metadata.config.filter.clone());

    if let Some(filter) = filter {
        cmd.push_str(&format!(" --filter \"{}\"", filter));
    }
    cmd
}

/// Validate artifact integrity
pub fn validate_artifact(artifact: &RunArtifact) -> Result<()> {
    if artifact.metadata.run_name.is_empty() {
        anyhow::bail!("Artifact has empty run name");
    }

    if artifact.metadata.timestamp.is_empty() {
        anyhow::bail!("Artifact has empty timestamp");
    }

    if let Some(ref report) = artifact.report {
        for suite in &report.suites {
            for case in &suite.cases {
                if !case.full_name.starts_with(&suite.name) {
                    anyhow::bail!(
                        "Case '{}' does not belong to suite '{}'",
                        case.full_name,
                        suite.name
                    );
                }
            }
        }

        if report.success() && artifact.metadata.failure_reason.is_some() {
            anyhow::bail!("Artifact records a failure reason for a successful run");
        }
    }

    Ok(())
}
