// File: testing-framework/src/utilities/artifacts.rs
//
// Failure Artifact Collection
//
// A failing run can be saved as a JSON artifact holding the full report,
// the configuration it ran with and the log lines captured along the way.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::RunnerConfig;
use crate::report::{CaseReport, CaseStatus, RunReport, SuiteReport};
use crate::reporter::Reporter;

/// Run metadata for reproduction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Run name, used in the artifact filename
    pub run_name: String,
    /// Configuration the run used
    pub config: RunnerConfig,
    /// Extra command line arguments that shaped the run, e.g. page settings
    #[serde(default)]
    pub replay_args: Vec<String>,
    /// Timestamp when the artifact was created
    pub timestamp: String,
    /// Run duration (milliseconds)
    pub duration_ms: u64,
    /// Failure reason (if available)
    pub failure_reason: Option<String>,
}

/// Log entry captured during a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Log level (ERROR, WARN, INFO, DEBUG, TRACE)
    pub level: String,
    /// Log message
    pub message: String,
    /// Timestamp
    pub timestamp: String,
}

/// Complete run artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunArtifact {
    /// Run metadata
    pub metadata: RunMetadata,
    /// Report of the run (absent if the run never finished)
    pub report: Option<RunReport>,
    /// Captured logs
    pub logs: Vec<LogEntry>,
}

/// Artifact collector for capturing run state
///
/// # Examples
///
/// ```rust,ignore
/// use feedreader_testing_framework::utilities::artifacts::ArtifactCollector;
///
/// let mut collector = ArtifactCollector::new("feedreader", runner.config().clone());
/// let report = runner.run(registry).await;
/// if !report.success() {
///     collector.set_report(report);
///     collector.save("./artifacts/").await?;
/// }
/// ```
pub struct ArtifactCollector {
    metadata: RunMetadata,
    report: Option<RunReport>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    start_time: std::time::Instant,
}

impl ArtifactCollector {
    /// Create a new artifact collector for a run
    pub fn new(run_name: impl Into<String>, config: RunnerConfig) -> Self {
        Self {
            metadata: RunMetadata {
                run_name: run_name.into(),
                config,
                replay_args: Vec::new(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                duration_ms: 0,
                failure_reason: None,
            },
            report: None,
            logs: Arc::new(Mutex::new(Vec::new())),
            start_time: std::time::Instant::now(),
        }
    }

    /// Record the arguments needed to rebuild the run's environment
    pub fn with_replay_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metadata.replay_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Reporter that records failures into this collector's logs
    ///
    /// Every event is forwarded to `inner` as well.
    pub fn reporter(&self, inner: Arc<dyn Reporter>) -> CaptureReporter {
        CaptureReporter {
            logs: self.logs.clone(),
            inner,
        }
    }

    /// Set the failure reason
    pub fn set_failure_reason(&mut self, reason: String) {
        self.metadata.failure_reason = Some(reason);
    }

    /// Attach the run report
    ///
    /// Fills in the failure reason from the failing cases unless one was
    /// set explicitly.
    pub fn set_report(&mut self, report: RunReport) {
        if self.metadata.failure_reason.is_none() && !report.success() {
            let summary = report.summary();
            let mut reason = format!(
                "{} failed, {} timed out, {} suite setup errors",
                summary.failed, summary.timed_out, summary.setup_errors
            );
            let failing = report.failing_cases();
            if !failing.is_empty() {
                reason.push_str(": ");
                reason.push_str(&failing.join(", "));
            }
            self.metadata.failure_reason = Some(reason);
        }
        self.report = Some(report);
    }

    /// Capture a log entry
    ///
    /// # Examples
    ///
    /// ```rust
    /// use feedreader_testing_framework::config::RunnerConfig;
    /// use feedreader_testing_framework::utilities::artifacts::ArtifactCollector;
    ///
    /// let collector = ArtifactCollector::new("run", RunnerConfig::default());
    /// collector.capture_log("WARN", "New Feed Selection timed out");
    /// collector.capture_log("INFO", "Loaded feed 0");
    /// ```
    pub fn capture_log(&self, level: impl Into<String>, message: impl Into<String>) {
        push_log(&self.logs, level, message);
    }

    /// Build the artifact without writing it
    pub fn artifact(&self) -> RunArtifact {
        let mut metadata = self.metadata.clone();
        metadata.duration_ms = match &self.report {
            Some(report) => report.duration_ms,
            None => self.start_time.elapsed().as_millis() as u64,
        };

        RunArtifact {
            metadata,
            report: self.report.clone(),
            logs: self.logs.lock().clone(),
        }
    }

    /// Save artifact to disk
    ///
    /// Creates a JSON file named after the run and the current time inside
    /// `output_dir` (created if missing). Returns the file path.
    pub async fn save(&mut self, output_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let artifact = self.artifact();

        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)
            .await
            .context("Failed to create artifact directory")?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let filename = format!("{}_{}.json", self.metadata.run_name, timestamp);
        let filepath = output_dir.join(filename);

        let json =
            serde_json::to_string_pretty(&artifact).context("Failed to serialize artifact")?;

        let mut file = fs::File::create(&filepath)
            .await
            .context("Failed to create artifact file")?;
        file.write_all(json.as_bytes())
            .await
            .context("Failed to write artifact data")?;
        file.flush()
            .await
            .context("Failed to flush artifact file")?;

        if log::log_enabled!(log::Level::Info) {
            log::info!("Saved run artifact to {}", filepath.display());
        }

        Ok(filepath)
    }

    /// Load artifact from disk
    pub async fn load(filepath: impl AsRef<Path>) -> Result<RunArtifact> {
        let filepath = filepath.as_ref();
        let content = fs::read_to_string(filepath)
            .await
            .with_context(|| format!("Failed to read artifact file {}", filepath.display()))?;

        let artifact: RunArtifact =
            serde_json::from_str(&content).context("Failed to parse artifact JSON")?;

        Ok(artifact)
    }
}

fn push_log(logs: &Mutex<Vec<LogEntry>>, level: impl Into<String>, message: impl Into<String>) {
    logs.lock().push(LogEntry {
        level: level.into(),
        message: message.into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    });
}

/// Reporter that keeps failure events for the artifact
///
/// Created by [`ArtifactCollector::reporter`].
pub struct CaptureReporter {
    logs: Arc<Mutex<Vec<LogEntry>>>,
    inner: Arc<dyn Reporter>,
}

impl Reporter for CaptureReporter {
    fn run_started(&self, suites: usize, cases: usize) {
        self.inner.run_started(suites, cases);
    }

    fn suite_started(&self, name: &str) {
        self.inner.suite_started(name);
    }

    fn case_started(&self, full_name: &str) {
        self.inner.case_started(full_name);
    }

    fn case_done(&self, report: &CaseReport) {
        let level = match report.status {
            CaseStatus::Failed => Some("ERROR"),
            CaseStatus::TimedOut => Some("WARN"),
            _ => None,
        };
        if let Some(level) = level {
            push_log(
                &self.logs,
                level,
                format!(
                    "{}: {}",
                    report.full_name,
                    report.failure_messages().join("; ")
                ),
            );
        }
        self.inner.case_done(report);
    }

    fn suite_done(&self, report: &SuiteReport) {
        for message in report.failure_messages() {
            push_log(&self.logs, "ERROR", format!("{}: {}", report.name, message));
        }
        self.inner.suite_done(report);
    }

    fn run_done(&self, report: &RunReport) {
        let summary = report.summary();
        push_log(
            &self.logs,
            "INFO",
            format!(
                "{} passed, {} failed, {} timed out in {} ms",
                summary.passed, summary.failed, summary.timed_out, report.duration_ms
            ),
        );
        self.inner.run_done(report);
    }
}
