// File: testing-framework/src/report.rs
//
// Structured run results: one report per suite, one per case, one entry per
// expectation. Everything serializes to JSON for artifacts and `--json`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single `expect(..)` matcher call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// Matcher name as written, e.g. "not.toBe"
    pub matcher: String,
    /// Whether the expectation held
    pub passed: bool,
    /// Failure message (only set when `passed` is false)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Final state of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Every expectation held and every step completed
    Passed,
    /// An expectation failed, a step failed or panicked
    Failed,
    /// An asynchronous step never signalled completion in time
    TimedOut,
    /// Registered with `xit`
    Pending,
    /// Not selected by the run filter
    Skipped,
}

impl CaseStatus {
    /// Counts against the run's success
    pub fn is_failure(self) -> bool {
        matches!(self, CaseStatus::Failed | CaseStatus::TimedOut)
    }

    fn symbol(self) -> &'static str {
        match self {
            CaseStatus::Passed => "✓",
            CaseStatus::Failed => "✗",
            CaseStatus::TimedOut => "⏱",
            CaseStatus::Pending => "…",
            CaseStatus::Skipped => "-",
        }
    }
}

/// Final state of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteStatus {
    /// No failing case and no failing suite-level hook
    Passed,
    /// Some case or suite-level hook failed
    Failed,
    /// The `describe` body failed; no case ran
    SetupError,
}

/// Result of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Case name as registered
    pub name: String,
    /// "<suite> <case>"
    pub full_name: String,
    /// Final status
    pub status: CaseStatus,
    /// Every matcher call made by the case and its per-case hooks
    pub expectations: Vec<ExpectationResult>,
    /// Step-level failures (timeouts, panics, `done.fail`, hook failures)
    pub failures: Vec<String>,
    /// Wall time spent in hooks and body
    pub duration_ms: u64,
}

impl CaseReport {
    /// A case that never ran
    pub(crate) fn not_run(name: &str, full_name: String, status: CaseStatus) -> Self {
        Self {
            name: name.to_string(),
            full_name,
            status,
            expectations: Vec::new(),
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Step failures followed by failed expectation messages
    pub fn failure_messages(&self) -> Vec<String> {
        let mut messages = self.failures.clone();
        messages.extend(
            self.expectations
                .iter()
                .filter(|e| !e.passed)
                .filter_map(|e| e.message.clone()),
        );
        messages
    }

    /// Number of expectations that held
    pub fn passed_expectations(&self) -> usize {
        self.expectations.iter().filter(|e| e.passed).count()
    }
}

/// Result of one suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name
    pub name: String,
    /// Final status
    pub status: SuiteStatus,
    /// Set when the suite could not be registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_error: Option<String>,
    /// Case results in execution order
    pub cases: Vec<CaseReport>,
    /// Expectations made in `beforeAll`/`afterAll`
    #[serde(default)]
    pub expectations: Vec<ExpectationResult>,
    /// Failures of `beforeAll`/`afterAll`
    #[serde(default)]
    pub failures: Vec<String>,
}

impl SuiteReport {
    /// Look up a case by name
    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|c| c.name == name)
    }

    /// Suite-level failure messages
    pub fn failure_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();
        if let Some(err) = &self.setup_error {
            messages.push(err.clone());
        }
        messages.extend(self.failures.iter().cloned());
        messages.extend(
            self.expectations
                .iter()
                .filter(|e| !e.passed)
                .filter_map(|e| e.message.clone()),
        );
        messages
    }
}

/// Aggregated counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Suites registered
    pub suites: usize,
    /// Cases registered
    pub cases: usize,
    /// Cases passed
    pub passed: usize,
    /// Cases failed
    pub failed: usize,
    /// Cases timed out
    pub timed_out: usize,
    /// Cases pending (`xit`)
    pub pending: usize,
    /// Cases filtered out
    pub skipped: usize,
    /// Suites that failed during setup
    pub setup_errors: usize,
    /// Suites whose suite-level hooks failed
    pub suite_failures: usize,
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// RFC 3339 start time
    pub started_at: String,
    /// Total wall time
    pub duration_ms: u64,
    /// Suite results in execution order
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    /// Look up a suite by name
    pub fn suite(&self, name: &str) -> Option<&SuiteReport> {
        self.suites.iter().find(|s| s.name == name)
    }

    /// Look up a case by suite and case name
    pub fn case(&self, suite: &str, case: &str) -> Option<&CaseReport> {
        self.suite(suite).and_then(|s| s.case(case))
    }

    /// Aggregate counters across all suites
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            suites: self.suites.len(),
            ..RunSummary::default()
        };

        for suite in &self.suites {
            match suite.status {
                SuiteStatus::SetupError => summary.setup_errors += 1,
                SuiteStatus::Failed if !suite.failure_messages().is_empty() => {
                    summary.suite_failures += 1
                }
                _ => {}
            }

            for case in &suite.cases {
                summary.cases += 1;
                match case.status {
                    CaseStatus::Passed => summary.passed += 1,
                    CaseStatus::Failed => summary.failed += 1,
                    CaseStatus::TimedOut => summary.timed_out += 1,
                    CaseStatus::Pending => summary.pending += 1,
                    CaseStatus::Skipped => summary.skipped += 1,
                }
            }
        }

        summary
    }

    /// True when nothing failed, timed out or errored during setup
    pub fn success(&self) -> bool {
        self.suites
            .iter()
            .all(|s| s.status == SuiteStatus::Passed)
    }

    /// Full names of every failing or timed out case
    pub fn failing_cases(&self) -> Vec<&str> {
        self.suites
            .iter()
            .flat_map(|s| s.cases.iter())
            .filter(|c| c.status.is_failure())
            .map(|c| c.full_name.as_str())
            .collect()
    }

    /// Human-readable rendering
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Print report to stdout
    pub fn print(&self) {
        println!("{}", self.render());
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.summary();

        writeln!(f, "\n╔════════════════════════════════════════════════════════════╗")?;
        writeln!(f, "║  Feed Reader Run Report                                    ║")?;
        writeln!(f, "╠════════════════════════════════════════════════════════════╣")?;
        writeln!(f, "║  Suites: {:<49} ║", summary.suites)?;
        writeln!(
            f,
            "║  Cases: {:<50} ║",
            format!(
                "{} total, {} passed, {} failed, {} timed out",
                summary.cases, summary.passed, summary.failed, summary.timed_out
            )
        )?;
        if summary.pending + summary.skipped > 0 {
            writeln!(
                f,
                "║  Not run: {:<48} ║",
                format!("{} pending, {} skipped", summary.pending, summary.skipped)
            )?;
        }
        writeln!(f, "║  Duration: {:<47} ║", format!("{} ms", self.duration_ms))?;
        writeln!(
            f,
            "║  Status: {:<49} ║",
            if self.success() {
                "SUCCESS ✓"
            } else {
                "FAILED ✗"
            }
        )?;
        writeln!(f, "╚════════════════════════════════════════════════════════════╝\n")?;

        for suite in &self.suites {
            writeln!(f, "{}", suite.name)?;
            for message in suite.failure_messages() {
                for line in textwrap::wrap(&message, 70) {
                    writeln!(f, "  ! {}", line)?;
                }
            }
            for case in &suite.cases {
                writeln!(f, "  {} {}", case.status.symbol(), case.name)?;
                for message in case.failure_messages() {
                    for line in textwrap::wrap(&message, 68) {
                        writeln!(f, "      {}", line)?;
                    }
                }
            }
        }

        Ok(())
    }
}
