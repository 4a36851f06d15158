//! Run lifecycle notifications

use crate::report::{CaseReport, CaseStatus, RunReport, SuiteReport};

/// Receives lifecycle events while a run progresses
///
/// All methods default to no-ops so implementors only override what they
/// need.
pub trait Reporter: Send + Sync {
    /// Before the first suite
    fn run_started(&self, _suites: usize, _cases: usize) {}

    /// Before a suite's `beforeAll` hooks
    fn suite_started(&self, _name: &str) {}

    /// Before a case's `beforeEach` hooks
    fn case_started(&self, _full_name: &str) {}

    /// After a case's `afterEach` hooks
    fn case_done(&self, _report: &CaseReport) {}

    /// After a suite's `afterAll` hooks
    fn suite_done(&self, _report: &SuiteReport) {}

    /// After the last suite
    fn run_done(&self, _report: &RunReport) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Writes events through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn run_started(&self, suites: usize, cases: usize) {
        if log::log_enabled!(log::Level::Info) {
            log::info!("Running {} cases in {} suites", cases, suites);
        }
    }

    fn suite_started(&self, name: &str) {
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Suite '{}' started", name);
        }
    }

    fn case_started(&self, full_name: &str) {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Case '{}' started", full_name);
        }
    }

    fn case_done(&self, report: &CaseReport) {
        match report.status {
            CaseStatus::Passed => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("✓ {} ({} ms)", report.full_name, report.duration_ms);
                }
            }
            CaseStatus::Failed | CaseStatus::TimedOut => {
                if log::log_enabled!(log::Level::Warn) {
                    log::warn!(
                        "✗ {}: {}",
                        report.full_name,
                        report.failure_messages().join("; ")
                    );
                }
            }
            CaseStatus::Pending | CaseStatus::Skipped => {
                if log::log_enabled!(log::Level::Debug) {
                    log::debug!("- {} ({:?})", report.full_name, report.status);
                }
            }
        }
    }

    fn suite_done(&self, report: &SuiteReport) {
        for message in report.failure_messages() {
            if log::log_enabled!(log::Level::Warn) {
                log::warn!("Suite '{}': {}", report.name, message);
            }
        }
    }

    fn run_done(&self, report: &RunReport) {
        let summary = report.summary();
        if log::log_enabled!(log::Level::Info) {
            log::info!(
                "Finished in {} ms: {} passed, {} failed, {} timed out",
                report.duration_ms,
                summary.passed,
                summary.failed,
                summary.timed_out
            );
        }
    }
}
