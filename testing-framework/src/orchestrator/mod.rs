// File: testing-framework/src/orchestrator/mod.rs
//
// Orchestrator Module - execution phase of the assertion runner
//
// Suites run one after another, cases within a suite run one after another,
// and every asynchronous hook or case is awaited (or timed out) before the
// next step starts. Later steps routinely read state that earlier steps
// mutated, so there is never more than one step in flight.

/// Clock abstractions for deterministic time control in tests
pub mod clock;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::config::RunnerConfig;
use crate::done::{Completion, Done};
use crate::error::Result;
use crate::expect::TestContext;
use crate::registry::{panic_message, Body, Case, HookKind, Hooks, Registry, Suite};
use crate::report::{CaseReport, CaseStatus, RunReport, SuiteReport, SuiteStatus};
use crate::reporter::{LogReporter, Reporter};

pub use clock::{Clock, PausedClock, SystemClock};

/// How a single hook or case body finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Returned, resolved its future, or invoked `done` exactly once
    Completed,
    /// Panicked, called `done.fail`, dropped `done`, or invoked it twice
    Failed(String),
    /// Did not complete within the allotted time
    TimedOut(Duration),
}

impl StepOutcome {
    /// Failure text, if any
    pub fn failure(&self) -> Option<String> {
        match self {
            StepOutcome::Completed => None,
            StepOutcome::Failed(reason) => Some(reason.clone()),
            StepOutcome::TimedOut(timeout) => Some(format!(
                "Timeout - Async function did not complete within {}ms",
                timeout.as_millis()
            )),
        }
    }
}

/// Executes a [`Registry`] and produces a [`RunReport`]
///
/// # Example
///
/// ```rust
/// use feedreader_testing_framework::prelude::*;
///
/// # tokio_test::block_on(async {
/// let mut registry = Registry::new();
/// registry.describe("Arithmetic", |s| {
///     s.it("adds", |ctx| {
///         ctx.expect(1 + 1).to_be(2);
///     });
///     s.it_async("adds later", |ctx, done| {
///         let ctx = ctx.clone();
///         tokio::spawn(async move {
///             ctx.expect(2 + 2).to_be(4);
///             done.call();
///         });
///     });
///     Ok(())
/// });
///
/// let runner = Runner::new(RunnerConfig::default()).unwrap();
/// let report = runner.run(registry).await;
/// assert!(report.success());
/// # });
/// ```
pub struct Runner {
    config: RunnerConfig,
    clock: Arc<dyn Clock>,
    reporter: Arc<dyn Reporter>,
}

impl Runner {
    /// Create a runner using the system clock and the log reporter
    pub fn new(config: RunnerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Arc::new(SystemClock),
            reporter: Arc::new(LogReporter),
        })
    }

    /// Use another clock for timeouts and durations
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Send lifecycle events to another reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Active configuration
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute every suite in registration order
    pub async fn run(&self, registry: Registry) -> RunReport {
        let started_at = chrono::Utc::now().to_rfc3339();
        let start = self.clock.now();

        self.reporter
            .run_started(registry.suites().len(), registry.case_count());

        let mut suites = Vec::new();
        for suite in registry.into_suites() {
            let report = self.run_suite(suite).await;
            self.reporter.suite_done(&report);
            suites.push(report);
        }

        let report = RunReport {
            started_at,
            duration_ms: (self.clock.now() - start).as_millis() as u64,
            suites,
        };
        self.reporter.run_done(&report);
        report
    }

    async fn run_suite(&self, suite: Suite) -> SuiteReport {
        self.reporter.suite_started(&suite.name);

        if let Some(err) = suite.setup_error {
            return SuiteReport {
                name: suite.name,
                status: SuiteStatus::SetupError,
                setup_error: Some(err.to_string()),
                cases: Vec::new(),
                expectations: Vec::new(),
                failures: Vec::new(),
            };
        }

        let selected: Vec<bool> = suite
            .cases
            .iter()
            .map(|case| !case.pending && self.config.selects(&full_name(&suite.name, case)))
            .collect();
        let any_selected = selected.iter().any(|s| *s);

        let suite_ctx = TestContext::new(suite.name.clone());
        let mut failures = Vec::new();

        if any_selected {
            self.run_suite_hooks(&suite.hooks, HookKind::BeforeAll, &suite_ctx, &mut failures)
                .await;
        }

        let mut cases = Vec::with_capacity(suite.cases.len());
        for (case, selected) in suite.cases.iter().zip(selected) {
            let name = full_name(&suite.name, case);

            let report = if case.pending {
                CaseReport::not_run(&case.name, name, CaseStatus::Pending)
            } else if !selected {
                CaseReport::not_run(&case.name, name, CaseStatus::Skipped)
            } else {
                self.run_case(&suite.hooks, case, name).await
            };

            self.reporter.case_done(&report);
            cases.push(report);
        }

        // Runs even when cases failed or timed out, so the suite can restore state.
        if any_selected {
            self.run_suite_hooks(&suite.hooks, HookKind::AfterAll, &suite_ctx, &mut failures)
                .await;
        }

        let expectations = suite_ctx.take_results();
        let failed = !failures.is_empty()
            || expectations.iter().any(|e| !e.passed)
            || cases.iter().any(|c| c.status.is_failure());

        SuiteReport {
            name: suite.name,
            status: if failed {
                SuiteStatus::Failed
            } else {
                SuiteStatus::Passed
            },
            setup_error: None,
            cases,
            expectations,
            failures,
        }
    }

    async fn run_suite_hooks(
        &self,
        hooks: &Hooks,
        kind: HookKind,
        ctx: &TestContext,
        failures: &mut Vec<String>,
    ) {
        for hook in hooks.get(kind) {
            let label = format!("{} {}", ctx.label(), kind);
            let outcome = self.run_step(hook, ctx, &label, self.config.timeout()).await;
            if let Some(reason) = outcome.failure() {
                failures.push(format!("{}: {}", kind, reason));
            }
        }
    }

    async fn run_case(&self, hooks: &Hooks, case: &Case, full_name: String) -> CaseReport {
        self.reporter.case_started(&full_name);

        let start = self.clock.now();
        let ctx = TestContext::new(full_name.clone());
        let mut failures = Vec::new();
        let mut timed_out = false;

        let mut record = |prefix: Option<HookKind>, outcome: StepOutcome| {
            if matches!(outcome, StepOutcome::TimedOut(_)) {
                timed_out = true;
            }
            if let Some(reason) = outcome.failure() {
                failures.push(match prefix {
                    Some(kind) => format!("{}: {}", kind, reason),
                    None => reason,
                });
            }
        };

        let hook_timeout = self.config.timeout();
        for hook in hooks.get(HookKind::BeforeEach) {
            let label = format!("{} {}", full_name, HookKind::BeforeEach);
            let outcome = self.run_step(hook, &ctx, &label, hook_timeout).await;
            record(Some(HookKind::BeforeEach), outcome);
        }

        let case_timeout = case.timeout.unwrap_or(hook_timeout);
        let outcome = self.run_step(&case.body, &ctx, &full_name, case_timeout).await;
        record(None, outcome);

        for hook in hooks.get(HookKind::AfterEach) {
            let label = format!("{} {}", full_name, HookKind::AfterEach);
            let outcome = self.run_step(hook, &ctx, &label, hook_timeout).await;
            record(Some(HookKind::AfterEach), outcome);
        }

        let expectations = ctx.take_results();
        let status = if timed_out {
            CaseStatus::TimedOut
        } else if !failures.is_empty() || expectations.iter().any(|e| !e.passed) {
            CaseStatus::Failed
        } else {
            CaseStatus::Passed
        };

        CaseReport {
            name: case.name.clone(),
            full_name,
            status,
            expectations,
            failures,
            duration_ms: (self.clock.now() - start).as_millis() as u64,
        }
    }

    /// Run one hook or case body to completion, failure or timeout
    ///
    /// Panics are caught here; nothing a body does can abort the run.
    pub async fn run_step(
        &self,
        body: &Body,
        ctx: &TestContext,
        label: &str,
        timeout: Duration,
    ) -> StepOutcome {
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("Step '{}' ({:?})", label, body);
        }

        match body {
            Body::Sync(f) => match panic::catch_unwind(AssertUnwindSafe(|| f(ctx))) {
                Ok(()) => StepOutcome::Completed,
                Err(payload) => {
                    StepOutcome::Failed(format!("panicked: {}", panic_message(&*payload)))
                }
            },
            Body::Callback(f) => {
                let (done, mut waiter) = Done::channel(label);

                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| f(ctx, done))) {
                    return StepOutcome::Failed(format!("panicked: {}", panic_message(&*payload)));
                }

                let completion = tokio::select! {
                    completion = waiter.wait() => Some(completion),
                    _ = self.clock.sleep(timeout) => None,
                };

                match completion {
                    None => {
                        if log::log_enabled!(log::Level::Warn) {
                            log::warn!("'{}' timed out after {:?}", label, timeout);
                        }
                        StepOutcome::TimedOut(timeout)
                    }
                    Some(Some(Completion::Done)) => match waiter.calls() {
                        1 => StepOutcome::Completed,
                        calls => StepOutcome::Failed(format!(
                            "done callback invoked {} times",
                            calls
                        )),
                    },
                    Some(Some(Completion::Failed(reason))) => StepOutcome::Failed(reason),
                    Some(None) => StepOutcome::Failed(
                        "done callback dropped without being invoked".to_string(),
                    ),
                }
            }
            Body::Future(f) => {
                let future = match panic::catch_unwind(AssertUnwindSafe(|| f(ctx.clone()))) {
                    Ok(future) => future,
                    Err(payload) => {
                        return StepOutcome::Failed(format!(
                            "panicked: {}",
                            panic_message(&*payload)
                        ))
                    }
                };

                let result = tokio::select! {
                    result = AssertUnwindSafe(future).catch_unwind() => Some(result),
                    _ = self.clock.sleep(timeout) => None,
                };

                match result {
                    Some(Ok(())) => StepOutcome::Completed,
                    Some(Err(payload)) => {
                        StepOutcome::Failed(format!("panicked: {}", panic_message(&*payload)))
                    }
                    None => {
                        if log::log_enabled!(log::Level::Warn) {
                            log::warn!("'{}' timed out after {:?}", label, timeout);
                        }
                        StepOutcome::TimedOut(timeout)
                    }
                }
            }
        }
    }
}

fn full_name(suite: &str, case: &Case) -> String {
    format!("{} {}", suite, case.name)
}
