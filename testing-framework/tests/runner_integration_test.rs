#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//! End-to-end behaviour of the runner: ordering, hooks, timeouts, setup
//! isolation, filtering and reporting.

use feedreader_testing_framework::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

type Trace = Arc<Mutex<Vec<String>>>;

fn trace() -> Trace {
    Arc::new(Mutex::new(Vec::new()))
}

fn push(trace: &Trace, entry: &str) {
    trace.lock().push(entry.to_string());
}

fn silent_runner(timeout_ms: u64) -> Runner {
    Runner::new(RunnerConfig::default().with_timeout(Duration::from_millis(timeout_ms)))
        .unwrap()
        .with_reporter(Arc::new(SilentReporter))
}

/// Callback body that completes from a spawned task after yielding,
/// so the runner genuinely has to wait.
fn deferred(trace: Trace, entry: &'static str) -> impl Fn(&TestContext, Done) + Send + Sync {
    move |_, done| {
        let trace = trace.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            push(&trace, entry);
            done.call();
        });
    }
}

#[tokio::test]
async fn test_hooks_and_cases_run_in_declaration_order() {
    let t = trace();
    let mut registry = Registry::new();

    registry.describe("Ordered", |s| {
        s.before_all_async(deferred(t.clone(), "beforeAll"));
        s.before_each_async(deferred(t.clone(), "beforeEach"));
        s.after_each({
            let t = t.clone();
            move |_| push(&t, "afterEach")
        });
        s.after_all_async(deferred(t.clone(), "afterAll"));

        s.it_async("first", deferred(t.clone(), "first"));
        s.it("second", {
            let t = t.clone();
            move |_| push(&t, "second")
        });
        s.it_future("third", {
            let t = t.clone();
            move |_| {
                let t = t.clone();
                async move {
                    tokio::task::yield_now().await;
                    push(&t, "third");
                }
            }
        });
        Ok(())
    });

    let report = silent_runner(1000).run(registry).await;
    assert!(report.success(), "{}", report.render());

    assert_eq!(
        *t.lock(),
        vec![
            "beforeAll",
            "beforeEach",
            "first",
            "afterEach",
            "beforeEach",
            "second",
            "afterEach",
            "beforeEach",
            "third",
            "afterEach",
            "afterAll",
        ]
    );
}

#[tokio::test]
async fn test_suites_run_sequentially() {
    let t = trace();
    let mut registry = Registry::new();

    for suite in ["A", "B"] {
        let t = t.clone();
        registry.describe(suite, move |s| {
            s.it_async("slow", deferred(t.clone(), if suite == "A" { "A.slow" } else { "B.slow" }));
            s.it("fast", {
                let t = t.clone();
                move |_| push(&t, if suite == "A" { "A.fast" } else { "B.fast" })
            });
            Ok(())
        });
    }

    silent_runner(1000).run(registry).await;
    assert_eq!(*t.lock(), vec!["A.slow", "A.fast", "B.slow", "B.fast"]);
}

#[tokio::test]
async fn test_after_all_runs_once_after_failures() {
    let t = trace();
    let mut registry = Registry::new();

    registry.describe("Failing", |s| {
        s.after_all({
            let t = t.clone();
            move |_| push(&t, "afterAll")
        });
        s.it("fails an expectation", |ctx| {
            ctx.expect(1).to_be(2);
            ctx.expect(3).to_be(3);
        });
        s.it("panics", |_| panic!("broken case"));
        s.it("passes", |ctx| {
            ctx.expect(true).to_be_truthy();
        });
        Ok(())
    });

    let report = silent_runner(1000).run(registry).await;
    assert_eq!(*t.lock(), vec!["afterAll"]);

    let suite = report.suite("Failing").unwrap();
    assert_eq!(suite.status, SuiteStatus::Failed);

    let failing = suite.case("fails an expectation").unwrap();
    assert_eq!(failing.status, CaseStatus::Failed);
    // Sibling expectations were still evaluated
    assert_eq!(failing.expectations.len(), 2);
    assert_eq!(failing.passed_expectations(), 1);

    let panicked = suite.case("panics").unwrap();
    assert_eq!(panicked.failures, vec!["panicked: broken case"]);

    assert_eq!(suite.case("passes").unwrap().status, CaseStatus::Passed);
}

#[tokio::test]
async fn test_hung_case_times_out_and_suite_proceeds() {
    let t = trace();
    let parked: Arc<Mutex<Vec<Done>>> = Arc::new(Mutex::new(Vec::new()));
    let mut registry = Registry::new();

    registry.describe("Hanging", |s| {
        s.after_all_async(deferred(t.clone(), "afterAll"));
        s.it_async("never completes", {
            let parked = parked.clone();
            move |_, done| parked.lock().push(done)
        })
        .timeout(Duration::from_millis(20));
        s.it("still runs", {
            let t = t.clone();
            move |_| push(&t, "still runs")
        });
        Ok(())
    });

    let report = silent_runner(1000).run(registry).await;

    let hung = report.case("Hanging", "never completes").unwrap();
    assert_eq!(hung.status, CaseStatus::TimedOut);
    assert_eq!(
        hung.failures,
        vec!["Timeout - Async function did not complete within 20ms"]
    );
    assert_eq!(*t.lock(), vec!["still runs", "afterAll"]);
    assert!(!report.success());
    assert_eq!(report.summary().timed_out, 1);
}

#[tokio::test]
async fn test_paused_clock_makes_default_timeout_instant() {
    let clock = Arc::new(PausedClock::new());
    let parked: Arc<Mutex<Vec<Done>>> = Arc::new(Mutex::new(Vec::new()));
    let mut registry = Registry::new();

    registry.describe("Hanging", |s| {
        let parked = parked.clone();
        s.it_async("waits forever", move |_, done| parked.lock().push(done));
        Ok(())
    });

    let runner = Runner::new(RunnerConfig::default())
        .unwrap()
        .with_clock(clock.clone())
        .with_reporter(Arc::new(SilentReporter));

    let start = clock.now();
    let report = runner.run(registry).await;

    assert_eq!(
        report.case("Hanging", "waits forever").unwrap().status,
        CaseStatus::TimedOut
    );
    // Paused time lands on the deadline, rounded up to the next millisecond
    let elapsed = clock.now() - start;
    assert!(elapsed >= Duration::from_millis(5000), "elapsed {:?}", elapsed);
    assert!(elapsed <= Duration::from_millis(5001), "elapsed {:?}", elapsed);
    assert!(
        (5000..=5001).contains(&report.duration_ms),
        "took {}ms",
        report.duration_ms
    );
}

#[tokio::test]
async fn test_before_each_failure_is_attributed_to_case() {
    let mut registry = Registry::new();

    registry.describe("Hooks", |s| {
        s.before_each_async(|_, done| {
            done.fail("feed source offline");
        });
        s.it("body still runs", |ctx| {
            ctx.expect(1).to_be(1);
        });
        Ok(())
    });

    let report = silent_runner(1000).run(registry).await;
    let case = report.case("Hooks", "body still runs").unwrap();

    assert_eq!(case.status, CaseStatus::Failed);
    assert_eq!(case.failures, vec!["beforeEach: feed source offline"]);
    assert_eq!(case.expectations.len(), 1);
}

#[tokio::test]
async fn test_expectations_in_hooks() {
    let mut registry = Registry::new();

    registry.describe("Hook expectations", |s| {
        s.before_each(|ctx| {
            ctx.expect(0).to_be_greater_than(1);
        });
        s.after_all(|ctx| {
            ctx.expect("restored").to_be("restored");
        });
        s.it("case", |_| {});
        Ok(())
    });

    let report = silent_runner(1000).run(registry).await;
    let suite = report.suite("Hook expectations").unwrap();

    // beforeEach expectation lands on the case
    assert_eq!(suite.cases[0].status, CaseStatus::Failed);
    assert_eq!(
        suite.cases[0].failure_messages(),
        vec!["Expected 0 to be greater than 1."]
    );
    // afterAll expectation lands on the suite
    assert_eq!(suite.expectations.len(), 1);
    assert!(suite.expectations[0].passed);
}

#[tokio::test]
async fn test_setup_error_does_not_stop_later_suites() {
    let t = trace();
    let mut registry = Registry::new();

    registry
        .describe("Broken", |_| anyhow::bail!("allFeeds is not defined"))
        .describe("Healthy", |s| {
            let t = t.clone();
            s.it("runs", move |_| push(&t, "healthy"));
            Ok(())
        });

    let report = silent_runner(1000).run(registry).await;

    let broken = report.suite("Broken").unwrap();
    assert_eq!(broken.status, SuiteStatus::SetupError);
    assert_eq!(
        broken.setup_error.as_deref(),
        Some("suite 'Broken' failed during setup: allFeeds is not defined")
    );
    assert_eq!(*t.lock(), vec!["healthy"]);
    assert_eq!(report.summary().setup_errors, 1);
    assert!(!report.success());
}

#[tokio::test]
async fn test_filter_skips_cases_and_their_hooks() {
    let t = trace();
    let mut registry = Registry::new();

    registry
        .describe("Selected", |s| {
            s.before_each({
                let t = t.clone();
                move |_| push(&t, "Selected.beforeEach")
            });
            s.it("menu toggles", {
                let t = t.clone();
                move |_| push(&t, "menu toggles")
            });
            s.it("other", {
                let t = t.clone();
                move |_| push(&t, "other")
            });
            Ok(())
        })
        .describe("Unselected", |s| {
            s.before_all({
                let t = t.clone();
                move |_| push(&t, "Unselected.beforeAll")
            });
            s.it("nothing here", |_| {});
            Ok(())
        });

    let runner = Runner::new(RunnerConfig::default().with_filter("menu"))
        .unwrap()
        .with_reporter(Arc::new(SilentReporter));
    let report = runner.run(registry).await;

    assert_eq!(*t.lock(), vec!["Selected.beforeEach", "menu toggles"]);
    assert_eq!(
        report.case("Selected", "other").unwrap().status,
        CaseStatus::Skipped
    );
    assert_eq!(
        report.case("Unselected", "nothing here").unwrap().status,
        CaseStatus::Skipped
    );
    assert!(report.success());
}

#[tokio::test]
async fn test_pending_case_is_not_executed() {
    let t = trace();
    let mut registry = Registry::new();

    registry.describe("Pending", |s| {
        let t = t.clone();
        s.xit("later", move |_| push(&t, "ran"));
        Ok(())
    });

    let report = silent_runner(1000).run(registry).await;
    assert!(t.lock().is_empty());
    assert_eq!(
        report.case("Pending", "later").unwrap().status,
        CaseStatus::Pending
    );
    assert!(report.success());
}

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl Reporter for RecordingReporter {
    fn run_started(&self, suites: usize, cases: usize) {
        self.events.lock().push(format!("run {} {}", suites, cases));
    }

    fn suite_started(&self, name: &str) {
        self.events.lock().push(format!("suite {}", name));
    }

    fn case_started(&self, full_name: &str) {
        self.events.lock().push(format!("case {}", full_name));
    }

    fn case_done(&self, report: &CaseReport) {
        self.events
            .lock()
            .push(format!("done {} {:?}", report.full_name, report.status));
    }

    fn suite_done(&self, report: &SuiteReport) {
        self.events
            .lock()
            .push(format!("suite done {} {:?}", report.name, report.status));
    }

    fn run_done(&self, _report: &RunReport) {
        self.events.lock().push("run done".to_string());
    }
}

#[tokio::test]
async fn test_reporter_receives_lifecycle_events() {
    let reporter = Arc::new(RecordingReporter::default());
    let mut registry = Registry::new();

    registry.describe("S", |s| {
        s.it("a", |_| {});
        s.it("b", |ctx| ctx.fail("nope"));
        Ok(())
    });

    Runner::new(RunnerConfig::default())
        .unwrap()
        .with_reporter(reporter.clone())
        .run(registry)
        .await;

    assert_eq!(
        *reporter.events.lock(),
        vec![
            "run 1 2",
            "suite S",
            "case S a",
            "done S a Passed",
            "case S b",
            "done S b Failed",
            "suite done S Failed",
            "run done",
        ]
    );
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Whatever mix of sync and async cases is registered, execution
        /// order equals declaration order with beforeEach before each case.
        #[test]
        fn prop_execution_order_matches_declaration(kinds in prop::collection::vec(0u8..3, 1..12)) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();

            let t = trace();
            let mut registry = Registry::new();
            registry.describe("Prop", |s| {
                s.before_each({
                    let t = t.clone();
                    move |_| push(&t, "before")
                });
                for (i, kind) in kinds.iter().enumerate() {
                    let name: &'static str = Box::leak(format!("case{}", i).into_boxed_str());
                    match kind {
                        0 => {
                            let t = t.clone();
                            s.it(name, move |_| push(&t, name));
                        }
                        1 => {
                            s.it_async(name, deferred(t.clone(), name));
                        }
                        _ => {
                            let t = t.clone();
                            s.it_future(name, move |_| {
                                let t = t.clone();
                                async move {
                                    tokio::task::yield_now().await;
                                    push(&t, name);
                                }
                            });
                        }
                    }
                }
                Ok(())
            });

            let report = rt.block_on(silent_runner(1000).run(registry));
            prop_assert!(report.success());

            let mut expected = Vec::new();
            for i in 0..kinds.len() {
                expected.push("before".to_string());
                expected.push(format!("case{}", i));
            }
            prop_assert_eq!(t.lock().clone(), expected);
        }
    }
}
