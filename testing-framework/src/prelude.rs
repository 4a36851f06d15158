//! Convenient re-exports for writing suites

pub use crate::config::RunnerConfig;
pub use crate::done::{Completion, Done};
pub use crate::expect::{Expectation, TestContext};
pub use crate::orchestrator::{Clock, PausedClock, Runner, StepOutcome, SystemClock};
pub use crate::registry::{Body, Case, HookKind, Registry, Suite};
pub use crate::report::{CaseReport, CaseStatus, RunReport, SuiteReport, SuiteStatus};
pub use crate::reporter::{LogReporter, Reporter, SilentReporter};
