//! # Feed Reader Testing Framework
//!
//! Asynchronous assertion runner: named suites of cases, before/after hooks,
//! expectations that record instead of panicking, and callback-style
//! completion with resolve-once semantics.
//!
//! ## Lifecycle
//!
//! 1. **Register**: fill a [`Registry`] with `describe` blocks. Bodies only
//!    register cases and hooks.
//! 2. **Execute**: [`Runner::run`] walks suites and cases in declaration
//!    order, awaiting every asynchronous step before starting the next.
//! 3. **Report**: the returned [`RunReport`] holds a result for every suite
//!    and case.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use feedreader_testing_framework::prelude::*;
//!
//! let mut registry = Registry::new();
//! registry.describe("Initial Entries", |s| {
//!     let app = app.clone();
//!     s.before_each_async(move |_, done| app.load_feed(0, done.into_callback()));
//!     s.it("has entries", move |ctx| {
//!         ctx.expect(app.entry_count()).to_be_greater_than(0);
//!     });
//!     Ok(())
//! });
//!
//! let report = Runner::new(RunnerConfig::default())?.run(registry).await;
//! report.print();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Runner configuration
pub mod config;

/// Resolve-once completion handles
pub mod done;

/// Framework error types
pub mod error;

pub mod expect;

/// Core orchestration - runner, step execution, clocks
pub mod orchestrator;

/// Registration of suites, cases and hooks
pub mod registry;

/// Structured run results
pub mod report;

pub mod reporter;

/// Failure artifacts and replay
pub mod utilities;

// Convenient re-exports for common usage
pub mod prelude;

// Re-export commonly used types at crate root
pub use config::RunnerConfig;
pub use done::Done;
pub use error::FrameworkError;
pub use expect::TestContext;
pub use orchestrator::{Clock, PausedClock, Runner, SystemClock};
pub use registry::Registry;
pub use report::RunReport;

/// Framework version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
