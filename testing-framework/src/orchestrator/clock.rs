// File: testing-framework/src/orchestrator/clock.rs
//
// Clock Abstraction
//
// The runner measures step durations and enforces step timeouts through this
// trait, so a hung asynchronous case can be tested without waiting for the
// real timeout to elapse.

use std::future::Future;
use std::pin::Pin;
use tokio::time::{self, Duration, Instant};

/// Clock abstraction trait - the runner only reads time through this
///
/// # Examples
///
/// ## Real time (SystemClock)
///
/// ```rust
/// use std::sync::Arc;
/// use tokio::time::Duration;
/// use feedreader_testing_framework::orchestrator::clock::{Clock, SystemClock};
///
/// # tokio_test::block_on(async {
/// let clock: Arc<dyn Clock> = Arc::new(SystemClock);
/// let start = clock.now();
/// clock.sleep(Duration::from_millis(10)).await;
/// assert!(clock.now() - start >= Duration::from_millis(10));
/// # });
/// ```
///
/// ## Paused time (PausedClock)
///
/// ```rust
/// use std::sync::Arc;
/// use tokio::time::Duration;
/// use feedreader_testing_framework::orchestrator::clock::{Clock, PausedClock};
///
/// # tokio_test::block_on(async {
/// let clock = Arc::new(PausedClock::new());
/// let start = clock.now();
///
/// // A five second step timeout elapses instantly
/// clock.advance(Duration::from_secs(5)).await;
/// assert_eq!(clock.now() - start, Duration::from_secs(5));
/// # });
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current instant
    ///
    /// Real time for `SystemClock`, simulated time for `PausedClock`.
    fn now(&self) -> Instant;

    /// Sleeps for the specified duration
    ///
    /// With a paused runtime the sleep completes as soon as the runtime is
    /// otherwise idle, or when time is advanced past it.
    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// System real-time clock
///
/// Used by the CLI and by default in `Runner::new`.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        time::Instant::now()
    }

    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(time::sleep(d))
    }
}

/// Paused clock (test environment)
///
/// Works with tokio's `time::pause()`: time only moves when advanced, or
/// when the runtime auto-advances because every task is waiting on a timer.
/// A step that never completes therefore times out immediately in tests.
///
/// # Important Notes
///
/// 1. `new()` pauses tokio time itself; do not combine it with
///    `#[tokio::test(start_paused = true)]`, which already paused it
/// 2. Requires a current-thread runtime (the `#[tokio::test]` default)
pub struct PausedClock;

impl PausedClock {
    /// Creates a new PausedClock and pauses tokio time
    pub fn new() -> Self {
        time::pause();
        Self
    }

    /// Manually advance time by the specified duration
    ///
    /// Pending `sleep()` futures that expire during the advancement are woken.
    pub async fn advance(&self, d: Duration) {
        time::advance(d).await
    }
}

impl Clock for PausedClock {
    fn now(&self) -> Instant {
        // Simulated time, only moves via advance() or auto-advance
        time::Instant::now()
    }

    fn sleep(&self, d: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(time::sleep(d))
    }
}

impl Default for PausedClock {
    fn default() -> Self {
        Self::new()
    }
}
