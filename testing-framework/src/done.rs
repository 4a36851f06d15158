// File: testing-framework/src/done.rs
//
// Completion handle for callback-style asynchronous cases and hooks.
//
// An asynchronous body receives a `Done`. The runner suspends on the paired
// receiver until the first call resolves it. Every later call is ignored
// for the purpose of progression but still counted, so the runner can flag
// bodies that complete more than once.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;

/// How an asynchronous step finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// `done.call()` was invoked
    Done,
    /// `done.fail(reason)` was invoked
    Failed(String),
}

/// Resolve-once completion callback
///
/// Cheap to clone; all clones share the same resolution. Dropping every
/// clone without calling it is observed by the runner as an abandoned step.
///
/// # Examples
///
/// ```rust
/// use feedreader_testing_framework::done::{Completion, Done};
///
/// # tokio_test::block_on(async {
/// let (done, mut waiter) = Done::channel("loads the first feed");
/// let cb = done.clone();
/// tokio::spawn(async move { cb.call(); });
/// assert_eq!(waiter.wait().await, Some(Completion::Done));
/// # });
/// ```
#[derive(Clone)]
pub struct Done {
    inner: Arc<DoneInner>,
}

struct DoneInner {
    label: String,
    sender: Mutex<Option<oneshot::Sender<Completion>>>,
    calls: Arc<AtomicUsize>,
}

/// Receiving side held by the runner
pub struct DoneWaiter {
    receiver: oneshot::Receiver<Completion>,
    calls: Arc<AtomicUsize>,
}

impl Done {
    /// Create a completion handle and the waiter the runner suspends on
    pub fn channel(label: impl Into<String>) -> (Done, DoneWaiter) {
        let (sender, receiver) = oneshot::channel();
        let calls = Arc::new(AtomicUsize::new(0));

        let done = Done {
            inner: Arc::new(DoneInner {
                label: label.into(),
                sender: Mutex::new(Some(sender)),
                calls: calls.clone(),
            }),
        };

        (done, DoneWaiter { receiver, calls })
    }

    /// Signal successful completion
    ///
    /// Returns `true` if this call resolved the step, `false` if it had
    /// already been resolved.
    pub fn call(&self) -> bool {
        self.resolve(Completion::Done)
    }

    /// Signal completion with a failure
    pub fn fail(&self, reason: impl Into<String>) -> bool {
        self.resolve(Completion::Failed(reason.into()))
    }

    /// Number of times this handle (or any clone) was invoked
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Consume the handle into a plain callback, for APIs that take
    /// `FnOnce()` completion callbacks.
    pub fn into_callback(self) -> impl FnOnce() + Send + 'static {
        move || {
            self.call();
        }
    }

    fn resolve(&self, completion: Completion) -> bool {
        let previous = self.inner.calls.fetch_add(1, Ordering::SeqCst);

        match self.inner.sender.lock().take() {
            Some(sender) => {
                // The runner may have given up on this step already (timeout).
                if sender.send(completion).is_err() && log::log_enabled!(log::Level::Debug) {
                    log::debug!("'{}' completed after the runner stopped waiting", self.inner.label);
                }
                true
            }
            None => {
                if log::log_enabled!(log::Level::Warn) {
                    log::warn!(
                        "'{}' invoked its completion callback {} times",
                        self.inner.label,
                        previous + 1
                    );
                }
                false
            }
        }
    }
}

impl std::fmt::Debug for Done {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Done")
            .field("label", &self.inner.label)
            .field("calls", &self.calls())
            .finish()
    }
}

impl DoneWaiter {
    /// Wait for the first resolution
    ///
    /// Returns `None` when every `Done` clone was dropped without being called.
    pub async fn wait(&mut self) -> Option<Completion> {
        (&mut self.receiver).await.ok()
    }

    /// Calls observed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
