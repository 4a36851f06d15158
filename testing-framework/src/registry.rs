// File: testing-framework/src/registry.rs
//
// Registration phase: suites, cases and hooks.
//
// A `Registry` is filled by calling `describe` once per suite. The describe
// body runs immediately and only registers; nothing executes until the
// registry is handed to `Runner::run`.

use futures::future::BoxFuture;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::done::Done;
use crate::error::FrameworkError;
use crate::expect::TestContext;

type SyncFn = dyn Fn(&TestContext) + Send + Sync;
type CallbackFn = dyn Fn(&TestContext, Done) + Send + Sync;
type FutureFn = dyn Fn(TestContext) -> BoxFuture<'static, ()> + Send + Sync;

/// Executable body of a case or hook
///
/// The variant is the arity flag: a `Sync` body completes when it returns,
/// the other two suspend the runner until they complete or time out.
pub enum Body {
    /// Completes on return
    Sync(Box<SyncFn>),
    /// Completes when the provided `Done` is invoked
    Callback(Box<CallbackFn>),
    /// Completes when the returned future resolves
    Future(Box<FutureFn>),
}

impl Body {
    /// Synchronous body
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        Body::Sync(Box::new(f))
    }

    /// Callback-style asynchronous body
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&TestContext, Done) + Send + Sync + 'static,
    {
        Body::Callback(Box::new(f))
    }

    /// Future-returning asynchronous body
    pub fn future<F, Fut>(f: F) -> Self
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Body::Future(Box::new(move |ctx| Box::pin(f(ctx))))
    }

    /// Whether the runner has to wait for completion
    pub fn is_async(&self) -> bool {
        !matches!(self, Body::Sync(_))
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Body::Sync(_) => "sync",
            Body::Callback(_) => "callback",
            Body::Future(_) => "future",
        };
        f.write_str(kind)
    }
}

/// Hook positions relative to the cases of a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// Once, before the first case
    BeforeAll,
    /// Before every case
    BeforeEach,
    /// After every case
    AfterEach,
    /// Once, after the last case
    AfterAll,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HookKind::BeforeAll => "beforeAll",
            HookKind::BeforeEach => "beforeEach",
            HookKind::AfterEach => "afterEach",
            HookKind::AfterAll => "afterAll",
        };
        f.write_str(name)
    }
}

/// Hooks of one suite, each list in registration order
#[derive(Debug, Default)]
pub struct Hooks {
    pub(crate) before_all: Vec<Body>,
    pub(crate) before_each: Vec<Body>,
    pub(crate) after_each: Vec<Body>,
    pub(crate) after_all: Vec<Body>,
}

impl Hooks {
    /// Hooks registered at a position
    pub fn get(&self, kind: HookKind) -> &[Body] {
        match kind {
            HookKind::BeforeAll => &self.before_all,
            HookKind::BeforeEach => &self.before_each,
            HookKind::AfterEach => &self.after_each,
            HookKind::AfterAll => &self.after_all,
        }
    }

    fn push(&mut self, kind: HookKind, body: Body) {
        match kind {
            HookKind::BeforeAll => self.before_all.push(body),
            HookKind::BeforeEach => self.before_each.push(body),
            HookKind::AfterEach => self.after_each.push(body),
            HookKind::AfterAll => self.after_all.push(body),
        }
    }

    fn clear(&mut self) {
        self.before_all.clear();
        self.before_each.clear();
        self.after_each.clear();
        self.after_all.clear();
    }
}

/// One registered case
#[derive(Debug)]
pub struct Case {
    pub(crate) name: String,
    pub(crate) body: Body,
    pub(crate) timeout: Option<Duration>,
    pub(crate) pending: bool,
}

impl Case {
    /// Case name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Override the run-wide timeout for this case's asynchronous steps
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    /// Registered with `xit`
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// A named group of cases plus hooks
#[derive(Debug)]
pub struct Suite {
    pub(crate) name: String,
    pub(crate) cases: Vec<Case>,
    pub(crate) hooks: Hooks,
    pub(crate) setup_error: Option<FrameworkError>,
}

impl Suite {
    fn new(name: String) -> Self {
        Self {
            name,
            cases: Vec::new(),
            hooks: Hooks::default(),
            setup_error: None,
        }
    }

    /// Suite name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered cases in declaration order
    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Registered hooks
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Set when the describe body failed
    pub fn setup_error(&self) -> Option<&FrameworkError> {
        self.setup_error.as_ref()
    }

    /// Register a case with an explicit body
    pub fn case(&mut self, name: impl Into<String>, body: Body) -> &mut Case {
        self.cases.push(Case {
            name: name.into(),
            body,
            timeout: None,
            pending: false,
        });
        let last = self.cases.len() - 1;
        &mut self.cases[last]
    }

    /// Synchronous case
    pub fn it<F>(&mut self, name: impl Into<String>, f: F) -> &mut Case
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        self.case(name, Body::sync(f))
    }

    /// Asynchronous case completed through `done`
    pub fn it_async<F>(&mut self, name: impl Into<String>, f: F) -> &mut Case
    where
        F: Fn(&TestContext, Done) + Send + Sync + 'static,
    {
        self.case(name, Body::callback(f))
    }

    /// Asynchronous case completed when its future resolves
    pub fn it_future<F, Fut>(&mut self, name: impl Into<String>, f: F) -> &mut Case
    where
        F: Fn(TestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.case(name, Body::future(f))
    }

    /// Pending case: reported, never executed
    pub fn xit<F>(&mut self, name: impl Into<String>, f: F) -> &mut Case
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        let case = self.case(name, Body::sync(f));
        case.pending = true;
        case
    }

    /// Register a hook with an explicit body
    pub fn hook(&mut self, kind: HookKind, body: Body) -> &mut Self {
        self.hooks.push(kind, body);
        self
    }

    /// Synchronous hook run before every case
    pub fn before_each<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        self.hook(HookKind::BeforeEach, Body::sync(f))
    }

    /// Asynchronous hook run before every case
    pub fn before_each_async<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext, Done) + Send + Sync + 'static,
    {
        self.hook(HookKind::BeforeEach, Body::callback(f))
    }

    /// Synchronous hook run after every case
    pub fn after_each<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        self.hook(HookKind::AfterEach, Body::sync(f))
    }

    /// Asynchronous hook run after every case
    pub fn after_each_async<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext, Done) + Send + Sync + 'static,
    {
        self.hook(HookKind::AfterEach, Body::callback(f))
    }

    /// Synchronous hook run once before the first case
    pub fn before_all<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        self.hook(HookKind::BeforeAll, Body::sync(f))
    }

    /// Asynchronous hook run once before the first case
    pub fn before_all_async<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext, Done) + Send + Sync + 'static,
    {
        self.hook(HookKind::BeforeAll, Body::callback(f))
    }

    /// Synchronous hook run once after the last case
    pub fn after_all<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext) + Send + Sync + 'static,
    {
        self.hook(HookKind::AfterAll, Body::sync(f))
    }

    /// Asynchronous hook run once after the last case
    pub fn after_all_async<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&TestContext, Done) + Send + Sync + 'static,
    {
        self.hook(HookKind::AfterAll, Body::callback(f))
    }

    fn fail_setup(&mut self, reason: String) {
        // A half-registered suite is never executed.
        self.cases.clear();
        self.hooks.clear();
        self.setup_error = Some(FrameworkError::Setup {
            suite: self.name.clone(),
            reason,
        });
    }
}

/// All suites of a run, in registration order
#[derive(Debug, Default)]
pub struct Registry {
    suites: Vec<Suite>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suite
    ///
    /// `body` runs right away and registers cases and hooks on the suite.
    /// If it returns an error or panics, the suite is kept as a setup error
    /// and later suites are unaffected.
    pub fn describe<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Suite) -> anyhow::Result<()>,
    {
        let mut suite = Suite::new(name.into());

        if suite.name.trim().is_empty() {
            suite.fail_setup(FrameworkError::EmptyName { kind: "suite" }.to_string());
        } else {
            match panic::catch_unwind(AssertUnwindSafe(|| body(&mut suite))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => suite.fail_setup(format!("{:#}", e)),
                Err(payload) => suite.fail_setup(format!("panicked: {}", panic_message(&*payload))),
            }
        }

        if let Some(err) = &suite.setup_error {
            if log::log_enabled!(log::Level::Warn) {
                log::warn!("{}", err);
            }
        } else if log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "Registered suite '{}' with {} cases",
                suite.name,
                suite.cases.len()
            );
        }

        self.suites.push(suite);
        self
    }

    /// Registered suites
    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    /// Total registered cases
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    pub(crate) fn into_suites(self) -> Vec<Suite> {
        self.suites
    }
}

/// Best-effort text of a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
