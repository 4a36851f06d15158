//! Expectations and matchers
//!
//! `expect(actual)` produces an [`Expectation`]: a subject, a negation flag
//! and, once a matcher method is called, an [`Operation`]. All matchers go
//! through the same evaluation path: compute the raw outcome, apply the
//! negation, record the result against the running case. A failing matcher
//! never panics and never stops the body.
//!
//! ```rust
//! use feedreader_testing_framework::expect::TestContext;
//!
//! let ctx = TestContext::new("RSS Feeds are defined");
//! let feeds = vec!["Udacity Blog", "CSS Tricks"];
//!
//! ctx.expect(Some(&feeds)).to_be_defined();
//! ctx.expect(feeds.len()).not().to_be(0);
//! ctx.expect(feeds.len()).to_be_greater_than(3); // recorded as a failure
//!
//! let results = ctx.take_results();
//! assert_eq!(results.len(), 3);
//! assert!(!results[2].passed);
//! ```

use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;

use crate::report::ExpectationResult;

/// Matcher operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Equality (`===` in spirit; identity for node handles)
    ToBe,
    /// `Option` is `Some`
    ToBeDefined,
    /// `Option` is `None`
    ToBeUndefined,
    /// Strictly greater
    ToBeGreaterThan,
    /// Strictly less
    ToBeLessThan,
    /// `true`
    ToBeTruthy,
    /// `false`
    ToBeFalsy,
    /// Collection holds an element equal to the expected one
    ToContain,
}

impl Operation {
    /// Matcher name as it appears in reports
    pub fn name(self) -> &'static str {
        match self {
            Operation::ToBe => "toBe",
            Operation::ToBeDefined => "toBeDefined",
            Operation::ToBeUndefined => "toBeUndefined",
            Operation::ToBeGreaterThan => "toBeGreaterThan",
            Operation::ToBeLessThan => "toBeLessThan",
            Operation::ToBeTruthy => "toBeTruthy",
            Operation::ToBeFalsy => "toBeFalsy",
            Operation::ToContain => "toContain",
        }
    }

    fn phrase(self) -> &'static str {
        match self {
            Operation::ToBe => "to be",
            Operation::ToBeDefined => "to be defined",
            Operation::ToBeUndefined => "to be undefined",
            Operation::ToBeGreaterThan => "to be greater than",
            Operation::ToBeLessThan => "to be less than",
            Operation::ToBeTruthy => "to be truthy",
            Operation::ToBeFalsy => "to be falsy",
            Operation::ToContain => "to contain",
        }
    }
}

/// Handle given to every case and hook body
///
/// Collects expectation results for the step currently executing. Clones
/// share the same sink, so a context moved into a spawned task or a
/// completion callback still records against the right case.
#[derive(Clone)]
pub struct TestContext {
    label: Arc<str>,
    results: Arc<Mutex<Vec<ExpectationResult>>>,
}

impl TestContext {
    /// Create a context with an empty result sink
    pub fn new(label: impl Into<String>) -> Self {
        let label: String = label.into();
        Self {
            label: label.into(),
            results: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Full name of the case (or suite, for suite-level hooks)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start an expectation
    pub fn expect<T: Debug>(&self, actual: T) -> Expectation<T> {
        Expectation {
            subject: actual,
            negate: false,
            ctx: self.clone(),
        }
    }

    /// Record an unconditional failure
    pub fn fail(&self, message: impl Into<String>) {
        self.record(ExpectationResult {
            matcher: "fail".to_string(),
            passed: false,
            message: Some(message.into()),
        });
    }

    /// Drain everything recorded so far
    pub fn take_results(&self) -> Vec<ExpectationResult> {
        std::mem::take(&mut *self.results.lock())
    }

    /// Whether any recorded expectation failed
    pub fn has_failures(&self) -> bool {
        self.results.lock().iter().any(|r| !r.passed)
    }

    fn record(&self, result: ExpectationResult) {
        if !result.passed && log::log_enabled!(log::Level::Debug) {
            log::debug!(
                "{}: {}",
                self.label,
                result.message.as_deref().unwrap_or("expectation failed")
            );
        }
        self.results.lock().push(result);
    }
}

impl std::fmt::Debug for TestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestContext")
            .field("label", &self.label)
            .field("recorded", &self.results.lock().len())
            .finish()
    }
}

/// A pending expectation: subject plus negation flag
#[must_use = "an expectation does nothing until a matcher is called"]
pub struct Expectation<T: Debug> {
    subject: T,
    negate: bool,
    ctx: TestContext,
}

impl<T: Debug> Expectation<T> {
    /// Negate the next matcher (`expect(x).not().to_be(y)`)
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Evaluate uniformly: apply negation, build the message, record
    fn evaluate(&self, operation: Operation, outcome: bool, expected: Option<String>) -> bool {
        let passed = outcome != self.negate;

        let matcher = if self.negate {
            format!("not.{}", operation.name())
        } else {
            operation.name().to_string()
        };

        let message = (!passed).then(|| {
            let mut message = format!(
                "Expected {:?} {}{}",
                self.subject,
                if self.negate { "not " } else { "" },
                operation.phrase()
            );
            if let Some(expected) = expected {
                message.push(' ');
                message.push_str(&expected);
            }
            message.push('.');
            message
        });

        self.ctx.record(ExpectationResult {
            matcher,
            passed,
            message,
        });
        passed
    }
}

impl<T: Debug + PartialEq> Expectation<T> {
    /// Equality
    pub fn to_be(self, expected: T) -> bool {
        let outcome = self.subject == expected;
        self.evaluate(Operation::ToBe, outcome, Some(format!("{:?}", expected)))
    }
}

impl<T: Debug + PartialOrd> Expectation<T> {
    /// Strictly greater than `n`
    pub fn to_be_greater_than(self, n: T) -> bool {
        let outcome = self.subject > n;
        self.evaluate(Operation::ToBeGreaterThan, outcome, Some(format!("{:?}", n)))
    }

    /// Strictly less than `n`
    pub fn to_be_less_than(self, n: T) -> bool {
        let outcome = self.subject < n;
        self.evaluate(Operation::ToBeLessThan, outcome, Some(format!("{:?}", n)))
    }
}

impl<U: Debug> Expectation<Option<U>> {
    /// Subject is `Some`
    pub fn to_be_defined(self) -> bool {
        let outcome = self.subject.is_some();
        self.evaluate(Operation::ToBeDefined, outcome, None)
    }

    /// Subject is `None`
    pub fn to_be_undefined(self) -> bool {
        let outcome = self.subject.is_none();
        self.evaluate(Operation::ToBeUndefined, outcome, None)
    }
}

impl Expectation<bool> {
    /// Subject is `true`
    pub fn to_be_truthy(self) -> bool {
        let outcome = self.subject;
        self.evaluate(Operation::ToBeTruthy, outcome, None)
    }

    /// Subject is `false`
    pub fn to_be_falsy(self) -> bool {
        let outcome = !self.subject;
        self.evaluate(Operation::ToBeFalsy, outcome, None)
    }
}

impl<U: Debug + PartialEq> Expectation<Vec<U>> {
    /// Collection contains `item`
    pub fn to_contain(self, item: U) -> bool {
        let outcome = self.subject.contains(&item);
        self.evaluate(Operation::ToContain, outcome, Some(format!("{:?}", item)))
    }
}
