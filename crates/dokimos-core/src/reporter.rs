//! Failure reporting backends.
//!
//! A [`Reporter`] decides what happens when a [`Scope`](crate::Scope) records a
//! failure. The scope has already marked itself failed by then, so a reporter
//! only controls rendering:
//!
//! | Reporter | Behaviour |
//! |---|---|
//! | [`PanicReporter`] | Panics, ending the test at the first failure |
//! | [`TracingReporter`] | Logs through `tracing` and lets the test continue |
//! | [`CollectingReporter`] | Stores failures for later inspection |

use crate::AssertionError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Receives every failure recorded by a scope.
pub trait Reporter: Send + Sync + fmt::Debug {
    /// Called once per recorded failure.
    fn report(&self, error: &AssertionError);
}

/// Panics with the rendered failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn report(&self, error: &AssertionError) {
        panic!("assertion failed: {error}");
    }
}

/// Logs each failure as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, error: &AssertionError) {
        tracing::error!(kind = error.kind(), error = %error, "assertion failed");
    }
}

/// Stores failures in memory.
///
/// Clones share the same storage, so a test can keep one handle while the
/// scope owns another.
///
/// # Example
///
/// ```
/// use dokimos_core::{AssertionError, CollectingReporter, Reporter};
///
/// let collector = CollectingReporter::new();
/// collector.report(&AssertionError::message("boom"));
/// assert_eq!(collector.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    failures: Arc<Mutex<Vec<AssertionError>>>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the collected failures, oldest first.
    #[must_use]
    pub fn failures(&self) -> Vec<AssertionError> {
        self.failures.lock().clone()
    }

    /// Number of collected failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }

    /// Drops all collected failures.
    pub fn clear(&self) {
        self.failures.lock().clear();
    }

    /// Panics listing every collected failure, if there are any.
    pub fn assert_passed(&self) {
        let failures = self.failures.lock();
        if failures.is_empty() {
            return;
        }
        let rendered: Vec<String> = failures.iter().map(ToString::to_string).collect();
        panic!(
            "{} assertion(s) failed:\n{}",
            rendered.len(),
            rendered.join("\n---\n")
        );
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, error: &AssertionError) {
        self.failures.lock().push(error.clone());
    }
}
