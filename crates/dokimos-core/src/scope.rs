//! The default failure scope.

use crate::{AssertionError, Checker, CollectingReporter, PanicReporter, Reporter, TracingReporter};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
struct ScopeState {
    failures: Vec<AssertionError>,
}

/// Shared failure scope backed by a [`Reporter`].
///
/// Cloning a `Scope` clones the handle: both clones observe and record into
/// the same state. Use [`Checker::fork`] for an independent scope. A fork
/// copies the recorded failures and keeps the same reporter.
///
/// # Example
///
/// ```
/// use dokimos_core::{Checker, Scope};
///
/// let scope = Scope::collecting();
/// let shared = scope.clone();
/// shared.equal("a", "b");
///
/// assert!(scope.failed());
/// assert_eq!(scope.failures().len(), 1);
/// ```
#[derive(Clone)]
pub struct Scope {
    state: Arc<Mutex<ScopeState>>,
    reporter: Arc<dyn Reporter>,
}

impl Scope {
    /// Creates a passing scope that forwards failures to `reporter`.
    pub fn new(reporter: impl Reporter + 'static) -> Self {
        Self::with_reporter(Arc::new(reporter))
    }

    /// Creates a passing scope over an already shared reporter.
    #[must_use]
    pub fn with_reporter(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScopeState::default())),
            reporter,
        }
    }

    /// Scope that panics on the first failure.
    #[must_use]
    pub fn panicking() -> Self {
        Self::new(PanicReporter)
    }

    /// Scope that logs failures and keeps going.
    #[must_use]
    pub fn logging() -> Self {
        Self::new(TracingReporter)
    }

    /// Scope that only records failures, for inspection via [`Scope::failures`].
    #[must_use]
    pub fn collecting() -> Self {
        Self::new(CollectingReporter::new())
    }

    /// Failures recorded in this scope (including those copied in by a fork).
    #[must_use]
    pub fn failures(&self) -> Vec<AssertionError> {
        self.state.lock().failures.clone()
    }

    /// Clears the recorded failures, returning the scope to passing.
    pub fn reset(&self) {
        self.state.lock().failures.clear();
    }

    /// The reporter this scope forwards to.
    #[must_use]
    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::panicking()
    }
}

impl Checker for Scope {
    fn failed(&self) -> bool {
        !self.state.lock().failures.is_empty()
    }

    fn fail(&self, error: AssertionError) {
        tracing::debug!(kind = error.kind(), "recording assertion failure");
        // Lock released before reporting, a panicking reporter must not hold it.
        self.state.lock().failures.push(error.clone());
        self.reporter.report(&error);
    }

    fn fork(&self) -> Self {
        let state = self.state.lock().clone();
        Self {
            state: Arc::new(Mutex::new(state)),
            reporter: Arc::clone(&self.reporter),
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Scope")
            .field("failures", &state.failures.len())
            .field("reporter", &self.reporter)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_scope_passes() {
        let scope = Scope::collecting();
        assert!(!scope.failed());
        assert!(scope.failures().is_empty());
    }

    #[test]
    fn test_equal_records_mismatch() {
        let scope = Scope::collecting();
        scope.equal(&1, &1);
        assert!(!scope.failed());

        scope.equal(&1, &2);
        assert!(scope.failed());
        assert_eq!(scope.failures(), vec![AssertionError::mismatch(&1, &2)]);
    }

    #[test]
    fn test_clone_shares_state() {
        let scope = Scope::collecting();
        let handle = scope.clone();
        handle.fail(AssertionError::message("boom"));
        assert!(scope.failed());
    }

    #[test]
    fn test_fork_copies_failed_state() {
        let scope = Scope::collecting();
        scope.fail(AssertionError::message("before fork"));

        let forked = scope.fork();
        assert!(forked.failed());
        assert_eq!(forked.failures(), scope.failures());
    }

    #[test]
    fn test_fork_is_independent() {
        let scope = Scope::collecting();
        let forked = scope.fork();

        forked.fail(AssertionError::message("only in fork"));
        assert!(forked.failed());
        assert!(!scope.failed());

        scope.fail(AssertionError::message("only in parent"));
        assert_eq!(forked.failures().len(), 1);
        assert_eq!(scope.failures().len(), 1);
    }

    #[test]
    fn test_fork_shares_reporter() {
        let collector = CollectingReporter::new();
        let scope = Scope::new(collector.clone());
        let forked = scope.fork();

        scope.fail(AssertionError::message("parent"));
        forked.fail(AssertionError::message("fork"));

        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_reset() {
        let scope = Scope::collecting();
        scope.fail(AssertionError::message("boom"));
        scope.reset();
        assert!(!scope.failed());
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_panicking_scope() {
        let scope = Scope::panicking();
        scope.equal("expected", "actual");
    }

    #[test]
    fn test_logging_scope_continues() {
        let scope = Scope::logging();
        scope.equal("expected", "actual");
        assert!(scope.failed());
    }

    #[test]
    fn test_debug_output() {
        let scope = Scope::collecting();
        let debug = format!("{scope:?}");
        assert!(debug.contains("Scope"));
        assert!(debug.contains("failures"));
    }

    proptest! {
        #[test]
        fn prop_equal_fails_iff_values_differ(a in any::<i64>(), b in any::<i64>()) {
            let scope = Scope::collecting();
            scope.equal(&a, &b);
            prop_assert_eq!(scope.failed(), a != b);
        }

        #[test]
        fn prop_fork_never_leaks_back(failures in 0usize..8) {
            let scope = Scope::collecting();
            let forked = scope.fork();
            for i in 0..failures {
                forked.fail(AssertionError::message(format!("failure {i}")));
            }
            prop_assert!(!scope.failed());
            prop_assert_eq!(forked.failures().len(), failures);
        }
    }
}
