//! The failure-scope contract.

use crate::AssertionError;
use std::fmt;

/// A failure scope that inspectors report into.
///
/// Methods take `&self`: a checker is a handle, and every inspector in one
/// chain shares the same underlying state. [`fork`](Checker::fork) is the only
/// way to obtain a scope whose state evolves independently.
///
/// # Example
///
/// ```
/// use dokimos_core::{AssertionError, Checker, Scope};
///
/// fn expect_ok(checker: &impl Checker, status: u16) {
///     if checker.failed() {
///         return;
///     }
///     checker.equal(&200, &status);
/// }
///
/// let scope = Scope::collecting();
/// expect_ok(&scope, 500);
/// assert!(scope.failed());
/// ```
pub trait Checker {
    /// Returns true once any failure has been recorded in this scope.
    fn failed(&self) -> bool;

    /// Records a failure unconditionally.
    fn fail(&self, error: AssertionError);

    /// Creates an independent scope starting from a copy of the current state.
    ///
    /// Failures recorded on either side after the fork are invisible to the
    /// other.
    #[must_use]
    fn fork(&self) -> Self
    where
        Self: Sized;

    /// Records a [`AssertionError::Mismatch`] if `expected != actual`.
    fn equal<T>(&self, expected: &T, actual: &T)
    where
        T: PartialEq + fmt::Debug + ?Sized,
    {
        if expected != actual {
            self.fail(AssertionError::mismatch(expected, actual));
        }
    }
}
