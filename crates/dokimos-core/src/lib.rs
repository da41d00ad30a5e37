//! # Dokimos Core
//!
//! Failure-tracking primitives shared by every Dokimos inspector.
//!
//! This crate provides the pieces an assertion chain reports into:
//!
//! - [`Checker`] - The failure-scope contract (`failed`, `equal`, `fail`, `fork`)
//! - [`Scope`] - The default checker, a shared handle over recorded failures
//! - [`Reporter`] - Backends that render a failure as it is recorded
//! - [`AssertionError`] - The failure kinds an inspector can raise
//!
//! ## Example
//!
//! ```
//! use dokimos_core::{Checker, Scope};
//!
//! let scope = Scope::collecting();
//! scope.equal(&200_u16, &404_u16);
//! assert!(scope.failed());
//!
//! // A fork starts from the same state but evolves independently.
//! let forked = scope.fork();
//! forked.reset();
//! assert!(scope.failed());
//! assert!(!forked.failed());
//! ```

#![doc(html_root_url = "https://docs.rs/dokimos-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod checker;
mod error;
mod reporter;
mod scope;

pub use checker::Checker;
pub use error::AssertionError;
pub use reporter::{CollectingReporter, PanicReporter, Reporter, TracingReporter};
pub use scope::Scope;
