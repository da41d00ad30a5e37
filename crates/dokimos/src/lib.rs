//! # Dokimos
//!
//! Fluent, short-circuiting assertions for HTTP responses in tests.
//!
//! Wrap a received `http::Response` and chain assertions on its status,
//! headers and body. Failures are recorded in a shared failure scope rather
//! than returned, so the chain never needs branching: after the first
//! failure every later assertion is skipped.
//!
//! ## Key Features
//!
//! - **Short-circuit chains**: one failure, one report, no cascade
//! - **Read-once bodies**: the body is drained on first use and cached
//! - **Strict JSON gate**: `application/json` and a utf-8 (or absent)
//!   charset are checked before the body is even read
//! - **Pluggable reporting**: panic, log through `tracing`, or collect
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use dokimos::{Checker, Response, Scope};
//!
//! let raw = http::Response::builder()
//!     .status(200)
//!     .header("Content-Type", "application/json; charset=utf-8")
//!     .body(Bytes::from_static(br#"{"name": "Alice", "roles": ["admin"]}"#))
//!     .unwrap();
//!
//! let mut response = Response::from_bytes(Scope::collecting(), raw);
//! response
//!     .status(200)
//!     .header("content-type", "application/json; charset=utf-8");
//!
//! let user = response.json();
//! user.is_object();
//! user.path("/name").equal("Alice");
//! user.path("/roles/0").equal("admin");
//!
//! assert!(!response.checker().failed());
//! assert!(!user.checker().failed());
//! ```
//!
//! ## Failure scopes
//!
//! | Operation | Scope used |
//! |-----------|------------|
//! | `status`, `headers`, `header`, `no_content`, `text` | the response's scope |
//! | `json()` | a fork of the response's scope |
//! | `Value::path` | a fork of the value's scope |

#![doc(html_root_url = "https://docs.rs/dokimos/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod expect;
mod media;
mod response;
mod value;

pub use expect::{Expect, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use media::MediaType;
pub use response::{BufferedResponse, Response};
pub use value::Value;

pub use dokimos_config::{ConfigError, ConfigLoader, DokimosConfig, FailureConfig, FailureMode};
pub use dokimos_core::{
    AssertionError, Checker, CollectingReporter, PanicReporter, Reporter, Scope, TracingReporter,
};
