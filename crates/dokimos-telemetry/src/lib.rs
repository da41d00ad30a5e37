//! Logging setup for Dokimos.
//!
//! Dokimos inspectors emit `tracing` events (body reads, decode steps,
//! short-circuited calls, reported failures). This crate installs a
//! `tracing-subscriber` pipeline so those events are visible:
//!
//! - **JSON output** for CI logs that are machine-read
//! - **Pretty output** for local runs
//! - **Test output** captured per test by the libtest harness
//!
//! # Example
//!
//! ```rust,ignore
//! use dokimos_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//!
//! tracing::info!(status = 200, "response received");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, init_test_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
