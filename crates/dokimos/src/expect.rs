//! Configured entry point.

use crate::response::{BufferedResponse, Response};
use bytes::Bytes;
use dokimos_config::{ConfigError, ConfigLoader, DokimosConfig, FailureMode};
use dokimos_core::{
    AssertionError, CollectingReporter, PanicReporter, Reporter, Scope, TracingReporter,
};
use std::fmt;
use std::sync::Arc;

/// Configuration file looked up by [`Expect::from_env`].
pub const DEFAULT_CONFIG_FILE: &str = "dokimos.toml";

/// Environment variable prefix used by [`Expect::from_env`].
pub const ENV_PREFIX: &str = "DOKIMOS";

/// Creates response inspectors that share one reporting backend.
///
/// Each wrapped response gets its own fresh [`Scope`], so a failure on one
/// response never silences assertions on the next. All scopes report to the
/// reporter selected by `failure.mode`.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use dokimos::Expect;
/// use dokimos_config::{DokimosConfig, FailureConfig, FailureMode};
///
/// let config = DokimosConfig::builder()
///     .failure(FailureConfig { mode: FailureMode::Collect })
///     .build();
/// let expect = Expect::new(&config);
///
/// let raw = http::Response::builder().status(204).body(Bytes::new()).unwrap();
/// expect.bytes_response(raw).status(204).no_content();
///
/// expect.assert_passed();
/// ```
#[derive(Debug, Clone)]
pub struct Expect {
    reporter: Arc<dyn Reporter>,
    collector: Option<CollectingReporter>,
}

impl Expect {
    /// Builds an `Expect` using the reporter named by `config.failure.mode`.
    #[must_use]
    pub fn new(config: &DokimosConfig) -> Self {
        match config.failure.mode {
            FailureMode::Panic => Self::with_reporter(Arc::new(PanicReporter)),
            FailureMode::Log => Self::with_reporter(Arc::new(TracingReporter)),
            FailureMode::Collect => {
                let collector = CollectingReporter::new();
                Self {
                    reporter: Arc::new(collector.clone()),
                    collector: Some(collector),
                }
            }
        }
    }

    /// Builds an `Expect` around a custom reporter.
    #[must_use]
    pub fn with_reporter(reporter: Arc<dyn Reporter>) -> Self {
        Self {
            reporter,
            collector: None,
        }
    }

    /// Loads `dokimos.toml` (if present) and `DOKIMOS__*` overrides, installs
    /// logging, and builds an `Expect`.
    ///
    /// An already installed global subscriber is kept.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ConfigLoader::new()
            .with_optional_file(DEFAULT_CONFIG_FILE)?
            .with_env_prefix(ENV_PREFIX)
            .load()?;

        let log_config = dokimos_telemetry::LogConfig::from(&config.logging);
        if let Err(e) = dokimos_telemetry::init_logging(&log_config) {
            tracing::debug!(error = %e, "keeping existing tracing subscriber");
        }

        Ok(Self::new(&config))
    }

    /// A fresh, passing scope reporting to this `Expect`'s backend.
    #[must_use]
    pub fn scope(&self) -> Scope {
        Scope::with_reporter(Arc::clone(&self.reporter))
    }

    /// Wraps a response in a new inspector with its own scope.
    pub fn response<B>(&self, raw: http::Response<B>) -> Response<Scope, B> {
        Response::new(self.scope(), raw)
    }

    /// Wraps a response whose body is already buffered.
    pub fn bytes_response(&self, raw: http::Response<Bytes>) -> BufferedResponse<Scope> {
        Response::from_bytes(self.scope(), raw)
    }

    /// Drains an [`http_body::Body`] and wraps the buffered response.
    pub async fn collect_response<T>(&self, raw: http::Response<T>) -> BufferedResponse<Scope>
    where
        T: http_body::Body,
        T::Error: fmt::Display,
    {
        Response::collect(self.scope(), raw).await
    }

    /// Failures collected so far. Always empty unless the mode is `collect`.
    #[must_use]
    pub fn failures(&self) -> Vec<AssertionError> {
        self.collector
            .as_ref()
            .map(CollectingReporter::failures)
            .unwrap_or_default()
    }

    /// Panics listing the collected failures, if any.
    pub fn assert_passed(&self) {
        if let Some(collector) = &self.collector {
            collector.assert_passed();
        }
    }
}

impl Default for Expect {
    fn default() -> Self {
        Self::new(&DokimosConfig::default())
    }
}
