//! Main configuration types.
//!
//! This module provides the top-level [`DokimosConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{FailureConfig, LoggingConfig};

/// Complete Dokimos configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use dokimos_config::{DokimosConfig, FailureMode};
///
/// let config = DokimosConfig::default();
/// assert_eq!(config.failure.mode, FailureMode::Panic);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct DokimosConfig {
    /// Failure handling configuration.
    #[serde(default)]
    pub failure: FailureConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DokimosConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> DokimosConfigBuilder {
        DokimosConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `logging.level` is not a valid
    /// filter directive.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.logging.enabled {
            dokimos_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| crate::ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Local development preset: debug level, pretty output with locations,
    /// failures logged so one run shows every broken assertion.
    ///
    /// # Example
    ///
    /// ```
    /// use dokimos_config::{DokimosConfig, FailureMode};
    ///
    /// let config = DokimosConfig::development();
    /// assert_eq!(config.failure.mode, FailureMode::Log);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = crate::LogFormat::Pretty;
        config.logging.include_location = true;
        config.failure.mode = crate::FailureMode::Log;

        config
    }

    /// CI preset: JSON logs, panic at the first failure.
    #[must_use]
    pub fn ci() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = crate::LogFormat::Json;
        config.failure.mode = crate::FailureMode::Panic;

        config
    }
}

/// Builder for [`DokimosConfig`].
#[derive(Debug, Default)]
pub struct DokimosConfigBuilder {
    failure: Option<FailureConfig>,
    logging: Option<LoggingConfig>,
}

impl DokimosConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure configuration.
    #[must_use]
    pub fn failure(mut self, failure: FailureConfig) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    ///
    /// Any unset sections will use their default values.
    #[must_use]
    pub fn build(self) -> DokimosConfig {
        DokimosConfig {
            failure: self.failure.unwrap_or_default(),
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<DokimosConfig, crate::ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
