//! Typed configuration for Dokimos.
//!
//! This crate decides how assertion failures are rendered and how the
//! inspectors' log output is set up, with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use dokimos_config::ConfigLoader;
//!
//! # fn main() -> Result<(), dokimos_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("dokimos.toml")?
//!     .with_env_prefix("DOKIMOS")
//!     .load()?;
//!
//! println!("Failures will be handled with: {:?}", config.failure.mode);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [failure]
//! mode = "collect"   # panic | log | collect
//!
//! [logging]
//! enabled = true
//! level = "dokimos=debug"
//! format = "pretty"  # pretty | json
//! include_location = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `DOKIMOS__FAILURE__MODE=log`
//! - `DOKIMOS__LOGGING__LEVEL=debug`
//! - `DOKIMOS__LOGGING__FORMAT=json`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
