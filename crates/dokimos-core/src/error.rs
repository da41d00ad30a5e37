//! Assertion failure types.

use std::fmt;
use thiserror::Error;

/// A failure recorded by a [`Checker`](crate::Checker).
///
/// Inspectors never return these to the caller. They are handed to the
/// failure scope, which records them and forwards them to its
/// [`Reporter`](crate::Reporter).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssertionError {
    /// Expected and actual values differ.
    #[error("values are not equal\n  expected: {expected}\n    actual: {actual}")]
    Mismatch {
        /// Debug rendering of the expected value.
        expected: String,
        /// Debug rendering of the actual value.
        actual: String,
    },

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),

    /// The `Content-Type` charset parameter is not the accepted one.
    #[error("bad charset: expected empty or '{expected}', got '{actual}'")]
    Charset {
        /// The accepted charset.
        expected: String,
        /// The charset found in the header.
        actual: String,
    },

    /// The response body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(String),

    /// A decoded value did not have the expected shape.
    #[error("{0}")]
    Value(String),

    /// Free-form failure message.
    #[error("{0}")]
    Message(String),
}

impl AssertionError {
    /// Create a mismatch error from the debug renderings of both values.
    pub fn mismatch<T>(expected: &T, actual: &T) -> Self
    where
        T: fmt::Debug + ?Sized,
    {
        Self::Mismatch {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Create a charset error.
    pub fn charset(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Charset {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a free-form failure.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Short, stable name of the failure kind, used as a log field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Mismatch { .. } => "mismatch",
            Self::BodyRead(_) => "body_read",
            Self::Charset { .. } => "charset",
            Self::Json(_) => "json",
            Self::Value(_) => "value",
            Self::Message(_) => "message",
        }
    }
}

impl From<std::io::Error> for AssertionError {
    fn from(e: std::io::Error) -> Self {
        Self::BodyRead(e.to_string())
    }
}
