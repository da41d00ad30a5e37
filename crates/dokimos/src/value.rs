//! Decoded JSON inspector.

use dokimos_core::{AssertionError, Checker};
use serde::Serialize;
use serde_json::Value as Json;

/// Assertions over a decoded JSON value.
///
/// Usually obtained from [`Response::json`](crate::Response::json). The value
/// may be absent when decoding failed upstream; every assertion is then a
/// no-op because the checker it was given has already failed.
///
/// # Example
///
/// ```
/// use dokimos::{Checker, Scope, Value};
/// use serde_json::json;
///
/// let value = Value::new(Scope::collecting(), Some(json!({"user": {"tags": ["a", "b"]}})));
/// value.is_object().path("/user/tags").is_array().equal(["a", "b"]);
/// assert!(!value.checker().failed());
/// ```
#[derive(Debug)]
pub struct Value<C> {
    checker: C,
    value: Option<Json>,
}

impl<C: Checker> Value<C> {
    /// Wraps a decoded value.
    ///
    /// An absent value is reported, unless the checker already failed (the
    /// upstream failure explains the absence).
    pub fn new(checker: C, value: Option<Json>) -> Self {
        if value.is_none() && !checker.failed() {
            checker.fail(AssertionError::Value("value is absent".to_string()));
        }
        Self { checker, value }
    }

    /// The decoded value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<&Json> {
        self.value.as_ref()
    }

    /// The failure scope of this value.
    #[must_use]
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Asserts the value equals `expected` once serialized to JSON.
    pub fn equal(&self, expected: impl Serialize) -> &Self {
        let Some(actual) = self.live() else {
            return self;
        };
        if let Some(expected) = self.to_json(expected) {
            self.checker.equal(&expected, actual);
        }
        self
    }

    /// Asserts the value differs from `expected` once serialized to JSON.
    pub fn not_equal(&self, expected: impl Serialize) -> &Self {
        let Some(actual) = self.live() else {
            return self;
        };
        if let Some(expected) = self.to_json(expected) {
            if &expected == actual {
                self.checker.fail(AssertionError::Value(format!(
                    "expected value different from {expected}"
                )));
            }
        }
        self
    }

    /// Asserts the value is JSON `null`.
    pub fn null(&self) -> &Self {
        if let Some(actual) = self.live() {
            self.checker.equal(&Json::Null, actual);
        }
        self
    }

    /// Asserts the value is not JSON `null`.
    pub fn not_null(&self) -> &Self {
        if let Some(actual) = self.live() {
            if actual.is_null() {
                self.checker
                    .fail(AssertionError::Value("expected non-null value".to_string()));
            }
        }
        self
    }

    /// Asserts the value is an object.
    pub fn is_object(&self) -> &Self {
        self.expect_kind("object")
    }

    /// Asserts the value is an array.
    pub fn is_array(&self) -> &Self {
        self.expect_kind("array")
    }

    /// Asserts the value is a string.
    pub fn is_string(&self) -> &Self {
        self.expect_kind("string")
    }

    /// Asserts the value is a number.
    pub fn is_number(&self) -> &Self {
        self.expect_kind("number")
    }

    /// Asserts the value is a boolean.
    pub fn is_boolean(&self) -> &Self {
        self.expect_kind("boolean")
    }

    /// Inspects the value at a JSON pointer (RFC 6901), e.g. `/items/0/id`.
    ///
    /// The returned inspector gets a fork of this checker. A missing path is
    /// reported on the fork.
    pub fn path(&self, pointer: &str) -> Self {
        let checker = self.checker.fork();
        if checker.failed() {
            return Self {
                checker,
                value: None,
            };
        }

        let found = self.value.as_ref().and_then(|v| v.pointer(pointer)).cloned();
        if found.is_none() {
            checker.fail(AssertionError::Value(format!(
                "path '{pointer}' not found"
            )));
        }
        Self {
            checker,
            value: found,
        }
    }

    /// The value, or `None` if the chain failed or nothing was decoded.
    fn live(&self) -> Option<&Json> {
        if self.checker.failed() {
            return None;
        }
        self.value.as_ref()
    }

    fn to_json(&self, expected: impl Serialize) -> Option<Json> {
        match serde_json::to_value(expected) {
            Ok(json) => Some(json),
            Err(e) => {
                self.checker.fail(AssertionError::Value(format!(
                    "expected value is not serializable: {e}"
                )));
                None
            }
        }
    }

    fn expect_kind(&self, expected: &'static str) -> &Self {
        if let Some(actual) = self.live() {
            let actual = kind_of(actual);
            if actual != expected {
                self.checker.fail(AssertionError::Value(format!(
                    "expected {expected} value, got {actual}"
                )));
            }
        }
        self
    }
}

fn kind_of(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
