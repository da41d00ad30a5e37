//! Response inspector.

use crate::media::{header_text, MediaType, APPLICATION_JSON, UTF_8};
use crate::value::Value;
use bytes::buf::Reader;
use bytes::{Buf, Bytes};
use dokimos_core::{AssertionError, Checker};
use http::{header, HeaderMap};
use http_body_util::BodyExt;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use tracing::{debug, trace};

/// A [`Response`] over an already buffered body.
pub type BufferedResponse<C> = Response<C, Reader<Bytes>>;

/// Fluent assertions over one received HTTP response.
///
/// Every assertion returns `&mut Self` so calls can be chained. Once the
/// checker has failed, assertions become no-ops: they neither compare nor
/// touch the body, so a chain can keep going after the first failure
/// without cascading noise.
///
/// The body is read at most once, on first use, and cached for every later
/// assertion.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use dokimos::{Checker, Response, Scope};
///
/// let raw = http::Response::builder()
///     .status(201)
///     .header("Content-Type", "application/json")
///     .body(Bytes::from_static(br#"{"id": 7}"#))
///     .unwrap();
///
/// let mut response = Response::from_bytes(Scope::collecting(), raw);
/// response.status(201).header("content-type", "application/json");
/// response.json().path("/id").equal(7);
///
/// assert!(!response.checker().failed());
/// ```
pub struct Response<C, B> {
    checker: C,
    raw: http::Response<B>,
    /// `None` until the body has been read once.
    body: Option<Bytes>,
}

impl<C: Checker, B> Response<C, B> {
    /// Wraps `raw`. Nothing is read until an assertion needs the body.
    pub fn new(checker: C, raw: http::Response<B>) -> Self {
        Self {
            checker,
            raw,
            body: None,
        }
    }

    /// The wrapped response.
    #[must_use]
    pub fn raw(&self) -> &http::Response<B> {
        &self.raw
    }

    /// The failure scope shared by this chain.
    #[must_use]
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Asserts the numeric status code.
    pub fn status(&mut self, expected: u16) -> &mut Self {
        if self.short_circuit("status") {
            return self;
        }
        self.checker.equal(&expected, &self.raw.status().as_u16());
        self
    }

    /// Asserts the complete header collection.
    ///
    /// Names are compared case-insensitively. Each name maps to all of its
    /// values in response order, so a missing header, an extra header or a
    /// reordered value list all fail.
    ///
    /// # Example
    ///
    /// ```
    /// use bytes::Bytes;
    /// use dokimos::{Checker, Response, Scope};
    ///
    /// let raw = http::Response::builder()
    ///     .header("X-A", "1")
    ///     .header("X-B", "2")
    ///     .header("X-B", "3")
    ///     .body(Bytes::new())
    ///     .unwrap();
    ///
    /// let mut response = Response::from_bytes(Scope::collecting(), raw);
    /// response.headers([("X-A", vec!["1"]), ("X-B", vec!["2", "3"])]);
    /// assert!(!response.checker().failed());
    /// ```
    pub fn headers<I, K, V>(&mut self, expected: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        if self.short_circuit("headers") {
            return self;
        }

        let mut table: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, values) in expected {
            table
                .entry(name.as_ref().to_ascii_lowercase())
                .or_default()
                .extend(values.into_iter().map(|v| v.as_ref().to_string()));
        }

        self.checker.equal(&table, &header_table(self.raw.headers()));
        self
    }

    /// Asserts the first value of header `name`; an absent header reads as
    /// the empty string.
    pub fn header(&mut self, name: &str, expected: &str) -> &mut Self {
        if self.short_circuit("header") {
            return self;
        }
        let actual = first_header(self.raw.headers(), name);
        self.checker.equal(expected, actual.as_str());
        self
    }

    /// Asserts the `Content-Type` media type exactly, and that the charset
    /// parameter is either absent or equal to `charset` ignoring case.
    pub fn content_type(&mut self, media_type: &str, charset: &str) -> &mut Self {
        if self.short_circuit("content_type") {
            return self;
        }
        self.check_content_type(media_type, charset);
        self
    }

    /// Returns true if the checker already failed, in which case the caller
    /// must return without doing anything.
    fn short_circuit(&self, assertion: &'static str) -> bool {
        let failed = self.checker.failed();
        if failed {
            trace!(assertion, "skipping assertion, chain already failed");
        }
        failed
    }

    /// Media type first, charset second. Returns false after reporting.
    fn check_content_type(&self, media_type: &str, charset: &str) -> bool {
        let media = MediaType::from_headers(self.raw.headers());

        self.checker.equal(media_type, media.essence());
        if self.checker.failed() {
            return false;
        }

        if !media.accepts_charset(charset) {
            self.checker.fail(AssertionError::charset(
                charset,
                media.charset().unwrap_or_default(),
            ));
            return false;
        }

        true
    }
}

impl<C: Checker, B: Read> Response<C, B> {
    /// The response body, read on first call and cached afterwards.
    ///
    /// A read error is reported to the checker and yields empty bytes; the
    /// cache stays empty in that case.
    pub fn body(&mut self) -> Bytes {
        if let Some(body) = &self.body {
            return body.clone();
        }

        let mut buf = Vec::new();
        match self.raw.body_mut().read_to_end(&mut buf) {
            Ok(len) => {
                debug!(body_bytes = len, "read response body");
                let body = Bytes::from(buf);
                self.body = Some(body.clone());
                body
            }
            Err(e) => {
                self.checker.fail(AssertionError::from(e));
                Bytes::new()
            }
        }
    }

    /// Asserts there is no `Content-Type` header and the body is empty.
    ///
    /// Both checks run, so a response failing both reports twice.
    pub fn no_content(&mut self) -> &mut Self {
        if self.short_circuit("no_content") {
            return self;
        }

        let content_type = first_header(self.raw.headers(), header::CONTENT_TYPE.as_str());
        let body = self.body();

        self.checker.equal("", content_type.as_str());
        self.checker.equal("", &*String::from_utf8_lossy(&body));
        self
    }

    /// Asserts the body, decoded as (lossy) UTF-8 text.
    pub fn text(&mut self, expected: &str) -> &mut Self {
        if self.short_circuit("text") {
            return self;
        }
        let body = self.body();
        self.checker.equal(expected, &*String::from_utf8_lossy(&body));
        self
    }

    /// Decodes the body as JSON after validating the content type.
    ///
    /// Checks run in order and stop at the first failure: media type must be
    /// exactly `application/json`, charset absent or `utf-8`, body readable,
    /// body valid JSON. Returns `None` if the chain had already failed or any
    /// step fails.
    pub fn decode_json(&mut self) -> Option<serde_json::Value> {
        if self.short_circuit("decode_json") {
            return None;
        }

        if !self.check_content_type(APPLICATION_JSON, UTF_8) {
            return None;
        }

        let body = self.body();
        if self.checker.failed() {
            return None;
        }

        match serde_json::from_slice(&body) {
            Ok(value) => {
                debug!(body_bytes = body.len(), "decoded JSON body");
                Some(value)
            }
            Err(e) => {
                self.checker.fail(AssertionError::Json(e.to_string()));
                None
            }
        }
    }

    /// Decodes the body and returns an inspector over the result.
    ///
    /// Always returns a usable [`Value`], even if decoding failed. The value
    /// gets a fork of this chain's checker, so failures on either side no
    /// longer affect the other.
    pub fn json(&mut self) -> Value<C> {
        let value = self.decode_json();
        Value::new(self.checker.fork(), value)
    }
}

impl<C: Checker> Response<C, Reader<Bytes>> {
    /// Wraps a response whose body is already in memory.
    pub fn from_bytes(checker: C, raw: http::Response<Bytes>) -> Self {
        Self::new(checker, raw.map(Buf::reader))
    }

    /// Drains an [`http_body::Body`] and wraps the buffered result.
    ///
    /// A body error is reported as a body-read failure and the response is
    /// wrapped with an empty body.
    pub async fn collect<T>(checker: C, raw: http::Response<T>) -> Self
    where
        T: http_body::Body,
        T::Error: fmt::Display,
    {
        let (parts, body) = raw.into_parts();
        let bytes = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                checker.fail(AssertionError::BodyRead(e.to_string()));
                Bytes::new()
            }
        };
        Self::from_bytes(checker, http::Response::from_parts(parts, bytes))
    }
}

impl<C: fmt::Debug, B> fmt::Debug for Response<C, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.raw.status())
            .field("headers", self.raw.headers())
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("checker", &self.checker)
            .finish()
    }
}

/// First value of `name`, or the empty string.
fn first_header(headers: &HeaderMap, name: &str) -> String {
    headers.get(name).map(header_text).unwrap_or_default()
}

/// Headers as lower-cased name to values, values in response order.
fn header_table(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    headers
        .keys()
        .map(|name| {
            let values = headers.get_all(name).iter().map(header_text).collect();
            (name.as_str().to_string(), values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dokimos_core::Scope;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Yields its data once, then errors on any read after end of stream.
    struct OneShot {
        data: io::Cursor<Vec<u8>>,
        drained: bool,
        reads: Arc<AtomicUsize>,
    }

    impl OneShot {
        fn new(data: &[u8]) -> (Self, Arc<AtomicUsize>) {
            let reads = Arc::new(AtomicUsize::new(0));
            let reader = Self {
                data: io::Cursor::new(data.to_vec()),
                drained: false,
                reads: Arc::clone(&reads),
            };
            (reader, reads)
        }
    }

    impl Read for OneShot {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.drained {
                return Err(io::Error::new(io::ErrorKind::Other, "body already consumed"));
            }
            let n = self.data.read(buf)?;
            if n == 0 {
                self.drained = true;
            }
            Ok(n)
        }
    }

    /// Fails every read.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
        }
    }

    fn raw_with<B>(content_type: Option<&str>, body: B) -> http::Response<B> {
        let mut builder = http::Response::builder().status(200);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(body).unwrap()
    }

    #[test]
    fn test_new_does_not_read_body() {
        let (reader, reads) = OneShot::new(b"{}");
        let response = Response::new(Scope::collecting(), raw_with(None, reader));
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(response.body.is_none());
        assert_eq!(response.raw().status(), http::StatusCode::OK);
    }

    #[test]
    fn test_body_reads_stream_once() {
        let (reader, reads) = OneShot::new(b"hello");
        let mut response = Response::new(Scope::collecting(), raw_with(None, reader));

        let first = response.body();
        let reads_after_first = reads.load(Ordering::SeqCst);
        let second = response.body();

        assert_eq!(first, Bytes::from_static(b"hello"));
        assert_eq!(first, second);
        assert_eq!(reads.load(Ordering::SeqCst), reads_after_first);
        assert!(!response.checker().failed());
    }

    #[test]
    fn test_body_read_error_reports_and_does_not_cache() {
        let mut response = Response::new(Scope::collecting(), raw_with(None, Broken));

        let body = response.body();
        assert!(body.is_empty());
        assert!(response.body.is_none());

        let failures = response.checker().failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind(), "body_read");
        assert!(failures[0].to_string().contains("connection reset"));
    }

    #[test]
    fn test_empty_body_is_cached() {
        let mut response = Response::new(Scope::collecting(), raw_with(None, io::empty()));
        assert!(response.body().is_empty());
        assert_eq!(response.body.as_deref(), Some(&b""[..]));
    }

    #[test]
    fn test_header_absent_reads_as_empty() {
        let mut response = Response::from_bytes(Scope::collecting(), raw_with(None, Bytes::new()));
        response.header("X-Missing", "");
        assert!(!response.checker().failed());
    }

    #[test]
    fn test_header_uses_first_value() {
        let raw = http::Response::builder()
            .header("X-Multi", "first")
            .header("X-Multi", "second")
            .body(Bytes::new())
            .unwrap();
        let mut response = Response::from_bytes(Scope::collecting(), raw);

        response.header("x-multi", "first");
        assert!(!response.checker().failed());

        response.header("X-Multi", "second");
        assert!(response.checker().failed());
    }

    #[test]
    fn test_header_table_groups_values() {
        let mut headers = HeaderMap::new();
        headers.append("x-b", "2".parse().unwrap());
        headers.append("x-a", "1".parse().unwrap());
        headers.append("x-b", "3".parse().unwrap());

        let table = header_table(&headers);
        assert_eq!(table.len(), 2);
        assert_eq!(table["x-a"], vec!["1"]);
        assert_eq!(table["x-b"], vec!["2", "3"]);
    }

    #[test]
    fn test_status_mismatch_records_failure() {
        let mut response = Response::from_bytes(Scope::collecting(), raw_with(None, Bytes::new()));
        response.status(404);
        assert_eq!(
            response.checker().failures(),
            vec![AssertionError::mismatch(&404_u16, &200_u16)]
        );
    }

    #[test]
    fn test_failed_chain_skips_body_read() {
        let (reader, reads) = OneShot::new(b"payload");
        let mut response = Response::new(Scope::collecting(), raw_with(None, reader));

        response.status(500);
        assert!(response.checker().failed());

        response.no_content().text("payload");
        assert!(response.decode_json().is_none());

        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert!(response.body.is_none());
        assert_eq!(response.checker().failures().len(), 1);
    }

    #[test]
    fn test_decode_json_skips_parse_after_read_error() {
        let mut response =
            Response::new(Scope::collecting(), raw_with(Some("application/json"), Broken));

        assert!(response.decode_json().is_none());

        let failures = response.checker().failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind(), "body_read");
    }

    #[test]
    fn test_debug_output() {
        let mut response =
            Response::from_bytes(Scope::collecting(), raw_with(None, Bytes::from("abc")));
        response.body();
        let debug = format!("{response:?}");
        assert!(debug.contains("Response"));
        assert!(debug.contains("body_len: Some(3)"));
    }
}
