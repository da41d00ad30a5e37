//! `Content-Type` parsing.

use http::{header, HeaderMap, HeaderValue};
use std::collections::HashSet;

/// The JSON media type, compared exactly against the parsed essence.
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// The only charset accepted for JSON bodies.
pub(crate) const UTF_8: &str = "utf-8";

/// A parsed `Content-Type` header.
///
/// Parsing never fails: an absent or malformed header yields an empty media
/// type with no charset, which then fails any exact media-type comparison.
///
/// # Example
///
/// ```
/// use dokimos::MediaType;
///
/// let media = MediaType::parse("Application/JSON; Charset=UTF-8");
/// assert_eq!(media.essence(), "application/json");
/// assert!(media.accepts_charset("utf-8"));
///
/// let broken = MediaType::parse("not a media type");
/// assert_eq!(broken.essence(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaType {
    essence: String,
    charset: Option<String>,
}

impl MediaType {
    /// Parses a raw header value.
    ///
    /// Whitespace around `;` separators is allowed. A parameter named twice
    /// makes the whole value malformed.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let Ok(mime) = strip_separator_whitespace(value).parse::<mime::Mime>() else {
            return Self::default();
        };

        // Parameter names are matched case-insensitively.
        let mut names = HashSet::new();
        if !mime
            .params()
            .all(|(name, _)| names.insert(name.as_str().to_ascii_lowercase()))
        {
            return Self::default();
        }

        let charset = mime
            .params()
            .find(|(name, _)| name.as_str().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.as_str().trim_matches('"').to_string());

        Self {
            essence: mime.essence_str().to_string(),
            charset,
        }
    }

    /// Parses the first `Content-Type` value in `headers`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(header::CONTENT_TYPE)
            .map(header_text)
            .map_or_else(Self::default, |value| Self::parse(&value))
    }

    /// The `type/subtype` part, lower-cased, without parameters.
    #[must_use]
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// The `charset` parameter, if present.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.charset.as_deref()
    }

    /// True if the charset is absent or equals `expected` ignoring case.
    #[must_use]
    pub fn accepts_charset(&self, expected: &str) -> bool {
        self.charset
            .as_deref()
            .map_or(true, |charset| charset.eq_ignore_ascii_case(expected))
    }
}

/// Drops the optional whitespace around `;` separators (outside quoted
/// strings), which `mime` does not accept before a separator.
fn strip_separator_whitespace(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut quoted = false;
    let mut escaped = false;
    let mut after_separator = false;

    for c in value.trim().chars() {
        if after_separator && matches!(c, ' ' | '\t') {
            continue;
        }
        after_separator = false;

        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                out.truncate(out.trim_end_matches([' ', '\t']).len());
                after_separator = true;
            }
            _ => {}
        }
        out.push(c);
    }

    out
}

/// Header value as text. Non-UTF-8 bytes are replaced rather than dropped.
pub(crate) fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}
