//! Strict query parser
//!
//! Grammar:
//! query = pair *("&" pair)
//! pair  = key "=" value
//! key   = "f" / "g" / "b" / "z"
//!
//! Every token is checked in order: separator, key membership, duplicate,
//! extension. The first failing check decides the error and aborts the parse.

use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Static regex for the only allowed `z` values
pub static EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.(css|js)$").expect("Invalid EXTENSION_RE regex"));

/// Characters escaped when writing a canonical query value
const VALUE_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Query parameter key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryKey {
    /// Base path prepended to files
    B,
    /// Comma-separated files
    F,
    /// Group name
    G,
    /// Output extension override (`.css` or `.js`)
    Z,
}

impl QueryKey {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "b" => Some(QueryKey::B),
            "f" => Some(QueryKey::F),
            "g" => Some(QueryKey::G),
            "z" => Some(QueryKey::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::B => "b",
            QueryKey::F => "f",
            QueryKey::G => "g",
            QueryKey::Z => "z",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parsing failures; any one of them rejects the whole query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed token '{token}': expected key=value")]
    MalformedToken { token: String },

    #[error("Unknown key '{key}': expected one of f, g, b, z")]
    UnknownKey { key: String },

    #[error("Duplicate key '{key}'")]
    DuplicateKey { key: QueryKey },

    #[error("Invalid extension '{value}': expected .css or .js")]
    InvalidExtension { value: String },

    #[error("Value for '{key}' is not valid UTF-8 after decoding")]
    InvalidEncoding { key: QueryKey },
}

impl ParseError {
    /// Stable machine-readable code for result items
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::MalformedToken { .. } => "malformed_token",
            ParseError::UnknownKey { .. } => "unknown_key",
            ParseError::DuplicateKey { .. } => "duplicate_key",
            ParseError::InvalidExtension { .. } => "invalid_extension",
            ParseError::InvalidEncoding { .. } => "invalid_encoding",
        }
    }
}

/// Validated query parameters, keyed in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    params: BTreeMap<QueryKey, String>,
}

impl ParsedQuery {
    #[allow(dead_code)]
    pub fn get(&self, key: QueryKey) -> Option<&str> {
        self.params.get(&key).map(String::as_str)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryKey, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Re-encode as a query string with keys in `b, f, g, z` order
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}={}", key, encode_value(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Decoded parameters as a JSON object
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(key, value)| (key.to_string(), serde_json::Value::from(value)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

/// Strictly parse a query string such as `b=min/foo&f=hello.js`
pub fn parse_parameters(raw_query: &str) -> Result<ParsedQuery, ParseError> {
    let mut parsed = ParsedQuery::default();

    for token in raw_query.split('&') {
        let Some((raw_key, raw_value)) = token.split_once('=') else {
            return Err(ParseError::MalformedToken {
                token: token.to_string(),
            });
        };

        let key = QueryKey::parse(raw_key).ok_or_else(|| ParseError::UnknownKey {
            key: raw_key.to_string(),
        })?;

        if parsed.params.contains_key(&key) {
            return Err(ParseError::DuplicateKey { key });
        }

        if key == QueryKey::Z && !EXTENSION_RE.is_match(raw_value) {
            return Err(ParseError::InvalidExtension {
                value: raw_value.to_string(),
            });
        }

        let value = decode_value(raw_value).ok_or(ParseError::InvalidEncoding { key })?;
        parsed.params.insert(key, value);
    }

    Ok(parsed)
}

/// Form-decode a value: '+' is a space, then `%XX` escapes.
///
/// Malformed escapes are kept verbatim; `None` if the bytes are not UTF-8.
pub fn decode_value(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

/// Percent-encode a value so it survives [`decode_value`] unchanged
pub fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, VALUE_ENCODE_SET).to_string()
}
