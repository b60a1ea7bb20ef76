//! Unified Result Model
//!
//! Every command maps its outcome to this model before rendering output.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Generation,
    Uri,
    Flush,
    Query,
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Whether the command created the generation directory
    #[serde(default)]
    pub created: bool,

    /// Whether the command removed the generation directory
    #[serde(default)]
    pub removed: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Generation id the item refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<String>,

    /// Generation directory, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Built cache-busting URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Structured data payload (parsed query parameters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn empty(kind: Kind) -> Self {
        Self {
            kind,
            generation: None,
            path: None,
            uri: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a new generation result
    pub fn generation(id: impl Into<String>, path: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::Generation);
        item.generation = Some(id.into());
        item.path = Some(path.into());
        item
    }

    /// Create a new uri result
    pub fn uri(id: impl Into<String>, uri: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::Uri);
        item.generation = Some(id.into());
        item.uri = Some(uri.into());
        item
    }

    /// Create a new flush result
    pub fn flush(id: impl Into<String>, path: impl Into<String>) -> Self {
        let mut item = Self::empty(Kind::Flush);
        item.generation = Some(id.into());
        item.path = Some(path.into());
        item.meta.removed = true;
        item
    }

    /// Create a new parsed query result
    pub fn query(data: serde_json::Value) -> Self {
        Self::empty(Kind::Query).with_data(data)
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        let mut item = Self::empty(Kind::Error);
        item.errors.push(error);
        item
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_item_generation() {
        let item = ResultItem::generation("1467089473", "static/1467089473");
        assert_eq!(item.kind, Kind::Generation);
        assert_eq!(item.generation.as_deref(), Some("1467089473"));
        assert_eq!(item.path.as_deref(), Some("static/1467089473"));
        assert!(!item.meta.created);
    }

    #[test]
    fn test_result_item_uri() {
        let item = ResultItem::uri("42", "/min/static/42/f=a.js");
        assert_eq!(item.kind, Kind::Uri);
        assert_eq!(item.uri.as_deref(), Some("/min/static/42/f=a.js"));
    }

    #[test]
    fn test_result_item_flush_marks_removed() {
        let item = ResultItem::flush("42", "static/42");
        assert_eq!(item.kind, Kind::Flush);
        assert!(item.meta.removed);
    }

    #[test]
    fn test_result_item_error() {
        let item = ResultItem::error(ItemError::new("unknown_key", "unknown key 'x'"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert_eq!(item.errors[0].code, "unknown_key");
    }

    #[test]
    fn test_result_item_with_meta() {
        let item = ResultItem::generation("1", "r/1").with_meta(Meta {
            created: true,
            removed: false,
        });
        assert!(item.meta.created);
    }

    #[test]
    fn test_query_data_serialization() {
        let item = ResultItem::query(serde_json::json!({"f": "a.js"}));
        let json = serde_json::to_string(&item).unwrap();
        // data field should be embedded directly, not as escaped string
        assert!(json.contains("\"data\":{\"f\":\"a.js\"}"));
        assert!(json.contains("\"kind\":\"query\""));
        assert!(!json.contains("\"errors\""));
    }

    #[test]
    fn test_result_item_deserialization() {
        let json = r#"{"kind":"generation","generation":"7","meta":{"created":true}}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, Kind::Generation);
        assert!(item.meta.created);
        assert!(!item.meta.removed);
    }

    #[test]
    fn test_result_set_from_iter() {
        let set: ResultSet = vec![ResultItem::uri("1", "/a/1/"), ResultItem::uri("1", "/b/1/")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
        assert!(ResultSet::new().is_empty());
    }
}
