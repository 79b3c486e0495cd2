//! Records as returned by the remote tabular backend.
//!
//! Field labels are defined by whoever owns the base, so `fields` stays an
//! untyped JSON object. All reads go through the optional accessors below;
//! none of them panic or invent values for missing fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of a remote table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// A file attachment cell entry (`[{url, filename, thumbnails}]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub small: Option<Thumbnail>,
    #[serde(default)]
    pub large: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl Record {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter, mostly for fixtures and tests.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// String value of `field`. Non-string values are treated as absent.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Linked record ids stored in `field`.
    ///
    /// Empty when the field is absent or not an array; non-string entries
    /// are skipped.
    pub fn links(&self, field: &str) -> Vec<&str> {
        match self.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// First linked id in `field`, if any.
    pub fn first_link(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(Value::Array(items)) => items.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// Numeric value of `field`.
    ///
    /// Accepts JSON numbers and strings holding a finite number; everything
    /// else is `None`.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// The attachment at position 0 of `field`, or `None` when that entry is
    /// absent or malformed. Later entries are never consulted.
    pub fn first_attachment(&self, field: &str) -> Option<Attachment> {
        match self.get(field) {
            Some(Value::Array(items)) => serde_json::from_value(items.first()?.clone()).ok(),
            _ => None,
        }
    }

    /// Attachments stored in `field`. Entries without a `url` are skipped.
    pub fn attachments(&self, field: &str) -> Vec<Attachment> {
        match self.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_list_entry_without_fields() {
        let rec: Record =
            serde_json::from_str(r#"{"id":"rec1","createdTime":"2025-01-01T00:00:00.000Z"}"#)
                .unwrap();
        assert_eq!(rec.id, "rec1");
        assert!(rec.fields.is_empty());
    }

    #[test]
    fn text_ignores_non_strings() {
        let rec = Record::new("r").with("Name", "Alice").with("Age", 41);
        assert_eq!(rec.text("Name"), Some("Alice"));
        assert_eq!(rec.text("Age"), None);
        assert_eq!(rec.text("Missing"), None);
    }

    #[test]
    fn links_tolerate_missing_and_mixed_values() {
        let rec = Record::new("r")
            .with("Assigned To", json!(["e1", 7, "e2"]))
            .with("Stage", "Fresh");
        assert_eq!(rec.links("Assigned To"), vec!["e1", "e2"]);
        assert!(rec.links("Stage").is_empty());
        assert!(rec.links("Missing").is_empty());
        assert_eq!(rec.first_link("Assigned To"), Some("e1"));
        assert_eq!(rec.first_link("Missing"), None);
    }

    #[test]
    fn first_link_is_positional() {
        let rec = Record::new("r").with("Assigned To", json!([3, "e2"]));
        assert_eq!(rec.first_link("Assigned To"), None);
    }

    #[test]
    fn number_parses_numeric_strings() {
        let rec = Record::new("r")
            .with("a", 12.5)
            .with("b", " 7 ")
            .with("c", "abc")
            .with("d", "NaN")
            .with("e", true);
        assert_eq!(rec.number("a"), Some(12.5));
        assert_eq!(rec.number("b"), Some(7.0));
        assert_eq!(rec.number("c"), None);
        assert_eq!(rec.number("d"), None);
        assert_eq!(rec.number("e"), None);
        assert_eq!(rec.number("missing"), None);
    }

    #[test]
    fn first_attachment_is_positional() {
        let rec = Record::new("e1").with(
            "Profile Photo",
            json!([{"filename": "no-url.png"}, {"url": "https://img/2.png"}]),
        );
        assert!(rec.first_attachment("Profile Photo").is_none());

        let rec = Record::new("e2").with("Profile Photo", json!([{"url": "https://img/1.png"}]));
        assert_eq!(
            rec.first_attachment("Profile Photo").map(|a| a.url).as_deref(),
            Some("https://img/1.png")
        );
        assert!(Record::new("e3").first_attachment("Profile Photo").is_none());
    }

    #[test]
    fn attachments_skip_malformed_entries() {
        let rec = Record::new("r").with(
            "Profile Photo",
            json!([
                {"url": "https://x/a.png", "thumbnails": {"small": {"url": "https://x/a_s.png"}}},
                {"filename": "no-url.png"},
                {"url": "https://x/b.png", "filename": "b.png"}
            ]),
        );
        let att = rec.attachments("Profile Photo");
        assert_eq!(att.len(), 2);
        assert_eq!(
            att[0].thumbnails.as_ref().and_then(|t| t.small.as_ref()).map(|t| t.url.as_str()),
            Some("https://x/a_s.png")
        );
        assert_eq!(att[1].filename.as_deref(), Some("b.png"));
    }
}
