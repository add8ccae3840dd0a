//! Wire types for the knowledge API.
//!
//! - `KnowledgeItem` - a record as returned by `GET /knowledge[/{id}]`
//! - `KnowledgeDraft` - request body for `POST /knowledge` and `PUT /knowledge/{id}`
//! - response bodies for mutations and uploads
//! - `ErrorBody` - the `{detail}` payload carried by non-success responses

use serde::{Deserialize, Serialize};
use std::fmt;

/// A knowledge record owned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Server-assigned identifier (the backend sends `_id`)
    #[serde(alias = "_id")]
    pub id: String,

    pub title: String,

    pub content: String,

    /// Attribution; `None` is sent and received as JSON `null`
    #[serde(default)]
    pub source: Option<String>,

    /// Free-form data the backend attaches (file type, filename, row data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl KnowledgeItem {
    /// Source for display, "N/A" when absent or empty.
    pub fn display_source(&self) -> &str {
        match self.source.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => "N/A",
        }
    }
}

impl fmt::Display for KnowledgeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.id)?;
        writeln!(f, "Source: {}", self.display_source())?;
        writeln!(f)?;
        write!(f, "{}", self.content)
    }
}

/// Body for create and update requests.
///
/// `source` always serializes, as `null` when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDraft {
    pub title: String,
    pub content: String,
    pub source: Option<String>,
}

impl KnowledgeDraft {
    /// Build a draft from raw form input; an empty source becomes `None`.
    pub fn from_input(title: &str, content: &str, source: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            source: if source.is_empty() {
                None
            } else {
                Some(source.to_string())
            },
        }
    }
}

/// Response to `POST /knowledge`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
    pub message: String,
}

/// Response carrying only a message (update, delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response to any of the upload endpoints.
///
/// The text upload returns a single `id`; CSV and JSON uploads return `ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
}

impl UploadSummary {
    /// Number of items the upload created.
    pub fn created_count(&self) -> usize {
        if self.ids.is_empty() {
            usize::from(self.id.is_some())
        } else {
            self.ids.len()
        }
    }
}

/// Error payload of a non-success response.
///
/// `detail` is usually a string but validation failures send a list of objects.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Detail as display text; strings are shown verbatim.
    pub fn detail_text(&self) -> Option<String> {
        match &self.detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_accepts_mongo_id() {
        let json = r#"{"_id": "65f0", "title": "T", "content": "C", "source": null}"#;
        let item: KnowledgeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "65f0");
        assert_eq!(item.source, None);
    }

    #[test]
    fn test_item_accepts_plain_id_and_missing_source() {
        let json = r#"{"id": "abc", "title": "T", "content": "C"}"#;
        let item: KnowledgeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "abc");
        assert_eq!(item.display_source(), "N/A");
    }

    #[test]
    fn test_item_keeps_metadata() {
        let json = r#"{"_id": "1", "title": "T", "content": "C", "source": "notes.csv",
                       "metadata": {"file_type": "csv"}}"#;
        let item: KnowledgeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.display_source(), "notes.csv");
        assert_eq!(item.metadata.unwrap()["file_type"], "csv");
    }

    #[test]
    fn test_draft_empty_source_serializes_null() {
        let draft = KnowledgeDraft::from_input("Title", "Body", "");
        let value = serde_json::to_value(&draft).unwrap();
        assert!(value["source"].is_null());
        assert!(value.as_object().unwrap().contains_key("source"));
    }

    #[test]
    fn test_draft_keeps_present_source() {
        let draft = KnowledgeDraft::from_input("Title", "Body", "wiki");
        assert_eq!(draft.source.as_deref(), Some("wiki"));
    }

    #[test]
    fn test_upload_summary_counts() {
        let csv: UploadSummary =
            serde_json::from_str(r#"{"ids": ["a", "b"], "message": "Processed 2 items from CSV"}"#)
                .unwrap();
        assert_eq!(csv.created_count(), 2);

        let txt: UploadSummary =
            serde_json::from_str(r#"{"id": "a", "message": "Text file processed successfully"}"#)
                .unwrap();
        assert_eq!(txt.created_count(), 1);
    }

    #[test]
    fn test_error_body_detail_text() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Not found"}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("Not found"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"msg": "field required"}]}"#).unwrap();
        assert_eq!(
            body.detail_text().as_deref(),
            Some(r#"[{"msg":"field required"}]"#)
        );
    }
}
