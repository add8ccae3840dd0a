//! Bulk import requests (text, CSV, JSON).

use std::path::{Path, PathBuf};

use serde::Serialize;

/// The three bulk import flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Text,
    Csv,
    Json,
}

impl UploadKind {
    pub const ALL: [UploadKind; 3] = [UploadKind::Text, UploadKind::Csv, UploadKind::Json];

    /// Endpoint path the upload is posted to.
    pub fn endpoint(&self) -> &'static str {
        match self {
            UploadKind::Text => "/upload-txt",
            UploadKind::Csv => "/upload-csv",
            UploadKind::Json => "/upload-json",
        }
    }

    /// Display label used in messages ("CSV file processed: ...").
    pub fn label(&self) -> &'static str {
        match self {
            UploadKind::Text => "Text",
            UploadKind::Csv => "CSV",
            UploadKind::Json => "JSON",
        }
    }

    /// MIME type attached to the file part.
    pub fn mime(&self) -> &'static str {
        match self {
            UploadKind::Text => "text/plain",
            UploadKind::Csv => "text/csv",
            UploadKind::Json => "application/json",
        }
    }

    /// Names of the two metadata fields sent next to the file.
    pub fn field_names(&self) -> [&'static str; 2] {
        match self {
            UploadKind::Text => ["title", "source"],
            UploadKind::Csv => ["title_column", "content_column"],
            UploadKind::Json => ["title_field", "content_field"],
        }
    }

    /// Success message for a server summary.
    pub fn success_message(&self, summary: &str) -> String {
        format!("{} file processed: {}", self.label(), summary)
    }
}

/// A file-bearing import request.
///
/// The text upload always sends `source`, as an empty string when blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    Text {
        file: PathBuf,
        title: String,
        source: String,
    },
    Csv {
        file: PathBuf,
        title_column: String,
        content_column: String,
    },
    Json {
        file: PathBuf,
        title_field: String,
        content_field: String,
    },
}

impl UploadRequest {
    pub fn kind(&self) -> UploadKind {
        match self {
            UploadRequest::Text { .. } => UploadKind::Text,
            UploadRequest::Csv { .. } => UploadKind::Csv,
            UploadRequest::Json { .. } => UploadKind::Json,
        }
    }

    pub fn file(&self) -> &Path {
        match self {
            UploadRequest::Text { file, .. }
            | UploadRequest::Csv { file, .. }
            | UploadRequest::Json { file, .. } => file,
        }
    }

    /// Text parts of the multipart body, in send order.
    pub fn fields(&self) -> [(&'static str, &str); 2] {
        let [first, second] = self.kind().field_names();
        match self {
            UploadRequest::Text { title, source, .. } => {
                [(first, title.as_str()), (second, source.as_str())]
            }
            UploadRequest::Csv {
                title_column,
                content_column,
                ..
            } => [(first, title_column.as_str()), (second, content_column.as_str())],
            UploadRequest::Json {
                title_field,
                content_field,
                ..
            } => [(first, title_field.as_str()), (second, content_field.as_str())],
        }
    }

    /// File name reported in the multipart part.
    pub fn file_name(&self) -> String {
        self.file()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(UploadKind::Text.endpoint(), "/upload-txt");
        assert_eq!(UploadKind::Csv.endpoint(), "/upload-csv");
        assert_eq!(UploadKind::Json.endpoint(), "/upload-json");
    }

    #[test]
    fn test_text_upload_keeps_empty_source_field() {
        let request = UploadRequest::Text {
            file: PathBuf::from("/tmp/notes.txt"),
            title: "Notes".to_string(),
            source: String::new(),
        };
        assert_eq!(request.fields(), [("title", "Notes"), ("source", "")]);
        assert_eq!(request.file_name(), "notes.txt");
    }

    #[test]
    fn test_csv_and_json_field_names() {
        let csv = UploadRequest::Csv {
            file: PathBuf::from("rows.csv"),
            title_column: "q".to_string(),
            content_column: "a".to_string(),
        };
        assert_eq!(csv.fields(), [("title_column", "q"), ("content_column", "a")]);

        let json = UploadRequest::Json {
            file: PathBuf::from("items.json"),
            title_field: "name".to_string(),
            content_field: "body".to_string(),
        };
        assert_eq!(json.kind(), UploadKind::Json);
        assert_eq!(json.fields(), [("title_field", "name"), ("content_field", "body")]);
    }

    #[test]
    fn test_success_message() {
        assert_eq!(
            UploadKind::Csv.success_message("12 rows imported"),
            "CSV file processed: 12 rows imported"
        );
    }
}
