//! Bulk upload form state, one independent form per upload kind.

use std::path::PathBuf;

use crate::api::{UploadKind, UploadRequest};

/// Field of an upload form: the file path plus two metadata inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    File,
    First,
    Second,
}

impl UploadField {
    pub const ALL: [UploadField; 3] = [UploadField::File, UploadField::First, UploadField::Second];
}

/// One upload form (text, CSV or JSON).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    kind: UploadKind,
    pub file: String,
    /// Title / title column / title field
    pub first: String,
    /// Source / content column / content field
    pub second: String,
}

impl UploadForm {
    pub fn new(kind: UploadKind) -> Self {
        Self {
            kind,
            file: String::new(),
            first: String::new(),
            second: String::new(),
        }
    }

    pub fn kind(&self) -> UploadKind {
        self.kind
    }

    pub fn title(&self) -> String {
        format!("Upload {} File (.{})", self.kind.label(), self.extension())
    }

    fn extension(&self) -> &'static str {
        match self.kind {
            UploadKind::Text => "txt",
            UploadKind::Csv => "csv",
            UploadKind::Json => "json",
        }
    }

    pub fn label(&self, field: UploadField) -> &'static str {
        match (self.kind, field) {
            (UploadKind::Text, UploadField::File) => "Text File",
            (UploadKind::Csv, UploadField::File) => "CSV File",
            (UploadKind::Json, UploadField::File) => "JSON File",
            (UploadKind::Text, UploadField::First) => "Title",
            (UploadKind::Text, UploadField::Second) => "Source (optional)",
            (UploadKind::Csv, UploadField::First) => "Title Column",
            (UploadKind::Csv, UploadField::Second) => "Content Column",
            (UploadKind::Json, UploadField::First) => "Title Field",
            (UploadKind::Json, UploadField::Second) => "Content Field",
        }
    }

    pub fn is_required(&self, field: UploadField) -> bool {
        !(self.kind == UploadKind::Text && field == UploadField::Second)
    }

    pub fn field(&self, field: UploadField) -> &str {
        match field {
            UploadField::File => &self.file,
            UploadField::First => &self.first,
            UploadField::Second => &self.second,
        }
    }

    pub fn field_mut(&mut self, field: UploadField) -> &mut String {
        match field {
            UploadField::File => &mut self.file,
            UploadField::First => &mut self.first,
            UploadField::Second => &mut self.second,
        }
    }

    /// First required field left empty.
    pub fn missing_field(&self) -> Option<UploadField> {
        UploadField::ALL
            .into_iter()
            .find(|f| self.is_required(*f) && self.field(*f).is_empty())
    }

    /// Empty every field.
    pub fn reset(&mut self) {
        *self = Self::new(self.kind);
    }

    /// Multipart request for the current input.
    pub fn to_request(&self) -> UploadRequest {
        let file = PathBuf::from(&self.file);
        match self.kind {
            UploadKind::Text => UploadRequest::Text {
                file,
                title: self.first.clone(),
                source: self.second.clone(),
            },
            UploadKind::Csv => UploadRequest::Csv {
                file,
                title_column: self.first.clone(),
                content_column: self.second.clone(),
            },
            UploadKind::Json => UploadRequest::Json {
                file,
                title_field: self.first.clone(),
                content_field: self.second.clone(),
            },
        }
    }
}

/// The three upload forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForms {
    text: UploadForm,
    csv: UploadForm,
    json: UploadForm,
}

impl Default for UploadForms {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForms {
    pub fn new() -> Self {
        Self {
            text: UploadForm::new(UploadKind::Text),
            csv: UploadForm::new(UploadKind::Csv),
            json: UploadForm::new(UploadKind::Json),
        }
    }

    pub fn get(&self, kind: UploadKind) -> &UploadForm {
        match kind {
            UploadKind::Text => &self.text,
            UploadKind::Csv => &self.csv,
            UploadKind::Json => &self.json,
        }
    }

    pub fn get_mut(&mut self, kind: UploadKind) -> &mut UploadForm {
        match kind {
            UploadKind::Text => &mut self.text,
            UploadKind::Csv => &mut self.csv,
            UploadKind::Json => &mut self.json,
        }
    }
}
