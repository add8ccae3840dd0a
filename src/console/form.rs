//! Create/update form state.

use crate::models::{KnowledgeDraft, KnowledgeItem};

/// What submitting the form does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Create,
    /// Updating the item with this id
    Editing(String),
}

impl FormMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, FormMode::Editing(_))
    }

    pub fn editing_id(&self) -> Option<&str> {
        match self {
            FormMode::Editing(id) => Some(id),
            FormMode::Create => None,
        }
    }

    /// Submit control derived from the mode.
    pub fn submit_control(&self) -> SubmitControl {
        match self {
            FormMode::Create => SubmitControl {
                label: "Add Knowledge",
                style: ButtonStyle::Primary,
            },
            FormMode::Editing(_) => SubmitControl {
                label: "Update Knowledge",
                style: ButtonStyle::Warning,
            },
        }
    }

    /// Notification shown after a successful submission in this mode.
    pub fn success_message(&self) -> &'static str {
        match self {
            FormMode::Create => "Knowledge added successfully",
            FormMode::Editing(_) => "Knowledge updated successfully",
        }
    }
}

/// Visual affordance of the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitControl {
    pub label: &'static str,
    pub style: ButtonStyle,
}

/// Input fields of the knowledge form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Content,
    Source,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Title, FormField::Content, FormField::Source];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Content => "Content",
            FormField::Source => "Source (optional)",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, FormField::Source)
    }

    pub fn next(&self) -> FormField {
        match self {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Source,
            FormField::Source => FormField::Title,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::Title => FormField::Source,
            FormField::Content => FormField::Title,
            FormField::Source => FormField::Content,
        }
    }
}

/// The single form used for both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeForm {
    pub title: String,
    pub content: String,
    pub source: String,
    mode: FormMode,
}

impl KnowledgeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn submit_control(&self) -> SubmitControl {
        self.mode.submit_control()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Content => &self.content,
            FormField::Source => &self.source,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Content => &mut self.content,
            FormField::Source => &mut self.source,
        }
    }

    /// Fill the fields from `item` and enter edit mode for it.
    pub fn load(&mut self, item: &KnowledgeItem) {
        self.title = item.title.clone();
        self.content = item.content.clone();
        self.source = item.source.clone().unwrap_or_default();
        self.mode = FormMode::Editing(item.id.clone());
    }

    /// Empty the fields and return to create mode.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// First required field left empty.
    pub fn missing_field(&self) -> Option<FormField> {
        FormField::ALL
            .into_iter()
            .find(|f| f.is_required() && self.field(*f).is_empty())
    }

    /// Request body for the current input; an empty source becomes null.
    pub fn to_draft(&self) -> KnowledgeDraft {
        KnowledgeDraft::from_input(&self.title, &self.content, &self.source)
    }
}
