//! TUI Views module
//!
//! One view per tab.

mod knowledge_form;
mod knowledge_list;
mod upload_forms;

pub use knowledge_form::KnowledgeFormView;
pub use knowledge_list::KnowledgeListView;
pub use upload_forms::UploadFormsView;
