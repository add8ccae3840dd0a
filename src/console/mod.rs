//! Admin console controller.
//!
//! [`Console`] owns all client-side UI state (active tab, list view-model,
//! create/update form, upload forms, pending notifications) and knows nothing
//! about terminals or sockets. User actions return a [`Dispatch`]: the request
//! to perform plus a [`Ticket`]. Whoever runs the request feeds the
//! [`Outcome`] back through [`Console::apply`], which may return follow-up
//! dispatches (a list refresh after a successful mutation).
//!
//! Outcomes whose ticket has been superseded by a newer request in the same
//! slot are dropped, so the newest request wins regardless of arrival order.

mod form;
mod generation;
mod list;
mod upload;

use std::collections::VecDeque;

use tracing::{debug, info, warn};

pub use form::{ButtonStyle, FormField, FormMode, KnowledgeForm, SubmitControl};
pub use generation::{Generations, Slot, Ticket};
pub use list::{EMPTY_PLACEHOLDER, EXCERPT_CHARS, ItemSummary, ListView, excerpt, render_list};
pub use upload::{UploadField, UploadForm, UploadForms};

use crate::api::{ApiError, ApiResult, KnowledgeApi, UploadKind, UploadRequest};
use crate::models::{KnowledgeDraft, KnowledgeItem, UploadSummary};

/// Prompt shown before a delete is issued.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this item?";

/// Top-level tabs of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    List,
    Form,
    Upload,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::List, Tab::Form, Tab::Upload];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::List => "Knowledge Base",
            Tab::Form => "Add Knowledge",
            Tab::Upload => "Upload Files",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::List => Tab::Form,
            Tab::Form => Tab::Upload,
            Tab::Upload => Tab::List,
        }
    }
}

/// Severity of a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user, drained by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Backend call to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ListKnowledge,
    GetKnowledge { id: String },
    DeleteKnowledge { id: String },
    SaveKnowledge { mode: FormMode, draft: KnowledgeDraft },
    Upload(UploadRequest),
}

/// A request stamped with the ticket its outcome must be applied under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub ticket: Ticket,
    pub request: Request,
}

/// Result of executing a [`Request`].
#[derive(Debug, Clone)]
pub enum Outcome {
    Listed(ApiResult<Vec<KnowledgeItem>>),
    Loaded(ApiResult<KnowledgeItem>),
    Deleted(ApiResult<()>),
    Saved {
        mode: FormMode,
        result: ApiResult<()>,
    },
    Uploaded {
        kind: UploadKind,
        result: ApiResult<UploadSummary>,
    },
}

/// Perform `request` against `api`.
pub async fn execute<A: KnowledgeApi>(api: &A, request: &Request) -> Outcome {
    match request {
        Request::ListKnowledge => Outcome::Listed(api.list_knowledge().await),
        Request::GetKnowledge { id } => Outcome::Loaded(api.get_knowledge(id).await),
        Request::DeleteKnowledge { id } => {
            Outcome::Deleted(api.delete_knowledge(id).await.map(|_| ()))
        }
        Request::SaveKnowledge { mode, draft } => {
            let result = match mode {
                FormMode::Create => api.create_knowledge(draft).await.map(|_| ()),
                FormMode::Editing(id) => api.update_knowledge(id, draft).await.map(|_| ()),
            };
            Outcome::Saved {
                mode: mode.clone(),
                result,
            }
        }
        Request::Upload(upload) => Outcome::Uploaded {
            kind: upload.kind(),
            result: api.upload(upload).await,
        },
    }
}

/// Client-side state of the admin console.
#[derive(Debug)]
pub struct Console {
    tab: Tab,
    list: ListView,
    form: KnowledgeForm,
    uploads: UploadForms,
    pending_delete: Option<String>,
    generations: Generations,
    notices: VecDeque<Notice>,
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl Console {
    pub fn new() -> Self {
        Self {
            tab: Tab::List,
            list: ListView::Loading,
            form: KnowledgeForm::new(),
            uploads: UploadForms::new(),
            pending_delete: None,
            generations: Generations::new(),
            notices: VecDeque::new(),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn form(&self) -> &KnowledgeForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut KnowledgeForm {
        &mut self.form
    }

    pub fn uploads(&self) -> &UploadForms {
        &self.uploads
    }

    pub fn uploads_mut(&mut self) -> &mut UploadForms {
        &mut self.uploads
    }

    /// Id awaiting delete confirmation.
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Take all notifications queued since the last call.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push_back(Notice {
            level,
            message: message.into(),
        });
    }

    fn report(&mut self, err: &ApiError) {
        warn!(error = %err, "request failed");
        self.notify(NoticeLevel::Error, err.user_message());
    }

    fn dispatch(&mut self, slot: Slot, request: Request) -> Dispatch {
        let ticket = self.generations.begin(slot);
        debug!(?ticket, "dispatching request");
        Dispatch { ticket, request }
    }

    /// Fetch the full collection.
    pub fn refresh_list(&mut self) -> Dispatch {
        self.dispatch(Slot::List, Request::ListKnowledge)
    }

    /// Fetch an item to load into the form.
    pub fn start_edit(&mut self, id: &str) -> Dispatch {
        self.dispatch(
            Slot::EditLoad,
            Request::GetKnowledge { id: id.to_string() },
        )
    }

    /// Ask for confirmation before deleting `id`. No request is issued yet.
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete = Some(id.to_string());
    }

    /// Answer the pending delete prompt. Declining issues nothing.
    pub fn confirm_delete(&mut self, confirmed: bool) -> Option<Dispatch> {
        let id = self.pending_delete.take()?;
        if !confirmed {
            debug!(%id, "delete declined");
            return None;
        }
        Some(self.dispatch(
            Slot::Delete(id.clone()),
            Request::DeleteKnowledge { id },
        ))
    }

    /// Submit the create/update form.
    ///
    /// Returns `None` (with a warning notice) when a required field is empty.
    pub fn submit_form(&mut self) -> Option<Dispatch> {
        if let Some(field) = self.form.missing_field() {
            self.notify(
                NoticeLevel::Warning,
                format!("Please fill in the {} field", field.label()),
            );
            return None;
        }
        let request = Request::SaveKnowledge {
            mode: self.form.mode().clone(),
            draft: self.form.to_draft(),
        };
        Some(self.dispatch(Slot::KnowledgeForm, request))
    }

    /// Abandon the current input and any edit session.
    pub fn reset_form(&mut self) {
        self.form.clear();
    }

    /// Submit one of the upload forms.
    ///
    /// Returns `None` (with a warning notice) when a required field is empty.
    pub fn submit_upload(&mut self, kind: UploadKind) -> Option<Dispatch> {
        let form = self.uploads.get(kind);
        if let Some(field) = form.missing_field() {
            let label = form.label(field);
            self.notify(
                NoticeLevel::Warning,
                format!("Please fill in the {} field", label),
            );
            return None;
        }
        let request = Request::Upload(form.to_request());
        Some(self.dispatch(Slot::Upload(kind), request))
    }

    /// Apply the outcome of a dispatched request.
    ///
    /// Returns follow-up requests to run. Stale outcomes are dropped.
    pub fn apply(&mut self, ticket: &Ticket, outcome: Outcome) -> Vec<Dispatch> {
        if !self.generations.finish(ticket) {
            debug!(
                ?ticket,
                latest = self.generations.latest(&ticket.slot),
                "discarding stale response"
            );
            return Vec::new();
        }

        match outcome {
            Outcome::Listed(result) => {
                if let Err(err) = &result {
                    warn!(error = %err, "failed to load knowledge");
                }
                self.list = render_list(&result);
                Vec::new()
            }
            Outcome::Loaded(Ok(item)) => {
                info!(id = %item.id, "editing knowledge item");
                self.form.load(&item);
                self.tab = Tab::Form;
                Vec::new()
            }
            Outcome::Loaded(Err(err)) => {
                self.report(&err);
                Vec::new()
            }
            Outcome::Deleted(Ok(())) => {
                if let Slot::Delete(id) = &ticket.slot {
                    info!(%id, "knowledge deleted");
                }
                self.notify(NoticeLevel::Success, "Knowledge deleted successfully");
                vec![self.refresh_list()]
            }
            Outcome::Deleted(Err(err)) => {
                self.report(&err);
                Vec::new()
            }
            Outcome::Saved { mode, result: Ok(()) } => {
                info!(editing = mode.is_editing(), "knowledge saved");
                self.notify(NoticeLevel::Success, mode.success_message());
                self.form.clear();
                self.tab = Tab::List;
                vec![self.refresh_list()]
            }
            Outcome::Saved {
                result: Err(err), ..
            } => {
                self.report(&err);
                Vec::new()
            }
            Outcome::Uploaded {
                kind,
                result: Ok(summary),
            } => {
                info!(kind = kind.label(), created = summary.created_count(), "upload processed");
                self.notify(NoticeLevel::Success, kind.success_message(&summary.message));
                self.uploads.get_mut(kind).reset();
                vec![self.refresh_list()]
            }
            Outcome::Uploaded {
                result: Err(err), ..
            } => {
                self.report(&err);
                Vec::new()
            }
        }
    }

    /// Run `dispatch` and every follow-up it triggers to completion.
    pub async fn settle<A: KnowledgeApi>(&mut self, api: &A, dispatch: Dispatch) {
        let mut queue = VecDeque::from([dispatch]);
        while let Some(next) = queue.pop_front() {
            let outcome = execute(api, &next.request).await;
            queue.extend(self.apply(&next.ticket, outcome));
        }
    }
}
