//! Client side of the knowledge REST API.
//!
//! [`KnowledgeApi`] is the seam between the console controller and the
//! network. [`HttpKnowledgeApi`] is the `reqwest` implementation; tests
//! substitute an in-memory fake.
//!
//! Every failure is an [`ApiError`]: either the server answered with a
//! non-success status (and usually a `{detail}` body), or no usable answer
//! arrived at all.

mod http;
mod upload;

use std::future::Future;

pub use http::HttpKnowledgeApi;
pub use upload::{UploadKind, UploadRequest};

use crate::models::{CreatedResponse, KnowledgeDraft, KnowledgeItem, MessageResponse, UploadSummary};

/// Failure of a single API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server responded with a non-success status.
    #[error("{detail}")]
    Application { status: u16, detail: String },

    /// The request never produced a usable response (connection, decode, local file).
    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    /// Wrap any transport-level failure.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        ApiError::Transport(err.to_string())
    }

    /// HTTP status for application errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Application { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }

    /// Message shown to the user, e.g. "Error: Not found".
    pub fn user_message(&self) -> String {
        format!("Error: {}", self)
    }
}

/// Result of a single API call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Operations the admin console performs against the knowledge backend.
pub trait KnowledgeApi {
    /// `GET /knowledge`
    fn list_knowledge(&self) -> impl Future<Output = ApiResult<Vec<KnowledgeItem>>> + Send;

    /// `GET /knowledge/{id}`
    fn get_knowledge(&self, id: &str) -> impl Future<Output = ApiResult<KnowledgeItem>> + Send;

    /// `POST /knowledge`
    fn create_knowledge(
        &self,
        draft: &KnowledgeDraft,
    ) -> impl Future<Output = ApiResult<CreatedResponse>> + Send;

    /// `PUT /knowledge/{id}`
    fn update_knowledge(
        &self,
        id: &str,
        draft: &KnowledgeDraft,
    ) -> impl Future<Output = ApiResult<MessageResponse>> + Send;

    /// `DELETE /knowledge/{id}`
    fn delete_knowledge(&self, id: &str) -> impl Future<Output = ApiResult<MessageResponse>> + Send;

    /// `POST /upload-txt`, `/upload-csv` or `/upload-json` depending on the request kind.
    fn upload(&self, request: &UploadRequest) -> impl Future<Output = ApiResult<UploadSummary>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_displays_detail_verbatim() {
        let err = ApiError::Application {
            status: 404,
            detail: "Not found".to_string(),
        };
        assert_eq!(err.to_string(), "Not found");
        assert_eq!(err.user_message(), "Error: Not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_transport_error_uses_message() {
        let err = ApiError::transport("connection refused");
        assert_eq!(err.user_message(), "Error: connection refused");
        assert_eq!(err.status(), None);
    }
}
