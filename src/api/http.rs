//! `reqwest` implementation of [`KnowledgeApi`].

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, ApiResult, KnowledgeApi, UploadRequest};
use crate::models::{
    CreatedResponse, ErrorBody, KnowledgeDraft, KnowledgeItem, MessageResponse, UploadSummary,
};

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpKnowledgeApi {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:8000`).
    ///
    /// Without a timeout, requests rely on the transport defaults.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> crate::Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| crate::Error::Config(format!("invalid server URL {}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(crate::Error::Config(format!(
                "server URL {} cannot carry a path",
                base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| crate::Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of one item. The id is pushed as a single, percent-encoded path
    /// segment, so `?`, `#` and `/` in it stay part of the id.
    fn item_url(&self, id: &str) -> ApiResult<Url> {
        let mut url = Url::parse(&self.url("/knowledge")).map_err(ApiError::transport)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Transport(format!("{} cannot carry a path", self.base_url)))?
            .push(id);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(ApiError::transport)?;
        decode(response).await
    }

    async fn upload_form(&self, request: &UploadRequest) -> ApiResult<Form> {
        let bytes = tokio::fs::read(request.file()).await.map_err(|e| {
            ApiError::Transport(format!(
                "failed to read {}: {}",
                request.file().display(),
                e
            ))
        })?;

        let part = Part::bytes(bytes)
            .file_name(request.file_name())
            .mime_str(request.kind().mime())
            .map_err(ApiError::transport)?;

        let form = request
            .fields()
            .into_iter()
            .fold(Form::new().part("file", part), |form, (name, value)| {
                form.text(name, value.to_string())
            });
        Ok(form)
    }
}

/// Turn a response into a value or an [`ApiError`].
///
/// Non-success bodies are expected to carry `{detail}`; without one the
/// status line stands in.
async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(ApiError::transport);
    }

    let body = response.bytes().await.map_err(ApiError::transport)?;
    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.detail_text())
        .unwrap_or_else(|| format!("HTTP {}", status));

    debug!(status = status.as_u16(), %detail, "request rejected");
    Err(ApiError::Application {
        status: status.as_u16(),
        detail,
    })
}

impl KnowledgeApi for HttpKnowledgeApi {
    async fn list_knowledge(&self) -> ApiResult<Vec<KnowledgeItem>> {
        debug!("GET /knowledge");
        self.send(self.client.get(self.url("/knowledge"))).await
    }

    async fn get_knowledge(&self, id: &str) -> ApiResult<KnowledgeItem> {
        debug!(id, "GET /knowledge/{{id}}");
        self.send(self.client.get(self.item_url(id)?)).await
    }

    async fn create_knowledge(&self, draft: &KnowledgeDraft) -> ApiResult<CreatedResponse> {
        debug!(title = %draft.title, "POST /knowledge");
        self.send(self.client.post(self.url("/knowledge")).json(draft))
            .await
    }

    async fn update_knowledge(
        &self,
        id: &str,
        draft: &KnowledgeDraft,
    ) -> ApiResult<MessageResponse> {
        debug!(id, "PUT /knowledge/{{id}}");
        self.send(self.client.put(self.item_url(id)?).json(draft))
            .await
    }

    async fn delete_knowledge(&self, id: &str) -> ApiResult<MessageResponse> {
        debug!(id, "DELETE /knowledge/{{id}}");
        self.send(self.client.delete(self.item_url(id)?)).await
    }

    async fn upload(&self, request: &UploadRequest) -> ApiResult<UploadSummary> {
        let endpoint = request.kind().endpoint();
        debug!(endpoint, file = %request.file().display(), "POST upload");
        let form = self.upload_form(request).await?;
        self.send(self.client.post(self.url(endpoint)).multipart(form))
            .await
    }
}
