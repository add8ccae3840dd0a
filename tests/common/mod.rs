//! Common test utilities for kadmin integration tests.
//!
//! Provides a stub knowledge backend (axum on an ephemeral port) and
//! `TestEnv`, which points the `kadmin` binary at it with an isolated config.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use assert_cmd::Command;
use axum::{
    Json, Router,
    extract::{Multipart, Path as UrlPath, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
pub use tempfile::TempDir;

/// In-memory state of the stub backend.
#[derive(Debug, Default)]
pub struct BackendState {
    pub items: Vec<Value>,
    pub next_id: u64,
    /// Number of DELETE requests received
    pub deletes: usize,
    /// Text fields of the last multipart upload, plus "filename"
    pub last_upload: HashMap<String, String>,
    /// Bodies of create/update requests, in arrival order
    pub bodies: Vec<Value>,
}

type Shared = Arc<Mutex<BackendState>>;

/// A running stub backend.
pub struct StubBackend {
    pub url: String,
    pub state: Shared,
}

impl StubBackend {
    /// Start the backend on 127.0.0.1 with an ephemeral port.
    pub fn start() -> Self {
        let state: Shared = Arc::default();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let app = router(state.clone());
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        Self { url, state }
    }

    /// Insert an item directly, returning its id.
    pub fn seed(&self, title: &str, content: &str, source: Option<&str>) -> String {
        let mut state = self.state.lock().unwrap();
        insert(&mut state, title, content, source.map(str::to_string))
    }

    pub fn items(&self) -> Vec<Value> {
        self.state.lock().unwrap().items.clone()
    }

    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    pub fn last_upload(&self) -> HashMap<String, String> {
        self.state.lock().unwrap().last_upload.clone()
    }

    pub fn bodies(&self) -> Vec<Value> {
        self.state.lock().unwrap().bodies.clone()
    }
}

fn insert(state: &mut BackendState, title: &str, content: &str, source: Option<String>) -> String {
    state.next_id += 1;
    let id = format!("kb{:04}", state.next_id);
    state.items.push(json!({
        "_id": id,
        "title": title,
        "content": content,
        "source": source,
        "metadata": null,
    }));
    id
}

fn detail(status: StatusCode, detail: impl Into<Value>) -> Response {
    (status, Json(json!({ "detail": detail.into() }))).into_response()
}

fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "Not found")
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/knowledge", get(list_items).post(create_item))
        .route(
            "/knowledge/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/upload-txt", post(upload_txt))
        .route("/upload-csv", post(upload_csv))
        .route("/upload-json", post(upload_json))
        .with_state(state)
}

async fn list_items(State(state): State<Shared>) -> Response {
    Json(state.lock().unwrap().items.clone()).into_response()
}

async fn get_item(State(state): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let state = state.lock().unwrap();
    match state.items.iter().find(|i| i["_id"] == id) {
        Some(item) => Json(item.clone()).into_response(),
        None => not_found(),
    }
}

/// Mirror of the backend's validation: title and content are required strings.
fn validate(body: &Value) -> Result<(String, String, Option<String>), Response> {
    match (body["title"].as_str(), body["content"].as_str()) {
        (Some(title), Some(content)) => Ok((
            title.to_string(),
            content.to_string(),
            body["source"].as_str().map(str::to_string),
        )),
        _ => Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!([{ "loc": ["body", "title"], "msg": "field required" }]),
        )),
    }
}

async fn create_item(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.bodies.push(body.clone());
    let (title, content, source) = match validate(&body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    let id = insert(&mut state, &title, &content, source);
    Json(json!({ "id": id, "message": "Knowledge added successfully" })).into_response()
}

async fn update_item(
    State(state): State<Shared>,
    UrlPath(id): UrlPath<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.bodies.push(body.clone());
    let (title, content, source) = match validate(&body) {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    match state.items.iter_mut().find(|i| i["_id"] == id) {
        Some(item) => {
            item["title"] = json!(title);
            item["content"] = json!(content);
            item["source"] = json!(source);
            Json(json!({ "message": "Knowledge updated successfully" })).into_response()
        }
        None => not_found(),
    }
}

async fn delete_item(State(state): State<Shared>, UrlPath(id): UrlPath<String>) -> Response {
    let mut state = state.lock().unwrap();
    state.deletes += 1;
    let before = state.items.len();
    state.items.retain(|i| i["_id"] != id);
    if state.items.len() == before {
        return not_found();
    }
    Json(json!({ "message": "Knowledge deleted successfully" })).into_response()
}

/// Collect text fields and the file part of a multipart body.
async fn read_form(mut multipart: Multipart) -> (HashMap<String, String>, String) {
    let mut fields = HashMap::new();
    let mut file = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            fields.insert("filename".to_string(), filename);
            file = field.text().await.unwrap();
        } else {
            fields.insert(name, field.text().await.unwrap());
        }
    }
    (fields, file)
}

async fn upload_txt(State(state): State<Shared>, multipart: Multipart) -> Response {
    let (fields, text) = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_upload = fields.clone();

    let title = fields.get("title").cloned().unwrap_or_default();
    let source = match fields.get("source") {
        Some(s) if !s.is_empty() => s.clone(),
        _ => fields.get("filename").cloned().unwrap_or_default(),
    };
    let id = insert(&mut state, &title, &text, Some(source));
    Json(json!({ "id": id, "message": "Text file processed successfully" })).into_response()
}

async fn upload_csv(State(state): State<Shared>, multipart: Multipart) -> Response {
    let (fields, text) = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_upload = fields.clone();

    let mut lines = text.lines();
    let header: Vec<&str> = lines.next().unwrap_or_default().split(',').collect();
    let column = |key: &str| {
        let wanted = fields.get(key).cloned().unwrap_or_default();
        header
            .iter()
            .position(|h| h.trim() == wanted)
            .ok_or_else(|| {
                detail(
                    StatusCode::BAD_REQUEST,
                    format!("Column '{}' not found in CSV", wanted),
                )
            })
    };
    let (title_idx, content_idx) = match (column("title_column"), column("content_column")) {
        (Ok(t), Ok(c)) => (t, c),
        (Err(response), _) | (_, Err(response)) => return response,
    };

    let filename = fields.get("filename").cloned().unwrap_or_default();
    let mut ids = Vec::new();
    for line in lines.filter(|l| !l.trim().is_empty()) {
        let cells: Vec<&str> = line.split(',').collect();
        let title = cells.get(title_idx).copied().unwrap_or_default();
        let content = cells.get(content_idx).copied().unwrap_or_default();
        ids.push(insert(&mut state, title, content, Some(filename.clone())));
    }
    let message = format!("{} rows imported", ids.len());
    Json(json!({ "ids": ids, "message": message })).into_response()
}

async fn upload_json(State(state): State<Shared>, multipart: Multipart) -> Response {
    let (fields, text) = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_upload = fields.clone();

    let records: Vec<Value> = match serde_json::from_str(&text) {
        Ok(Value::Array(records)) => records,
        _ => return detail(StatusCode::BAD_REQUEST, "JSON file must contain an array"),
    };
    let title_field = fields.get("title_field").cloned().unwrap_or_default();
    let content_field = fields.get("content_field").cloned().unwrap_or_default();
    let filename = fields.get("filename").cloned().unwrap_or_default();

    let mut ids = Vec::new();
    for record in &records {
        let title = record[&title_field].as_str().unwrap_or_default();
        let content = record[&content_field].as_str().unwrap_or_default();
        ids.push(insert(&mut state, title, content, Some(filename.clone())));
    }
    let message = format!("{} items imported", ids.len());
    Json(json!({ "ids": ids, "message": message })).into_response()
}

/// An isolated environment for running the `kadmin` binary.
///
/// `config_dir` holds the config file (`KADMIN_CONFIG` is set per command,
/// so tests stay parallel-safe); `files_dir` is scratch space for uploads.
pub struct TestEnv {
    pub config_dir: TempDir,
    pub files_dir: TempDir,
    pub backend: StubBackend,
}

impl TestEnv {
    /// Create a new test environment with its own stub backend.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            files_dir: TempDir::new().unwrap(),
            backend: StubBackend::start(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.kdl")
    }

    /// Write `contents` to the config file.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }

    /// Write a scratch file for uploads, returning its path.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.files_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn files_path(&self) -> &Path {
        self.files_dir.path()
    }

    /// Get a Command for the kadmin binary pointed at the stub backend.
    pub fn kadmin(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_kadmin"));
        cmd.env("KADMIN_CONFIG", self.config_path());
        cmd.env("KADMIN_SERVER", &self.backend.url);
        cmd.env_remove("KADMIN_LOG");
        cmd.env_remove("KADMIN_LOG_FORMAT");
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a command's stdout as JSON.
pub fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}
