//! HttpKnowledgeApi and Console against the stub backend.

mod common;

use common::{StubBackend, TestEnv};
use kadmin::api::{ApiError, HttpKnowledgeApi, KnowledgeApi, UploadKind, UploadRequest};
use kadmin::console::{Console, ListView, NoticeLevel, Tab, UploadField};
use kadmin::models::KnowledgeDraft;

fn client(backend: &StubBackend) -> HttpKnowledgeApi {
    HttpKnowledgeApi::new(&backend.url, None).unwrap()
}

#[tokio::test]
async fn test_list_reads_underscore_id() {
    let backend = StubBackend::start();
    let id = backend.seed("Rust", "Ownership rules", Some("book"));

    let items = client(&backend).list_knowledge().await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, id);
    assert_eq!(items[0].source.as_deref(), Some("book"));
}

#[tokio::test]
async fn test_get_missing_is_application_error() {
    let backend = StubBackend::start();

    let err = client(&backend).get_knowledge("nope").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Application {
            status: 404,
            detail: "Not found".to_string()
        }
    );
    assert_eq!(err.user_message(), "Error: Not found");
}

#[tokio::test]
async fn test_create_update_delete() {
    let backend = StubBackend::start();
    let api = client(&backend);

    let created = api
        .create_knowledge(&KnowledgeDraft::from_input("Title", "Body", ""))
        .await
        .unwrap();
    assert_eq!(created.message, "Knowledge added successfully");
    assert_eq!(backend.bodies()[0]["source"], serde_json::Value::Null);

    let updated = api
        .update_knowledge(
            &created.id,
            &KnowledgeDraft::from_input("Title 2", "Body 2", "notes"),
        )
        .await
        .unwrap();
    assert_eq!(updated.message, "Knowledge updated successfully");

    let item = api.get_knowledge(&created.id).await.unwrap();
    assert_eq!(item.title, "Title 2");
    assert_eq!(item.source.as_deref(), Some("notes"));

    api.delete_knowledge(&created.id).await.unwrap();
    assert!(backend.items().is_empty());
}

#[tokio::test]
async fn test_delete_with_query_character_does_not_hit_other_item() {
    let backend = StubBackend::start();
    let id = backend.seed("Keep", "Still here", None);

    let err = client(&backend)
        .delete_knowledge(&format!("{}?x", id))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(backend.items().len(), 1);
    assert_eq!(backend.items()[0]["_id"], id.as_str());
}

#[tokio::test]
async fn test_id_with_slash_reaches_item_route() {
    let backend = StubBackend::start();

    let err = client(&backend).get_knowledge("a/b").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Application {
            status: 404,
            detail: "Not found".to_string()
        }
    );
}

#[tokio::test]
async fn test_bodyless_error_falls_back_to_status_line() {
    let backend = StubBackend::start();
    // Unrouted paths get axum's empty 404.
    let api = HttpKnowledgeApi::new(&format!("{}/missing", backend.url), None).unwrap();

    let err = api.list_knowledge().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_upload_summaries() {
    let env = TestEnv::new();
    let api = client(&env.backend);

    let txt = env.write_file("notes.txt", "plain text");
    let summary = api
        .upload(&UploadRequest::Text {
            file: txt,
            title: "Notes".to_string(),
            source: String::new(),
        })
        .await
        .unwrap();
    assert!(summary.id.is_some());
    assert_eq!(summary.created_count(), 1);
    assert_eq!(env.backend.last_upload()["filename"], "notes.txt");

    let json = env.write_file(
        "items.json",
        r#"[{"name": "a", "body": "x"}, {"name": "b", "body": "y"}]"#,
    );
    let summary = api
        .upload(&UploadRequest::Json {
            file: json,
            title_field: "name".to_string(),
            content_field: "body".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(summary.ids.len(), 2);
    assert_eq!(summary.created_count(), 2);
    assert_eq!(summary.message, "2 items imported");
}

#[tokio::test]
async fn test_console_upload_refreshes_list() {
    let env = TestEnv::new();
    let api = client(&env.backend);
    let csv = env.write_file("rows.csv", "title,content\nOne,First\nTwo,Second\n");

    let mut console = Console::new();
    let dispatch = console.refresh_list();
    console.settle(&api, dispatch).await;
    assert_eq!(*console.list(), ListView::Empty);

    console.set_tab(Tab::Upload);
    let form = console.uploads_mut().get_mut(UploadKind::Csv);
    *form.field_mut(UploadField::File) = csv.display().to_string();
    *form.field_mut(UploadField::First) = "title".to_string();
    *form.field_mut(UploadField::Second) = "content".to_string();

    let dispatch = console.submit_upload(UploadKind::Csv).unwrap();
    console.settle(&api, dispatch).await;

    let titles: Vec<&str> = console
        .list()
        .items()
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, ["One", "Two"]);

    let notices = console.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Success);
    assert_eq!(notices[0].message, "CSV file processed: 2 rows imported");
    assert!(console.uploads().get(UploadKind::Csv).field(UploadField::File).is_empty());
}

#[tokio::test]
async fn test_console_reports_server_detail() {
    let backend = StubBackend::start();
    let api = client(&backend);
    let mut console = Console::new();

    let dispatch = console.start_edit("missing");
    console.settle(&api, dispatch).await;

    let notices = console.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Error: Not found");
    assert_eq!(console.tab(), Tab::List);
}

#[tokio::test]
async fn test_console_list_failure_renders_inline() {
    let api = HttpKnowledgeApi::new("http://127.0.0.1:9", None).unwrap();
    let mut console = Console::new();

    let dispatch = console.refresh_list();
    console.settle(&api, dispatch).await;

    let placeholder = console.list().placeholder().unwrap();
    assert!(placeholder.starts_with("Error loading knowledge: "));
}
