//! Command implementations for the kadmin CLI.
//!
//! Each command runs one request through a [`KnowledgeApi`] and returns a
//! result type that renders as JSON (default) or human-readable text.

use serde::Serialize;
use tracing::info;

use crate::Result;
use crate::api::{KnowledgeApi, UploadKind, UploadRequest};
use crate::config::ResolvedConfig;
use crate::console::{DELETE_PROMPT, EMPTY_PLACEHOLDER, FormMode, ItemSummary};
use crate::models::{KnowledgeDraft, KnowledgeItem};

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

/// Question asked before `delete` unless `--yes` is given.
pub fn delete_prompt(id: &str) -> String {
    format!("{} [{}] (y/N) ", DELETE_PROMPT, id)
}

/// Whether a line typed at the delete prompt confirms it.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

// === list ===

#[derive(Debug, Serialize)]
pub struct KnowledgeList {
    pub count: usize,
    pub items: Vec<ItemSummary>,
}

impl Output for KnowledgeList {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }
        let mut lines = vec![format!("{} knowledge item(s):", self.count), String::new()];
        for item in &self.items {
            lines.push(format!("{}  {}", item.id, item.title));
            lines.push(format!("    Source: {}", item.source));
            lines.push(format!("    {}", item.excerpt.replace('\n', " ")));
            lines.push(String::new());
        }
        lines.pop();
        lines.join("\n")
    }
}

pub async fn list<A: KnowledgeApi>(api: &A) -> Result<KnowledgeList> {
    let items = api.list_knowledge().await?;
    let items: Vec<ItemSummary> = items.iter().map(ItemSummary::from_item).collect();
    Ok(KnowledgeList {
        count: items.len(),
        items,
    })
}

// === show ===

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ShowResult(pub KnowledgeItem);

impl Output for ShowResult {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        self.0.to_string()
    }
}

pub async fn show<A: KnowledgeApi>(api: &A, id: &str) -> Result<ShowResult> {
    Ok(ShowResult(api.get_knowledge(id).await?))
}

// === add / update ===

#[derive(Debug, Serialize)]
pub struct Saved {
    pub id: String,
    pub message: String,
    #[serde(skip)]
    mode: FormMode,
}

impl Output for Saved {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("{}: {}", self.mode.success_message(), self.id)
    }
}

pub async fn add<A: KnowledgeApi>(api: &A, draft: &KnowledgeDraft) -> Result<Saved> {
    let created = api.create_knowledge(draft).await?;
    info!(id = %created.id, "knowledge created");
    Ok(Saved {
        id: created.id,
        message: created.message,
        mode: FormMode::Create,
    })
}

pub async fn update<A: KnowledgeApi>(api: &A, id: &str, draft: &KnowledgeDraft) -> Result<Saved> {
    let response = api.update_knowledge(id, draft).await?;
    info!(%id, "knowledge updated");
    Ok(Saved {
        id: id.to_string(),
        message: response.message,
        mode: FormMode::Editing(id.to_string()),
    })
}

// === delete ===

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub message: String,
}

impl Output for Deleted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        format!("Knowledge deleted successfully: {}", self.id)
    }
}

pub async fn delete<A: KnowledgeApi>(api: &A, id: &str) -> Result<Deleted> {
    let response = api.delete_knowledge(id).await?;
    info!(%id, "knowledge deleted");
    Ok(Deleted {
        id: id.to_string(),
        message: response.message,
    })
}

/// Reported when the delete prompt is declined; no request is sent.
#[derive(Debug, Serialize)]
pub struct DeleteAborted {
    pub id: String,
    pub deleted: bool,
}

impl DeleteAborted {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            deleted: false,
        }
    }
}

impl Output for DeleteAborted {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        "Aborted".to_string()
    }
}

// === upload ===

#[derive(Debug, Serialize)]
pub struct Uploaded {
    pub kind: UploadKind,
    pub message: String,
    pub created: usize,
    pub ids: Vec<String>,
}

impl Output for Uploaded {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let mut out = self.kind.success_message(&self.message);
        if self.created > 0 {
            out.push_str(&format!("\nCreated {} item(s)", self.created));
        }
        out
    }
}

pub async fn upload<A: KnowledgeApi>(api: &A, request: &UploadRequest) -> Result<Uploaded> {
    let summary = api.upload(request).await?;
    let created = summary.created_count();
    info!(kind = request.kind().label(), created, "upload processed");
    let ids = match summary.id {
        Some(id) if summary.ids.is_empty() => vec![id],
        _ => summary.ids,
    };
    Ok(Uploaded {
        kind: request.kind(),
        message: summary.message,
        created,
        ids,
    })
}

// === config show ===

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigShow(pub ResolvedConfig);

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json_of(self)
    }

    fn to_human(&self) -> String {
        let config = &self.0;
        let mut lines = Vec::new();
        if let Some(path) = &config.config_path {
            lines.push(format!("Config file: {}", path.display()));
        }
        lines.push(format!(
            "server: {} ({})",
            config.server.value, config.server.source
        ));
        lines.push(format!(
            "output-format: {} ({})",
            config.output_format.value, config.output_format.source
        ));
        match &config.timeout_secs {
            Some(t) => lines.push(format!("timeout-secs: {} ({})", t.value, t.source)),
            None => lines.push("timeout-secs: (none)".to_string()),
        }
        match &config.log_dir {
            Some(d) => lines.push(format!("log-dir: {} ({})", d.value.display(), d.source)),
            None => lines.push("log-dir: (default)".to_string()),
        }
        lines.join("\n")
    }
}

pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    ConfigShow(config.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Resolved, ValueSource};

    fn summary(id: &str, source: &str) -> ItemSummary {
        ItemSummary {
            id: id.to_string(),
            title: format!("Title {}", id),
            source: source.to_string(),
            excerpt: "line one\nline two".to_string(),
        }
    }

    #[test]
    fn test_empty_list_human_is_placeholder() {
        let list = KnowledgeList {
            count: 0,
            items: vec![],
        };
        assert_eq!(list.to_human(), "No knowledge items found.");
        assert_eq!(list.to_json(), r#"{"count":0,"items":[]}"#);
    }

    #[test]
    fn test_list_human_shows_source_and_excerpt() {
        let list = KnowledgeList {
            count: 2,
            items: vec![summary("a", "N/A"), summary("b", "wiki")],
        };
        let human = list.to_human();
        assert!(human.starts_with("2 knowledge item(s):"));
        assert!(human.contains("a  Title a"));
        assert!(human.contains("Source: N/A"));
        assert!(human.contains("Source: wiki"));
        assert!(human.contains("line one line two"));
    }

    #[test]
    fn test_saved_human_uses_mode_message() {
        let saved = Saved {
            id: "9".to_string(),
            message: "ok".to_string(),
            mode: FormMode::Editing("9".to_string()),
        };
        assert_eq!(saved.to_human(), "Knowledge updated successfully: 9");
        assert_eq!(saved.to_json(), r#"{"id":"9","message":"ok"}"#);
    }

    #[test]
    fn test_uploaded_human() {
        let uploaded = Uploaded {
            kind: UploadKind::Csv,
            message: "12 rows imported".to_string(),
            created: 12,
            ids: vec![],
        };
        assert_eq!(
            uploaded.to_human(),
            "CSV file processed: 12 rows imported\nCreated 12 item(s)"
        );
        assert!(uploaded.to_json().contains(r#""kind":"csv""#));
    }

    #[test]
    fn test_confirmation_answers() {
        assert!(is_confirmation("y\n"));
        assert!(is_confirmation(" YES "));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
        assert!(delete_prompt("7").starts_with("Are you sure you want to delete this item?"));
    }

    #[test]
    fn test_config_show_human_lists_sources() {
        let config = ResolvedConfig {
            server: Resolved::new("http://kb:1".to_string(), ValueSource::CliFlag),
            ..ResolvedConfig::default()
        };
        let human = config_show(&config).to_human();
        assert!(human.contains("server: http://kb:1 (cli)"));
        assert!(human.contains("output-format: json (default)"));
        assert!(config_show(&config).to_json().contains(r#""source":"cli""#));
    }
}
