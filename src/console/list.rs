//! List view-model: knowledge items rendered as summaries.

use serde::Serialize;

use crate::api::ApiResult;
use crate::models::KnowledgeItem;

/// Characters of content shown in a summary before truncation.
pub const EXCERPT_CHARS: usize = 200;

/// Placeholder rendered for an empty collection.
pub const EMPTY_PLACEHOLDER: &str = "No knowledge items found.";

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: String,
    pub title: String,
    /// Source or "N/A"
    pub source: String,
    /// Content truncated to [`EXCERPT_CHARS`] characters, "..." appended when cut
    pub excerpt: String,
}

impl ItemSummary {
    pub fn from_item(item: &KnowledgeItem) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            source: item.display_source().to_string(),
            excerpt: excerpt(&item.content),
        }
    }
}

/// State of the list container. Each render replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    /// Initial fetch still in flight
    Loading,
    /// Collection is empty
    Empty,
    Items(Vec<ItemSummary>),
    /// Fetch failed; holds the failure message
    Failed(String),
}

impl ListView {
    /// Text of the inline placeholder, if this state renders one.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            ListView::Loading => Some("Loading...".to_string()),
            ListView::Empty => Some(EMPTY_PLACEHOLDER.to_string()),
            ListView::Failed(message) => Some(format!("Error loading knowledge: {}", message)),
            ListView::Items(_) => None,
        }
    }

    pub fn items(&self) -> &[ItemSummary] {
        match self {
            ListView::Items(items) => items,
            _ => &[],
        }
    }
}

/// Render a fetch result into a list view.
pub fn render_list(result: &ApiResult<Vec<KnowledgeItem>>) -> ListView {
    match result {
        Ok(items) if items.is_empty() => ListView::Empty,
        Ok(items) => ListView::Items(items.iter().map(ItemSummary::from_item).collect()),
        Err(err) => ListView::Failed(err.to_string()),
    }
}

/// First [`EXCERPT_CHARS`] characters of `content`, with "..." if longer.
pub fn excerpt(content: &str) -> String {
    match content.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}
