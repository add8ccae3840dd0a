//! Knowledge Base view - rendered summaries with keyboard selection.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::console::{ItemSummary, ListView};

/// Selection state for the knowledge list
#[derive(Debug, Default)]
pub struct KnowledgeListView {
    pub list_state: ListState,
}

impl KnowledgeListView {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self { list_state }
    }

    pub fn selected(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    /// Keep the selection inside a list of `len` items
    pub fn clamp(&mut self, len: usize) {
        let selected = self.selected().min(len.saturating_sub(1));
        self.list_state.select(Some(selected));
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.list_state
            .select(Some((self.selected() + 1).min(len - 1)));
    }

    pub fn select_previous(&mut self) {
        self.list_state
            .select(Some(self.selected().saturating_sub(1)));
    }

    pub fn select_first(&mut self) {
        self.list_state.select(Some(0));
    }

    pub fn select_last(&mut self, len: usize) {
        self.list_state.select(Some(len.saturating_sub(1)));
    }

    /// The summary under the cursor, if any
    pub fn selected_item<'a>(&self, view: &'a ListView) -> Option<&'a ItemSummary> {
        view.items().get(self.selected())
    }

    /// Render the view
    pub fn render(&mut self, frame: &mut Frame, area: Rect, view: &ListView) {
        let title = match view {
            ListView::Items(items) => format!(" Knowledge Base ({}) ", items.len()),
            _ => " Knowledge Base ".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        if let Some(placeholder) = view.placeholder() {
            let style = match view {
                ListView::Failed(_) => Style::default().fg(Color::Red),
                _ => Style::default().fg(Color::DarkGray),
            };
            let empty = Paragraph::new(placeholder)
                .style(style)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let width = area.width.saturating_sub(6) as usize;
        let list_items: Vec<ListItem> = view
            .items()
            .iter()
            .map(|item| summary_item(item, width))
            .collect();

        let list = List::new(list_items)
            .block(block)
            .highlight_symbol("> ")
            .highlight_style(Style::default().bg(Color::DarkGray));

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }
}

fn summary_item(item: &ItemSummary, width: usize) -> ListItem<'static> {
    let excerpt: String = item
        .excerpt
        .replace(['\n', '\r'], " ")
        .chars()
        .take(width)
        .collect();

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(item.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", item.id), Style::default().fg(Color::Blue)),
        ]),
        Line::from(Span::styled(
            format!("Source: {}", item.source),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(excerpt),
        Line::from(""),
    ])
}
