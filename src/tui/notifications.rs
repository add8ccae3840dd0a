//! Notifications for the TUI
//!
//! Console notices become toasts. Errors stay until dismissed; everything
//! else auto-dismisses. Every notice is also kept in a history overlay.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::console::{Notice, NoticeLevel};

/// Maximum number of toasts to display at once
const MAX_VISIBLE_TOASTS: usize = 3;

/// Default auto-dismiss duration in seconds
const DEFAULT_DISMISS_SECONDS: u64 = 4;

/// Maximum history entries to keep
const MAX_HISTORY_ENTRIES: usize = 100;

const TOAST_WIDTH: u16 = 52;

pub fn level_color(level: NoticeLevel) -> Color {
    match level {
        NoticeLevel::Info => Color::Blue,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    }
}

pub fn level_icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Success => "✓",
        NoticeLevel::Warning => "⚠",
        NoticeLevel::Error => "✗",
    }
}

/// A single toast notification
#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
    pub created_at: Instant,
    /// How long before auto-dismiss (None = manual dismiss only)
    pub duration: Option<Duration>,
    pub dismissed: bool,
}

impl Toast {
    /// Create a toast; errors are sticky.
    pub fn new(id: u64, level: NoticeLevel, message: impl Into<String>) -> Self {
        let duration = match level {
            NoticeLevel::Error => None,
            _ => Some(Duration::from_secs(DEFAULT_DISMISS_SECONDS)),
        };
        Self {
            id,
            level,
            message: message.into(),
            created_at: Instant::now(),
            duration,
            dismissed: false,
        }
    }

    pub fn is_sticky(&self) -> bool {
        self.duration.is_none()
    }

    /// Check if this toast should be dismissed due to timeout
    pub fn is_expired(&self) -> bool {
        self.duration
            .map(|d| self.created_at.elapsed() >= d)
            .unwrap_or(false)
    }

    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }
}

/// Entry in the notification history
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub level: NoticeLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Format relative time since notification
    pub fn relative_time(&self) -> String {
        let duration = Utc::now().signed_duration_since(self.timestamp);

        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            format!("{}d ago", duration.num_days())
        }
    }
}

/// Notification manager - handles toasts and history
#[derive(Debug)]
pub struct NotificationManager {
    /// Active toasts (newest first)
    toasts: VecDeque<Toast>,
    history: VecDeque<HistoryEntry>,
    next_id: u64,
    pub history_visible: bool,
    history_state: ListState,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            toasts: VecDeque::new(),
            history: VecDeque::new(),
            next_id: 1,
            history_visible: false,
            history_state: ListState::default(),
        }
    }

    /// Show a console notice.
    pub fn push(&mut self, notice: Notice) {
        let toast = Toast::new(self.next_id, notice.level, notice.message);
        self.next_id += 1;

        self.history.push_front(HistoryEntry {
            level: toast.level,
            message: toast.message.clone(),
            timestamp: Utc::now(),
        });
        if self.history.len() > MAX_HISTORY_ENTRIES {
            self.history.pop_back();
        }

        self.toasts.push_front(toast);
    }

    /// Remove expired and dismissed toasts
    pub fn cleanup(&mut self) {
        self.toasts.retain(|t| !t.dismissed && !t.is_expired());
    }

    /// Dismiss the oldest visible toast
    pub fn dismiss_oldest(&mut self) {
        let visible_count = self.toasts.len().min(MAX_VISIBLE_TOASTS);
        if let Some(toast) = visible_count
            .checked_sub(1)
            .and_then(|idx| self.toasts.get_mut(idx))
        {
            toast.dismiss();
        }
        self.cleanup();
    }

    pub fn dismiss_all(&mut self) {
        for toast in &mut self.toasts {
            toast.dismiss();
        }
        self.cleanup();
    }

    /// Get visible toasts (limited by MAX_VISIBLE_TOASTS)
    pub fn visible_toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().take(MAX_VISIBLE_TOASTS)
    }

    pub fn has_toasts(&self) -> bool {
        !self.toasts.is_empty()
    }

    /// Toasts beyond the visible limit
    pub fn overflow_count(&self) -> usize {
        self.toasts.len().saturating_sub(MAX_VISIBLE_TOASTS)
    }

    pub fn toggle_history(&mut self) {
        self.history_visible = !self.history_visible;
        if self.history_visible {
            self.history_state.select(Some(0));
        }
    }

    pub fn close_history(&mut self) {
        self.history_visible = false;
    }

    pub fn history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter()
    }

    pub fn history_next(&mut self) {
        let last = self.history.len().saturating_sub(1);
        let next = self.history_state.selected().map_or(0, |i| (i + 1).min(last));
        self.history_state.select(Some(next));
    }

    pub fn history_previous(&mut self) {
        let prev = self
            .history_state
            .selected()
            .map_or(0, |i| i.saturating_sub(1));
        self.history_state.select(Some(prev));
    }

    /// Draw visible toasts stacked in the top-right corner of `area`.
    pub fn render_toasts(&self, frame: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let mut y = area.y + 1;

        for toast in self.visible_toasts() {
            let inner_width = width.saturating_sub(2).max(1) as usize;
            let lines = (toast.message.chars().count() + 2).div_ceil(inner_width) as u16;
            let height = (lines + 2).min(area.height.saturating_sub(y - area.y));
            if height < 3 {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, height);
            let color = level_color(toast.level);
            let hint = if toast.is_sticky() { " x:dismiss " } else { "" };
            let body = Paragraph::new(Line::from(vec![
                Span::styled(format!("{} ", level_icon(toast.level)), Style::default().fg(color)),
                Span::raw(toast.message.as_str()),
            ]))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title_bottom(Line::from(hint).right_aligned()),
            );
            frame.render_widget(Clear, rect);
            frame.render_widget(body, rect);
            y += height;
        }

        let overflow = self.overflow_count();
        if overflow > 0 && y < area.y + area.height {
            let rect = Rect::new(area.x + area.width - width, y, width, 1);
            let more = Paragraph::new(format!("+{} more (n: history)", overflow))
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Right);
            frame.render_widget(more, rect);
        }
    }

    /// Draw the history overlay centered in `area`.
    pub fn render_history(&mut self, frame: &mut Frame, area: Rect) {
        let rect = centered(area, 80, 70);
        let items: Vec<ListItem> = if self.history.is_empty() {
            vec![ListItem::new(Span::styled(
                "No notifications yet",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            self.history
                .iter()
                .map(|entry| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{} ", level_icon(entry.level)),
                            Style::default().fg(level_color(entry.level)),
                        ),
                        Span::styled(
                            format!("{:<9} ", entry.relative_time()),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(entry.message.as_str()),
                    ]))
                })
                .collect()
        };
        let list = List::new(items)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Notifications ")
                    .title_bottom(Line::from(" j/k:Scroll  n/Esc:Close ").centered()),
            );
        frame.render_widget(Clear, rect);
        frame.render_stateful_widget(list, rect, &mut self.history_state);
    }
}

/// Rectangle of `percent_x` by `percent_y` centered in `area`.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
