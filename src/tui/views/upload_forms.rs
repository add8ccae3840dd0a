//! Upload Files view - one form per file format.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Tabs},
};

use super::knowledge_form::{field_input, submit_button};
use crate::api::UploadKind;
use crate::console::{ButtonStyle, SubmitControl, UploadField, UploadForms};

/// Selected upload form and focused field
#[derive(Debug, Clone, Copy)]
pub struct UploadFormsView {
    pub kind: UploadKind,
    pub focus: UploadField,
}

impl Default for UploadFormsView {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadFormsView {
    pub fn new() -> Self {
        Self {
            kind: UploadKind::Text,
            focus: UploadField::File,
        }
    }

    fn kind_index(&self) -> usize {
        UploadKind::ALL
            .iter()
            .position(|k| *k == self.kind)
            .unwrap_or(0)
    }

    /// Switch to the next upload form; focus returns to the file field
    pub fn next_kind(&mut self) {
        let idx = (self.kind_index() + 1) % UploadKind::ALL.len();
        self.kind = UploadKind::ALL[idx];
        self.focus = UploadField::File;
    }

    pub fn previous_kind(&mut self) {
        let len = UploadKind::ALL.len();
        let idx = (self.kind_index() + len - 1) % len;
        self.kind = UploadKind::ALL[idx];
        self.focus = UploadField::File;
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            UploadField::File => UploadField::First,
            UploadField::First => UploadField::Second,
            UploadField::Second => UploadField::File,
        };
    }

    pub fn focus_previous(&mut self) {
        self.focus = match self.focus {
            UploadField::File => UploadField::Second,
            UploadField::First => UploadField::File,
            UploadField::Second => UploadField::First,
        };
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, forms: &UploadForms) {
        let form = forms.get(self.kind);
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", form.title()));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Format selector
                Constraint::Length(3), // File
                Constraint::Length(3), // Title / column / field
                Constraint::Length(3), // Source / column / field
                Constraint::Length(2), // Submit
                Constraint::Min(0),
            ])
            .split(inner);

        let titles: Vec<&str> = UploadKind::ALL.iter().map(|k| k.label()).collect();
        let selector = Tabs::new(titles)
            .select(self.kind_index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .divider(" | ");
        frame.render_widget(selector, chunks[0]);

        for (field, chunk) in UploadField::ALL.into_iter().zip(chunks[1..4].iter()) {
            let input = field_input(
                form.label(field),
                form.is_required(field),
                form.field(field),
                self.focus == field,
            );
            frame.render_widget(input, *chunk);
        }

        frame.render_widget(
            submit_button(SubmitControl {
                label: "Upload",
                style: ButtonStyle::Primary,
            }),
            chunks[4],
        );

        let hint = Paragraph::new(" File is a local path. ←/→ switches format.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, chunks[5]);
    }
}
