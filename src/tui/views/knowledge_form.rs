//! Add Knowledge view - the create/update form.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::console::{ButtonStyle, FormField, KnowledgeForm, SubmitControl};

/// Cursor drawn after the focused field's text
pub const CURSOR: &str = "▏";

/// Focus state for the knowledge form
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeFormView {
    pub focus: FormField,
}

impl Default for KnowledgeFormView {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeFormView {
    pub fn new() -> Self {
        Self {
            focus: FormField::Title,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, form: &KnowledgeForm) {
        let heading = match form.mode().editing_id() {
            Some(id) => format!(" Editing {} ", id),
            None => " Add Knowledge ".to_string(),
        };
        let outer = Block::default().borders(Borders::ALL).title(heading);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Content
                Constraint::Length(3), // Source
                Constraint::Length(3), // Submit
            ])
            .split(inner);

        for (field, chunk) in FormField::ALL.into_iter().zip(chunks.iter()) {
            let input = field_input(
                field.label(),
                field.is_required(),
                form.field(field),
                self.focus == field,
            );
            frame.render_widget(input, *chunk);
        }

        frame.render_widget(submit_button(form.submit_control()), chunks[3]);
    }
}

/// A bordered text input; the focused one is highlighted and shows a cursor
pub fn field_input<'a>(label: &str, required: bool, value: &'a str, focused: bool) -> Paragraph<'a> {
    let title = if required {
        format!(" {} * ", label)
    } else {
        format!(" {} ", label)
    };
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut text = Text::from(value);
    if focused {
        if value.is_empty() || value.ends_with('\n') {
            text.lines.push(Line::from(CURSOR));
        } else if let Some(line) = text.lines.last_mut() {
            line.push_span(Span::raw(CURSOR));
        }
    }

    Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        )
}

/// The submit control, styled as primary or warning
pub fn submit_button(control: SubmitControl) -> Paragraph<'static> {
    let style = match control.style {
        ButtonStyle::Primary => Style::default().fg(Color::White).bg(Color::Blue),
        ButtonStyle::Warning => Style::default().fg(Color::Black).bg(Color::Yellow),
    };
    Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", control.label), style.add_modifier(Modifier::BOLD)),
        Span::styled("  Ctrl+S", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::NONE))
    .alignment(Alignment::Left)
}
