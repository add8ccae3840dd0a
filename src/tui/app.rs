//! TUI Application - main event loop and terminal management
//!
//! This module contains the core TUI application logic including:
//! - Terminal setup and restoration
//! - Key handling for the three tabs and the delete prompt
//! - Spawning backend requests and applying their outcomes

use std::io::{self, stdout};
use std::time::Duration;

use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use super::notifications::{NotificationManager, centered};
use super::views::{KnowledgeFormView, KnowledgeListView, UploadFormsView};
use crate::api::HttpKnowledgeApi;
use crate::console::{
    Console, DELETE_PROMPT, Dispatch, FormField, Outcome, Tab, Ticket, UploadField, execute,
};

/// Interval between keyboard polls
const TICK: Duration = Duration::from_millis(100);

/// TUI Application state
pub struct TuiApp {
    console: Console,
    list_view: KnowledgeListView,
    form_view: KnowledgeFormView,
    upload_view: UploadFormsView,
    notifications: NotificationManager,
    /// Backend URL shown in the title bar
    server: String,
    should_quit: bool,
    /// Last key pressed (for gg detection)
    last_key: Option<KeyCode>,
}

impl TuiApp {
    pub fn new(server: &str) -> Self {
        Self {
            console: Console::new(),
            list_view: KnowledgeListView::new(),
            form_view: KnowledgeFormView::new(),
            upload_view: UploadFormsView::new(),
            notifications: NotificationManager::new(),
            server: server.to_string(),
            should_quit: false,
            last_key: None,
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Requests to run when the console opens
    pub fn start(&mut self) -> Vec<Dispatch> {
        vec![self.console.refresh_list()]
    }

    /// Apply a finished request and surface its notices.
    pub fn apply(&mut self, ticket: &Ticket, outcome: Outcome) -> Vec<Dispatch> {
        let tab_before = self.console.tab();
        let follow_ups = self.console.apply(ticket, outcome);
        if self.console.tab() == Tab::Form && tab_before != Tab::Form {
            self.form_view.focus = FormField::Title;
        }
        self.list_view.clamp(self.console.list().items().len());
        self.absorb_notices();
        follow_ups
    }

    fn absorb_notices(&mut self) {
        for notice in self.console.drain_notices() {
            self.notifications.push(notice);
        }
    }

    /// Expire timed toasts
    pub fn tick(&mut self) {
        self.notifications.cleanup();
    }

    /// Handle a key press, returning the requests it starts.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Dispatch> {
        let dispatches = self.route_key(key);
        self.absorb_notices();
        self.last_key = Some(key.code);
        dispatches
    }

    fn route_key(&mut self, key: KeyEvent) -> Vec<Dispatch> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        // The delete prompt is modal
        if self.console.pending_delete().is_some() {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.console.confirm_delete(true).into_iter().collect()
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.console.confirm_delete(false).into_iter().collect()
                }
                _ => Vec::new(),
            };
        }

        if self.notifications.history_visible {
            match key.code {
                KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => {
                    self.notifications.close_history()
                }
                KeyCode::Char('j') | KeyCode::Down => self.notifications.history_next(),
                KeyCode::Char('k') | KeyCode::Up => self.notifications.history_previous(),
                _ => {}
            }
            return Vec::new();
        }

        match key.code {
            KeyCode::F(1) => return self.switch_tab(Tab::List),
            KeyCode::F(2) => return self.switch_tab(Tab::Form),
            KeyCode::F(3) => return self.switch_tab(Tab::Upload),
            _ => {}
        }

        match self.console.tab() {
            Tab::List => self.handle_list_key(key),
            Tab::Form => self.handle_form_key(key, ctrl),
            Tab::Upload => self.handle_upload_key(key, ctrl),
        }
    }

    fn switch_tab(&mut self, tab: Tab) -> Vec<Dispatch> {
        self.console.set_tab(tab);
        Vec::new()
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Vec<Dispatch> {
        let len = self.console.list().items().len();
        let selected_id = self
            .list_view
            .selected_item(self.console.list())
            .map(|item| item.id.clone());

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => return self.switch_tab(Tab::List.next()),
            KeyCode::Char('a') => return self.switch_tab(Tab::Form),
            KeyCode::Char('u') => return self.switch_tab(Tab::Upload),
            // Navigation
            KeyCode::Char('j') | KeyCode::Down => self.list_view.select_next(len),
            KeyCode::Char('k') | KeyCode::Up => self.list_view.select_previous(),
            KeyCode::Char('g') => {
                if self.last_key == Some(KeyCode::Char('g')) {
                    self.list_view.select_first();
                }
            }
            KeyCode::Home => self.list_view.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.list_view.select_last(len),
            // Actions
            KeyCode::Char('r') => return vec![self.console.refresh_list()],
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = selected_id {
                    return vec![self.console.start_edit(&id)];
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = selected_id {
                    self.console.request_delete(&id);
                }
            }
            // Notifications
            KeyCode::Char('n') => self.notifications.toggle_history(),
            KeyCode::Char('x') => self.notifications.dismiss_oldest(),
            KeyCode::Char('X') => self.notifications.dismiss_all(),
            _ => {}
        }
        Vec::new()
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctrl: bool) -> Vec<Dispatch> {
        let focus = self.form_view.focus;
        match key.code {
            KeyCode::Char('s') if ctrl => {
                return self.console.submit_form().into_iter().collect();
            }
            KeyCode::Char('r') if ctrl => {
                self.console.reset_form();
                self.form_view.focus = FormField::Title;
            }
            KeyCode::Char('x') if ctrl => self.notifications.dismiss_all(),
            KeyCode::Esc => return self.switch_tab(Tab::List),
            KeyCode::Tab | KeyCode::Down => self.form_view.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form_view.focus_previous(),
            KeyCode::Enter if focus == FormField::Content => {
                self.console.form_mut().content.push('\n');
            }
            KeyCode::Enter => self.form_view.focus_next(),
            KeyCode::Backspace => {
                self.console.form_mut().field_mut(focus).pop();
            }
            KeyCode::Char(c) if !ctrl => {
                self.console.form_mut().field_mut(focus).push(c);
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_upload_key(&mut self, key: KeyEvent, ctrl: bool) -> Vec<Dispatch> {
        let kind = self.upload_view.kind;
        let focus = self.upload_view.focus;
        match key.code {
            KeyCode::Char('s') if ctrl => {
                return self.console.submit_upload(kind).into_iter().collect();
            }
            KeyCode::Char('r') if ctrl => {
                self.console.uploads_mut().get_mut(kind).reset();
                self.upload_view.focus = UploadField::File;
            }
            KeyCode::Char('x') if ctrl => self.notifications.dismiss_all(),
            KeyCode::Esc => return self.switch_tab(Tab::List),
            KeyCode::Left => self.upload_view.previous_kind(),
            KeyCode::Right => self.upload_view.next_kind(),
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => self.upload_view.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.upload_view.focus_previous(),
            KeyCode::Backspace => {
                self.console.uploads_mut().get_mut(kind).field_mut(focus).pop();
            }
            KeyCode::Char(c) if !ctrl => {
                self.console
                    .uploads_mut()
                    .get_mut(kind)
                    .field_mut(focus)
                    .push(c);
            }
            _ => {}
        }
        Vec::new()
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(5),    // Main content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tab_bar(frame, chunks[0]);

        match self.console.tab() {
            Tab::List => self.list_view.render(frame, chunks[1], self.console.list()),
            Tab::Form => self.form_view.render(frame, chunks[1], self.console.form()),
            Tab::Upload => self
                .upload_view
                .render(frame, chunks[1], self.console.uploads()),
        }

        self.render_status_bar(frame, chunks[2]);

        self.notifications.render_toasts(frame, chunks[1]);

        if self.console.pending_delete().is_some() {
            self.render_delete_prompt(frame, area);
        }
        if self.notifications.history_visible {
            self.notifications.render_history(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let selected = Tab::ALL
            .iter()
            .position(|t| *t == self.console.tab())
            .unwrap_or(0);
        let titles: Vec<String> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, t)| format!("[F{}] {}", i + 1, t.title()))
            .collect();

        let tabs = Tabs::new(titles)
            .select(selected)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" kadmin ")
                    .title(Line::from(format!(" {} ", self.server)).right_aligned()),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let keys = match self.console.tab() {
            Tab::List => {
                " j/k:Navigate  e:Edit  d:Delete  r:Refresh  a/u:Add/Upload  n:History  x:Dismiss  q:Quit"
            }
            Tab::Form => " Tab:Next field  Enter:Newline in content  Ctrl+S:Save  Ctrl+R:Reset  Esc:List",
            Tab::Upload => {
                " ←/→:Format  Tab:Next field  Ctrl+S:Upload  Ctrl+R:Reset  Esc:List"
            }
        };
        let status = Paragraph::new(keys)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, area);
    }

    fn render_delete_prompt(&self, frame: &mut Frame, area: Rect) {
        let rect = centered(area, 50, 20);
        let prompt = Paragraph::new(vec![
            Line::from(DELETE_PROMPT),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y ", Style::default().fg(Color::Black).bg(Color::Red)),
                Span::raw(" Delete   "),
                Span::styled(" n ", Style::default().fg(Color::Black).bg(Color::Gray)),
                Span::raw(" Cancel"),
            ]),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Confirm "),
        );
        frame.render_widget(Clear, rect);
        frame.render_widget(prompt, rect);
    }
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Restore the terminal to normal mode
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run each request on the runtime; outcomes come back over `tx`.
fn spawn_requests(
    api: &HttpKnowledgeApi,
    tx: &UnboundedSender<(Ticket, Outcome)>,
    dispatches: Vec<Dispatch>,
) {
    for Dispatch { ticket, request } in dispatches {
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = execute(&api, &request).await;
            // The receiver only goes away when the UI is shutting down
            let _ = tx.send((ticket, outcome));
        });
    }
}

/// Run the TUI application against `api`.
///
/// The terminal is restored even when the event loop fails.
pub async fn run_tui(api: HttpKnowledgeApi) -> crate::Result<()> {
    info!(server = api.base_url(), "starting console");
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &api).await;
    restore_terminal()?;
    info!("console closed");
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: &HttpKnowledgeApi,
) -> crate::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(Ticket, Outcome)>();
    let mut app = TuiApp::new(api.base_url());
    spawn_requests(api, &tx, app.start());

    loop {
        app.tick();
        terminal.draw(|f| app.render(f))?;

        tokio::select! {
            _ = tokio::time::sleep(TICK) => {
                while event::poll(Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        if key.kind == KeyEventKind::Press {
                            let dispatches = app.handle_key(key);
                            spawn_requests(api, &tx, dispatches);
                        }
                    }
                }
            }
            Some((ticket, outcome)) = rx.recv() => {
                debug!(?ticket, "response received");
                let follow_ups = app.apply(&ticket, outcome);
                spawn_requests(api, &tx, follow_ups);
            }
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
