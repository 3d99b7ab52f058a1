use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::analytics::{self, AnalyticsSnapshot, DashboardState, LoadError, SnapshotMount};
use crate::backend::{AnalyticsBackend, BackendError};
use crate::chat::{predefined_questions, QueryDispatcher, QueryReply, Rejected, SuggestionCursor};
use crate::shared::{Config, I18n, Language, LanguageContext, ModernTheme, SelectOutcome};
use crate::ui;

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chat,
    Dashboard,
}

impl View {
    pub fn index(&self) -> usize {
        match self {
            View::Chat => 0,
            View::Dashboard => 1,
        }
    }
}

/// Results delivered by background tasks
#[derive(Debug)]
pub enum AppEvent {
    QueryFinished(Result<QueryReply, BackendError>),
    SnapshotLoaded {
        generation: u64,
        result: Result<AnalyticsSnapshot, LoadError>,
    },
}

/// Spinner shown while a query or snapshot is in flight
#[derive(Debug)]
pub struct Spinner {
    frame: usize,
    last_update: std::time::Instant,
}

impl Spinner {
    const CHARS: &'static [char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

    pub fn new() -> Self {
        Self {
            frame: 0,
            last_update: std::time::Instant::now(),
        }
    }

    /// Advance the frame every 100ms
    pub fn tick(&mut self) {
        if self.last_update.elapsed().as_millis() > 100 {
            self.frame = (self.frame + 1) % Self::CHARS.len();
            self.last_update = std::time::Instant::now();
        }
    }

    pub fn current(&self) -> char {
        Self::CHARS[self.frame]
    }
}

/// Status message for user feedback
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub timestamp: std::time::Instant,
    pub message_type: StatusType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Warning,
    Error,
}

/// Main application state
pub struct App {
    /// Should the application quit
    pub should_quit: bool,
    /// Application configuration
    pub config: Config,
    /// Whether config changes are written to disk
    persist_config: bool,
    pub theme: ModernTheme,
    pub i18n: I18n,
    pub language: LanguageContext,
    /// Conversation and its outstanding query
    pub dispatcher: QueryDispatcher,
    /// Text being composed in the chat input
    pub input: String,
    predefined_cursor: SuggestionCursor,
    follow_up_cursor: SuggestionCursor,
    /// History revision the follow-up cursor was last stepped against
    follow_up_revision: u64,
    pub view: View,
    /// Dashboard snapshot lifecycle
    pub dashboard: SnapshotMount,
    backend: Arc<dyn AnalyticsBackend>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    pub status_message: Option<StatusMessage>,
    pub spinner: Spinner,
    needs_redraw: bool,
}

impl App {
    pub fn new(config: Config, backend: Arc<dyn AnalyticsBackend>) -> Self {
        let theme = ModernTheme::for_mode(config.theme_mode);
        let language = LanguageContext::new(config.language);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            should_quit: false,
            config,
            persist_config: true,
            theme,
            i18n: I18n::new(),
            language,
            dispatcher: QueryDispatcher::new(),
            input: String::new(),
            predefined_cursor: SuggestionCursor::default(),
            follow_up_cursor: SuggestionCursor::default(),
            follow_up_revision: 0,
            view: View::Chat,
            dashboard: SnapshotMount::default(),
            backend,
            events_tx,
            events_rx,
            status_message: None,
            spinner: Spinner::new(),
            needs_redraw: true,
        }
    }

    /// Run the main application loop
    pub async fn run(&mut self) -> Result<()> {
        if !IsTty::is_tty(&io::stdout()) {
            eprintln!("This application requires a TTY terminal to run.");
            return Ok(());
        }

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let outcome = self.event_loop(&mut terminal);

        self.cleanup();

        // Cleanup terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        outcome
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            if self.is_waiting() {
                self.spinner.tick();
                self.needs_redraw = true;
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_app_event(event);
            }

            // Status messages clear after 2 seconds
            self.update_status_message(std::time::Duration::from_secs(2));

            if self.needs_redraw {
                terminal.draw(|f| ui::draw(f, self))?;
                self.needs_redraw = false;
            }

            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                        self.needs_redraw = true;
                    }
                }
            }
        }
        Ok(())
    }

    /// Current language, as every consumer reads it
    pub fn current_language(&self) -> Language {
        self.language.current()
    }

    /// Translate `key` in the current language
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.i18n.t(self.language.current(), key)
    }

    /// Something in flight that the UI should animate for
    pub fn is_waiting(&self) -> bool {
        self.dispatcher.is_busy() || self.dashboard.is_loading()
    }

    /// Handle keyboard input
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Help overlay swallows everything but its own toggles
        if self.config.show_help {
            if matches!(key.code, KeyCode::F(1) | KeyCode::Esc) {
                self.toggle_help();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(1) => {
                self.toggle_help();
                return;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_view();
                return;
            }
            KeyCode::Char('l') if ctrl => {
                self.cycle_language();
                return;
            }
            KeyCode::Char('t') if ctrl => {
                self.cycle_theme();
                return;
            }
            _ => {}
        }

        match self.view {
            View::Chat => self.handle_chat_key(key.code, ctrl),
            View::Dashboard => self.handle_dashboard_key(key.code),
        }
    }

    fn handle_chat_key(&mut self, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Char('p') if ctrl => self.fill_predefined(),
            KeyCode::Char('f') if ctrl => self.fill_follow_up(),
            // Input is disabled while a query is outstanding
            _ if self.dispatcher.is_busy() => {}
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.input.push(c),
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('r') if self.dashboard.is_mounted() => {
                self.load_dashboard();
                let text = self.t("dashboard.loading").to_string();
                self.show_status(&text, StatusType::Info);
            }
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Send the composed input through the dispatcher
    fn submit_input(&mut self) {
        match self.dispatcher.begin(&self.input, self.language.current()) {
            Ok(request) => {
                self.input.clear();

                let backend = Arc::clone(&self.backend);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let outcome = backend.query(&request).await;
                    let _ = tx.send(AppEvent::QueryFinished(outcome));
                });
            }
            Err(Rejected::Busy) => {
                let text = self.t("status.busy").to_string();
                self.show_status(&text, StatusType::Warning);
            }
            Err(Rejected::Empty) => {}
        }
    }

    fn fill_predefined(&mut self) {
        if self.dispatcher.is_busy() {
            return;
        }
        let questions = predefined_questions(self.language.current());
        if let Some(question) = self.predefined_cursor.next(questions) {
            self.input = question.to_string();
        }
    }

    fn fill_follow_up(&mut self) {
        if self.dispatcher.is_busy() {
            return;
        }
        let history = self.dispatcher.history();
        if history.revision() != self.follow_up_revision {
            self.follow_up_revision = history.revision();
            self.follow_up_cursor.reset();
        }
        let Some(message) = history.last_assistant() else {
            return;
        };
        if let Some(follow_up) = self.follow_up_cursor.next(&message.follow_ups) {
            self.input = follow_up.to_string();
        }
    }

    fn switch_view(&mut self) {
        match self.view {
            View::Chat => {
                self.view = View::Dashboard;
                self.load_dashboard();
            }
            View::Dashboard => {
                self.view = View::Chat;
                self.dashboard.unmount();
            }
        }
    }

    /// Mount (or remount) the dashboard and fetch a fresh snapshot
    fn load_dashboard(&mut self) {
        let generation = self.dashboard.mount();
        let window_days = self.config.window_days;
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = analytics::load(backend.as_ref(), window_days).await;
            let _ = tx.send(AppEvent::SnapshotLoaded { generation, result });
        });
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::QueryFinished(outcome) => {
                self.dispatcher.complete(outcome, &self.i18n);
            }
            AppEvent::SnapshotLoaded { generation, result } => {
                let applied = self.dashboard.accept(generation, result);
                if applied && matches!(self.dashboard.state(), DashboardState::Failed(_)) {
                    let text = self.t("dashboard.error").to_string();
                    self.show_status(&text, StatusType::Error);
                }
            }
        }
        self.needs_redraw = true;
    }

    fn cycle_language(&mut self) {
        if let SelectOutcome::Changed(language) = self.language.select_next() {
            self.config.language = language;
            self.save_config();
            self.predefined_cursor.reset();

            let text = format!(
                "{}: {}",
                self.t("status.languageChanged"),
                language.display_name()
            );
            self.show_status(&text, StatusType::Success);
        }
    }

    /// Toggle theme mode
    fn cycle_theme(&mut self) {
        let next = self.config.theme_mode.next();
        self.config.set_theme_mode(next);
        self.save_config();
        self.theme = ModernTheme::for_mode(next);

        let text = format!(
            "{}: {}",
            self.t("status.themeChanged"),
            self.config.theme_display()
        );
        self.show_status(&text, StatusType::Success);
    }

    /// Toggle help overlay
    fn toggle_help(&mut self) {
        self.config.toggle_help();
        self.save_config();
    }

    fn save_config(&self) {
        if !self.persist_config {
            return;
        }
        if let Err(err) = self.config.save() {
            tracing::warn!("failed to save config: {err}");
        }
    }

    /// Show a status message to the user
    pub fn show_status(&mut self, text: &str, status_type: StatusType) {
        self.status_message = Some(StatusMessage {
            text: text.to_string(),
            timestamp: std::time::Instant::now(),
            message_type: status_type,
        });
        self.needs_redraw = true;
    }

    /// Clear status message if it's older than the specified duration
    pub fn update_status_message(&mut self, max_age: std::time::Duration) {
        if let Some(ref msg) = self.status_message {
            if msg.timestamp.elapsed() > max_age {
                self.status_message = None;
                self.needs_redraw = true;
            }
        }
    }

    /// Clean up resources before exiting
    fn cleanup(&mut self) {
        // Save current configuration before exiting
        self.save_config();
        tracing::info!("shutting down");
    }
}
