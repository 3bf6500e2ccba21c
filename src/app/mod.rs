//! Application state and event handling

pub mod controller;
pub mod fetch;
pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::document::{DocumentError, DocumentSource, Section};
use crate::explain::Explainer;
use crate::ui;
use controller::ExplanationEvent;
use input::Action;
use state::{AppState, Panel};

/// Capacity of the explanation event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

type DocumentResult = Result<Vec<Section>, DocumentError>;

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,

    /// Where the blueprint is loaded from
    source: DocumentSource,

    /// Explanation provider
    explainer: Arc<dyn Explainer>,

    /// HTTP client for the document fetch
    http: reqwest::Client,

    /// Sender handed to explanation stream tasks
    explanation_tx: mpsc::Sender<ExplanationEvent>,

    /// Events from explanation stream tasks
    explanation_rx: mpsc::Receiver<ExplanationEvent>,

    /// Pending document load, if one is running
    document_rx: Option<oneshot::Receiver<DocumentResult>>,

    /// Fired when the application exits
    shutdown: CancellationToken,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, source: DocumentSource, explainer: Arc<dyn Explainer>) -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let (explanation_tx, explanation_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let state = AppState {
            document_name: source.display_name(),
            model_name: config.model.display_name().to_string(),
            ..Default::default()
        };

        Ok(Self {
            config,
            state,
            terminal,
            source,
            explainer,
            http: reqwest::Client::new(),
            explanation_tx,
            explanation_rx,
            document_rx: None,
            shutdown: CancellationToken::new(),
        })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        self.start_document_load();
        let theme = self.config.active_theme();

        loop {
            self.drain_events();

            // Draw UI
            self.terminal.draw(|frame| {
                ui::draw(frame, &mut self.state, &theme);
            })?;

            // Handle events
            if event::poll(std::time::Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        let action = input::key_with_modifier_to_action(key.code, key.modifiers);
                        if let Some(action) = action {
                            if self.handle_action(action) {
                                break;
                            }
                        }
                    }
                }
            }
        }

        self.shutdown.cancel();
        self.restore_terminal()?;
        Ok(())
    }

    /// Fetch and parse the blueprint in the background
    fn start_document_load(&mut self) {
        let (tx, rx) = oneshot::channel();
        let source = self.source.clone();
        let http = self.http.clone();

        self.state.controller.begin_document_load();
        self.document_rx = Some(rx);

        tokio::spawn(async move {
            let _ = tx.send(source.load_sections(&http).await);
        });
    }

    /// Apply everything background tasks have reported since the last frame
    fn drain_events(&mut self) {
        if let Some(rx) = self.document_rx.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    self.state.controller.finish_document_load(result);
                    self.state.section_list = Default::default();
                    self.document_rx = None;

                    let count = self.state.controller.sections().len();
                    if self.state.controller.can_select() {
                        self.state.status.set_message(loaded_message(count));
                    }
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    tracing::error!("Document load task ended without a result");
                    self.state.status.set_error("Blueprint load was interrupted");
                    self.document_rx = None;
                }
            }
        }

        while let Ok(event) = self.explanation_rx.try_recv() {
            self.state.controller.apply(event);
        }
    }

    /// Handle an action, returns true if should exit
    fn handle_action(&mut self, action: Action) -> bool {
        let section_count = self.state.controller.sections().len();
        let on_list = self.state.focused_panel == Panel::Sections;
        let list = &mut self.state.section_list;

        match action {
            Action::Quit => return true,
            Action::SwitchPanel => self.state.focused_panel = self.state.focused_panel.toggled(),
            Action::Select => self.select_current(),
            Action::Up if on_list => list.move_up(),
            Action::Down if on_list => list.move_down(section_count),
            Action::Top if on_list => list.move_top(),
            Action::Bottom if on_list => list.move_bottom(section_count),
            _ => self.scroll_explanation(action),
        }
        false
    }

    /// Scroll the explanation pane
    fn scroll_explanation(&mut self, action: Action) {
        let view = &mut self.state.explanation_view;
        let half = view.half_page();

        match action {
            Action::Up | Action::ScrollUp => view.scroll_up(1),
            Action::Down | Action::ScrollDown => view.scroll_down(1),
            Action::PageUp => view.scroll_up(half),
            Action::PageDown => view.scroll_down(half),
            Action::Top => view.scroll = 0,
            // Clamped to the last line on the next render
            Action::Bottom => view.scroll = u16::MAX,
            _ => {}
        }
    }

    /// Select the section under the cursor
    fn select_current(&mut self) {
        if !self.state.controller.can_select() {
            self.state.status.set_error("No sections to select yet");
            return;
        }

        let index = self.state.section_list.cursor;
        self.state.explanation_view.scroll = 0;
        self.state.status.clear_message();

        let started = fetch::select_and_fetch(
            &mut self.state.controller,
            self.explainer.as_ref(),
            index,
            &self.explanation_tx,
            &self.shutdown,
        );

        if started.is_none() {
            tracing::debug!("Section {} answered without a request", index);
        }
    }
}

/// Status line notice after a successful load
fn loaded_message(count: usize) -> String {
    match count {
        1 => "Loaded 1 section. Press Enter to explain it".to_string(),
        n => format!("Loaded {} sections. Press Enter to explain one", n),
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown.cancel();
        let _ = self.restore_terminal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_message_counts_sections() {
        assert_eq!(loaded_message(1), "Loaded 1 section. Press Enter to explain it");
        assert_eq!(loaded_message(12), "Loaded 12 sections. Press Enter to explain one");
    }
}
