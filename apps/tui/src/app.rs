//! Core TUI application state and event loop.
//!
//! The pipeline runs as a task on a tokio runtime owned by the app. It
//! reports back over a channel that the draw loop drains between frames.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tokio::runtime::Runtime;

use articlecast_core::{Pipeline, ProgressReporter, RunReport, Stage};
use articlecast_publish::DryRunPublisher;
use articlecast_shared::{AppConfig, RuntimeConfig, load_config, load_config_from};

use crate::screens::{QueryScreen, ResultsScreen, ScreenAction, ScreenId};
use crate::widgets::status_bar;

/// Progress sent from the pipeline task to the UI thread.
#[derive(Debug)]
pub(crate) enum RunEvent {
    Stage(Stage),
    UrlsFound { wikipedia: usize, medium: usize },
    DocumentsLoaded(usize),
    Finished(std::result::Result<RunReport, String>),
}

/// Forwards pipeline progress into the UI channel.
struct ChannelProgress {
    tx: Sender<RunEvent>,
}

impl ProgressReporter for ChannelProgress {
    fn stage(&self, stage: Stage) {
        let _ = self.tx.send(RunEvent::Stage(stage));
    }

    fn urls_found(&self, wikipedia: usize, medium: usize) {
        let _ = self.tx.send(RunEvent::UrlsFound { wikipedia, medium });
    }

    fn documents_loaded(&self, count: usize) {
        let _ = self.tx.send(RunEvent::DocumentsLoaded(count));
    }

    fn done(&self, _report: &RunReport) {}
}

/// Application state.
pub(crate) struct App {
    /// Currently active screen tab.
    pub active_tab: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Frame counter for the running indicator.
    pub tick: usize,
    pub query: QueryScreen,
    pub results: ResultsScreen,
    /// Receiver for the run in flight, if any.
    events: Option<Receiver<RunEvent>>,
    runtime: Runtime,
}

impl App {
    pub(crate) fn new(runtime: Runtime) -> Self {
        Self {
            active_tab: 0,
            should_quit: false,
            show_help: false,
            tick: 0,
            query: QueryScreen::new(),
            results: ResultsScreen::new(),
            events: None,
            runtime,
        }
    }

    fn current(&self) -> ScreenId {
        ScreenId::ALL[self.active_tab]
    }

    fn is_editing(&self) -> bool {
        self.current() == ScreenId::Query && self.query.is_editing()
    }

    fn select(&mut self, screen: ScreenId) {
        self.active_tab = ScreenId::ALL.iter().position(|s| *s == screen).unwrap_or(0);
    }

    /// Build the pipeline from config and environment, then spawn it.
    fn start_run(&mut self, query: String, dry_run: bool) {
        if self.results.is_running() {
            self.query.set_status("A run is already in progress.");
            return;
        }

        self.results.start(&query, dry_run);
        self.select(ScreenId::Results);

        let pipeline = match build_pipeline(dry_run) {
            Ok(p) => p,
            Err(e) => {
                self.results.fail(format!("{e:#}"));
                self.query.set_status(format!("Could not start: {e}"));
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        self.events = Some(rx);
        self.query.set_status(format!("Running \"{query}\"…"));

        self.runtime.spawn(async move {
            let progress = ChannelProgress { tx: tx.clone() };
            let result = pipeline
                .run(&query, &progress)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(RunEvent::Finished(result));
        });
    }

    /// Drain pending events from the run in flight.
    fn poll_run(&mut self) {
        let Some(rx) = &self.events else {
            return;
        };

        let mut events = Vec::new();
        let mut closed = false;
        loop {
            match rx.try_recv() {
                Ok(ev) => events.push(ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    closed = true;
                    break;
                }
            }
        }

        for ev in events {
            self.results.apply(ev);
        }
        if closed {
            self.events = None;
            if self.results.is_running() {
                self.results.fail("pipeline task ended without a result");
            }
            self.query.set_status(self.results.status_line());
        }
    }
}

fn resolve_config() -> Result<AppConfig> {
    let config = match std::env::var_os("ARTICLECAST_CONFIG") {
        Some(path) => load_config_from(&PathBuf::from(path))?,
        None => load_config()?,
    };
    Ok(config)
}

fn build_pipeline(dry_run: bool) -> Result<Pipeline> {
    let runtime = RuntimeConfig::from_env(resolve_config()?)?;
    let pipeline = Pipeline::from_config(&runtime)?;
    Ok(if dry_run {
        pipeline.with_publisher(Arc::new(DryRunPublisher))
    } else {
        pipeline
    })
}

/// Entry point: sets up terminal, runs event loop, restores terminal.
pub(crate) fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(runtime));

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        app.poll_run();
        terminal.draw(|f| draw(f, &app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code, key.modifiers);
                }
            }
        }
        app.tick = app.tick.wrapping_add(1);

        if app.should_quit {
            break;
        }
    }

    // In-flight runs are abandoned; dropping the runtime cancels them.
    app.runtime.shutdown_background();
    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    // Global keybindings (always active)
    match code {
        KeyCode::Char('q') | KeyCode::Char('c')
            if modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.should_quit = true;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        KeyCode::Char('q') | KeyCode::Esc if !app.is_editing() => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') if !app.is_editing() => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Char(c @ '1'..='2') if !app.is_editing() => {
            app.active_tab = (c as usize) - ('1' as usize);
            return;
        }
        KeyCode::Tab if !app.is_editing() => {
            app.active_tab = (app.active_tab + 1) % ScreenId::ALL.len();
            return;
        }
        KeyCode::BackTab if !app.is_editing() => {
            app.active_tab = (app.active_tab + ScreenId::ALL.len() - 1) % ScreenId::ALL.len();
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.current() {
        ScreenId::Query => {
            if let Some(ScreenAction::Submit { query, dry_run }) =
                app.query.handle_key(code, modifiers)
            {
                app.start_run(query, dry_run);
            }
        }
        ScreenId::Results => app.results.handle_key(code, modifiers),
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let tab_titles: Vec<Line> = ScreenId::ALL
        .iter()
        .map(|s| Line::from(format!("{s}")))
        .collect();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(" Articlecast "))
        .select(app.active_tab)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");
    f.render_widget(tabs, chunks[0]);

    match app.current() {
        ScreenId::Query => app.query.draw(f, chunks[1]),
        ScreenId::Results => app.results.draw(f, chunks[1]),
    }

    let status = app.results.status_line();
    let tick = app.results.is_running().then_some(app.tick);
    f.render_widget(status_bar(&status, tick), chunks[2]);

    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  1-2          Switch to screen"),
        Line::from("  Tab/S-Tab    Next/previous screen"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Esc      Quit"),
        Line::from("  Ctrl-C       Quit, even while typing"),
        Line::from(""),
        Line::from("Query:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  Enter        Run the pipeline"),
        Line::from("  Esc / i      Stop / resume editing"),
        Line::from("  d            Toggle dry run"),
        Line::from(""),
        Line::from("Results:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  ↑/↓ PgUp/PgDn  Scroll the summary"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help (any key closes) ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
