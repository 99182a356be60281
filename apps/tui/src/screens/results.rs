//! "Results" screen: stage progress, keywords, URLs, summary, publish status.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use articlecast_core::{RunReport, Stage};

use crate::app::RunEvent;

pub(crate) struct ResultsScreen {
    query: String,
    dry_run: bool,
    stage: Option<Stage>,
    running: bool,
    urls_found: Option<(usize, usize)>,
    documents_loaded: Option<usize>,
    report: Option<RunReport>,
    error: Option<String>,
    scroll: u16,
}

impl ResultsScreen {
    pub(crate) fn new() -> Self {
        Self {
            query: String::new(),
            dry_run: false,
            stage: None,
            running: false,
            urls_found: None,
            documents_loaded: None,
            report: None,
            error: None,
            scroll: 0,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running
    }

    /// Reset for a new run of `query`.
    pub(crate) fn start(&mut self, query: &str, dry_run: bool) {
        *self = Self::new();
        self.query = query.to_string();
        self.dry_run = dry_run;
        self.running = true;
    }

    /// Record a run that could not start or ended in error.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.running = false;
        self.error = Some(message.into());
    }

    /// Fold one event from the pipeline task into the view.
    pub(crate) fn apply(&mut self, event: RunEvent) {
        match event {
            RunEvent::Stage(stage) => self.stage = Some(stage),
            RunEvent::UrlsFound { wikipedia, medium } => {
                self.urls_found = Some((wikipedia, medium));
            }
            RunEvent::DocumentsLoaded(count) => self.documents_loaded = Some(count),
            RunEvent::Finished(Ok(report)) => {
                self.running = false;
                self.stage = Some(Stage::Done);
                self.report = Some(report);
            }
            RunEvent::Finished(Err(message)) => self.fail(message),
        }
    }

    /// One-line summary for the status bar.
    pub(crate) fn status_line(&self) -> String {
        if let Some(err) = &self.error {
            return format!("Run failed: {err}");
        }
        match (&self.report, self.stage) {
            (Some(report), _) => format!(
                "Done in {:.1}s · {}",
                report.elapsed.as_secs_f64(),
                self.publish_label()
            ),
            (None, Some(stage)) => format!("{stage}…"),
            (None, None) => "Ready, press ? for help".to_string(),
        }
    }

    fn publish_label(&self) -> &'static str {
        match (&self.report, self.dry_run) {
            (None, _) => "not yet published",
            (Some(_), true) => "dry run, not sent",
            (Some(r), false) if r.published => "published to Telegram",
            (Some(_), false) => "publish FAILED",
        }
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(6), // Run info
                Constraint::Length(8), // URLs
                Constraint::Min(3),    // Summary
            ])
            .split(area);

        self.draw_info(f, chunks[0]);
        self.draw_urls(f, chunks[1]);
        self.draw_summary(f, chunks[2]);
    }

    fn draw_info(&self, f: &mut Frame, area: Rect) {
        let stage = match (self.stage, self.running) {
            (Some(stage), true) => format!("{stage}…"),
            (Some(stage), false) => stage.to_string(),
            (None, _) => "-".to_string(),
        };
        let keywords = self
            .report
            .as_ref()
            .map_or("-", |r| r.state.keywords.as_str());
        let counts = match (self.urls_found, self.documents_loaded) {
            (Some((w, m)), Some(d)) => format!("{w} Wikipedia · {m} Medium · {d} documents"),
            (Some((w, m)), None) => format!("{w} Wikipedia · {m} Medium"),
            _ => "-".to_string(),
        };

        let publish_style = match &self.report {
            Some(r) if !r.published && !self.dry_run => Style::default().fg(Color::Red),
            Some(_) => Style::default().fg(Color::Green),
            None => Style::default(),
        };

        let lines = vec![
            Line::from(format!("Query:     {}", self.query)),
            Line::from(format!("Stage:     {stage}")),
            Line::from(format!("Keywords:  {keywords}")),
            Line::from(vec![
                Span::raw(format!("Found:     {counts}  ·  ")),
                Span::styled(self.publish_label(), publish_style),
            ]),
        ];
        let info = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Run "));
        f.render_widget(info, area);
    }

    fn draw_urls(&self, f: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let (wikipedia, medium) = match &self.report {
            Some(r) => (r.state.wikipedia_urls.as_slice(), r.state.medium_urls.as_slice()),
            None => (&[][..], &[][..]),
        };

        for (urls, title, col) in [(wikipedia, " Wikipedia ", cols[0]), (medium, " Medium ", cols[1])] {
            let items: Vec<ListItem> = urls.iter().map(|u| ListItem::new(u.as_str())).collect();
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{title}({}) ", urls.len())),
            );
            f.render_widget(list, col);
        }
    }

    fn draw_summary(&self, f: &mut Frame, area: Rect) {
        let (text, style) = match (&self.error, &self.report) {
            (Some(err), _) => (err.as_str(), Style::default().fg(Color::Red)),
            (None, Some(r)) => (
                r.state.summary.as_deref().unwrap_or_default(),
                Style::default(),
            ),
            (None, None) if self.running => ("Working…", Style::default().fg(Color::DarkGray)),
            (None, None) => (
                "No run yet. Enter a query on the Query tab.",
                Style::default().fg(Color::DarkGray),
            ),
        };

        let summary = Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Summary (↑/↓ to scroll) "),
            );
        f.render_widget(summary, area);
    }

    pub(crate) fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
    }
}
