//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Bottom status bar. `tick` drives the spinner while a run is active.
pub(crate) fn status_bar(msg: &str, tick: Option<usize>) -> Paragraph<'_> {
    let text = match tick {
        Some(t) => format!(" {} {msg}", SPINNER[t % SPINNER.len()]),
        None => format!(" {msg}"),
    };
    Paragraph::new(text).style(Style::default().bg(Color::DarkGray).fg(Color::White))
}
