//! "Query" screen: free-text input and the dry-run toggle.

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::ScreenAction;

pub(crate) struct QueryScreen {
    input: String,
    editing: bool,
    dry_run: bool,
    status: String,
}

impl QueryScreen {
    pub(crate) fn new() -> Self {
        Self {
            input: String::new(),
            editing: true,
            dry_run: false,
            status: "Type a topic and press Enter to search, summarize, and publish.".to_string(),
        }
    }

    pub(crate) fn is_editing(&self) -> bool {
        self.editing
    }

    pub(crate) fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub(crate) fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Query
                Constraint::Length(3), // Publish mode
                Constraint::Length(2), // Hint
                Constraint::Min(1),    // Status
            ])
            .split(area);

        let input_style = if self.editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let input = Paragraph::new(self.input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Query ")
                .border_style(input_style),
        );
        f.render_widget(input, chunks[0]);

        if self.editing {
            // Cursor after the last typed character, inside the border.
            let width = u16::try_from(self.input.chars().count()).unwrap_or(u16::MAX);
            let x = chunks[0].x.saturating_add(1).saturating_add(width);
            f.set_cursor_position((x.min(chunks[0].right().saturating_sub(2)), chunks[0].y + 1));
        }

        let mode = if self.dry_run {
            "dry run: summarize only, nothing is sent"
        } else {
            "publish to the Telegram channel"
        };
        let mode_p = Paragraph::new(format!("{mode}  ('d' to toggle)"))
            .block(Block::default().borders(Borders::ALL).title(" Mode "));
        f.render_widget(mode_p, chunks[1]);

        let hint = if self.editing {
            "Type to edit · Enter to run · Esc to stop editing"
        } else {
            "Enter or 'i' to edit · 'd' toggles dry run · Tab for results"
        };
        let hint_p = Paragraph::new(hint)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        f.render_widget(hint_p, chunks[2]);

        let status = Paragraph::new(self.status.as_str())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(status, chunks[3]);
    }

    pub(crate) fn handle_key(
        &mut self,
        code: KeyCode,
        _modifiers: KeyModifiers,
    ) -> Option<ScreenAction> {
        if self.editing {
            match code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Enter => return self.submit(),
                KeyCode::Char(c) => self.input.push(c),
                _ => {}
            }
            return None;
        }

        match code {
            KeyCode::Enter | KeyCode::Char('i') => self.editing = true,
            KeyCode::Char('d') => self.dry_run = !self.dry_run,
            _ => {}
        }
        None
    }

    fn submit(&mut self) -> Option<ScreenAction> {
        let query = self.input.trim();
        if query.is_empty() {
            self.status = "Query must not be empty.".to_string();
            return None;
        }
        self.editing = false;
        Some(ScreenAction::Submit {
            query: query.to_string(),
            dry_run: self.dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(screen: &mut QueryScreen, code: KeyCode) -> Option<ScreenAction> {
        screen.handle_key(code, KeyModifiers::NONE)
    }

    fn type_str(screen: &mut QueryScreen, text: &str) {
        for c in text.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_submits_trimmed_query() {
        let mut screen = QueryScreen::new();
        type_str(&mut screen, "  machine learning ");

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(
            action,
            Some(ScreenAction::Submit {
                query: "machine learning".into(),
                dry_run: false,
            })
        );
        assert!(!screen.is_editing());
    }

    #[test]
    fn empty_query_is_refused() {
        let mut screen = QueryScreen::new();
        type_str(&mut screen, "   ");

        assert_eq!(press(&mut screen, KeyCode::Enter), None);
        assert!(screen.is_editing());
        assert!(screen.status.contains("must not be empty"));
    }

    #[test]
    fn dry_run_toggles_outside_editing() {
        let mut screen = QueryScreen::new();
        type_str(&mut screen, "rust");
        // 'd' while editing is text.
        assert_eq!(screen.input, "rust");
        press(&mut screen, KeyCode::Char('d'));
        assert_eq!(screen.input, "rustd");
        press(&mut screen, KeyCode::Backspace);

        press(&mut screen, KeyCode::Esc);
        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Enter);

        let action = press(&mut screen, KeyCode::Enter);
        assert_eq!(
            action,
            Some(ScreenAction::Submit {
                query: "rust".into(),
                dry_run: true,
            })
        );
    }
}
