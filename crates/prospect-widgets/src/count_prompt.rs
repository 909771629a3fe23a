//! Inline prompt asking how many leading rows to select.
//!
//! The prompt collects digits and hands the raw text to the parent on Enter;
//! validation happens in the engine so the prompt can show the engine's own
//! error message and stay open for another try.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use prospect_core::command::Command;
use prospect_core::component::Component;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    KeyPress(KeyEvent),
    /// Enter with the raw input.
    Submitted(String),
    Cancelled,
}

pub struct CountPrompt {
    input: String,
    error: Option<String>,
    active: bool,
    theme: Arc<Theme>,
}

impl CountPrompt {
    pub fn new(theme: Arc<Theme>) -> Self {
        Self {
            input: String::new(),
            error: None,
            active: false,
            theme,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn open(&mut self) {
        self.active = true;
        self.input.clear();
        self.error = None;
    }

    pub fn close(&mut self) {
        self.active = false;
        self.error = None;
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show a validation failure; the prompt stays open.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }
}

impl Component for CountPrompt {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        let Message::KeyPress(key) = msg else {
            return Command::none();
        };
        if !self.active {
            return Command::none();
        }
        match key.code {
            KeyCode::Esc => Command::message(Message::Cancelled),
            KeyCode::Enter => Command::message(Message::Submitted(self.input.clone())),
            KeyCode::Backspace => {
                self.input.pop();
                self.error = None;
                Command::none()
            }
            // Anything printable is accepted; the engine reports non-numeric input.
            KeyCode::Char(c) if !c.is_control() && self.input.len() < 9 => {
                self.input.push(c);
                self.error = None;
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.active {
            return;
        }
        let mut spans = vec![
            Span::styled("Select first ", self.theme.accent),
            Span::styled(self.input.clone(), self.theme.text),
            Span::styled(" ", self.theme.accent.add_modifier(Modifier::REVERSED)),
            Span::styled(" rows", self.theme.muted),
        ];
        if let Some(err) = &self.error {
            spans.push(Span::styled(format!("  {err}"), self.theme.error));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn focused(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use prospect_core::testing::render_component;

    fn key(code: KeyCode) -> Message {
        Message::KeyPress(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn collects_and_submits() {
        let mut p = CountPrompt::new(Arc::new(Theme::dark()));
        p.open();
        p.update(key(KeyCode::Char('2')));
        p.update(key(KeyCode::Char('5')));
        let msgs = p.update(key(KeyCode::Enter)).collect().await;
        assert_eq!(msgs, vec![Message::Submitted("25".into())]);
    }

    #[test]
    fn inactive_ignores_keys() {
        let mut p = CountPrompt::new(Arc::new(Theme::dark()));
        p.update(key(KeyCode::Char('3')));
        assert_eq!(p.input(), "");
    }

    #[test]
    fn error_shown_and_cleared_by_typing() {
        let mut p = CountPrompt::new(Arc::new(Theme::dark()));
        p.open();
        p.update(key(KeyCode::Char('9')));
        p.set_error("cannot select \"9\" of 3 items");
        let screen = render_component(&p, 60, 1);
        assert!(screen.contains("Select first 9"));
        assert!(screen.contains("of 3 items"));

        p.update(key(KeyCode::Backspace));
        assert_eq!(p.error(), None);
    }
}
