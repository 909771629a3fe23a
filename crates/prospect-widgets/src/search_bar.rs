//! Single-line search input.
//!
//! The bar only edits text. Every edit emits [`Message::Changed`] with the
//! whole query; the parent forwards it to a
//! [`ResultsTable`](crate::results_table::ResultsTable) and schedules the
//! debounce timer, so the bar itself stays free of timing concerns.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prospect_core::command::Command;
use prospect_core::component::Component;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::runeutil::tail_fit;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    KeyPress(KeyEvent),
    /// The query text changed.
    Changed(String),
    /// Enter: apply the query now.
    Submitted(String),
    /// Esc: leave the bar.
    Dismissed,
}

pub struct SearchBar {
    query: String,
    focus: bool,
    placeholder: String,
    theme: Arc<Theme>,
}

impl SearchBar {
    pub fn new(theme: Arc<Theme>) -> Self {
        Self {
            query: String::new(),
            focus: false,
            placeholder: "Search…".to_string(),
            theme,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query without emitting a message.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    fn changed(&self) -> Command<Message> {
        Command::message(Message::Changed(self.query.clone()))
    }
}

impl Component for SearchBar {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        let Message::KeyPress(key) = msg else {
            return Command::none();
        };
        if !self.focus {
            return Command::none();
        }
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Command::message(Message::Dismissed),
            (KeyCode::Enter, _) => Command::message(Message::Submitted(self.query.clone())),
            (KeyCode::Backspace, _) => {
                if self.query.pop().is_some() {
                    self.changed()
                } else {
                    Command::none()
                }
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.query.is_empty() {
                    return Command::none();
                }
                self.query.clear();
                self.changed()
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.query.push(c);
                self.changed()
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focus));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut spans = vec![Span::styled("/ ", self.theme.accent)];
        if self.query.is_empty() && !self.focus {
            spans.push(Span::styled(self.placeholder.clone(), self.theme.muted));
        } else {
            // Leave room for the prompt and the cursor cell.
            let room = (inner.width as usize).saturating_sub(3);
            spans.push(Span::styled(
                tail_fit(&self.query, room).to_string(),
                self.theme.text,
            ));
            if self.focus {
                spans.push(Span::styled(" ", self.theme.accent.add_modifier(Modifier::REVERSED)));
            }
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
