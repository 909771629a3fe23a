//! Tab bar for switching between result sets.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use prospect_core::command::Command;
use prospect_core::component::Component;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    KeyPress(KeyEvent),
    /// The tab at this index became active.
    Selected(usize),
}

/// Horizontal row of labelled tabs, each with an optional count badge.
pub struct Tabs {
    titles: Vec<String>,
    counts: Vec<Option<usize>>,
    selected: usize,
    theme: Arc<Theme>,
}

impl Tabs {
    pub fn new(titles: Vec<String>, theme: Arc<Theme>) -> Self {
        let counts = vec![None; titles.len()];
        Self {
            titles,
            counts,
            selected: 0,
            theme,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Select the tab at `index`. No-op if out of bounds.
    pub fn select(&mut self, index: usize) {
        if index < self.titles.len() {
            self.selected = index;
        }
    }

    /// Show `count` next to the title of tab `index`.
    pub fn set_count(&mut self, index: usize, count: usize) {
        if let Some(slot) = self.counts.get_mut(index) {
            *slot = Some(count);
        }
    }

    fn step(&mut self, forward: bool) -> Command<Message> {
        let n = self.titles.len();
        if n == 0 {
            return Command::none();
        }
        self.selected = if forward {
            (self.selected + 1) % n
        } else {
            (self.selected + n - 1) % n
        };
        Command::message(Message::Selected(self.selected))
    }
}

impl Component for Tabs {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match key.code {
                KeyCode::Tab | KeyCode::Right => self.step(true),
                KeyCode::BackTab | KeyCode::Left => self.step(false),
                _ => Command::none(),
            },
            Message::Selected(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, title) in self.titles.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", self.theme.muted));
            }
            let style = if i == self.selected {
                self.theme.accent
            } else {
                self.theme.muted
            };
            let label = match self.counts[i] {
                Some(count) => format!("{title} {count}"),
                None => title.clone(),
            };
            spans.push(Span::styled(label, style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use prospect_core::testing::render_component;

    fn tabs() -> Tabs {
        Tabs::new(
            vec!["People".into(), "Companies".into()],
            Arc::new(Theme::dark()),
        )
    }

    fn key(code: KeyCode) -> Message {
        Message::KeyPress(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn tab_cycles_and_reports() {
        let mut t = tabs();
        let msgs = t.update(key(KeyCode::Tab)).collect().await;
        assert_eq!(msgs, vec![Message::Selected(1)]);
        t.update(key(KeyCode::Tab));
        assert_eq!(t.selected(), 0);
        t.update(key(KeyCode::BackTab));
        assert_eq!(t.selected(), 1);
    }

    #[test]
    fn select_out_of_bounds_is_ignored() {
        let mut t = tabs();
        t.select(5);
        assert_eq!(t.selected(), 0);
    }

    #[test]
    fn renders_counts() {
        let mut t = tabs();
        t.set_count(0, 1200);
        t.set_count(1, 40);
        let screen = render_component(&t, 40, 1);
        assert!(screen.contains("People 1200"));
        assert!(screen.contains("Companies 40"));
    }
}
