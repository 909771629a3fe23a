//! Shared colour palette.
//!
//! One [`Theme`] value is built at startup and handed to every widget as an
//! `Arc<Theme>`, so switching between dark and light is a single decision
//! rather than a flag threaded through each component.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Plain body text.
    pub text: Style,
    /// Secondary text: counters, hints, placeholders.
    pub muted: Style,
    /// Active tab, prompt characters, the cursor in text inputs.
    pub accent: Style,
    /// Column headers.
    pub header: Style,
    /// The row under the keyboard cursor.
    pub cursor_row: Style,
    /// Checkbox of a selected row.
    pub selected_mark: Style,
    /// Contact values still masked.
    pub masked: Style,
    /// Validation and engine errors.
    pub error: Style,
    pub focused_border: Style,
    pub unfocused_border: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            text: Style::default().fg(Color::Gray),
            muted: Style::default().fg(Color::DarkGray),
            accent: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            cursor_row: Style::default()
                .bg(Color::Rgb(40, 44, 52))
                .add_modifier(Modifier::BOLD),
            selected_mark: Style::default().fg(Color::Green),
            masked: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
            focused_border: Style::default().fg(Color::Cyan),
            unfocused_border: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn light() -> Self {
        Self {
            text: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::Gray),
            accent: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            cursor_row: Style::default()
                .bg(Color::Rgb(220, 228, 240))
                .add_modifier(Modifier::BOLD),
            selected_mark: Style::default().fg(Color::Green),
            masked: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Red),
            focused_border: Style::default().fg(Color::Blue),
            unfocused_border: Style::default().fg(Color::Gray),
        }
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.focused_border
        } else {
            self.unfocused_border
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
