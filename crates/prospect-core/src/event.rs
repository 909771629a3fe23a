use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEvent};

/// Terminal input delivered to [`Model::handle_event`](crate::Model::handle_event).
///
/// Scroll and resize events arrive at whatever rate the terminal produces
/// them; handlers must be cheap and idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A key press or repeat. Releases are never delivered.
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    Paste(String),
    FocusGained,
    FocusLost,
}

impl TerminalEvent {
    /// Convert a raw crossterm event. Key releases map to `None` so a
    /// keystroke is handled once on terminals that report both edges.
    pub fn from_crossterm(event: Event) -> Option<Self> {
        Some(match event {
            Event::Key(key) if key.kind == KeyEventKind::Release => return None,
            Event::Key(key) => Self::Key(key),
            Event::Mouse(mouse) => Self::Mouse(mouse),
            Event::Resize(cols, rows) => Self::Resize(cols, rows),
            Event::Paste(text) => Self::Paste(text),
            Event::FocusGained => Self::FocusGained,
            Event::FocusLost => Self::FocusLost,
        })
    }
}
