//! Key bindings with help text.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A single key press with the modifiers that must be held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombination {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

/// One or more key combinations mapped to an action, with a short label
/// (`"space"`) and a description (`"select"`) for the help line.
#[derive(Debug, Clone)]
pub struct Binding {
    pub keys: Vec<KeyCombination>,
    pub label: &'static str,
    pub description: &'static str,
}

impl Binding {
    pub fn new(keys: Vec<KeyCombination>, label: &'static str, description: &'static str) -> Self {
        Self {
            keys,
            label,
            description,
        }
    }

    /// Single unmodified character.
    pub fn char(ch: char, description: &'static str) -> Self {
        Self {
            keys: vec![KeyCombination::new(KeyCode::Char(ch))],
            label: "",
            description,
        }
    }

    /// Whether `event` triggers this binding. Extra modifiers held by the
    /// user (e.g. Shift on an uppercase letter) do not prevent a match.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys
            .iter()
            .any(|k| k.code == event.code && event.modifiers.contains(k.modifiers))
    }

    fn display_label(&self) -> String {
        if !self.label.is_empty() {
            return self.label.to_string();
        }
        let name = match self.keys.first().map(|k| k.code) {
            Some(KeyCode::Char(' ')) => "space",
            Some(KeyCode::Char(c)) => return c.to_string(),
            Some(KeyCode::Enter) => "enter",
            Some(KeyCode::Esc) => "esc",
            Some(KeyCode::Tab) => "tab",
            Some(KeyCode::Up) => "↑",
            Some(KeyCode::Down) => "↓",
            Some(KeyCode::PageUp) => "pgup",
            Some(KeyCode::PageDown) => "pgdn",
            Some(KeyCode::Home) => "home",
            Some(KeyCode::End) => "end",
            _ => "?",
        };
        name.to_string()
    }
}

/// Render bindings as `"key desc · key desc"`.
pub fn help_line<'a>(bindings: impl IntoIterator<Item = &'a Binding>) -> String {
    bindings
        .into_iter()
        .map(|b| format!("{} {}", b.display_label(), b.description))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_ignores_extra_modifiers() {
        let b = Binding::char('G', "last");
        assert!(b.matches(&KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT)));
        assert!(!b.matches(&KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE)));
    }

    #[test]
    fn ctrl_binding_needs_ctrl() {
        let b = Binding::new(vec![KeyCombination::ctrl(KeyCode::Char('d'))], "^d", "down");
        assert!(!b.matches(&KeyEvent::new(KeyCode::Char('d'), KeyModifiers::NONE)));
        assert!(b.matches(&KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn help_line_labels() {
        let bindings = [
            Binding::char(' ', "select"),
            Binding::char('a', "all"),
            Binding::new(vec![KeyCombination::new(KeyCode::Enter)], "", "open"),
        ];
        assert_eq!(help_line(&bindings), "space select · a all · enter open");
    }
}
