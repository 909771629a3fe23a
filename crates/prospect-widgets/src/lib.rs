//! Components for browsing large result sets in the terminal.
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`ResultsTable`] | Windowed, selectable table over a [`WindowedList`](prospect_core::WindowedList) |
//! | [`SearchBar`] | Single-line query input |
//! | [`Tabs`] | Switch between result sets |
//! | [`CountPrompt`] | "Select first N" input |
//!
//! Supporting modules: [`theme`] for shared styles, [`key`] for bindings and
//! help text, [`cursor`] for row cursor arithmetic, [`runeutil`] for
//! width-aware truncation.

pub mod count_prompt;
pub mod cursor;
pub mod key;
pub mod results_table;
pub mod runeutil;
pub mod search_bar;
pub mod tabs;
pub mod theme;

pub use count_prompt::CountPrompt;
pub use cursor::RowCursor;
pub use key::{Binding, KeyCombination};
pub use results_table::{Column, ColumnKind, ResultsKeys, ResultsTable, Row};
pub use search_bar::SearchBar;
pub use tabs::Tabs;
pub use theme::Theme;
