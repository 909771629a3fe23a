//! Virtualized result table with multi-select and masked contact columns.
//!
//! `ResultsTable` is a [`Component`] over a [`WindowedList`]. Only the rows
//! that intersect the viewport are built each frame, so a table of a
//! million rows costs the same to draw as one of twenty. The same component
//! renders every row when the engine is configured with
//! [`Windowing::Full`](prospect_core::Windowing::Full).
//!
//! # Example
//!
//! ```ignore
//! let table = ResultsTable::new(people, EngineOptions::default(), theme)?
//!     .with_title("People");
//! ```

use std::cell::Cell as StdCell;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use prospect_core::command::Command;
use prospect_core::component::Component;
use prospect_core::window::{self, ViewportState};
use prospect_core::{
    contains_ignore_case, DebounceTicket, EngineError, EngineOptions, Item, RevealField,
    WindowedList,
};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table};
use ratatui::Frame;
use tracing::debug;

use crate::cursor::RowCursor;
use crate::key::{help_line, Binding, KeyCombination};
use crate::runeutil::truncate;
use crate::theme::Theme;

/// How a column's text is obtained and shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Shown as-is and searched by the default predicate.
    Text,
    /// Masked until revealed for the row; never searched.
    Contact(RevealField),
}

/// Header and layout of one table column.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: Constraint,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(title: &'static str, width: Constraint) -> Self {
        Self {
            title,
            width,
            kind: ColumnKind::Text,
        }
    }

    pub const fn contact(title: &'static str, width: Constraint, field: RevealField) -> Self {
        Self {
            title,
            width,
            kind: ColumnKind::Contact(field),
        }
    }
}

/// A record that can be shown as a row of a [`ResultsTable`].
pub trait Row: Item + Send + 'static {
    /// Column definitions, shared by every row of the type.
    fn columns() -> &'static [Column];

    /// Raw text of column `index`.
    fn cell(&self, index: usize) -> &str;

    /// Default search predicate: any text column contains `term`.
    fn matches(&self, term: &str) -> bool {
        Self::columns()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == ColumnKind::Text)
            .any(|(i, _)| contains_ignore_case(self.cell(i), term))
    }
}

/// Messages for the results table.
#[derive(Debug, Clone)]
pub enum Message<Id> {
    /// A key press forwarded to the table.
    KeyPress(KeyEvent),
    /// Scroll by a number of rows (mouse wheel); negative scrolls up.
    Scroll(i32),
    /// The cursor moved to this filtered index.
    CursorMoved(usize),
    /// A row's selection changed.
    Toggled(Id, bool),
    /// Select-all was switched on or off.
    SelectedAll(bool),
    /// A contact field of a row was revealed or hidden again.
    Revealed(Id, RevealField, bool),
    /// Enter on a row.
    Open(Id),
}

/// Configurable key bindings for the table.
#[derive(Debug, Clone)]
pub struct ResultsKeys {
    pub up: Binding,
    pub down: Binding,
    pub page_up: Binding,
    pub page_down: Binding,
    pub first: Binding,
    pub last: Binding,
    pub toggle: Binding,
    pub select_all: Binding,
    pub reveal_email: Binding,
    pub reveal_phone: Binding,
    pub open: Binding,
}

impl Default for ResultsKeys {
    fn default() -> Self {
        Self {
            up: Binding::new(
                vec![
                    KeyCombination::new(KeyCode::Up),
                    KeyCombination::new(KeyCode::Char('k')),
                ],
                "↑/k",
                "up",
            ),
            down: Binding::new(
                vec![
                    KeyCombination::new(KeyCode::Down),
                    KeyCombination::new(KeyCode::Char('j')),
                ],
                "↓/j",
                "down",
            ),
            page_up: Binding::new(vec![KeyCombination::new(KeyCode::PageUp)], "", "page up"),
            page_down: Binding::new(
                vec![KeyCombination::new(KeyCode::PageDown)],
                "",
                "page down",
            ),
            first: Binding::new(vec![KeyCombination::new(KeyCode::Home)], "", "first"),
            last: Binding::new(
                vec![
                    KeyCombination::new(KeyCode::End),
                    KeyCombination::new(KeyCode::Char('G')),
                ],
                "end/G",
                "last",
            ),
            toggle: Binding::char(' ', "select"),
            select_all: Binding::char('a', "all"),
            reveal_email: Binding::char('e', "email"),
            reveal_phone: Binding::char('p', "phone"),
            open: Binding::new(vec![KeyCombination::new(KeyCode::Enter)], "", "open"),
        }
    }
}

impl ResultsKeys {
    /// Bindings shown in the short help line.
    pub fn short_help(&self) -> Vec<&Binding> {
        vec![
            &self.toggle,
            &self.select_all,
            &self.reveal_email,
            &self.reveal_phone,
            &self.open,
        ]
    }
}

/// Scrollable, filterable, multi-select table of `R`.
pub struct ResultsTable<R: Row> {
    list: WindowedList<R>,
    cursor: RowCursor,
    scroll_offset: f64,
    visible_rows: StdCell<usize>,
    focus: bool,
    title: String,
    theme: Arc<Theme>,
    keys: ResultsKeys,
}

impl<R: Row> ResultsTable<R> {
    /// Build a table over `items`, filtered by [`Row::matches`].
    pub fn new(items: Vec<R>, options: EngineOptions, theme: Arc<Theme>) -> Result<Self, EngineError> {
        let list = WindowedList::new(options)?.with_items(items);
        Ok(Self::from_list(list, theme))
    }

    /// Wrap an existing engine. Its predicate is replaced by [`Row::matches`].
    pub fn from_list(mut list: WindowedList<R>, theme: Arc<Theme>) -> Self {
        list.set_predicate(|row: &R, term| row.matches(term));
        Self {
            cursor: RowCursor::new(list.filtered_len()),
            list,
            scroll_offset: 0.0,
            visible_rows: StdCell::new(10),
            focus: false,
            title: String::new(),
            theme,
            keys: ResultsKeys::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_key_bindings(mut self, keys: ResultsKeys) -> Self {
        self.keys = keys;
        self
    }

    pub fn key_bindings(&self) -> &ResultsKeys {
        &self.keys
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn list(&self) -> &WindowedList<R> {
        &self.list
    }

    /// Mutable engine access. Call [`sync`](Self::sync) afterwards if the
    /// filtered collection may have changed.
    pub fn list_mut(&mut self) -> &mut WindowedList<R> {
        &mut self.list
    }

    /// Replace the rows, keeping the cursor in range.
    pub fn set_items(&mut self, items: Vec<R>) {
        self.list.set_items(items);
        self.sync();
    }

    /// Feed a keystroke's worth of search input to the engine.
    pub fn search(&mut self, term: impl Into<String>, now: Instant) -> DebounceTicket {
        let ticket = self.list.set_search_term(term, now);
        if !self.list.is_search_pending() {
            self.reset_scroll();
        }
        ticket
    }

    /// Apply a debounce timer. Returns `true` when the filter changed.
    pub fn fire_search(&mut self, ticket: DebounceTicket) -> bool {
        let committed = self.list.fire_search(ticket);
        if committed {
            self.reset_scroll();
        }
        committed
    }

    /// Apply the pending search term immediately.
    pub fn flush_search(&mut self) -> bool {
        let committed = self.list.flush_search();
        if committed {
            self.reset_scroll();
        }
        committed
    }

    /// Set the search term without debounce (e.g. clearing on tab switch).
    pub fn reset_search(&mut self, term: impl Into<String>) {
        self.list.reset_search(term);
        self.reset_scroll();
    }

    /// Re-clamp cursor and scroll after the filtered collection changed.
    pub fn sync(&mut self) {
        self.cursor.set_count(self.list.filtered_len());
        let max = window::max_scroll_offset(self.list.filtered_len(), &self.viewport());
        self.scroll_offset = self.scroll_offset.min(max);
    }

    /// Index of the highlighted row within the filtered collection.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor.current()
    }

    /// The highlighted row.
    pub fn cursor_item(&self) -> Option<&R> {
        self.cursor().and_then(|i| self.list.filtered_item(i))
    }

    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Tell the table how many rows it can show before it is first drawn.
    pub fn set_visible_rows(&self, rows: usize) {
        self.visible_rows.set(rows.max(1));
    }

    /// The viewport the next frame will render.
    pub fn viewport(&self) -> ViewportState {
        let rows = self.visible_rows.get() as f64 * self.list.options().item_height;
        self.list.viewport(self.scroll_offset, rows)
    }

    fn reset_scroll(&mut self) {
        self.scroll_offset = 0.0;
        self.cursor = RowCursor::new(self.list.filtered_len());
    }

    fn follow_cursor(&mut self) -> Command<Message<R::Id>> {
        let Some(index) = self.cursor.current() else {
            return Command::none();
        };
        self.scroll_offset = window::scroll_to_index(index, &self.viewport());
        Command::message(Message::CursorMoved(index))
    }

    fn scroll_by(&mut self, rows: i32) {
        let viewport = self.viewport();
        let max = window::max_scroll_offset(self.list.filtered_len(), &viewport);
        let delta = rows as f64 * viewport.item_height;
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, max);

        let h = viewport.item_height;
        let first = (self.scroll_offset / h).ceil() as usize;
        let last = ((self.scroll_offset + viewport.viewport_height) / h).floor() as usize;
        self.cursor.clamp_to(first, last.saturating_sub(1).max(first));
    }

    fn toggle_cursor_row(&mut self) -> Command<Message<R::Id>> {
        match self.cursor_item().map(Item::id) {
            Some(id) => {
                let on = self.list.toggle_item(id.clone());
                Command::message(Message::Toggled(id, on))
            }
            None => Command::none(),
        }
    }

    fn toggle_all(&mut self) -> Command<Message<R::Id>> {
        let all = self.list.all_selected();
        self.list.select_all(!all);
        Command::message(Message::SelectedAll(!all))
    }

    fn reveal_cursor_row(&mut self, field: RevealField) -> Command<Message<R::Id>> {
        match self.cursor_item().map(Item::id) {
            Some(id) => {
                let on = self.list.toggle_reveal(id.clone(), field);
                debug!(?id, %field, on, "reveal toggled");
                Command::message(Message::Revealed(id, field, on))
            }
            None => Command::none(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message<R::Id>> {
        let page = self.visible_rows.get();
        if self.keys.up.matches(&key) {
            self.cursor.up(1);
            self.follow_cursor()
        } else if self.keys.down.matches(&key) {
            self.cursor.down(1);
            self.follow_cursor()
        } else if self.keys.page_up.matches(&key) {
            self.cursor.up(page);
            self.follow_cursor()
        } else if self.keys.page_down.matches(&key) {
            self.cursor.down(page);
            self.follow_cursor()
        } else if self.keys.first.matches(&key) {
            self.cursor.home();
            self.follow_cursor()
        } else if self.keys.last.matches(&key) {
            self.cursor.end();
            self.follow_cursor()
        } else if self.keys.toggle.matches(&key) {
            self.toggle_cursor_row()
        } else if self.keys.select_all.matches(&key) {
            self.toggle_all()
        } else if self.keys.reveal_email.matches(&key) {
            self.reveal_cursor_row(RevealField::Email)
        } else if self.keys.reveal_phone.matches(&key) {
            self.reveal_cursor_row(RevealField::Phone)
        } else if self.keys.open.matches(&key) {
            match self.cursor_item() {
                Some(row) => Command::message(Message::Open(row.id())),
                None => Command::none(),
            }
        } else {
            Command::none()
        }
    }

    fn render_cells(&self, row: &R, index: usize) -> TableRow<'static> {
        let id = row.id();
        let selected = self.list.is_selected(&id);
        let mark = if selected {
            Span::styled("[x]", self.theme.selected_mark)
        } else {
            Span::styled("[ ]", self.theme.muted)
        };

        let mut cells = Vec::with_capacity(R::columns().len() + 1);
        cells.push(Cell::from(mark));
        for (i, column) in R::columns().iter().enumerate() {
            let raw = row.cell(i);
            let fit = |text: &str| match column.width {
                Constraint::Length(w) | Constraint::Max(w) => truncate(text, w as usize),
                _ => text.to_string(),
            };
            let cell = match column.kind {
                ColumnKind::Text => Cell::from(fit(raw)),
                ColumnKind::Contact(field) => {
                    let style = if self.list.is_revealed(&id, field) {
                        self.theme.text
                    } else {
                        self.theme.masked
                    };
                    Cell::from(fit(&self.list.mask(&id, field, raw))).style(style)
                }
            };
            cells.push(cell);
        }

        let style = if self.focus && self.cursor.current() == Some(index) {
            self.theme.cursor_row
        } else {
            self.theme.text
        };
        TableRow::new(cells).style(style)
    }

    fn footer(&self, shown: std::ops::Range<usize>) -> Line<'static> {
        let len = self.list.filtered_len();
        let mut spans = Vec::new();
        if len == 0 {
            spans.push(Span::styled("No results", self.theme.muted));
        } else if shown.is_empty() {
            spans.push(Span::styled(
                format!("No rows visible of {len}"),
                self.theme.muted,
            ));
        } else {
            spans.push(Span::styled(
                format!("{}–{} of {}", shown.start + 1, shown.end, len),
                self.theme.muted,
            ));
        }
        let selected = self.list.selection().len();
        if selected > 0 {
            spans.push(Span::styled(
                format!(" · {selected} selected"),
                self.theme.selected_mark,
            ));
        }
        if self.focus {
            spans.push(Span::styled(
                format!("  {}", help_line(self.keys.short_help())),
                self.theme.muted,
            ));
        }
        Line::from(spans)
    }
}

impl<R: Row> Component for ResultsTable<R> {
    type Message = Message<R::Id>;

    fn update(&mut self, msg: Self::Message) -> Command<Self::Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::Scroll(rows) => {
                self.scroll_by(rows);
                Command::none()
            }
            Message::CursorMoved(index) => {
                if index < self.list.filtered_len() && index != self.cursor.index() {
                    self.cursor.select(index);
                    return self.follow_cursor();
                }
                Command::none()
            }
            _ => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(self.focus));
        if !self.title.is_empty() {
            block = block.title(format!(
                "{} ({})",
                self.title,
                self.list.filtered_len()
            ));
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        // One line of the body goes to the header row.
        let rows = body.height.saturating_sub(1) as usize;
        self.visible_rows.set(rows.max(1));

        let viewport = self.viewport();
        let slice = match self.list.compute_visible_slice(&viewport) {
            Ok(slice) => slice,
            Err(err) => {
                frame.render_widget(
                    Paragraph::new(err.to_string()).style(self.theme.error),
                    body,
                );
                return;
            }
        };

        // The window starts at or above the scroll position; skip the rows
        // scrolled past (only non-zero when every row is produced).
        let h = viewport.item_height;
        let skip = ((self.scroll_offset - slice.offset_y) / h).floor().max(0.0) as usize;
        let visible: Vec<TableRow> = slice
            .items
            .iter()
            .skip(skip)
            .take(rows)
            .map(|v| self.render_cells(v.item, v.index))
            .collect();

        let first = slice.range.start + skip;
        let shown = first..(first + visible.len()).min(slice.filtered_len);

        let mut widths = vec![Constraint::Length(3)];
        widths.extend(R::columns().iter().map(|c| c.width));
        let header = TableRow::new(
            std::iter::once(Cell::from(""))
                .chain(R::columns().iter().map(|c| Cell::from(c.title))),
        )
        .style(self.theme.header);

        frame.render_widget(Table::new(visible, widths).header(header), body);
        frame.render_widget(Paragraph::new(self.footer(shown)), footer);
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
