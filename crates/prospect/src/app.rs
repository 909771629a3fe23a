//! The prospecting dashboard: tabs, search, two result tables, a
//! select-first-N prompt, a detail pane and a status line.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use prospect_core::{
    parse_count, Command, Component, DebounceTicket, EngineError, EngineOptions, Item, Model,
    RevealField, TerminalEvent, WindowedList,
};
use prospect_widgets::results_table::Message as TableMessage;
use prospect_widgets::{count_prompt, search_bar, tabs};
use prospect_widgets::{CountPrompt, ResultsTable, Row, SearchBar, Tabs, Theme};
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, error, info};

use crate::gateway::{DataGateway, GatewayError, TrackingReport};
use crate::records::{Company, Person};

/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    People,
    Companies,
}

impl Tab {
    fn index(self) -> usize {
        match self {
            Tab::People => 0,
            Tab::Companies => 1,
        }
    }

    fn from_index(index: usize) -> Self {
        if index == 1 {
            Tab::Companies
        } else {
            Tab::People
        }
    }

    fn wrap(self) -> fn(TableMessage<u64>) -> Message {
        match self {
            Tab::People => Message::People,
            Tab::Companies => Message::Companies,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Table,
    Search,
    Prompt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyEvent),
    Paste(String),
    Scroll(i32),
    PeopleLoaded(Result<Vec<Person>, GatewayError>),
    CompaniesLoaded(Result<Vec<Company>, GatewayError>),
    Search(search_bar::Message),
    SearchSettled(Tab, DebounceTicket),
    Tabs(tabs::Message),
    People(TableMessage<u64>),
    Companies(TableMessage<u64>),
    Prompt(count_prompt::Message),
    Saved(Result<Person, GatewayError>),
    Tracked(Result<TrackingReport, GatewayError>),
    Quit,
}

/// Startup configuration for [`Dashboard`].
///
/// Building the flags validates the engine options, so the dashboard
/// itself starts infallibly.
pub struct Flags {
    gateway: Arc<dyn DataGateway>,
    people: WindowedList<Person>,
    companies: WindowedList<Company>,
    debounce: Duration,
    theme: Theme,
}

impl Flags {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        options: EngineOptions,
        theme: Theme,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            gateway,
            people: WindowedList::new(options.clone())?,
            debounce: options.debounce,
            companies: WindowedList::new(options)?,
            theme,
        })
    }
}

/// Operations the dashboard needs from whichever table is active.
trait Pane: Component<Message = TableMessage<u64>> {
    fn focus(&mut self);
    fn blur(&mut self);
    fn search(&mut self, term: String, now: Instant) -> Option<DebounceTicket>;
    fn fire_search(&mut self, ticket: DebounceTicket) -> bool;
    fn flush_search(&mut self) -> bool;
    fn clear_search(&mut self);
    fn filtered_len(&self) -> usize;
    fn selected(&self) -> usize;
    fn select_first_n(&mut self, n: usize) -> Result<(), EngineError>;
    fn clear_selection(&mut self);
}

impl<R: Row + Item<Id = u64>> Pane for ResultsTable<R> {
    fn focus(&mut self) {
        ResultsTable::focus(self);
    }

    fn blur(&mut self) {
        ResultsTable::blur(self);
    }

    fn search(&mut self, term: String, now: Instant) -> Option<DebounceTicket> {
        let ticket = ResultsTable::search(self, term, now);
        self.list().is_search_pending().then_some(ticket)
    }

    fn fire_search(&mut self, ticket: DebounceTicket) -> bool {
        ResultsTable::fire_search(self, ticket)
    }

    fn flush_search(&mut self) -> bool {
        ResultsTable::flush_search(self)
    }

    fn clear_search(&mut self) {
        self.reset_search("");
    }

    fn filtered_len(&self) -> usize {
        self.list().filtered_len()
    }

    fn selected(&self) -> usize {
        self.list().selection().len()
    }

    fn select_first_n(&mut self, n: usize) -> Result<(), EngineError> {
        self.list_mut().select_first_n_filtered(n)
    }

    fn clear_selection(&mut self) {
        self.list_mut().clear_selection();
    }
}

pub struct Dashboard {
    gateway: Arc<dyn DataGateway>,
    theme: Arc<Theme>,
    debounce: Duration,
    tab: Tab,
    focus: Focus,
    tabs: Tabs,
    search: SearchBar,
    people: ResultsTable<Person>,
    companies: ResultsTable<Company>,
    prompt: CountPrompt,
    detail: Option<(Tab, u64)>,
    status: Option<Status>,
    loading: usize,
}

impl Dashboard {
    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn people(&self) -> &ResultsTable<Person> {
        &self.people
    }

    pub fn companies(&self) -> &ResultsTable<Company> {
        &self.companies
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }

    /// Id of the row shown in the detail pane, if any.
    pub fn detail(&self) -> Option<(Tab, u64)> {
        self.detail
    }

    pub fn search_query(&self) -> &str {
        self.search.query()
    }

    fn pane(&self, tab: Tab) -> &dyn Pane {
        match tab {
            Tab::People => &self.people,
            Tab::Companies => &self.companies,
        }
    }

    fn pane_mut(&mut self, tab: Tab) -> &mut dyn Pane {
        match tab {
            Tab::People => &mut self.people,
            Tab::Companies => &mut self.companies,
        }
    }

    fn active(&mut self) -> &mut dyn Pane {
        self.pane_mut(self.tab)
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Search {
            self.search.focus();
            self.active().blur();
        } else {
            self.search.blur();
            self.active().focus();
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        // Each tab keeps its own selection; only the search is cleared.
        let old = self.tab;
        self.pane_mut(old).blur();
        self.pane_mut(old).clear_search();
        self.search.set_query("");
        self.tab = tab;
        self.tabs.select(tab.index());
        self.detail = None;
        self.set_focus(Focus::Table);
        debug!(?tab, "switched tab");
    }

    fn info(&mut self, text: impl Into<String>) {
        self.status = Some(Status::Info(text.into()));
    }

    fn fail(&mut self, text: impl Into<String>) {
        let text = text.into();
        error!(%text, "dashboard error");
        self.status = Some(Status::Error(text));
    }

    fn selection_status(&mut self) {
        let n = self.pane(self.tab).selected();
        self.info(format!("{n} selected"));
    }

    fn on_key(&mut self, key: KeyEvent) -> Command<Message> {
        match self.focus {
            Focus::Prompt => self
                .prompt
                .update(count_prompt::Message::KeyPress(key))
                .map(Message::Prompt),
            Focus::Search => self
                .search
                .update(search_bar::Message::KeyPress(key))
                .map(Message::Search),
            Focus::Table => self.on_table_key(key),
        }
    }

    fn on_table_key(&mut self, key: KeyEvent) -> Command<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Command::none();
        }
        match key.code {
            KeyCode::Char('q') => Command::quit(),
            KeyCode::Char('/') => {
                self.set_focus(Focus::Search);
                Command::none()
            }
            KeyCode::Tab | KeyCode::BackTab => self
                .tabs
                .update(tabs::Message::KeyPress(key))
                .map(Message::Tabs),
            KeyCode::Char('n') => {
                self.prompt.open();
                self.focus = Focus::Prompt;
                Command::none()
            }
            KeyCode::Char('c') => {
                self.active().clear_selection();
                self.selection_status();
                Command::none()
            }
            KeyCode::Esc if self.detail.is_some() => {
                self.detail = None;
                Command::none()
            }
            KeyCode::Char('s') if self.tab == Tab::People => match self.people.cursor_item() {
                Some(person) => {
                    info!(id = person.id, "saving person");
                    Command::perform(self.gateway.save_person(person.clone()), Message::Saved)
                }
                None => Command::none(),
            },
            KeyCode::Char('t') if self.tab == Tab::Companies => {
                match self.companies.cursor_item() {
                    Some(company) => Command::perform(
                        self.gateway.test_tracking(company.domain.clone()),
                        Message::Tracked,
                    ),
                    None => Command::none(),
                }
            }
            _ => {
                let wrap = self.tab.wrap();
                self.active().update(TableMessage::KeyPress(key)).map(wrap)
            }
        }
    }

    fn on_search(&mut self, msg: search_bar::Message) -> Command<Message> {
        match msg {
            search_bar::Message::Changed(term) => {
                let tab = self.tab;
                match self.active().search(term, Instant::now()) {
                    Some(ticket) => Command::tick(self.debounce, move |_| {
                        Message::SearchSettled(tab, ticket)
                    }),
                    None => Command::none(),
                }
            }
            search_bar::Message::Submitted(_) => {
                self.active().flush_search();
                self.set_focus(Focus::Table);
                Command::none()
            }
            search_bar::Message::Dismissed => {
                self.set_focus(Focus::Table);
                Command::none()
            }
            msg @ search_bar::Message::KeyPress(_) => {
                self.search.update(msg).map(Message::Search)
            }
        }
    }

    fn on_table(&mut self, tab: Tab, msg: TableMessage<u64>) -> Command<Message> {
        match msg {
            TableMessage::Open(id) => {
                self.detail = Some((tab, id));
                Command::none()
            }
            TableMessage::Toggled(..) | TableMessage::SelectedAll(_) => {
                self.selection_status();
                Command::none()
            }
            TableMessage::Revealed(id, field, on) => {
                info!(id, %field, on, "contact reveal");
                Command::none()
            }
            TableMessage::CursorMoved(_) => Command::none(),
            other => self.pane_mut(tab).update(other).map(tab.wrap()),
        }
    }

    fn on_prompt(&mut self, msg: count_prompt::Message) -> Command<Message> {
        match msg {
            count_prompt::Message::Submitted(input) => {
                let available = self.pane(self.tab).filtered_len();
                let result =
                    parse_count(&input, available).and_then(|n| self.active().select_first_n(n));
                match result {
                    Ok(()) => {
                        self.prompt.close();
                        self.set_focus(Focus::Table);
                        self.selection_status();
                    }
                    Err(err) => self.prompt.set_error(err.to_string()),
                }
                Command::none()
            }
            count_prompt::Message::Cancelled => {
                self.prompt.close();
                self.set_focus(Focus::Table);
                Command::none()
            }
            msg @ count_prompt::Message::KeyPress(_) => {
                self.prompt.update(msg).map(Message::Prompt)
            }
        }
    }

    fn loaded(&mut self) {
        self.loading = self.loading.saturating_sub(1);
        if self.loading == 0 && !matches!(self.status, Some(Status::Error(_))) {
            self.status = None;
        }
    }

    fn detail_lines(&self) -> Vec<Line<'static>> {
        let Some((tab, id)) = self.detail else {
            return Vec::new();
        };
        let field = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<10}"), self.theme.muted),
                Span::styled(value, self.theme.text),
            ])
        };
        match tab {
            Tab::People => {
                let list = self.people.list();
                let Some(p) = list.get(&id) else {
                    return vec![Line::from("Record no longer available")];
                };
                vec![
                    Line::styled(p.name.clone(), self.theme.header),
                    field("Title", p.title.clone()),
                    field("Company", p.company.clone()),
                    field("Location", p.location.clone()),
                    field("Email", list.mask(&id, RevealField::Email, &p.email)),
                    field("Phone", list.mask(&id, RevealField::Phone, &p.phone)),
                ]
            }
            Tab::Companies => {
                let list = self.companies.list();
                let Some(c) = list.get(&id) else {
                    return vec![Line::from("Record no longer available")];
                };
                vec![
                    Line::styled(c.name.clone(), self.theme.header),
                    field("Industry", c.industry.clone()),
                    field("Size", c.size.clone()),
                    field("Location", c.location.clone()),
                    field("Domain", c.domain.clone()),
                    field("Phone", list.mask(&id, RevealField::Phone, &c.phone)),
                ]
            }
        }
    }

    fn status_line(&self) -> Line<'static> {
        match &self.status {
            Some(Status::Error(text)) => Line::styled(text.clone(), self.theme.error),
            Some(Status::Info(text)) => Line::styled(text.clone(), self.theme.text),
            None if self.loading > 0 => Line::styled("Loading…", self.theme.muted),
            None => Line::styled(
                "/ search · tab switch · n first N · c clear · q quit",
                self.theme.muted,
            ),
        }
    }
}

impl Model for Dashboard {
    type Message = Message;
    type Flags = Flags;

    fn init(flags: Flags) -> (Self, Command<Message>) {
        let theme = Arc::new(flags.theme);
        let mut people = ResultsTable::from_list(flags.people, theme.clone()).with_title("People");
        people.focus();
        let companies =
            ResultsTable::from_list(flags.companies, theme.clone()).with_title("Companies");

        let dashboard = Dashboard {
            gateway: flags.gateway,
            debounce: flags.debounce,
            tab: Tab::People,
            focus: Focus::Table,
            tabs: Tabs::new(vec!["People".into(), "Companies".into()], theme.clone()),
            search: SearchBar::new(theme.clone()).with_placeholder("Search people and companies"),
            people,
            companies,
            prompt: CountPrompt::new(theme.clone()),
            detail: None,
            status: None,
            loading: 2,
            theme,
        };
        let cmd = Command::batch([
            Command::perform(dashboard.gateway.fetch_people(), Message::PeopleLoaded),
            Command::perform(dashboard.gateway.fetch_companies(), Message::CompaniesLoaded),
        ]);
        (dashboard, cmd)
    }

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Key(key) => self.on_key(key),
            Message::Paste(text) => {
                let query = format!("{}{}", self.search.query(), text.replace(['\n', '\r'], " "));
                self.search.set_query(query.clone());
                self.on_search(search_bar::Message::Changed(query))
            }
            Message::Scroll(rows) => {
                let wrap = self.tab.wrap();
                self.active().update(TableMessage::Scroll(rows)).map(wrap)
            }
            Message::PeopleLoaded(result) => {
                self.loaded();
                match result {
                    Ok(rows) => {
                        self.tabs.set_count(Tab::People.index(), rows.len());
                        self.people.set_items(rows);
                    }
                    Err(err) => self.fail(format!("Could not load people: {err}")),
                }
                Command::none()
            }
            Message::CompaniesLoaded(result) => {
                self.loaded();
                match result {
                    Ok(rows) => {
                        self.tabs.set_count(Tab::Companies.index(), rows.len());
                        self.companies.set_items(rows);
                    }
                    Err(err) => self.fail(format!("Could not load companies: {err}")),
                }
                Command::none()
            }
            Message::Search(msg) => self.on_search(msg),
            Message::SearchSettled(tab, ticket) => {
                if self.pane_mut(tab).fire_search(ticket) {
                    debug!(?tab, matches = self.pane(tab).filtered_len(), "search applied");
                }
                Command::none()
            }
            Message::Tabs(tabs::Message::Selected(index)) => {
                self.switch_tab(Tab::from_index(index));
                Command::none()
            }
            Message::Tabs(msg) => self.tabs.update(msg).map(Message::Tabs),
            Message::People(msg) => self.on_table(Tab::People, msg),
            Message::Companies(msg) => self.on_table(Tab::Companies, msg),
            Message::Prompt(msg) => self.on_prompt(msg),
            Message::Saved(Ok(person)) => {
                let name = person.name.clone();
                let mut rows = self.people.list().items().to_vec();
                if let Some(slot) = rows.iter_mut().find(|p| p.id == person.id) {
                    *slot = person;
                }
                self.people.set_items(rows);
                self.info(format!("Saved {name}"));
                Command::none()
            }
            Message::Saved(Err(err)) => {
                self.fail(format!("Save failed: {err}"));
                Command::none()
            }
            Message::Tracked(Ok(report)) => {
                let state = if report.installed {
                    "installed"
                } else {
                    "missing"
                };
                self.info(format!(
                    "Tracking on {} {state}, {} events in the last day",
                    report.domain, report.events_last_day
                ));
                Command::none()
            }
            Message::Tracked(Err(err)) => {
                self.fail(format!("Tracking check failed: {err}"));
                Command::none()
            }
            Message::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [tabs_area, search_area, body, bottom] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.tabs.view(frame, tabs_area);
        self.search.view(frame, search_area);

        let table_area = if self.detail.is_some() {
            let [table, side] =
                Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
                    .areas(body);
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border(false))
                .title("Details");
            frame.render_widget(
                Paragraph::new(self.detail_lines())
                    .block(block)
                    .wrap(Wrap { trim: true }),
                side,
            );
            table
        } else {
            body
        };
        self.pane(self.tab).view(frame, table_area);

        if self.prompt.is_active() {
            self.prompt.view(frame, bottom);
        } else {
            frame.render_widget(Paragraph::new(self.status_line()), bottom);
        }
    }

    fn handle_event(&self, event: TerminalEvent) -> Option<Message> {
        match event {
            TerminalEvent::Key(key)
                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                Some(Message::Quit)
            }
            TerminalEvent::Key(key) => Some(Message::Key(key)),
            TerminalEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Some(Message::Scroll(WHEEL_ROWS)),
                MouseEventKind::ScrollUp => Some(Message::Scroll(-WHEEL_ROWS)),
                _ => None,
            },
            TerminalEvent::Paste(text) if self.focus == Focus::Search => Some(Message::Paste(text)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::records;

    fn flags(people: usize, companies: usize) -> Flags {
        let gateway = Arc::new(MockGateway::new(
            records::people(people),
            records::companies(companies),
        ));
        let options = EngineOptions {
            debounce: Duration::ZERO,
            ..EngineOptions::default()
        };
        Flags::new(gateway, options, Theme::dark()).unwrap()
    }

    #[test]
    fn invalid_options_rejected_up_front() {
        let gateway = Arc::new(MockGateway::new(Vec::new(), Vec::new()));
        let options = EngineOptions {
            item_height: 0.0,
            ..EngineOptions::default()
        };
        assert!(Flags::new(gateway, options, Theme::dark()).is_err());
    }

    #[test]
    fn starts_loading_on_people_tab() {
        let (dash, cmd) = Dashboard::init(flags(3, 3));
        assert!(!cmd.is_none());
        assert!(dash.is_loading());
        assert_eq!(dash.tab(), Tab::People);
        assert!(dash.people().list().is_empty());
    }

    #[test]
    fn tab_index_round_trips() {
        assert_eq!(Tab::from_index(Tab::Companies.index()), Tab::Companies);
        assert_eq!(Tab::from_index(7), Tab::People);
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let (dash, _) = Dashboard::init(flags(0, 0));
        let ev = TerminalEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(matches!(dash.handle_event(ev), Some(Message::Quit)));
    }
}
