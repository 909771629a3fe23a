use crate::command::{Command, CommandInner};
use crate::component::Component;
use crate::event::TerminalEvent;
use crate::model::Model;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless harness that drives a [`Model`] without a real terminal.
///
/// Synchronous commands ([`Command::message`]) are queued and flushed with
/// [`drain_messages`](TestProgram::drain_messages). Async commands are kept
/// aside; [`run_pending`](TestProgram::run_pending) awaits them and feeds
/// their messages back through `update`, which lets a `#[tokio::test]`
/// exercise gateway loads and debounce timers end to end.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Dashboard>::new(flags);
/// prog.run_pending().await;            // initial load
/// prog.key(KeyCode::Char('a'));        // select all
/// assert!(prog.render_string(80, 20).contains("12 selected"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    pending_async: Vec<Command<M::Message>>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            pending_async: Vec::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, then flush the synchronous messages it produced.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
        self.drain_messages();
    }

    /// Route a terminal event through [`Model::handle_event`].
    pub fn event(&mut self, event: TerminalEvent) {
        if let Some(msg) = self.model.handle_event(event) {
            self.send(msg);
        }
    }

    /// Shorthand for a key press without modifiers.
    pub fn key(&mut self, code: crossterm::event::KeyCode) {
        self.event(TerminalEvent::Key(crossterm::event::KeyEvent::new(
            code,
            crossterm::event::KeyModifiers::NONE,
        )));
    }

    /// Type each character of `text` as a key press.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.key(crossterm::event::KeyCode::Char(ch));
        }
    }

    /// Process pending synchronous messages until none are left.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Await every queued async command (and any it spawns) and apply the results.
    pub async fn run_pending(&mut self) {
        self.drain_messages();
        while !self.pending_async.is_empty() {
            let cmds: Vec<_> = self.pending_async.drain(..).collect();
            for cmd in cmds {
                for msg in cmd.collect().await {
                    let next = self.model.update(msg);
                    self.collect(next);
                }
            }
            self.drain_messages();
        }
    }

    /// Number of async commands waiting for [`run_pending`](Self::run_pending).
    pub fn pending_async(&self) -> usize {
        self.pending_async.len()
    }

    /// Whether the model asked to quit.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access for arranging state directly.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Render the model to a [`Buffer`] of the given size.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        render_with(width, height, |frame| self.model.view(frame))
    }

    /// Render the model and return the screen as text, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Quit => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
            inner @ CommandInner::Future(_) => self.pending_async.push(Command { inner }),
        }
    }
}

/// Render a [`Component`] into a `width` x `height` buffer and return it as text.
pub fn render_component<C: Component>(component: &C, width: u16, height: u16) -> String {
    let buf = render_with(width, height, |frame| {
        let area = frame.area();
        component.view(frame, area);
    });
    buffer_to_string(&buf)
}

fn render_with(width: u16, height: u16, draw: impl FnOnce(&mut ratatui::Frame)) -> Buffer {
    let backend = ratatui::backend::TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    terminal.backend().buffer().clone()
}

/// Concatenate buffer rows into lines separated by `\n`.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Item, WindowedList};
    use crate::options::EngineOptions;
    use crossterm::event::KeyCode;
    use ratatui::widgets::Paragraph;

    #[derive(Debug)]
    struct Lead(u32);

    impl Item for Lead {
        type Id = u32;
        fn id(&self) -> u32 {
            self.0
        }
    }

    /// Loads leads asynchronously; `x` selects the first one.
    struct Picker {
        list: WindowedList<Lead>,
    }

    #[derive(Debug)]
    enum PickerMsg {
        Load(u32),
        Loaded(Vec<Lead>),
        SelectFirst,
        Done,
    }

    impl Model for Picker {
        type Message = PickerMsg;
        type Flags = u32;

        fn init(count: u32) -> (Self, Command<PickerMsg>) {
            let list = WindowedList::new(EngineOptions::default()).unwrap();
            (Picker { list }, Command::message(PickerMsg::Load(count)))
        }

        fn update(&mut self, msg: PickerMsg) -> Command<PickerMsg> {
            match msg {
                PickerMsg::Load(n) => Command::perform(
                    async move { (1..=n).map(Lead).collect::<Vec<_>>() },
                    PickerMsg::Loaded,
                ),
                PickerMsg::Loaded(leads) => {
                    self.list.set_items(leads);
                    Command::message(PickerMsg::SelectFirst)
                }
                PickerMsg::SelectFirst => {
                    let _ = self.list.select_first_n_filtered(1);
                    Command::none()
                }
                PickerMsg::Done => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!(
                "{} leads, {} selected",
                self.list.len(),
                self.list.selection().len()
            );
            frame.render_widget(Paragraph::new(text), frame.area());
        }

        fn handle_event(&self, event: TerminalEvent) -> Option<PickerMsg> {
            match event {
                TerminalEvent::Key(k) if k.code == KeyCode::Char('q') => Some(PickerMsg::Done),
                _ => None,
            }
        }
    }

    #[test]
    fn init_command_queues_async_load() {
        let prog = TestProgram::<Picker>::new(3);
        // The init message is queued, not yet processed.
        assert_eq!(prog.pending_async(), 0);
        assert!(prog.model().list.is_empty());
    }

    #[tokio::test]
    async fn async_load_then_chained_message() {
        let mut prog = TestProgram::<Picker>::new(5);
        prog.drain_messages();
        assert_eq!(prog.pending_async(), 1);

        prog.run_pending().await;
        assert_eq!(prog.pending_async(), 0);
        assert_eq!(prog.model().list.len(), 5);
        assert!(prog.model().list.is_selected(&1));
        assert!(prog.render_string(30, 1).contains("5 leads, 1 selected"));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        let mut prog = TestProgram::<Picker>::new(0);
        prog.type_text("abc");
        assert!(!prog.quit_requested());
        prog.key(KeyCode::Char('q'));
        assert!(prog.quit_requested());
    }

    #[test]
    fn send_processes_follow_ups() {
        let mut prog = TestProgram::<Picker>::new(0);
        prog.send(PickerMsg::Loaded(vec![Lead(1), Lead(2)]));
        assert_eq!(prog.model().list.len(), 2);
        assert_eq!(prog.model().list.selection().len(), 1);
    }

    #[test]
    fn buffer_rows_are_joined() {
        let buf = render_with(3, 2, |frame| {
            frame.render_widget(Paragraph::new("ab\ncd"), frame.area());
        });
        assert_eq!(buffer_to_string(&buf), "ab \ncd ");
    }
}
