use crate::command::Command;
use crate::event::TerminalEvent;
use ratatui::Frame;

/// The top-level application trait, following the Elm architecture.
///
/// The [`Program`](crate::Program) drives an **init -> update -> view**
/// cycle:
///
/// 1. [`init`](Model::init) builds the initial state and may return a
///    [`Command`] (for example, loading rows through a gateway).
/// 2. [`view`](Model::view) renders the state to a [`ratatui::Frame`].
/// 3. Terminal input is turned into messages by
///    [`handle_event`](Model::handle_event); async work returns messages
///    through commands.
/// 4. [`update`](Model::update) processes each message and may return
///    another [`Command`].
pub trait Model: Sized + Send + 'static {
    /// Every event that can change the application state.
    type Message: Send + 'static;

    /// Startup data passed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Called after every batch of updates.
    fn view(&self, frame: &mut Frame);

    /// Map a terminal event to a message. Unmapped events are dropped.
    fn handle_event(&self, event: TerminalEvent) -> Option<Self::Message> {
        let _ = event;
        None
    }
}
