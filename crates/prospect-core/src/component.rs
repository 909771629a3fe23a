use crate::command::Command;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`].
///
/// A parent [`Model`](crate::Model) owns its components, wraps each
/// component's message in one of its own variants and lifts returned
/// commands with [`Command::map`]:
///
/// ```rust,ignore
/// enum Msg { Search(search_bar::Message), People(results_table::Message) }
///
/// fn update(&mut self, msg: Msg) -> Command<Msg> {
///     match msg {
///         Msg::Search(m) => self.search.update(m).map(Msg::Search),
///         Msg::People(m) => self.people.update(m).map(Msg::People),
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate state, and return a [`Command`] for side effects.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations must stay inside it.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Whether this component currently takes keyboard input.
    fn focused(&self) -> bool {
        false
    }
}
