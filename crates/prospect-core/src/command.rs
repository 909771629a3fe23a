use futures::future::BoxFuture;
use std::future::Future;
use std::time::{Duration, Instant};

/// A side effect returned from [`Model::update`](crate::Model::update),
/// [`Model::init`](crate::Model::init) or
/// [`Component::update`](crate::Component::update).
///
/// Commands are descriptions; the runtime executes them. That keeps update
/// functions synchronous and easy to test with
/// [`TestProgram`](crate::testing::TestProgram).
///
/// # Examples
///
/// ```rust,ignore
/// // Do nothing:
/// let cmd = Command::none();
///
/// // Load rows through a gateway and map the result to a message:
/// let cmd = Command::perform(gateway.fetch_people(), Msg::PeopleLoaded);
///
/// // Wake up once a debounce window has passed:
/// let cmd = Command::tick(Duration::from_millis(300), move |_| Msg::Settle(ticket));
/// ```
pub struct Command<Msg: Send + 'static> {
    pub(crate) inner: CommandInner<Msg>,
}

pub(crate) enum CommandInner<Msg: Send + 'static> {
    None,
    Message(Msg),
    Quit,
    Future(BoxFuture<'static, Msg>),
    Batch(Vec<Command<Msg>>),
}

impl<Msg: Send + 'static> Command<Msg> {
    /// No-op command.
    pub fn none() -> Self {
        Command {
            inner: CommandInner::None,
        }
    }

    /// Whether this command does nothing.
    pub fn is_none(&self) -> bool {
        matches!(self.inner, CommandInner::None)
    }

    /// Run an async future, map the result to a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command {
            inner: CommandInner::Future(Box::pin(async move { map(future.await) })),
        }
    }

    /// Send a message immediately.
    pub fn message(msg: Msg) -> Self {
        Command {
            inner: CommandInner::Message(msg),
        }
    }

    /// Quit the program.
    pub fn quit() -> Self {
        Command {
            inner: CommandInner::Quit,
        }
    }

    /// Run multiple commands concurrently.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.remove(0),
            _ => Command {
                inner: CommandInner::Batch(cmds),
            },
        }
    }

    /// One-shot timer: fires once after `duration`, mapping the instant to a message.
    pub fn tick(duration: Duration, map: impl FnOnce(Instant) -> Msg + Send + 'static) -> Self {
        Command {
            inner: CommandInner::Future(Box::pin(async move {
                tokio::time::sleep(duration).await;
                map(Instant::now())
            })),
        }
    }

    /// Transform the message type (for component composition).
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_with(std::sync::Arc::new(f))
    }

    fn map_with<NewMsg: Send + 'static>(
        self,
        f: std::sync::Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        match self.inner {
            CommandInner::None => Command::none(),
            CommandInner::Message(msg) => Command::message(f(msg)),
            CommandInner::Quit => Command::quit(),
            CommandInner::Future(fut) => Command {
                inner: CommandInner::Future(Box::pin(async move { f(fut.await) })),
            },
            CommandInner::Batch(cmds) => Command {
                inner: CommandInner::Batch(
                    cmds.into_iter()
                        .map(|cmd| cmd.map_with(f.clone()))
                        .collect(),
                ),
            },
        }
    }

    /// Await this command to completion and collect every message it produces.
    ///
    /// Quit commands produce nothing. Used by tests that need the result of
    /// async work without a terminal.
    pub async fn collect(self) -> Vec<Msg> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(cmd) = stack.pop() {
            match cmd.inner {
                CommandInner::None | CommandInner::Quit => {}
                CommandInner::Message(msg) => out.push(msg),
                CommandInner::Future(fut) => out.push(fut.await),
                CommandInner::Batch(cmds) => stack.extend(cmds.into_iter().rev()),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Msg {
        Loaded(usize),
        Wrapped(Box<Msg>),
    }

    #[test]
    fn batch_of_nothing_is_none() {
        let cmd: Command<Msg> = Command::batch([Command::none(), Command::none()]);
        assert!(cmd.is_none());
    }

    #[tokio::test]
    async fn perform_maps_result() {
        let cmd = Command::perform(async { 41 + 1 }, Msg::Loaded);
        assert_eq!(cmd.collect().await, vec![Msg::Loaded(42)]);
    }

    #[tokio::test]
    async fn batch_collects_in_order() {
        let cmd = Command::batch([
            Command::message(Msg::Loaded(1)),
            Command::none(),
            Command::perform(async { 2 }, Msg::Loaded),
        ]);
        assert_eq!(cmd.collect().await, vec![Msg::Loaded(1), Msg::Loaded(2)]);
    }

    #[tokio::test]
    async fn map_wraps_every_message() {
        let cmd = Command::batch([
            Command::message(Msg::Loaded(1)),
            Command::perform(async { 2 }, Msg::Loaded),
        ])
        .map(|m| Msg::Wrapped(Box::new(m)));
        assert_eq!(
            cmd.collect().await,
            vec![
                Msg::Wrapped(Box::new(Msg::Loaded(1))),
                Msg::Wrapped(Box::new(Msg::Loaded(2))),
            ]
        );
    }

    #[tokio::test]
    async fn tick_waits_for_duration() {
        let start = Instant::now();
        let cmd = Command::tick(Duration::from_millis(20), |_| Msg::Loaded(0));
        assert_eq!(cmd.collect().await, vec![Msg::Loaded(0)]);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
