use crate::command::{Command, CommandInner};
use crate::event::TerminalEvent;
use crate::model::Model;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, EventStream};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
};
use crossterm::{cursor, execute};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration options for a [`Program`].
///
/// Use struct update syntax to override only the options you need:
///
/// ```rust,ignore
/// let opts = ProgramOptions {
///     fps: 30,
///     title: Some("prospect".into()),
///     ..ProgramOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ProgramOptions {
    /// Target frames per second (default: 60, max: 120).
    pub fps: u32,
    /// Start in alternate screen (default: true).
    pub alt_screen: bool,
    /// Capture mouse events so the wheel scrolls result lists (default: true).
    pub mouse_capture: bool,
    /// Set terminal title.
    pub title: Option<String>,
    /// Whether to restore the terminal from a panic hook (default: true).
    pub catch_panics: bool,
}

impl Default for ProgramOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            alt_screen: true,
            mouse_capture: true,
            title: None,
            catch_panics: true,
        }
    }
}

impl ProgramOptions {
    fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.clamp(1, 120) as f64)
    }
}

/// Most queued messages handled per wakeup before input is polled again.
const MAX_BATCH: usize = 128;

/// Wires a [`Model`] to the terminal and drives its init/update/view loop
/// until the model returns [`Command::quit()`] or the user hits Ctrl+C.
///
/// Renders are coalesced: any number of messages between two frame ticks
/// produce a single redraw.
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), ProgramError> {
///     let model = Program::<Dashboard>::new(flags)?.run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<M: Model> {
    model: M,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    // Dropped after `terminal`, restoring the screen last.
    _guard: TerminalGuard,
    msg_tx: mpsc::UnboundedSender<M::Message>,
    msg_rx: mpsc::UnboundedReceiver<M::Message>,
    options: ProgramOptions,
    dirty: bool,
    quit: bool,
}

impl<M: Model> Program<M> {
    /// Create a new program with default options.
    pub fn new(flags: M::Flags) -> Result<Self, ProgramError> {
        Self::with_options(flags, ProgramOptions::default())
    }

    /// Create a new program with custom options.
    ///
    /// Returns an error if terminal initialization fails.
    pub fn with_options(flags: M::Flags, options: ProgramOptions) -> Result<Self, ProgramError> {
        let guard = TerminalGuard::enter(&options)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (model, init_cmd) = M::init(flags);

        let mut program = Self {
            model,
            terminal,
            _guard: guard,
            msg_tx,
            msg_rx,
            options,
            dirty: true,
            quit: false,
        };
        program.dispatch(init_cmd);
        info!("program initialized");
        Ok(program)
    }

    /// Get a sender for external message injection.
    pub fn sender(&self) -> mpsc::UnboundedSender<M::Message> {
        self.msg_tx.clone()
    }

    /// Run until quit. Returns the final model; the terminal is restored
    /// when the program is dropped.
    pub async fn run(mut self) -> Result<M, ProgramError> {
        let outcome = self.event_loop().await;
        info!("shutting down");
        outcome.map(|()| self.model)
    }

    async fn event_loop(&mut self) -> Result<(), ProgramError> {
        self.draw()?;

        let mut frames = tokio::time::interval(self.options.frame_period());
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut input = EventStream::new();

        while !self.quit {
            tokio::select! {
                biased;

                _ = tokio::signal::ctrl_c() => {
                    debug!("ctrl+c signal");
                    break;
                }

                Some(event) = input.next() => self.on_input(event?),

                Some(msg) = self.msg_rx.recv() => {
                    self.update(msg);
                    self.drain_queue();
                }

                _ = frames.tick() => {
                    if self.dirty {
                        self.draw()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn on_input(&mut self, event: crossterm::event::Event) {
        let Some(event) = TerminalEvent::from_crossterm(event) else {
            return;
        };
        if let TerminalEvent::Resize(cols, rows) = event {
            debug!(cols, rows, "resize");
            self.dirty = true;
        }
        if let Some(msg) = self.model.handle_event(event) {
            self.update(msg);
        }
    }

    fn drain_queue(&mut self) {
        let started = Instant::now();
        for _ in 0..MAX_BATCH {
            if started.elapsed() > Duration::from_millis(1) {
                break;
            }
            match self.msg_rx.try_recv() {
                Ok(msg) => self.update(msg),
                Err(_) => break,
            }
        }
    }

    fn update(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.dispatch(cmd);
        self.dirty = true;
    }

    fn dispatch(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Quit => self.quit = true,
            CommandInner::Message(msg) => {
                let _ = self.msg_tx.send(msg);
            }
            CommandInner::Future(fut) => {
                let tx = self.msg_tx.clone();
                tokio::spawn(async move {
                    if tx.send(fut.await).is_err() {
                        warn!("message dropped after shutdown");
                    }
                });
            }
            CommandInner::Batch(cmds) => cmds.into_iter().for_each(|cmd| self.dispatch(cmd)),
        }
    }

    fn draw(&mut self) -> Result<(), ProgramError> {
        let model = &self.model;
        self.terminal.draw(|frame| model.view(frame))?;
        self.dirty = false;
        Ok(())
    }
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the
/// guard. Dropping it (or panicking, with `catch_panics`) puts the terminal
/// back.
struct TerminalGuard {
    alt_screen: bool,
}

impl TerminalGuard {
    fn enter(options: &ProgramOptions) -> Result<Self, std::io::Error> {
        if options.catch_panics {
            install_panic_hook(options.alt_screen);
        }
        enable_raw_mode()?;
        let guard = Self {
            alt_screen: options.alt_screen,
        };

        let mut out = stdout();
        if options.alt_screen {
            execute!(out, EnterAlternateScreen)?;
        }
        if options.mouse_capture {
            execute!(out, EnableMouseCapture)?;
        }
        if let Some(title) = &options.title {
            execute!(out, SetTitle(title))?;
        }
        execute!(out, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = restore(self.alt_screen) {
            warn!(%err, "terminal restore failed");
        }
    }
}

fn install_panic_hook(alt_screen: bool) {
    static HOOK: std::sync::Once = std::sync::Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = restore(alt_screen);
            previous(info);
        }));
    });
}

fn restore(alt_screen: bool) -> Result<(), std::io::Error> {
    // Every step runs even if an earlier one failed.
    let raw = disable_raw_mode();
    let mut out = stdout();
    execute!(out, DisableMouseCapture).ok();
    execute!(out, cursor::Show).ok();
    if alt_screen {
        execute!(out, LeaveAlternateScreen).ok();
    }
    raw
}

/// Open a log file in append mode.
///
/// The terminal owns stdout while a [`Program`] runs, so diagnostics go to
/// a file instead; hand the returned handle to a `tracing` writer.
pub fn log_to_file(path: impl AsRef<std::path::Path>) -> Result<std::fs::File, std::io::Error> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn log_to_file_appends() {
        let path = std::env::temp_dir().join(format!("prospect-log-{}.log", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "first").unwrap();
        }
        {
            let mut f = log_to_file(&path).unwrap();
            writeln!(f, "second").unwrap();
        }
        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first\nsecond\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn default_options() {
        let opts = ProgramOptions::default();
        assert_eq!(opts.fps, 60);
        assert!(opts.alt_screen);
        assert!(opts.mouse_capture);
        assert!(opts.catch_panics);
    }

    #[test]
    fn frame_period_is_clamped() {
        let period = |fps| ProgramOptions { fps, ..ProgramOptions::default() }.frame_period();
        assert_eq!(period(0), Duration::from_secs(1));
        assert_eq!(period(1000), period(120));
    }
}
