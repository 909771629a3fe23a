//! Core runtime and result-list engine for **prospect**.
//!
//! The crate has two halves.
//!
//! The **runtime** follows the Elm architecture: a [`Model`] is driven
//! through **init -> update -> view** by a [`Program`], side effects are
//! described as [`Command`]s, and reusable pieces implement [`Component`].
//! [`TestProgram`](testing::TestProgram) runs the same cycle headless.
//!
//! The **engine** is a [`WindowedList`]: a large ordered collection that
//! can be filtered by a debounced search term, windowed to the rows a
//! viewport actually shows, multi-selected by id, and displayed with
//! contact fields masked until revealed.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`window`] | Viewport → visible index range arithmetic |
//! | [`filter`] | Debounced search term, text predicate helper |
//! | [`selection`] | Id-keyed multi-selection, "select first N" parsing |
//! | [`reveal`] | Per-row reveal flags for masked fields |
//! | [`mask`] | Email / phone masking policies |
//! | [`engine`] | [`WindowedList`] tying the above together |

pub mod command;
pub mod component;
pub mod engine;
pub mod error;
pub mod event;
pub mod filter;
pub mod mask;
pub mod model;
pub mod options;
pub mod reveal;
pub mod runtime;
pub mod selection;
pub mod testing;
pub mod window;

pub use command::Command;
pub use component::Component;
pub use engine::{Item, Predicate, VisibleItem, VisibleSlice, WindowedList};
pub use error::EngineError;
pub use event::TerminalEvent;
pub use filter::{contains_ignore_case, DebounceTicket, Debouncer};
pub use mask::{mask_email, mask_phone, PhoneMask};
pub use model::Model;
pub use options::{EngineOptions, Windowing};
pub use reveal::{RevealField, RevealState};
pub use runtime::{log_to_file, Program, ProgramError, ProgramOptions};
pub use selection::{parse_count, SelectionSet};
pub use window::{ViewportState, WindowRange};

/// Run a prospect application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
