//! **prospect**: browse large people and company lists in the terminal.
//!
//! This crate ties the engine and components together into a dashboard:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`records`] | `Person` / `Company` rows and sample data |
//! | [`gateway`] | [`DataGateway`](gateway::DataGateway) trait and in-memory mock |
//! | [`app`] | The [`Dashboard`](app::Dashboard) model |
//! | [`logging`] | File-backed `tracing` setup |
//!
//! The engine ([`WindowedList`]) and runtime are re-exported from
//! `prospect-core`; components live under [`widgets`].

pub use prospect_core::*;

pub mod widgets {
    pub use prospect_widgets::*;
}

pub mod app;
pub mod gateway;
pub mod logging;
pub mod records;
