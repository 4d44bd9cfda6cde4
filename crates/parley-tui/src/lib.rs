//! Terminal UI for Parley
//!
//! A thin shell over [`parley_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`parley_app::Runtime`].
//!
//! This crate handles terminal rendering, plus an in-process demo server
//! for running the client without a backend.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod server;
pub mod terminal;
pub mod ui;

pub use parley_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
