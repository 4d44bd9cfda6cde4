//! Application layer for Parley
//!
//! Pure state machines and a generic runtime for the chat client, so the
//! same code that runs in the terminal can be driven deterministically in
//! tests.
//!
//! # Components
//!
//! - [`App`]: UI state machine (input, submit, token gate, connection state)
//! - [`Renderer`]: The render log and its `system` placeholder
//! - [`InputController`]: Input line, access token and token dialog
//! - [`ClientConfig`]: What distinguishes one client variant from another
//! - [`Bridge`]: Channel events to app events
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop over a Driver and a Channel

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod event;
mod input;
mod render;
mod runtime;
mod state;
mod style;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use config::{AGENT_SERVER, ClientConfig, DEFAULT_SERVER, PayloadShape, Variant};
pub use driver::Driver;
pub use event::AppEvent;
pub use input::{InputController, KeyInput, LineEditor, TokenPrompt};
pub use render::{Entry, EntryId, RenderOutcome, Renderer};
pub use runtime::Runtime;
pub use state::{ConnectionState, Message};
pub use style::{Alignment, Style, StyleSet, Tone};
