//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific
//! front-ends. Each front-end implements the trait to provide input and
//! drawing, while the generic [`crate::Runtime`] handles all orchestration.
//! The network side is abstracted separately by
//! [`parley_client::Channel`].

use std::future::Future;

use crate::{App, AppEvent};

/// Abstracts user-facing I/O for the application runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm for terminal events, ratatui for drawing
/// - **Tests**: scripted key sequences, renders recorded in memory
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait briefly for the next input event.
    ///
    /// Returns `None` if nothing arrived within the driver's poll interval,
    /// so the runtime can service the channel.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Release resources. Called once when the runtime exits.
    fn stop(&mut self);
}
