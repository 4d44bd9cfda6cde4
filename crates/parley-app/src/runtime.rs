//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: Channel events to app events
//! - [`Driver`]: Platform-specific input and drawing
//! - [`Channel`]: Connection to the server

use parley_client::Channel;

use crate::{App, AppAction, AppEvent, Bridge, Driver};

/// Generic runtime that orchestrates App, Bridge, Driver and Channel.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `C`: Channel to the server
pub struct Runtime<D, C>
where
    D: Driver,
    C: Channel,
{
    driver: D,
    channel: C,
    app: App,
    bridge: Bridge,
}

impl<D, C> Runtime<D, C>
where
    D: Driver,
    C: Channel,
{
    /// Create a new runtime.
    pub fn new(driver: D, channel: C, app: App) -> Self {
        let bridge = Bridge::new(app.config().inbound_event.clone());
        Self { driver, channel, app, bridge }
    }

    /// Run the main event loop.
    ///
    /// Each cycle:
    /// 1. Polls the driver for one input event
    /// 2. Drains ready channel events through the bridge
    /// 3. Executes the resulting actions (render, emit, quit)
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }

        self.channel.close();
        self.driver.stop();
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await? {
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        while let Some(channel_event) = self.channel.recv().await {
            for event in self.bridge.handle_channel_event(channel_event) {
                let actions = self.app.handle(event);
                if self.process_actions(actions).await? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                AppAction::Render => self.driver.render(&self.app)?,
                AppAction::Quit => return Ok(true),
                AppAction::Emit(emit) => {
                    tracing::debug!(event = %emit.event, "emitting");
                    if let Err(e) = self.channel.emit(emit).await {
                        tracing::warn!(error = %e, "emit failed");
                        let follow_up = self.app.handle(AppEvent::Error { message: e.to_string() });
                        if follow_up.contains(&AppAction::Render) {
                            self.driver.render(&self.app)?;
                        }
                    }
                },
            }
        }
        Ok(false)
    }
}
