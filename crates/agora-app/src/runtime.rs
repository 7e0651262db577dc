//! Generic runtime for session orchestration.
//!
//! The Runtime drives one connection's event loop, coordinating between:
//! - [`SessionController`]: interaction state machine
//! - [`RefreshScheduler`]: periodic refresh ticks
//! - [`Driver`]: platform-specific I/O

use agora_core::Environment;

use crate::{Driver, RefreshScheduler, SessionAction, SessionController, SessionEvent};

/// Generic runtime that orchestrates a session and its driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    session: SessionController<E>,
    scheduler: RefreshScheduler<E>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a runtime ticking at the service's configured refresh interval.
    pub fn new(driver: D, session: SessionController<E>) -> Self {
        let service = session.service();
        let scheduler =
            RefreshScheduler::new(service.env().clone(), service.config().refresh_interval);
        Self { driver, session, scheduler }
    }

    /// Run the event loop until the session quits.
    ///
    /// Renders once, then races driver input against refresh ticks. Ticks
    /// win ties. A closed input side is treated as a disconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error. The session is
    /// dropped either way, which releases its presence slot.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.event_loop().await;
        if let Err(e) = &result {
            tracing::debug!(user = %self.session.identity(), error = %e, "driver failed");
        }
        self.driver.stop();
        result
    }

    async fn event_loop(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.session.view()).await?;

        loop {
            let mode = self.session.mode();
            let event = tokio::select! {
                biased;
                () = self.scheduler.tick() => SessionEvent::RefreshTick,
                event = self.driver.next_event(mode) => event?.unwrap_or(SessionEvent::Disconnect),
            };

            let actions = self.session.handle(event);
            if self.process_actions(actions).await? {
                return Ok(());
            }
        }
    }

    /// Execute actions. Returns `true` if the session quit.
    async fn process_actions(&mut self, actions: Vec<SessionAction>) -> Result<bool, D::Error> {
        for action in actions {
            match action {
                SessionAction::Render => self.driver.render(&self.session.view()).await?,
                SessionAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }
}
