//! Session state machine.
//!
//! This module defines the [`SessionController`], one per connection. It owns
//! the interaction state (mode, selection, last observed log length) and a
//! snapshot of the log, and translates [`SessionEvent`]s into calls on the
//! shared [`ChatService`].
//!
//! The controller never renders anything. Each event yields a list of
//! [`SessionAction`]s; the runtime renders [`SessionController::view`] when
//! asked to.
//!
//! # States
//!
//! `Input` (initial) and `Selection`, toggled by [`SessionEvent::ToggleMode`].
//! After [`SessionEvent::Disconnect`] the controller ignores every event.

use std::sync::Arc;

use agora_core::{ChatError, ChatService, Direction, Environment, Identity, Snapshot};

use crate::{ClientView, Mode, SessionAction, SessionEvent, SessionView, TerminalInfo};

/// Per-connection interaction state machine.
pub struct SessionController<E: Environment> {
    service: Arc<ChatService<E>>,
    identity: Identity,
    client: ClientView,
    snapshot: Snapshot,
    terminal: TerminalInfo,
    /// Transient notice from the last failed operation. `None` if no notice.
    notice: Option<String>,
    /// Presence value at the last render, to re-render when it moves.
    last_seen_presence: usize,
    connected: bool,
}

impl<E: Environment> SessionController<E> {
    /// Register a connection with the service and seed the view.
    ///
    /// Announces the join (if enabled) and bumps presence before taking the
    /// first snapshot, so the new client sees its own join message.
    pub fn connect(service: Arc<ChatService<E>>, identity: Identity, terminal: TerminalInfo) -> Self {
        let online = service.connect(&identity);
        let snapshot = service.store().snapshot();
        let client = ClientView {
            mode: Mode::Input,
            selected_index: snapshot.latest_votable(),
            last_seen_count: snapshot.len(),
        };

        Self {
            service,
            identity,
            client,
            snapshot,
            terminal,
            notice: None,
            last_seen_presence: online,
            connected: true,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionAction> {
        if !self.connected {
            return vec![];
        }

        tracing::trace!(user = %self.identity, ?event, mode = ?self.client.mode, "session event");

        match event {
            SessionEvent::ToggleMode => self.toggle_mode(),
            SessionEvent::NavigateUp => self.navigate(Snapshot::prev_votable),
            SessionEvent::NavigateDown => self.navigate(Snapshot::next_votable),
            SessionEvent::Upvote => self.vote(Direction::Up),
            SessionEvent::Downvote => self.vote(Direction::Down),
            SessionEvent::Submit(text) => self.submit(&text),
            SessionEvent::RefreshTick => self.refresh_tick(),
            SessionEvent::Resize(width, height) => {
                self.terminal.width = width;
                self.terminal.height = height;
                vec![SessionAction::Render]
            },
            SessionEvent::Disconnect => {
                self.disconnect();
                vec![SessionAction::Quit]
            },
        }
    }

    fn toggle_mode(&mut self) -> Vec<SessionAction> {
        self.client.mode = match self.client.mode {
            Mode::Input => {
                self.client.selected_index = self.snapshot.latest_votable();
                Mode::Selection
            },
            Mode::Selection => Mode::Input,
        };
        self.notice = None;
        tracing::debug!(user = %self.identity, mode = ?self.client.mode, "mode toggled");
        vec![SessionAction::Render]
    }

    /// Move the selection with `step`, which returns the neighbouring votable
    /// index or `None` at the boundary.
    fn navigate(&mut self, step: fn(&Snapshot, usize) -> Option<usize>) -> Vec<SessionAction> {
        if self.client.mode != Mode::Selection {
            return vec![];
        }
        let Some(current) = self.client.selected_index else {
            return vec![];
        };

        match step(&self.snapshot, current) {
            Some(next) => {
                self.client.selected_index = Some(next);
                vec![SessionAction::Render]
            },
            None => vec![],
        }
    }

    fn vote(&mut self, direction: Direction) -> Vec<SessionAction> {
        if self.client.mode != Mode::Selection {
            return vec![];
        }
        let Some(id) = self.client.selected_index.and_then(|i| self.snapshot.votable_id(i)) else {
            return vec![];
        };

        match self.service.vote(&self.identity, &id, direction) {
            Ok(_) => {
                self.notice = None;
                // Counters changed; selection and last_seen_count stay put
                self.snapshot = self.service.store().snapshot();
            },
            Err(err) => self.report(&err),
        }
        vec![SessionAction::Render]
    }

    fn submit(&mut self, text: &str) -> Vec<SessionAction> {
        if self.client.mode != Mode::Input {
            return vec![];
        }
        let text = text.trim();
        if text.is_empty() {
            return vec![];
        }

        match self.service.post(&self.identity, text) {
            Ok(_) => {
                self.notice = None;
                self.snapshot = self.service.store().snapshot();
                self.client.last_seen_count = self.snapshot.len();
            },
            Err(err) => self.report(&err),
        }
        vec![SessionAction::Render]
    }

    fn refresh_tick(&mut self) -> Vec<SessionAction> {
        let mut changed = false;

        if self.service.store().len() != self.client.last_seen_count {
            self.snapshot = self.service.store().snapshot();
            self.client.last_seen_count = self.snapshot.len();
            // Any new message, from anyone, pulls the selection to the newest
            self.client.selected_index = self.snapshot.latest_votable();
            changed = true;
        }

        let presence = self.service.presence().value();
        if presence != self.last_seen_presence {
            self.last_seen_presence = presence;
            changed = true;
        }

        if changed { vec![SessionAction::Render] } else { vec![] }
    }

    fn report(&mut self, err: &ChatError) {
        if err.is_unexpected() {
            tracing::warn!(user = %self.identity, %err, "unexpected session error");
        } else {
            tracing::debug!(user = %self.identity, %err, "request rejected");
        }
        self.notice = Some(err.to_string());
    }

    fn disconnect(&mut self) {
        if std::mem::replace(&mut self.connected, false) {
            self.service.disconnect(&self.identity);
        }
    }

    /// Render data for the current state.
    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            identity: &self.identity,
            snapshot: &self.snapshot,
            client: &self.client,
            presence: self.service.presence().value(),
            notice: self.notice.as_deref(),
            terminal: &self.terminal,
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.client.mode
    }

    /// Mode, selection and last observed log length.
    pub fn client(&self) -> &ClientView {
        &self.client
    }

    /// The session's copy of the log.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Identity this session acts as.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Transient notice. `None` if the last operation succeeded.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Terminal type and viewport.
    pub fn terminal(&self) -> &TerminalInfo {
        &self.terminal
    }

    /// Whether the session has not seen [`SessionEvent::Disconnect`] yet.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The shared service.
    pub fn service(&self) -> &Arc<ChatService<E>> {
        &self.service
    }
}

impl<E: Environment> Drop for SessionController<E> {
    fn drop(&mut self) {
        // Transport went away without a Disconnect event
        self.disconnect();
    }
}
