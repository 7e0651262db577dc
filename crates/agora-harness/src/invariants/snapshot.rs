//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use agora_app::{ClientView, SessionController, SessionView};
use agora_core::{Audit, ChatService, Environment, Snapshot};

/// Snapshot of the entire system state.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Log and ledger, taken under one lock. `None` when only session views
    /// were captured.
    pub audit: Option<Audit>,
    /// Presence counter value. `None` when not captured.
    pub presence: Option<usize>,
    /// Per-session state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients, no store).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the shared store plus every live session.
    ///
    /// Sessions that already disconnected are skipped.
    pub fn capture<E: Environment>(
        service: &ChatService<E>,
        sessions: &[SessionController<E>],
    ) -> Self {
        Self {
            audit: Some(service.store().audit()),
            presence: Some(service.presence().value()),
            clients: sessions
                .iter()
                .filter(|s| s.is_connected())
                .map(ClientSnapshot::from_session)
                .collect(),
        }
    }

    /// Snapshot with a single client, taken from a render view.
    pub fn from_view(view: &SessionView<'_>) -> Self {
        Self { clients: vec![ClientSnapshot::from_view(view)], ..Self::default() }
    }
}

/// Snapshot of a single session's observable state.
#[derive(Debug, Clone)]
pub struct ClientSnapshot {
    /// Display name.
    pub name: String,
    /// Mode, selection and last seen count.
    pub client: ClientView,
    /// The session's copy of the log.
    pub snapshot: Snapshot,
}

impl ClientSnapshot {
    /// Capture a session.
    pub fn from_session<E: Environment>(session: &SessionController<E>) -> Self {
        Self::from_view(&session.view())
    }

    /// Capture a render view.
    pub fn from_view(view: &SessionView<'_>) -> Self {
        Self {
            name: view.identity.display_name().to_string(),
            client: view.client.clone(),
            snapshot: view.snapshot.clone(),
        }
    }
}
