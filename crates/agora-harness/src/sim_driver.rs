//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the line transport but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`agora_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::sync::Arc;

use agora_app::{ClientView, Driver, Mode, SessionEvent, SessionView};
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::invariants::{InvariantRegistry, SystemSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// What one render call saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Mode, selection and last seen count.
    pub client: ClientView,
    /// Message contents in log order.
    pub contents: Vec<String>,
    /// Content of the highlighted message, in selection mode.
    pub selected: Option<String>,
    /// Presence at render time.
    pub presence: usize,
    /// Notice line.
    pub notice: Option<String>,
    /// Viewport.
    pub size: (u16, u16),
}

impl RenderedFrame {
    fn from_view(view: &SessionView<'_>) -> Self {
        Self {
            client: view.client.clone(),
            contents: view.snapshot.iter().map(|m| m.content.clone()).collect(),
            selected: view.selected().map(|m| m.content.clone()),
            presence: view.presence,
            notice: view.notice.map(str::to_string),
            size: (view.terminal.width, view.terminal.height),
        }
    }
}

/// Shared state observable from the test after the driver moved into a
/// runtime.
#[derive(Default)]
struct SharedState {
    frames: Vec<RenderedFrame>,
    modes_polled: Vec<Mode>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Events come from a [`SimHandle`]; dropping every handle closes the input
/// side, which the runtime treats as a disconnect.
pub struct SimDriver {
    events: mpsc::UnboundedReceiver<SessionEvent>,
    state: Arc<Mutex<SharedState>>,
    invariants: Option<InvariantRegistry>,
}

/// Test-side handle to a [`SimDriver`].
#[derive(Clone)]
pub struct SimHandle {
    events: mpsc::UnboundedSender<SessionEvent>,
    state: Arc<Mutex<SharedState>>,
}

impl SimDriver {
    /// Create a driver and its handle.
    pub fn new() -> (Self, SimHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SharedState::default()));
        let driver = Self { events: rx, state: Arc::clone(&state), invariants: None };
        (driver, SimHandle { events: tx, state })
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }
}

impl SimHandle {
    /// Inject a session event. Returns `false` if the driver is gone.
    pub fn inject(&self, event: SessionEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// All frames rendered so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.state.lock().frames.clone()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.state.lock().frames.last().cloned()
    }

    /// Number of frames rendered so far.
    pub fn render_count(&self) -> usize {
        self.state.lock().frames.len()
    }

    /// Modes the runtime passed to `next_event`, in order.
    pub fn modes_polled(&self) -> Vec<Mode> {
        self.state.lock().modes_polled.clone()
    }

    /// Whether the runtime called `stop`.
    pub fn is_stopped(&self) -> bool {
        self.state.lock().stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn next_event(&mut self, mode: Mode) -> Result<Option<SessionEvent>, Self::Error> {
        self.state.lock().modes_polled.push(mode);
        Ok(self.events.recv().await)
    }

    async fn render(&mut self, view: &SessionView<'_>) -> Result<(), Self::Error> {
        if let Some(registry) = &self.invariants {
            registry
                .check_all(&SystemSnapshot::from_view(view))
                .map_err(|violations| SimDriverError(format!("{violations:?}")))?;
        }

        self.state.lock().frames.push(RenderedFrame::from_view(view));
        Ok(())
    }

    fn stop(&mut self) {
        self.state.lock().stopped = true;
        self.events.close();
    }
}
