//! Application layer for Agora
//!
//! Pure per-connection state machine plus a generic runtime, so the same
//! orchestration runs over a real socket and in deterministic simulation.
//!
//! # Components
//!
//! - [`SessionController`]: interaction state machine (input vs. selection
//!   mode, navigation, vote dispatch)
//! - [`InputState`]: line editor that turns raw [`KeyInput`] into
//!   [`SessionEvent`]s
//! - [`Driver`]: trait for platform-specific I/O
//! - [`RefreshScheduler`]: periodic wake-up that polls the shared log
//! - [`Runtime`]: event loop tying a driver, a scheduler and a session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod driver;
mod event;
mod input;
mod runtime;
mod scheduler;
mod session;
mod view;

pub use action::SessionAction;
pub use driver::Driver;
pub use event::SessionEvent;
pub use input::{InputState, KeyInput, KeyOutcome};
pub use runtime::Runtime;
pub use scheduler::RefreshScheduler;
pub use session::SessionController;
pub use view::{ClientView, Mode, SessionView, TerminalInfo};
