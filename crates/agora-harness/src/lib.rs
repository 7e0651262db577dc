//! Deterministic simulation harness for Agora session testing.
//!
//! Virtual-time implementations of [`agora_core::Environment`] and
//! [`agora_app::Driver`], so the production [`agora_app::Runtime`] can be
//! driven by scripted input on tokio's paused clock. [`StepEnv`] serves
//! synchronous tests that only need distinct timestamps.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the chat
//! invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod step_env;

pub use invariants::{
    ClientSnapshot, CountersMatchLedger, Invariant, InvariantRegistry, InvariantResult,
    LogMonotonic, PresenceMatchesSessions, SelectionInBounds, SelectionOnVotable, SystemSnapshot,
    Violation,
};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, SimHandle};
pub use sim_env::SimEnv;
pub use step_env::StepEnv;
