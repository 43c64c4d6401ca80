//! Business logic services.
//!
//! The reducer is the only code that changes state. The orchestrator turns
//! utterances into actions, the session applies and persists them, and the
//! dashboard summarises the result.

mod context;
mod dashboard;
mod orchestrator;
mod reducer;
mod session;

pub use context::build_context;
pub use dashboard::Dashboard;
pub use orchestrator::{
    ACKNOWLEDGEMENT_REPLY, FAILURE_REPLY, FALLBACK_REPLY, Orchestrator, REJECTED_REPLY, Turn,
    TurnOutcome, TurnPhase,
};
pub use reducer::{apply, reduce};
pub use session::Session;
