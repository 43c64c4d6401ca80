//! # Aiveno
//!
//! A personal life assistant that turns conversation into state changes.
//!
//! Aiveno sends what the user says, together with a summary of what it
//! already knows, to a hosted language model. The model either answers in
//! plain text or asks for structured actions (add a reminder, log an
//! expense, remember a fact, file a document) which are validated and
//! applied to locally persisted state.
//!
//! ## Layout
//!
//! - [`models`]: reminders, expenses, documents, user memory and the typed
//!   [`Action`] union
//! - [`services`]: the pure reducer, the conversation orchestrator, the
//!   session container and the dashboard summary
//! - [`llm`]: the [`ChatModel`] seam and hosted model clients
//! - [`storage`]: whole-state snapshot persistence
//! - [`config`], [`observability`], [`cli`]: configuration, logging and
//!   terminal helpers for the `aiveno` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use aiveno::{Orchestrator, Session};
//! use aiveno::llm::GeminiClient;
//! use aiveno::storage::FileStateStore;
//!
//! let mut session = Session::open(FileStateStore::new(data_dir));
//! let orchestrator = Orchestrator::new(GeminiClient::new());
//! let turn = session.send(&orchestrator, "Remind me to pay rent on the 1st")?;
//! println!("{}", turn.reply);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::{AivenoConfig, LlmConfig};
pub use llm::ChatModel;
pub use models::{
    Action, ActionRejection, ActionRequest, AppState, Category, Document, EntityId, Expense,
    Priority, Reminder, UserMemory,
};
pub use services::{Dashboard, Orchestrator, Session, Turn, TurnOutcome, apply, reduce};
pub use storage::{FileStateStore, MemoryStateStore, StateStore};

/// Error type for aiveno operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Blank utterances, malformed config values, bad CLI arguments |
/// | `OperationFailed` | Model requests, response parsing, file I/O, serialization |
/// | `Busy` | A conversation turn is started while another is in flight |
/// | `ActionRejected` | A directly issued action fails validation |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - The remote model cannot be reached, times out, or answers with an
    ///   error status
    /// - A model response cannot be decoded
    /// - The state file cannot be read, written, or (de)serialized
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// Another conversation turn is still awaiting the model.
    #[error("a conversation turn is already in progress")]
    Busy,

    /// An action failed validation and was not applied.
    #[error("action rejected: {0}")]
    ActionRejected(#[from] ActionRejection),
}

/// Result type alias for aiveno operations.
pub type Result<T> = std::result::Result<T, Error>;
