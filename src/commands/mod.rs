//! Command handlers module.
//!
//! - `chat.rs`: conversation commands (chat, ask)
//! - `records.rs`: direct edits (remind, expense, doc, memory)
//! - `config.rs`: configuration display and dashboard status

mod chat;
mod config;
mod records;

use aiveno::Session;
use aiveno::config::AivenoConfig;
use aiveno::storage::{FileStateStore, MemoryStateStore, StateStore};
use clap::Subcommand;

pub use chat::{cmd_ask, cmd_chat};
pub use config::{cmd_config, cmd_status};
pub use records::{cmd_doc, cmd_expense, cmd_memory, cmd_remind};

/// Session over whichever store the command line selected.
pub type CliSession = Session<Box<dyn StateStore>>;

/// Opens the session, on disk unless `ephemeral` is set.
pub fn open_session(config: &AivenoConfig, ephemeral: bool) -> anyhow::Result<CliSession> {
    let store: Box<dyn StateStore> = if ephemeral {
        Box::new(MemoryStateStore::new())
    } else {
        Box::new(FileStateStore::new(config.resolved_data_dir()?))
    };
    tracing::debug!(store = %store.describe(), "Opening session");
    Ok(Session::open(store))
}

/// Reminder subcommands.
#[derive(Subcommand)]
pub enum RemindAction {
    /// Add a reminder.
    Add {
        /// What to be reminded of.
        title: String,

        /// When it is due, e.g. "2024-05-01 10:00".
        #[arg(short, long)]
        due: String,

        /// Priority: low, medium, or high.
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// List reminders.
    List {
        /// Include completed reminders.
        #[arg(short, long)]
        all: bool,
    },

    /// Toggle a reminder between open and done.
    Done {
        /// Reminder ID or unique prefix.
        id: String,
    },

    /// Delete a reminder.
    Delete {
        /// Reminder ID or unique prefix.
        id: String,
    },
}

/// Expense subcommands.
#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Log an expense.
    Add {
        /// Amount in rupees.
        amount: f64,

        /// What the money was spent on.
        description: String,

        /// Category: food, transport, bills, shopping, health,
        /// entertainment, or other.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List expenses, most recent last.
    List {
        /// Maximum number of expenses to show.
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

/// Document subcommands.
#[derive(Subcommand)]
pub enum DocAction {
    /// File a document.
    Add {
        /// Document name.
        name: String,

        /// Expiry date, e.g. "2030-01-15".
        #[arg(short, long)]
        expires: String,

        /// Document type, e.g. "ID" or "Insurance".
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// List documents.
    List,
}

/// Memory subcommands.
#[derive(Subcommand)]
pub enum MemoryAction {
    /// Show what Aiveno knows about you.
    Show,

    /// Add a key fact.
    Add {
        /// The fact to remember.
        fact: String,
    },
}
