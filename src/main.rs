//! Binary entry point for aiveno.
//!
//! This binary provides the CLI interface for the Aiveno assistant.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

mod commands;

use aiveno::config::AivenoConfig;
use aiveno::observability::{self, LoggingConfig};
use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{DocAction, ExpenseAction, MemoryAction, RemindAction};
use std::path::PathBuf;
use std::process::ExitCode;

/// Aiveno - a personal life assistant for reminders, expenses, and documents.
#[derive(Parser)]
#[command(name = "aiveno")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "AIVENO_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Keep state in memory only; nothing is read from or written to disk.
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start an interactive conversation.
    Chat,

    /// Send one message and print the reply.
    Ask {
        /// What to say.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Manage reminders.
    Remind {
        /// Reminder subcommand.
        #[command(subcommand)]
        action: RemindAction,
    },

    /// Manage expenses.
    Expense {
        /// Expense subcommand.
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Manage important documents.
    Doc {
        /// Document subcommand.
        #[command(subcommand)]
        action: DocAction,
    },

    /// Show or extend what Aiveno remembers about you.
    Memory {
        /// Memory subcommand.
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Show the dashboard summary.
    Status,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match AivenoConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let logging = LoggingConfig::from_settings(Some(&config.logging), cli.verbose);
    if let Err(e) = observability::init(&logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: AivenoConfig) -> anyhow::Result<()> {
    if let Commands::Config { show } = cli.command {
        commands::cmd_config(&config, show);
        return Ok(());
    }

    let mut session = commands::open_session(&config, cli.ephemeral)
        .context("failed to open session")?;

    match cli.command {
        Commands::Chat => commands::cmd_chat(&config, &mut session),
        Commands::Ask { message } => commands::cmd_ask(&config, &mut session, &message.join(" ")),
        Commands::Remind { action } => commands::cmd_remind(&mut session, action),
        Commands::Expense { action } => commands::cmd_expense(&mut session, action),
        Commands::Doc { action } => commands::cmd_doc(&mut session, action),
        Commands::Memory { action } => commands::cmd_memory(&mut session, action),
        Commands::Status => {
            commands::cmd_status(&session);
            Ok(())
        },
        Commands::Config { .. } => Ok(()),
    }
}
