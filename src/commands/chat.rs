//! Conversation command handlers.

use super::CliSession;
use aiveno::cli::build_chat_model;
use aiveno::config::AivenoConfig;
use aiveno::models::GREETING;
use aiveno::{Error, Orchestrator};
use std::io::{self, BufRead, Write};

const DEGRADED_NOTICE: &str = "(couldn't save to disk; changes are kept for this session only)";

fn orchestrator(config: &AivenoConfig) -> Orchestrator {
    let orchestrator = Orchestrator::from_boxed(build_chat_model(&config.llm));
    tracing::debug!(provider = orchestrator.provider_name(), "Chat model ready");
    orchestrator
}

/// Ask command: one conversation turn.
pub fn cmd_ask(config: &AivenoConfig, session: &mut CliSession, message: &str) -> anyhow::Result<()> {
    let orchestrator = orchestrator(config);
    let turn = session.send(&orchestrator, message)?;
    println!("{}", turn.reply);
    for rejection in &turn.rejected {
        tracing::debug!(%rejection, "Action skipped");
    }
    if session.is_degraded() {
        eprintln!("{DEGRADED_NOTICE}");
    }
    Ok(())
}

/// Chat command: read-eval loop until EOF or `exit`.
pub fn cmd_chat(config: &AivenoConfig, session: &mut CliSession) -> anyhow::Result<()> {
    let orchestrator = orchestrator(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Aiveno: {GREETING}");
    println!("(type 'exit' to leave)");

    loop {
        print!("You: ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();
        if matches!(line, "exit" | "quit" | "bye") {
            break;
        }

        match session.send(&orchestrator, line) {
            Ok(turn) => {
                println!("Aiveno: {}", turn.reply);
                if session.is_degraded() {
                    eprintln!("{DEGRADED_NOTICE}");
                }
            },
            Err(Error::InvalidInput(_)) => {},
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
