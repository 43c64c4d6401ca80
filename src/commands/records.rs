//! Direct edit command handlers.
//!
//! These apply the same actions the assistant would, without a model call.

use super::{CliSession, DocAction, ExpenseAction, MemoryAction, RemindAction};
use aiveno::cli::render;
use aiveno::storage::StateStore;

fn warn_if_degraded(session: &CliSession) {
    if session.is_degraded() {
        eprintln!(
            "Warning: could not save to {}; the change is not persisted",
            session.store().describe()
        );
    }
}

/// Remind command.
pub fn cmd_remind(session: &mut CliSession, action: RemindAction) -> anyhow::Result<()> {
    match action {
        RemindAction::Add {
            title,
            due,
            priority,
        } => {
            let reminder = session.add_reminder(&title, &due, priority.as_deref())?;
            println!("Added {}", render::format_reminder(reminder));
        },
        RemindAction::List { all } => {
            let reminders: Vec<_> = session
                .state()
                .reminders
                .iter()
                .filter(|r| all || !r.completed)
                .collect();
            if reminders.is_empty() {
                println!("No reminders.");
            }
            for reminder in reminders {
                println!("{}", render::format_reminder(reminder));
            }
        },
        RemindAction::Done { id } => {
            let id = session.resolve_reminder(&id)?;
            let completed = session.complete_reminder(&id)?;
            let state = if completed { "done" } else { "open" };
            println!("Marked {} as {state}", render::short_id(&id));
        },
        RemindAction::Delete { id } => {
            let id = session.resolve_reminder(&id)?;
            session.delete_reminder(&id)?;
            println!("Deleted {}", render::short_id(&id));
        },
    }
    warn_if_degraded(session);
    Ok(())
}

/// Expense command.
pub fn cmd_expense(session: &mut CliSession, action: ExpenseAction) -> anyhow::Result<()> {
    match action {
        ExpenseAction::Add {
            amount,
            description,
            category,
        } => {
            let expense = session.add_expense(amount, &description, category.as_deref())?;
            println!("Logged {}", render::format_expense(expense));
        },
        ExpenseAction::List { limit } => {
            let expenses = &session.state().expenses;
            let shown = limit.map_or(expenses.as_slice(), |n| session.state().recent_expenses(n));
            if shown.is_empty() {
                println!("No expenses.");
            }
            for expense in shown {
                println!("{}", render::format_expense(expense));
            }
        },
    }
    warn_if_degraded(session);
    Ok(())
}

/// Doc command.
pub fn cmd_doc(session: &mut CliSession, action: DocAction) -> anyhow::Result<()> {
    match action {
        DocAction::Add {
            name,
            expires,
            kind,
        } => {
            let document = session.add_document(&name, &expires, kind.as_deref())?;
            println!("Filed {}", render::format_document(document));
        },
        DocAction::List => {
            let documents = &session.state().documents;
            if documents.is_empty() {
                println!("No documents.");
            }
            for document in render::documents_by_expiry(documents) {
                println!("{}", render::format_document(document));
            }
        },
    }
    warn_if_degraded(session);
    Ok(())
}

/// Memory command.
pub fn cmd_memory(session: &mut CliSession, action: MemoryAction) -> anyhow::Result<()> {
    match action {
        MemoryAction::Show => print!("{}", render::format_memory(&session.state().memory)),
        MemoryAction::Add { fact } => {
            session.remember(&fact)?;
            println!("Noted.");
        },
    }
    warn_if_degraded(session);
    Ok(())
}
