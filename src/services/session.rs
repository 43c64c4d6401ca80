//! Session: the application's root state container.
//!
//! A [`Session`] owns the current [`AppState`], the store that persists it
//! and the chat transcript. Every change goes through [`Session::dispatch`],
//! which runs the reducer and then saves a fresh snapshot. A failing store
//! never loses the in-memory change; the session keeps working and reports
//! itself as degraded until a save succeeds again.

use crate::models::{Action, AppState, ChatMessage, Document, EntityId, Expense, GREETING, Reminder};
use crate::services::orchestrator::{Orchestrator, Turn};
use crate::services::reducer::reduce;
use crate::storage::StateStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// State, store and transcript for one user.
pub struct Session<S: StateStore> {
    state: AppState,
    store: S,
    transcript: Vec<ChatMessage>,
    degraded: bool,
}

impl<S: StateStore> Session<S> {
    /// Opens a session, hydrating state from `store`.
    ///
    /// A missing snapshot yields the default state. An unreadable or corrupt
    /// snapshot is logged and also yields the default state; it is
    /// overwritten by the next successful save.
    pub fn open(store: S) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::debug!(store = %store.describe(), "No stored state; starting fresh");
                AppState::default()
            },
            Err(e) => {
                tracing::warn!(
                    store = %store.describe(),
                    error = %e,
                    "Stored state is unreadable; starting fresh"
                );
                AppState::default()
            },
        };

        Self {
            state,
            store,
            transcript: vec![ChatMessage::assistant(GREETING)],
            degraded: false,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Conversation so far, starting with the greeting.
    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns true if the most recent save failed.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Applies an action and persists the result.
    pub fn dispatch(&mut self, action: Action) {
        self.dispatch_at(action, Utc::now());
    }

    /// Applies an action with an explicit clock and persists the result.
    pub fn dispatch_at(&mut self, action: Action, now: DateTime<Utc>) {
        tracing::debug!(action = action.name(), "Dispatching action");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action, now);
        self.persist();
    }

    fn persist(&mut self) {
        match self.store.save(&self.state) {
            Ok(()) => {
                if self.degraded {
                    tracing::info!(store = %self.store.describe(), "State persistence recovered");
                }
                self.degraded = false;
            },
            Err(e) => {
                tracing::warn!(
                    store = %self.store.describe(),
                    error = %e,
                    "Failed to persist state; keeping changes in memory"
                );
                self.degraded = true;
            },
        }
    }

    /// Adds a reminder on the user's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] if the title or due date is blank.
    pub fn add_reminder(
        &mut self,
        title: &str,
        due_date: &str,
        priority: Option<&str>,
    ) -> Result<&Reminder> {
        self.dispatch(Action::add_reminder(title, due_date, priority)?);
        self.state
            .reminders
            .last()
            .ok_or_else(|| missing_after_insert("add_reminder"))
    }

    /// Flips a reminder's completion flag and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no reminder has this identifier.
    pub fn complete_reminder(&mut self, id: &EntityId) -> Result<bool> {
        if self.state.reminder(id).is_none() {
            return Err(unknown_reminder(id));
        }
        self.dispatch(Action::ToggleReminder { id: id.clone() });
        Ok(self.state.reminder(id).is_some_and(|r| r.completed))
    }

    /// Deletes a reminder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no reminder has this identifier.
    pub fn delete_reminder(&mut self, id: &EntityId) -> Result<()> {
        if self.state.reminder(id).is_none() {
            return Err(unknown_reminder(id));
        }
        self.dispatch(Action::DeleteReminder { id: id.clone() });
        Ok(())
    }

    /// Resolves a full identifier or unique prefix to a reminder identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if nothing or more than one reminder
    /// matches.
    pub fn resolve_reminder(&self, id_or_prefix: &str) -> Result<EntityId> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return Err(Error::InvalidInput("reminder id is empty".to_string()));
        }
        let mut matches = self
            .state
            .reminders
            .iter()
            .filter(|r| r.id.as_str().starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(reminder), None) => Ok(reminder.id.clone()),
            (None, _) => Err(unknown_reminder(&EntityId::new(needle))),
            (Some(_), Some(_)) => Err(Error::InvalidInput(format!(
                "reminder id prefix '{needle}' is ambiguous"
            ))),
        }
    }

    /// Logs an expense on the user's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] for a negative or non-finite amount
    /// or a blank description.
    pub fn add_expense(
        &mut self,
        amount: f64,
        description: &str,
        category: Option<&str>,
    ) -> Result<&Expense> {
        self.dispatch(Action::add_expense(amount, description, category)?);
        self.state
            .expenses
            .last()
            .ok_or_else(|| missing_after_insert("add_expense"))
    }

    /// Files a document on the user's behalf.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] if the name or expiry date is blank.
    pub fn add_document(
        &mut self,
        name: &str,
        expiry_date: &str,
        kind: Option<&str>,
    ) -> Result<&Document> {
        self.dispatch(Action::add_document(name, expiry_date, kind)?);
        self.state
            .documents
            .last()
            .ok_or_else(|| missing_after_insert("add_document"))
    }

    /// Records a key fact about the user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] if the fact is blank.
    pub fn remember(&mut self, fact: &str) -> Result<()> {
        self.dispatch(Action::update_memory(fact)?);
        Ok(())
    }

    /// Runs one conversation turn and applies the resulting actions.
    ///
    /// The user's message and the reply are appended to the transcript only
    /// when the turn runs; blank or overlapping input leaves it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank utterance and
    /// [`Error::Busy`] if the orchestrator is already in a turn.
    pub fn send(&mut self, orchestrator: &Orchestrator, utterance: &str) -> Result<Turn> {
        let snapshot = self.state.clone();
        let turn = orchestrator.converse(utterance, &snapshot, |action| {
            self.dispatch(action.clone());
        })?;

        self.transcript.push(ChatMessage::user(utterance.trim()));
        self.transcript.push(ChatMessage::assistant(turn.reply.clone()));
        Ok(turn)
    }
}

fn unknown_reminder(id: &EntityId) -> Error {
    Error::InvalidInput(format!("no reminder with id '{id}'"))
}

fn missing_after_insert(operation: &str) -> Error {
    Error::OperationFailed {
        operation: operation.to_string(),
        cause: "inserted entity not found".to_string(),
    }
}
