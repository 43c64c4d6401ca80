//! Conversation orchestrator.
//!
//! Turns one utterance into a reply plus zero or more validated actions.
//! A turn moves `Idle -> AwaitingModel -> (ApplyingActions ->) Idle` and
//! always ends in `Idle`, whatever the model does. Only one turn may be in
//! flight per orchestrator; overlapping calls are rejected with
//! [`Error::Busy`] before the model is contacted.
//!
//! Failures talking to the model never escape as errors: they become the
//! [`FAILURE_REPLY`] and leave the caller's state untouched.

use crate::llm::{ChatModel, ModelRequest, assistant_tools, build_system_instruction};
use crate::models::{Action, ActionRejection, AppState};
use crate::services::context::build_context;
use crate::{Error, Result};
use std::sync::atomic::{AtomicU8, Ordering};

/// Reply used when the model requested actions.
pub const ACKNOWLEDGEMENT_REPLY: &str = "I've updated that for you! Anything else I can help with?";

/// Reply used when the model answered with neither text nor actions.
pub const FALLBACK_REPLY: &str = "I'm here to help. Could you please rephrase that?";

/// Reply used when the model could not be reached or understood.
pub const FAILURE_REPLY: &str = "I'm having trouble connecting. Check your internet?";

/// Reply used when every requested action failed validation.
pub const REJECTED_REPLY: &str =
    "I couldn't save that. Could you share a few more details, like the date or amount?";

/// Where a turn currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TurnPhase {
    /// No turn in flight.
    Idle = 0,
    /// Waiting for the model.
    AwaitingModel = 1,
    /// Forwarding actions to the handler.
    ApplyingActions = 2,
}

impl TurnPhase {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::AwaitingModel,
            2 => Self::ApplyingActions,
            _ => Self::Idle,
        }
    }
}

/// How a turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The model requested actions; at least one was applied.
    ActionsApplied,
    /// The model requested actions but all were rejected.
    ActionsRejected,
    /// The model answered in free text.
    Replied,
    /// The model answered with nothing usable.
    NoContent,
    /// The model could not be reached or its answer could not be decoded.
    Failed,
}

/// Result of one conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Text to show the user.
    pub reply: String,
    /// How the turn ended.
    pub outcome: TurnOutcome,
    /// Actions forwarded to the handler, in order.
    pub applied: Vec<Action>,
    /// Actions that failed validation.
    pub rejected: Vec<ActionRejection>,
}

impl Turn {
    fn reply_only(reply: impl Into<String>, outcome: TurnOutcome) -> Self {
        Self {
            reply: reply.into(),
            outcome,
            applied: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Drives conversation turns against a chat model.
pub struct Orchestrator {
    model: Box<dyn ChatModel>,
    phase: AtomicU8,
}

impl Orchestrator {
    /// Creates an orchestrator around a chat model.
    #[must_use]
    pub fn new(model: impl ChatModel + 'static) -> Self {
        Self::from_boxed(Box::new(model))
    }

    /// Creates an orchestrator around an already boxed chat model.
    #[must_use]
    pub fn from_boxed(model: Box<dyn ChatModel>) -> Self {
        Self {
            model,
            phase: AtomicU8::new(TurnPhase::Idle as u8),
        }
    }

    /// Name of the underlying model provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.model.name()
    }

    /// Returns the current turn phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        TurnPhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    /// Returns true while a turn is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase() != TurnPhase::Idle
    }

    /// Runs one conversation turn.
    ///
    /// Each valid action is passed to `on_action` in the order the model
    /// issued it, before this method returns. Invalid actions are skipped
    /// and reported in [`Turn::rejected`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for a blank utterance and
    /// [`Error::Busy`] if another turn is in flight. Model failures are not
    /// errors; they produce a [`TurnOutcome::Failed`] turn.
    pub fn converse<F>(&self, utterance: &str, state: &AppState, mut on_action: F) -> Result<Turn>
    where
        F: FnMut(&Action),
    {
        if utterance.trim().is_empty() {
            return Err(Error::InvalidInput("utterance is empty".to_string()));
        }
        let guard = TurnGuard::acquire(&self.phase)?;

        let request = ModelRequest {
            system_instruction: build_system_instruction(&build_context(state)),
            utterance: utterance.to_string(),
            tools: assistant_tools(),
        };

        tracing::debug!(provider = self.model.name(), "Awaiting model response");
        let response = match self.model.generate(&request) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    provider = self.model.name(),
                    error = %e,
                    "Model call failed; replying with fallback"
                );
                return Ok(Turn::reply_only(FAILURE_REPLY, TurnOutcome::Failed));
            },
        };

        if response.tool_calls.is_empty() {
            return Ok(match response.non_empty_text() {
                Some(text) => Turn::reply_only(text, TurnOutcome::Replied),
                None => Turn::reply_only(FALLBACK_REPLY, TurnOutcome::NoContent),
            });
        }

        guard.advance(TurnPhase::ApplyingActions);
        let mut applied = Vec::new();
        let mut rejected = Vec::new();
        for request in &response.tool_calls {
            match Action::parse(request) {
                Ok(action) => {
                    tracing::info!(action = action.name(), "Applying model action");
                    on_action(&action);
                    applied.push(action);
                },
                Err(rejection) => {
                    tracing::warn!(
                        action = %rejection.action,
                        reason = %rejection.reason,
                        "Rejected model action"
                    );
                    rejected.push(rejection);
                },
            }
        }

        let (reply, outcome) = if applied.is_empty() {
            (REJECTED_REPLY, TurnOutcome::ActionsRejected)
        } else {
            (ACKNOWLEDGEMENT_REPLY, TurnOutcome::ActionsApplied)
        };
        Ok(Turn {
            reply: reply.to_string(),
            outcome,
            applied,
            rejected,
        })
    }
}

/// Holds the busy flag for one turn and resets it on drop.
struct TurnGuard<'a> {
    phase: &'a AtomicU8,
}

impl<'a> TurnGuard<'a> {
    fn acquire(phase: &'a AtomicU8) -> Result<Self> {
        phase
            .compare_exchange(
                TurnPhase::Idle as u8,
                TurnPhase::AwaitingModel as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| Error::Busy)?;
        Ok(Self { phase })
    }

    fn advance(&self, next: TurnPhase) {
        self.phase.store(next as u8, Ordering::Release);
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.phase.store(TurnPhase::Idle as u8, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ModelResponse;
    use crate::models::ActionRequest;
    use serde_json::json;
    use std::sync::Mutex;

    /// Model double that returns a canned response and records requests.
    struct CannedModel {
        response: Mutex<Option<Result<ModelResponse>>>,
        seen: Mutex<Vec<ModelRequest>>,
    }

    impl CannedModel {
        fn new(response: Result<ModelResponse>) -> Self {
            Self {
                response: Mutex::new(Some(response)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for CannedModel {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn generate(&self, request: &ModelRequest) -> Result<ModelResponse> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(request.clone());
            }
            self.response
                .lock()
                .ok()
                .and_then(|mut r| r.take())
                .unwrap_or_else(|| Ok(ModelResponse::default()))
        }
    }

    #[test]
    fn test_text_reply_is_verbatim() {
        let orchestrator = Orchestrator::new(CannedModel::new(Ok(ModelResponse::text(
            "Namaste! How can I help?",
        ))));
        let turn = orchestrator.converse("hi", &AppState::default(), |_| {});
        let turn = turn.unwrap();
        assert_eq!(turn.reply, "Namaste! How can I help?");
        assert_eq!(turn.outcome, TurnOutcome::Replied);
        assert!(turn.applied.is_empty());
    }

    #[test]
    fn test_provider_name_and_idle_phase() {
        let orchestrator = Orchestrator::new(CannedModel::new(Ok(ModelResponse::default())));
        assert_eq!(orchestrator.provider_name(), "canned");
        assert_eq!(orchestrator.phase(), TurnPhase::Idle);
    }

    #[test]
    fn test_empty_response_uses_fallback() {
        let orchestrator =
            Orchestrator::new(CannedModel::new(Ok(ModelResponse::text("   "))));
        let turn = orchestrator
            .converse("hmm", &AppState::default(), |_| {})
            .unwrap();
        assert_eq!(turn.reply, FALLBACK_REPLY);
        assert_eq!(turn.outcome, TurnOutcome::NoContent);
    }

    #[test]
    fn test_model_error_uses_failure_reply() {
        let orchestrator = Orchestrator::new(CannedModel::new(Err(Error::OperationFailed {
            operation: "canned_request".to_string(),
            cause: "timeout error".to_string(),
        })));
        let mut calls = 0;
        let turn = orchestrator
            .converse("hello", &AppState::default(), |_| calls += 1)
            .unwrap();
        assert_eq!(turn.reply, FAILURE_REPLY);
        assert_eq!(turn.outcome, TurnOutcome::Failed);
        assert_eq!(calls, 0);
        assert!(!orchestrator.is_busy());
    }

    #[test]
    fn test_actions_forwarded_in_order_with_ack() {
        let response = ModelResponse {
            text: Some("ignored free text".to_string()),
            tool_calls: vec![
                ActionRequest::new(
                    "add_reminder",
                    json!({"title": "Pay rent", "dueDate": "2024-05-01 10:00"}),
                ),
                ActionRequest::new("update_memory", json!({"fact": "User pays rent monthly"})),
            ],
        };
        let orchestrator = Orchestrator::new(CannedModel::new(Ok(response)));
        let mut names = Vec::new();
        let turn = orchestrator
            .converse("rent is due", &AppState::default(), |a| names.push(a.name()))
            .unwrap();

        assert_eq!(names, vec!["add_reminder", "update_memory"]);
        assert_eq!(turn.reply, ACKNOWLEDGEMENT_REPLY);
        assert_eq!(turn.outcome, TurnOutcome::ActionsApplied);
        assert_eq!(turn.applied.len(), 2);
    }

    #[test]
    fn test_invalid_action_is_skipped_not_fatal() {
        let response = ModelResponse::tool_calls(vec![
            ActionRequest::new("add_expense", json!({"description": "no amount"})),
            ActionRequest::new("add_expense", json!({"amount": 80, "description": "chai"})),
        ]);
        let orchestrator = Orchestrator::new(CannedModel::new(Ok(response)));
        let mut count = 0;
        let turn = orchestrator
            .converse("spent on chai", &AppState::default(), |_| count += 1)
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(turn.rejected.len(), 1);
        assert_eq!(turn.outcome, TurnOutcome::ActionsApplied);
    }

    #[test]
    fn test_all_rejected_uses_rejected_reply() {
        let response =
            ModelResponse::tool_calls(vec![ActionRequest::new("add_reminder", json!({}))]);
        let orchestrator = Orchestrator::new(CannedModel::new(Ok(response)));
        let turn = orchestrator
            .converse("remind me", &AppState::default(), |_| {})
            .unwrap();
        assert_eq!(turn.reply, REJECTED_REPLY);
        assert_eq!(turn.outcome, TurnOutcome::ActionsRejected);
    }

    #[test]
    fn test_blank_utterance_rejected_without_model_call() {
        let model = std::sync::Arc::new(CannedModel::new(Ok(ModelResponse::text("hi"))));
        let orchestrator = Orchestrator::new(std::sync::Arc::clone(&model));
        let result = orchestrator.converse("   ", &AppState::default(), |_| {});
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(model.seen.lock().map(|s| s.len()).unwrap_or(usize::MAX), 0);
    }

    #[test]
    fn test_request_carries_context_and_tools() {
        let model = std::sync::Arc::new(CannedModel::new(Ok(ModelResponse::text("ok"))));
        let orchestrator = Orchestrator::new(std::sync::Arc::clone(&model));
        let mut state = AppState::default();
        state.memory.name = "Arjun".to_string();
        let _ = orchestrator.converse("hello", &state, |_| {});

        let seen = model.seen.lock().map(|s| s.clone()).unwrap_or_default();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].utterance, "hello");
        assert!(seen[0].system_instruction.contains("User Name: Arjun"));
        assert_eq!(seen[0].tools.len(), 4);
    }

    #[test]
    fn test_overlapping_turn_is_busy() {
        let orchestrator = Orchestrator::new(CannedModel::new(Ok(ModelResponse::tool_calls(
            vec![ActionRequest::new("update_memory", json!({"fact": "x"}))],
        ))));
        let mut nested = None;
        let _ = orchestrator.converse("first", &AppState::default(), |_| {
            assert_eq!(orchestrator.phase(), TurnPhase::ApplyingActions);
            nested = Some(orchestrator.converse("second", &AppState::default(), |_| {}));
        });
        assert!(matches!(nested, Some(Err(Error::Busy))));
        assert_eq!(orchestrator.phase(), TurnPhase::Idle);
    }
}
