//! One chat turn: enter the session gate, build the prompt, call the model.
//!
//! [`run_turn`] stops short of writing to the transcript. It hands back the
//! model outcome together with a [`PendingTurn`] that still holds the session
//! gate, and the caller chooses whether to [`PendingTurn::commit`] a reply or
//! drop the turn. This keeps the decision about failed completions at the
//! HTTP/CLI boundary.

use std::time::Instant;

use tracing::Instrument;
use uuid::Uuid;

use tb_domain::chat::{Transcript, Turn};
use tb_domain::error::Result;
use tb_providers::{Completion, CompletionRequest};

use crate::runtime::session_gate::SessionGuard;
use crate::state::AppState;

/// Input for a single turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    /// Already resolved (defaults applied).
    pub session_id: String,
    pub message: String,
}

/// A turn whose model call has finished but whose exchange is not yet
/// stored. Holds the session gate until committed or dropped.
pub struct PendingTurn {
    state: AppState,
    message: String,
    turn_id: Uuid,
    guard: SessionGuard,
}

impl PendingTurn {
    pub fn session_id(&self) -> &str {
        self.guard.session_id()
    }

    /// Store the user message and `reply` as one exchange, then release the
    /// session gate. Returns the transcript as stored.
    pub fn commit(self, reply: impl Into<String>) -> Transcript {
        let transcript = self.state.sessions.append_exchange(
            self.guard.session_id(),
            Turn::user(self.message.as_str()),
            Turn::assistant(reply),
        );
        tracing::debug!(
            turn_id = %self.turn_id,
            session_id = %self.guard.session_id(),
            turns = transcript.len(),
            "turn committed"
        );
        transcript
    }
}

/// Run the model half of a turn.
///
/// Waits for any in-flight turn on the same session, snapshots the
/// transcript (creating the session if new), assembles the prompt and makes
/// exactly one completion call.
pub async fn run_turn(state: &AppState, input: TurnInput) -> (PendingTurn, Result<Completion>) {
    let turn_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "turn",
        %turn_id,
        session_id = %input.session_id,
        "otel.kind" = "SERVER",
    );

    async move {
        let guard = state.session_gates.enter(&input.session_id).await;

        let transcript = state.sessions.get_or_create(&input.session_id);
        let (prompt, report) = state.prompt.build(&transcript, &input.message);
        tracing::debug!(
            history_turns = report.history_turns,
            prompt_chars = report.total_chars,
            "prompt assembled"
        );

        let started = Instant::now();
        let result = state.llm.complete(&CompletionRequest::new(prompt)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(c) => tracing::info!(
                provider = %state.llm.provider_id(),
                model = %c.model,
                duration_ms,
                reply_chars = c.text.len(),
                "completion ok"
            ),
            Err(e) => tracing::warn!(
                provider = %state.llm.provider_id(),
                duration_ms,
                error = %e,
                "completion failed"
            ),
        }

        let pending = PendingTurn {
            state: state.clone(),
            message: input.message,
            turn_id,
            guard,
        };
        (pending, result)
    }
    .instrument(span)
    .await
}
