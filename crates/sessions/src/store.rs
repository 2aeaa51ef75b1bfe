//! Bounded per-session transcript store.
//!
//! Every write path enforces the `max_turns` window, so no transcript ever
//! holds more than `max_turns` turns. Sessions are created lazily and live
//! until the process exits; clearing empties a transcript but keeps its key.

use std::sync::Arc;

use tb_domain::chat::{Transcript, Turn};
use tb_domain::trace::TraceEvent;

use crate::backend::{MemoryBackend, TranscriptBackend};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct SessionStore {
    backend: Arc<dyn TranscriptBackend>,
    max_turns: usize,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn TranscriptBackend>, max_turns: usize) -> Self {
        Self { backend, max_turns }
    }

    /// Store backed by process memory.
    pub fn in_memory(max_turns: usize) -> Self {
        Self::new(Arc::new(MemoryBackend::new()), max_turns)
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Return the transcript for `session_id`, creating an empty session
    /// when the key has not been seen.
    pub fn get_or_create(&self, session_id: &str) -> Transcript {
        let mut snapshot = Transcript::new();
        let created = self
            .backend
            .update(session_id, &mut |t| snapshot = t.clone());
        if created {
            TraceEvent::SessionCreated {
                session_id: session_id.to_owned(),
            }
            .emit();
        }
        snapshot
    }

    /// Return the transcript for `session_id`; empty if absent. Never
    /// creates a session.
    pub fn get(&self, session_id: &str) -> Transcript {
        self.backend.load(session_id).unwrap_or_default()
    }

    /// Overwrite a session's transcript, trimming it to the window.
    pub fn replace(&self, session_id: &str, mut transcript: Transcript) {
        let trimmed = transcript.enforce_window(self.max_turns);
        if trimmed > 0 {
            tracing::debug!(session_id, trimmed, "transcript trimmed on replace");
        }
        self.backend.store(session_id, transcript);
    }

    /// Reset a session to an empty transcript. Idempotent; the key stays
    /// alive. Returns how many turns were dropped.
    pub fn clear(&self, session_id: &str) -> usize {
        let mut dropped = 0;
        self.backend.update(session_id, &mut |t| {
            dropped = t.len();
            *t = Transcript::new();
        });

        TraceEvent::SessionCleared {
            session_id: session_id.to_owned(),
            dropped_turns: dropped,
        }
        .emit();

        dropped
    }

    /// Append one user turn and one assistant turn, in that order, then
    /// trim to the window. Runs as a single update on the backend.
    ///
    /// Returns the transcript as stored.
    pub fn append_exchange(&self, session_id: &str, user: Turn, assistant: Turn) -> Transcript {
        let max_turns = self.max_turns;
        let mut trimmed = 0;
        let mut snapshot = Transcript::new();
        let mut pending = Some((user, assistant));

        self.backend.update(session_id, &mut |t| {
            if let Some((user, assistant)) = pending.take() {
                t.push(user);
                t.push(assistant);
            }
            trimmed = t.enforce_window(max_turns);
            snapshot = t.clone();
        });

        TraceEvent::TranscriptAppend {
            session_id: session_id.to_owned(),
            turns: snapshot.len(),
            trimmed,
        }
        .emit();

        snapshot
    }

    /// Number of sessions materialized so far.
    pub fn session_count(&self) -> usize {
        self.backend.session_count()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
