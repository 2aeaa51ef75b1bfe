use serde::Serialize;

/// Structured trace events emitted across all TutorBot crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    PromptBuilt {
        history_turns: usize,
        total_chars: usize,
    },
    LlmRequest {
        provider: String,
        model: String,
        duration_ms: u64,
        ok: bool,
        prompt_tokens: Option<u32>,
        completion_tokens: Option<u32>,
    },
    SessionCreated {
        session_id: String,
    },
    SessionCleared {
        session_id: String,
        dropped_turns: usize,
    },
    TranscriptAppend {
        session_id: String,
        turns: usize,
        trimmed: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "tb_event");
    }
}
