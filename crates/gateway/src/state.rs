use std::sync::Arc;

use tb_contextpack::PromptBuilder;
use tb_domain::config::Config;
use tb_providers::LlmProvider;
use tb_sessions::SessionStore;

use crate::runtime::session_gate::SessionGates;

/// Shared application state passed to all API handlers.
#[derive(Clone)]
pub struct AppState {
    // ── Core services ─────────────────────────────────────────────────
    pub config: Arc<Config>,
    pub llm: Arc<dyn LlmProvider>,
    pub prompt: Arc<PromptBuilder>,

    // ── Session management ────────────────────────────────────────────
    pub sessions: Arc<SessionStore>,
    /// Serializes turns that target the same session.
    pub session_gates: Arc<SessionGates>,
}
